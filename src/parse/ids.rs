use log::warn;

use crate::eval::CMDS_SEPARATOR;

/// Parse an allowed-commands list such as `"1, 3, 12"`.
///
/// Entries that are not integers are skipped with a warning. Range checks
/// belong to the engine, so `0` and negative numbers are kept here.
pub fn parse_allowed(list: &str) -> Vec<i64> {
    list.split(CMDS_SEPARATOR)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| match entry.parse::<i64>() {
            Ok(id) => Some(id),
            Err(e) => {
                warn!("ignoring allowed command entry {entry:?}: {e}");
                None
            }
        })
        .collect()
}
