//! Negation resolution over a detected code sequence.
//!
//! Each [`Code::DONT`] cancels a command. When the code right after it was
//! already stated earlier, every earlier copy and the restatement go away.
//! Otherwise the command just before the marker goes away. Sentinels are
//! never cancelled by this rule.
//!
//! The rule is a heuristic. Sentences that repeat the same command many times
//! around several negations can resolve differently from what a listener
//! would understand.

use log::{debug, trace};

use crate::eval::Code;

/// Remove negation markers and the commands they cancel.
///
/// Marking happens on a scratch copy where cancelled slots become `None`;
/// survivors are compacted at the end in their original order. A cancelled
/// slot no longer counts as a command for later markers.
pub fn resolve(codes: &[Code]) -> Vec<Code> {
    let mut slots: Vec<Option<Code>> = codes.iter().copied().map(Some).collect();

    for p in 0..slots.len() {
        if slots[p] != Some(Code::DONT) {
            continue;
        }
        slots[p] = None;

        let mut cancel_previous = true;
        if let Some(next) = slots.get(p + 1).copied().flatten().filter(|c| c.is_command()) {
            let earlier: Vec<usize> = (0..=p).filter(|&i| slots[i] == Some(next)).collect();
            if !earlier.is_empty() {
                trace!("don't at {p}: {next} restated, cancelling {} earlier", earlier.len());
                slots[p + 1] = None;
                for i in earlier {
                    slots[i] = None;
                }
                cancel_previous = false;
            }
        }

        if cancel_previous && p > 0 && slots[p - 1].is_some_and(Code::is_command) {
            trace!("don't at {p}: cancelling preceding command");
            slots[p - 1] = None;
        }
    }

    let resolved: Vec<Code> = slots.into_iter().flatten().collect();
    debug!("negation: {codes:?} -> {resolved:?}");
    resolved
}
