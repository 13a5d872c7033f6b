use std::fmt;

/// Separator between entries of both the allowed-id list and the output.
pub const CMDS_SEPARATOR: &str = ", ";

/// A detected result code.
///
/// Catalog codes are positive decimals such as `3234` or `8.01`. Negative
/// values are reserved sentinels and never come from the catalog.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Code(f32);

impl Code {
    /// A negation marker ("don't") was read at this point of the sentence.
    pub const DONT: Code = Code(-1.0);
    /// An "it" whose referent could not be resolved.
    pub const WHATS_IT: Code = Code(-10.0);

    pub const fn new(value: f32) -> Self {
        Self(value)
    }

    /// True for catalog codes, false for sentinels.
    pub fn is_command(self) -> bool {
        self.0 > 0.0
    }
}

impl From<f32> for Code {
    fn from(value: f32) -> Self {
        Self(value)
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Render codes in read order, joined by [`CMDS_SEPARATOR`].
pub fn join_codes(codes: &[Code]) -> String {
    codes
        .iter()
        .map(Code::to_string)
        .collect::<Vec<_>>()
        .join(CMDS_SEPARATOR)
}
