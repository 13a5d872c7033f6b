//! Optional pass that collapses immediately repeated codes.
//!
//! Nearby repeated vocabulary can make the engine report the same command
//! several times in a row. Collapsing runs fixes that, at the cost of also
//! merging commands the speaker really did repeat back to back.

use crate::eval::Code;

/// Drop every code that equals its immediate successor, so `[a, a, a, b]`
/// becomes `[a, b]`.
pub fn dedupe(codes: &[Code]) -> Vec<Code> {
    let mut out = codes.to_vec();
    out.dedup();
    out
}
