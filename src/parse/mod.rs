pub mod ids;
pub mod normalize;

pub use ids::parse_allowed;
pub use normalize::BasicNormalizer;

use crate::error::DetectResult;

/// Turns a raw sentence into tokens ready for literal comparison.
///
/// Implementations must produce the catalog's negation marker for "don't"
/// and resolve pronouns where they can.
pub trait Normalizer: Send + Sync {
    fn normalize(&self, sentence: &str) -> DetectResult<Vec<String>>;
}
