//! cmds-detect: finds catalog commands in natural-language sentences.
//!
//! A sentence (typically speech-recognition output) is normalized into
//! tokens and scanned once. Every token that triggers an allowed command
//! is handed to a sub-verification oracle, which collects related words
//! around it. The command's gates and condition tree then turn those words
//! into a result code. Negation markers cancel the commands they refer to,
//! and an optional pass collapses immediate repeats.
//!
//! # Architecture
//!
//! - **[`parse`]**: Sentence normalization and the allowed-id list parser.
//! - **[`catalog`]**: Immutable command records, gates, condition trees.
//! - **[`oracle`]**: Sub-verification trait and the default window scanner.
//! - **[`eval`]**: Engine, condition evaluator, negation resolver, deduplicator, [`Detector`].
//! - **[`config`]**: Configuration loading: embedded defaults + user overlay merge.
//! - **[`logging`]**: Detection log at `~/.local/share/cmds-detect/detect.log`.

/// Command catalog: records, gates, and condition trees.
pub mod catalog;
/// Configuration types, loading, and overlay merge logic.
pub mod config;
/// Error taxonomy.
pub mod error;
/// Detection pipeline: engine, evaluator, negation, dedupe.
pub mod eval;
/// File-based detection logging.
pub mod logging;
/// Sub-verification oracle.
pub mod oracle;
/// Sentence normalization and allowed-id parsing.
pub mod parse;

pub use error::{CatalogError, DetectError, DetectResult};
pub use eval::{CMDS_SEPARATOR, Code, Detector, ERR_CMD_DETECT};

/// Build a detector from the default config and detect commands.
///
/// This is the main entry point for tests and simple usage.
/// For user config or custom collaborators, build a [`Detector`] directly.
pub fn detect(sentence: &str, allowed_ids: &str) -> DetectResult<Vec<Code>> {
    let config = config::Config::default_config();
    Detector::from_config(&config)?.detect(sentence, allowed_ids)
}

/// String-convention variant of [`detect`]: joined codes, or
/// [`ERR_CMD_DETECT`] followed by the fault.
pub fn detect_str(sentence: &str, allowed_ids: &str) -> String {
    let config = config::Config::default_config();
    match Detector::from_config(&config) {
        Ok(detector) => detector.detect_str(sentence, allowed_ids),
        Err(e) => format!("{ERR_CMD_DETECT}{}", DetectError::from(e)),
    }
}
