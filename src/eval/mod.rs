pub mod code;
pub mod condition;
pub mod dedup;
pub mod engine;
pub mod negation;

pub use code::{CMDS_SEPARATOR, Code, join_codes};
pub use dedup::dedupe;
pub use engine::Markers;
pub use negation::resolve;

use std::panic::{self, AssertUnwindSafe};

use log::debug;

use crate::catalog::CommandCatalog;
use crate::config::Config;
use crate::error::{CatalogError, DetectError, DetectResult};
use crate::oracle::{SubVerifier, WindowVerifier};
use crate::parse::{self, BasicNormalizer, Normalizer};

/// Prefix of every failed [`Detector::detect_str`] result.
pub const ERR_CMD_DETECT: &str = "ERR_CMD_DETECT - ";

/// The full pipeline: normalize, scan, resolve negation, optionally dedupe.
///
/// A detector holds only read-only state, so one instance can serve any
/// number of calls.
pub struct Detector {
    catalog: CommandCatalog,
    normalizer: Box<dyn Normalizer>,
    verifier: Box<dyn SubVerifier>,
    negation_marker: String,
    anaphora_marker: String,
    collapse_repeats: bool,
}

impl Detector {
    /// Build the catalog and default collaborators from configuration.
    pub fn from_config(config: &Config) -> Result<Self, CatalogError> {
        let catalog = CommandCatalog::from_config(config)?;
        let settings = &config.settings;
        let normalizer = BasicNormalizer::new(
            catalog.referents(),
            &settings.negation_marker,
            &settings.anaphora_marker,
        );
        let verifier = WindowVerifier::new(vec![
            settings.negation_marker.clone(),
            settings.anaphora_marker.clone(),
        ]);

        Ok(Self {
            catalog,
            normalizer: Box::new(normalizer),
            verifier: Box::new(verifier),
            negation_marker: settings.negation_marker.clone(),
            anaphora_marker: settings.anaphora_marker.clone(),
            collapse_repeats: settings.collapse_repeats,
        })
    }

    /// Replace the sentence normalizer.
    pub fn with_normalizer(mut self, normalizer: impl Normalizer + 'static) -> Self {
        self.normalizer = Box::new(normalizer);
        self
    }

    /// Replace the sub-verification oracle.
    pub fn with_verifier(mut self, verifier: impl SubVerifier + 'static) -> Self {
        self.verifier = Box::new(verifier);
        self
    }

    /// Override the collapse_repeats setting (e.g. from --dedupe CLI flag).
    pub fn set_collapse_repeats(&mut self, collapse: bool) {
        self.collapse_repeats = collapse;
    }

    pub fn catalog(&self) -> &CommandCatalog {
        &self.catalog
    }

    /// Detect commands in `sentence`, restricted to a `", "`-separated id list.
    pub fn detect(&self, sentence: &str, allowed_ids: &str) -> DetectResult<Vec<Code>> {
        self.detect_ids(sentence, &parse::parse_allowed(allowed_ids))
    }

    /// Detect commands in `sentence`, restricted to `allowed` ids.
    pub fn detect_ids(&self, sentence: &str, allowed: &[i64]) -> DetectResult<Vec<Code>> {
        let commands = engine::resolve_allowed(&self.catalog, allowed)?;
        let tokens = self.normalizer.normalize(sentence)?;
        debug!("tokens: {tokens:?}");

        let markers = Markers {
            negation: &self.negation_marker,
            anaphora: &self.anaphora_marker,
        };
        let raw = engine::scan(&tokens, &commands, self.verifier.as_ref(), markers)?;
        let resolved = negation::resolve(&raw);

        Ok(if self.collapse_repeats {
            dedup::dedupe(&resolved)
        } else {
            resolved
        })
    }

    /// String form of [`detect`](Self::detect): joined codes on success,
    /// [`ERR_CMD_DETECT`] followed by the fault otherwise.
    ///
    /// Panics from plugged-in collaborators are reported the same way.
    pub fn detect_str(&self, sentence: &str, allowed_ids: &str) -> String {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.detect(sentence, allowed_ids)))
            .unwrap_or_else(|payload| {
                Err(DetectError::Collaborator(panic_message(payload.as_ref())))
            });
        match outcome {
            Ok(codes) => join_codes(&codes),
            Err(e) => format!("{ERR_CMD_DETECT}{e}"),
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic during detection".into()
    }
}
