use serde::{Deserialize, Serialize};

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

/// Env var that overrides the user overlay location.
pub const CONFIG_PATH_ENV: &str = "CMDS_DETECT_CONFIG";

// ── Final (merged) config types ──

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default, rename = "command")]
    pub commands: Vec<CommandDef>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Settings {
    /// Run the repeat-collapsing pass after negation resolution.
    #[serde(default)]
    pub collapse_repeats: bool,
    /// Token that stands for "don't" once the sentence is normalized.
    #[serde(default = "default_negation_marker")]
    pub negation_marker: String,
    /// Token left in place of an `it` that could not be resolved.
    #[serde(default = "default_anaphora_marker")]
    pub anaphora_marker: String,
}

fn default_negation_marker() -> String {
    "don't".into()
}

fn default_anaphora_marker() -> String {
    "whats_it".into()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            collapse_repeats: false,
            negation_marker: default_negation_marker(),
            anaphora_marker: default_anaphora_marker(),
        }
    }
}

/// One catalog entry as written in TOML. Validated into a
/// [`CommandSpec`](crate::catalog::CommandSpec) by the catalog.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct CommandDef {
    pub id: i64,
    #[serde(default)]
    pub name: String,
    /// Nouns a later "it" may stand for.
    #[serde(default)]
    pub referents: Vec<String>,
    #[serde(default)]
    pub triggers: Vec<String>,
    /// One word list per role.
    #[serde(default)]
    pub vocabulary: Vec<Vec<String>>,
    #[serde(default)]
    pub left: usize,
    #[serde(default)]
    pub right: usize,
    /// Per-role scan start, relative to the trigger position.
    #[serde(default)]
    pub starts: Vec<isize>,
    #[serde(default)]
    pub exclude_trigger: bool,
    #[serde(default)]
    pub last_match: bool,
    #[serde(default)]
    pub ignore_repeated_triggers: bool,
    #[serde(default)]
    pub ignore_repeated_commands: bool,
    #[serde(default)]
    pub ordered: bool,
    #[serde(default)]
    pub stop_at_first_unmatched: bool,
    #[serde(default)]
    pub exclude_trigger_words: bool,
    #[serde(default)]
    pub continue_with_role: Option<usize>,
    #[serde(default)]
    pub continue_if: Vec<Vec<SubConditionDef>>,
    #[serde(default)]
    pub skip_if: Vec<Vec<SubConditionDef>>,
    #[serde(default)]
    pub returns: Vec<AlternativeDef>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct SubConditionDef {
    #[serde(default)]
    pub role: Option<usize>,
    #[serde(default)]
    pub trigger: bool,
    #[serde(default)]
    pub any_of: Vec<String>,
    #[serde(default)]
    pub present: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AlternativeDef {
    #[serde(default)]
    pub when: Vec<SubConditionDef>,
    pub code: f32,
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
struct ConfigOverlay {
    #[serde(default)]
    settings: SettingsOverlay,
    #[serde(default)]
    catalog: CatalogOverlay,
    #[serde(default)]
    command: Vec<CommandDef>,
}

#[derive(Debug, Deserialize, Default)]
struct SettingsOverlay {
    collapse_repeats: Option<bool>,
    negation_marker: Option<String>,
    anaphora_marker: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
struct CatalogOverlay {
    #[serde(default)]
    replace: bool,
    #[serde(default)]
    remove: Vec<i64>,
}

// ── Merge logic ──

/// Merge user commands into the default catalog.
/// In replace mode: user commands replace the defaults entirely.
/// In merge mode: drop removed ids, then add or replace by id.
fn merge_commands(base: &mut Vec<CommandDef>, add: Vec<CommandDef>, remove: &[i64], replace: bool) {
    if replace {
        *base = add;
        return;
    }
    base.retain(|cmd| !remove.contains(&cmd.id));
    for cmd in add {
        match base.iter_mut().find(|c| c.id == cmd.id) {
            Some(existing) => *existing = cmd,
            None => base.push(cmd),
        }
    }
}

impl Config {
    /// Load the default embedded configuration.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Load configuration with resolution order:
    /// 1. Start with embedded defaults
    /// 2. Merge user overlay from `$CMDS_DETECT_CONFIG` or
    ///    ~/.config/cmds-detect/config.toml (if exists)
    ///
    /// Settings override individually. Commands add or replace by id.
    /// `[catalog] remove = [..]` drops default ids; `replace = true` drops them all.
    pub fn load() -> Self {
        let mut config = Self::default_config();
        if let Some(overlay) = Self::load_overlay() {
            config.apply_overlay(overlay);
        }
        config
    }

    fn overlay_path() -> Option<std::path::PathBuf> {
        if let Some(raw) = std::env::var_os(CONFIG_PATH_ENV) {
            let raw = raw.to_string_lossy().into_owned();
            return match shellexpand::full(&raw) {
                Ok(expanded) => Some(expanded.into_owned().into()),
                Err(e) => {
                    eprintln!("cmds-detect: cannot expand {CONFIG_PATH_ENV}: {e}");
                    None
                }
            };
        }
        let home = std::env::var_os("HOME")?;
        Some(std::path::Path::new(&home).join(".config/cmds-detect/config.toml"))
    }

    /// Try to load the user overlay.
    fn load_overlay() -> Option<ConfigOverlay> {
        let path = Self::overlay_path()?;
        let content = std::fs::read_to_string(path).ok()?;
        match toml::from_str(&content) {
            Ok(overlay) => Some(overlay),
            Err(e) => {
                eprintln!("cmds-detect: config parse error: {e}");
                None
            }
        }
    }

    /// Apply an overlay on top of this config (merge semantics).
    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        let s = overlay.settings;
        if let Some(v) = s.collapse_repeats {
            self.settings.collapse_repeats = v;
        }
        if let Some(v) = s.negation_marker {
            self.settings.negation_marker = v;
        }
        if let Some(v) = s.anaphora_marker {
            self.settings.anaphora_marker = v;
        }

        merge_commands(
            &mut self.commands,
            overlay.command,
            &overlay.catalog.remove,
            overlay.catalog.replace,
        );
    }

    /// Apply an overlay from a TOML string. Used for testing.
    #[cfg(test)]
    fn apply_overlay_str(&mut self, toml_str: &str) {
        let overlay: ConfigOverlay = toml::from_str(toml_str).unwrap();
        self.apply_overlay(overlay);
    }
}
