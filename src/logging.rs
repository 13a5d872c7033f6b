use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};

/// Env var selecting the log level (`error` .. `trace`, or `off`).
pub const LOG_LEVEL_ENV: &str = "CMDS_DETECT_LOG";

/// Route `log` output to ~/.local/share/cmds-detect/detect.log.
/// Best-effort: failures leave logging disabled (logging must never block detection).
pub fn init() {
    let Some(home) = std::env::var_os("HOME") else {
        return;
    };
    let log_dir = std::path::Path::new(&home).join(".local/share/cmds-detect");
    let _ = std::fs::create_dir_all(&log_dir);

    let Ok(file) = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("detect.log"))
    else {
        return;
    };

    let level = parse_level(std::env::var(LOG_LEVEL_ENV).ok().as_deref());
    let config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let _ = WriteLogger::init(level, config, file);
}

/// Level from an env value, defaulting to `Info` when unset or unparseable.
fn parse_level(raw: Option<&str>) -> LevelFilter {
    raw.and_then(|v| v.trim().parse().ok())
        .unwrap_or(LevelFilter::Info)
}

/// Record one detection: the sentence (truncated) and the outcome string.
pub fn log_detection(sentence: &str, outcome: &str) {
    let sentence_truncated: String = sentence.chars().take(200).collect();
    // Compact single-line sentence for the log
    let sentence_oneline = sentence_truncated.replace('\n', " ");
    log::info!("{sentence_oneline}\t{outcome}");
}
