//! cmds-detect: command detection for voice-assistant sentences.
//!
//! Reads `{"sentence": "...", "allowed_cmds": "1, 2"}` from stdin and
//! writes `{"result": "..."}` to stdout. A result starting with
//! `ERR_CMD_DETECT - ` is a failure; anything else is the `", "`-joined
//! list of detected codes (possibly empty).
//!
//! Flags:
//!   --dump-config   print the merged configuration as TOML and exit
//!   --list          print every catalog id as an allowed-commands list and exit
//!   --dedupe        collapse immediately repeated codes

use cmds_detect::Detector;
use cmds_detect::config::Config;
use cmds_detect::logging;
use serde::Deserialize;
use std::io::Read;

#[derive(Deserialize)]
struct DetectInput {
    sentence: Option<String>,
    allowed_cmds: Option<String>,
}

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let has_flag = |flag: &str| args.iter().any(|a| a == flag);

    let config = Config::load();

    if has_flag("--dump-config") {
        match toml::to_string_pretty(&config) {
            Ok(s) => print!("{s}"),
            Err(e) => {
                eprintln!("cmds-detect: cannot serialize config: {e}");
                std::process::exit(1);
            }
        }
        return;
    }

    logging::init();

    let mut detector = match Detector::from_config(&config) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("cmds-detect: invalid catalog: {e}");
            std::process::exit(1);
        }
    };
    if has_flag("--dedupe") {
        detector.set_collapse_repeats(true);
    }

    if has_flag("--list") {
        println!("{}", detector.catalog().all_ids());
        return;
    }

    let mut input = String::new();
    if std::io::stdin().read_to_string(&mut input).is_err() {
        eprintln!("failed to read stdin");
        std::process::exit(1);
    }

    let request: DetectInput = match serde_json::from_str(&input) {
        Ok(v) => v,
        Err(e) => {
            eprintln!("JSON parse error: {e}");
            std::process::exit(1);
        }
    };

    let sentence = request.sentence.unwrap_or_default();
    let allowed = request
        .allowed_cmds
        .unwrap_or_else(|| detector.catalog().all_ids());

    let result = detector.detect_str(&sentence, &allowed);
    logging::log_detection(&sentence, &result);

    let output = serde_json::json!({ "result": result });
    println!("{output}");
}
