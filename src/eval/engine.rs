//! Single-pass command scan over a normalized sentence.

use log::{debug, trace, warn};

use crate::catalog::{CommandCatalog, CommandSpec};
use crate::error::{DetectError, DetectResult};
use crate::eval::Code;
use crate::eval::condition::{evaluate, gates_pass};
use crate::oracle::{MatchResult, SubVerifier};

/// Tokens with a fixed meaning, never looked up in the catalog.
#[derive(Debug, Clone, Copy)]
pub struct Markers<'a> {
    pub negation: &'a str,
    pub anaphora: &'a str,
}

/// Resolve allowed ids to catalog records, in the caller's order.
///
/// Non-positive ids and ids above the highest catalog id are usage faults.
/// An id inside the range with no catalog entry is skipped.
pub fn resolve_allowed<'c>(
    catalog: &'c CommandCatalog,
    allowed: &[i64],
) -> DetectResult<Vec<&'c CommandSpec>> {
    let highest = i64::from(catalog.highest_id());
    let mut specs = Vec::with_capacity(allowed.len());
    for &id in allowed {
        if id <= 0 {
            return Err(DetectError::FaultyCatalogUsage {
                id,
                reason: "non-positive command identifier sent for detection",
            });
        }
        if id > highest {
            return Err(DetectError::FaultyCatalogUsage {
                id,
                reason: "command identifier above highest value sent for detection",
            });
        }
        // id is within 1..=highest, so it fits in u32
        match catalog.get(id as u32) {
            Some(spec) => specs.push(spec),
            None => warn!("command {id} is not in the catalog, skipping"),
        }
    }
    Ok(specs)
}

/// Scan tokens left to right and collect result codes.
///
/// Every token is visited once. A token may contribute several codes when it
/// triggers more than one allowed command; they follow the order of `commands`.
pub fn scan(
    tokens: &[String],
    commands: &[&CommandSpec],
    verifier: &dyn SubVerifier,
    markers: Markers<'_>,
) -> DetectResult<Vec<Code>> {
    let mut codes = Vec::new();

    for (position, token) in tokens.iter().enumerate() {
        if token == markers.negation {
            codes.push(Code::DONT);
            continue;
        }
        if token == markers.anaphora {
            codes.push(Code::WHATS_IT);
            continue;
        }

        for spec in commands.iter().filter(|s| s.pattern.is_trigger(token)) {
            let result = verifier
                .verify(tokens, position, &spec.pattern)?
                .unwrap_or_else(|| MatchResult::empty(spec.pattern.roles()));
            trace!("{token:?}@{position} -> command {}: {:?}", spec.id, result.roles());

            if !gates_pass(spec, &result, token) {
                trace!("command {} gated out at {position}", spec.id);
                continue;
            }
            if let Some(code) = evaluate(&result, token, &spec.returns) {
                debug!("{token:?}@{position} -> {code} ({})", spec.name);
                codes.push(code);
            }
        }
    }

    Ok(codes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AlternativeDef, CommandDef, SubConditionDef};
    use crate::oracle::WindowVerifier;

    const MARKERS: Markers<'static> = Markers {
        negation: "don't",
        anaphora: "whats_it",
    };

    fn toks(sentence: &str) -> Vec<String> {
        sentence.split(' ').map(String::from).collect()
    }

    fn role_is(role: usize, words: &[&str]) -> SubConditionDef {
        SubConditionDef {
            role: Some(role),
            any_of: words.iter().map(|w| w.to_string()).collect(),
            ..Default::default()
        }
    }

    fn present(role: usize) -> SubConditionDef {
        SubConditionDef {
            role: Some(role),
            present: true,
            ..Default::default()
        }
    }

    fn wifi(id: i64) -> CommandDef {
        CommandDef {
            id,
            name: "wifi".into(),
            triggers: vec!["on".into()],
            vocabulary: vec![vec!["wifi".into()]],
            left: 2,
            right: 2,
            ignore_repeated_triggers: true,
            returns: vec![AlternativeDef {
                when: vec![role_is(0, &["wifi"])],
                code: 3234.0,
            }],
            ..Default::default()
        }
    }

    fn catalog(defs: &[CommandDef]) -> CommandCatalog {
        CommandCatalog::from_defs(defs).unwrap()
    }

    fn run(catalog: &CommandCatalog, sentence: &str, allowed: &[i64]) -> DetectResult<Vec<Code>> {
        let commands = resolve_allowed(catalog, allowed)?;
        scan(&toks(sentence), &commands, &WindowVerifier::new(vec![]), MARKERS)
    }

    fn codes(values: &[f32]) -> Vec<Code> {
        values.iter().copied().map(Code::new).collect()
    }

    #[test]
    fn single_command() {
        let c = catalog(&[wifi(1)]);
        assert_eq!(run(&c, "turn on wifi", &[1]).unwrap(), codes(&[3234.0]));
    }

    #[test]
    fn restated_then_negated_scan() {
        let c = catalog(&[wifi(1)]);
        assert_eq!(
            run(&c, "turn on wifi no don't turn wifi on", &[1]).unwrap(),
            codes(&[3234.0, -1.0, 3234.0])
        );
    }

    #[test]
    fn no_trigger_no_codes() {
        let c = catalog(&[wifi(1)]);
        assert!(run(&c, "what a lovely day", &[1]).unwrap().is_empty());
    }

    #[test]
    fn command_not_allowed_is_ignored() {
        let mut other = wifi(2);
        other.triggers = vec!["lights".into()];
        let c = catalog(&[wifi(1), other]);
        assert!(run(&c, "turn on wifi", &[2]).unwrap().is_empty());
    }

    #[test]
    fn markers_emit_sentinels() {
        let c = catalog(&[wifi(1)]);
        assert_eq!(
            run(&c, "don't turn whats_it on", &[1]).unwrap(),
            codes(&[-1.0, -10.0])
        );
    }

    #[test]
    fn zero_id_is_usage_fault() {
        let c = catalog(&[wifi(1)]);
        assert!(matches!(
            run(&c, "turn on wifi", &[0]),
            Err(DetectError::FaultyCatalogUsage { id: 0, .. })
        ));
    }

    #[test]
    fn id_above_highest_is_usage_fault() {
        let c = catalog(&[wifi(1)]);
        assert!(matches!(
            run(&c, "turn on wifi", &[1, 2]),
            Err(DetectError::FaultyCatalogUsage { id: 2, .. })
        ));
    }

    #[test]
    fn usage_fault_even_without_triggers() {
        let c = catalog(&[wifi(1)]);
        assert!(run(&c, "", &[-4]).is_err());
    }

    #[test]
    fn gap_in_catalog_is_skipped() {
        let c = catalog(&[wifi(1), wifi(3)]);
        assert_eq!(run(&c, "on wifi", &[2, 3]).unwrap(), codes(&[3234.0]));
    }

    #[test]
    fn shared_trigger_follows_allowed_order() {
        let mut second = wifi(2);
        second.returns[0].code = 2.0;
        let c = catalog(&[wifi(1), second]);
        assert_eq!(run(&c, "on wifi", &[2, 1]).unwrap(), codes(&[2.0, 3234.0]));
        assert_eq!(run(&c, "on wifi", &[1, 2]).unwrap(), codes(&[3234.0, 2.0]));
    }

    #[test]
    fn continue_gate_filters() {
        let mut d = wifi(1);
        d.vocabulary.push(vec!["please".into()]);
        d.continue_if = vec![vec![present(1)]];
        let c = catalog(&[d]);
        assert!(run(&c, "on wifi", &[1]).unwrap().is_empty());
        assert_eq!(run(&c, "on wifi please", &[1]).unwrap(), codes(&[3234.0]));
    }

    #[test]
    fn skip_gate_filters() {
        let mut d = wifi(1);
        d.vocabulary.push(vec!["never".into()]);
        d.skip_if = vec![vec![present(1)]];
        let c = catalog(&[d]);
        assert_eq!(run(&c, "on wifi", &[1]).unwrap(), codes(&[3234.0]));
        assert!(run(&c, "never on wifi", &[1]).unwrap().is_empty());
    }

    #[test]
    fn unconditional_fires_without_vocabulary_match() {
        let d = CommandDef {
            id: 1,
            triggers: vec!["stop".into()],
            vocabulary: vec![vec!["music".into()]],
            right: 2,
            returns: vec![
                AlternativeDef {
                    when: vec![role_is(0, &["music"])],
                    code: 1.01,
                },
                AlternativeDef {
                    when: vec![],
                    code: 1.0,
                },
            ],
            ..Default::default()
        };
        let c = catalog(&[d]);
        assert_eq!(run(&c, "stop", &[1]).unwrap(), codes(&[1.0]));
        assert_eq!(run(&c, "stop the music", &[1]).unwrap(), codes(&[1.01]));
    }

    #[test]
    fn each_trigger_occurrence_evaluated() {
        let c = catalog(&[wifi(1)]);
        assert_eq!(
            run(&c, "on wifi on wifi", &[1]).unwrap(),
            codes(&[3234.0, 3234.0])
        );
    }

    struct FailingVerifier;

    impl SubVerifier for FailingVerifier {
        fn verify(
            &self,
            _: &[String],
            _: usize,
            _: &crate::catalog::Pattern,
        ) -> DetectResult<Option<MatchResult>> {
            Err(DetectError::Collaborator("oracle unavailable".into()))
        }
    }

    #[test]
    fn verifier_fault_propagates() {
        let c = catalog(&[wifi(1)]);
        let commands = resolve_allowed(&c, &[1]).unwrap();
        let err = scan(&toks("turn on wifi"), &commands, &FailingVerifier, MARKERS).unwrap_err();
        assert_eq!(err, DetectError::Collaborator("oracle unavailable".into()));
    }
}
