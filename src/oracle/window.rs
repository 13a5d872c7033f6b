//! Window-scanning verifier.
//!
//! For a trigger at `p`, each role scans the window `[p - left, p + right]`
//! for words of its vocabulary list. Pattern flags narrow the window or
//! the scan range:
//!
//! 1. `ignore_repeated_triggers` / `ignore_repeated_commands` clip the window
//!    just inside the nearest other trigger occurrence on each side.
//! 2. A role's scan starts at `p + starts[role]` when given.
//! 3. `ordered` starts each role after the previous matched role.
//! 4. `continue_with_role = k` starts every role after `k` right after
//!    role `k`'s match.
//! 5. `exclude_trigger` / `exclude_trigger_words` skip the trigger position
//!    and any trigger word.
//! 6. `last_match` keeps only the last hit; `stop_at_first_unmatched`
//!    empties every role after the first miss.
//!
//! Reserved markers (negation, unresolved anaphora) never fill a role.

use crate::catalog::Pattern;
use crate::error::{DetectError, DetectResult};
use crate::oracle::{MatchResult, SubVerifier};

#[derive(Debug, Clone, Default)]
pub struct WindowVerifier {
    reserved: Vec<String>,
}

impl WindowVerifier {
    /// `reserved` tokens are skipped by every role.
    pub fn new(reserved: Vec<String>) -> Self {
        Self { reserved }
    }

    /// Inclusive window bounds for the trigger at `p`.
    fn window(tokens: &[String], p: usize, pattern: &Pattern) -> (usize, usize) {
        let mut lo = p.saturating_sub(pattern.left);
        let mut hi = p.saturating_add(pattern.right).min(tokens.len() - 1);

        let mut clip = |stop: &dyn Fn(&str) -> bool| {
            if let Some(i) = (lo..p).rev().find(|&i| stop(&tokens[i])) {
                lo = i + 1;
            }
            if let Some(i) = (p + 1..=hi).find(|&i| stop(&tokens[i])) {
                hi = i - 1;
            }
        };
        if pattern.flags.ignore_repeated_triggers {
            let trigger = tokens[p].as_str();
            clip(&|t: &str| t == trigger);
        }
        if pattern.flags.ignore_repeated_commands {
            clip(&|t: &str| pattern.is_trigger(t));
        }
        (lo, hi)
    }

    fn accepts(
        &self,
        token: &str,
        at: usize,
        p: usize,
        words: &[String],
        pattern: &Pattern,
    ) -> bool {
        if pattern.flags.exclude_trigger && at == p {
            return false;
        }
        if self.reserved.iter().any(|r| r == token) {
            return false;
        }
        if pattern.flags.exclude_trigger_words && pattern.is_trigger(token) {
            return false;
        }
        words.iter().any(|w| w == token)
    }
}

impl SubVerifier for WindowVerifier {
    fn verify(
        &self,
        tokens: &[String],
        position: usize,
        pattern: &Pattern,
    ) -> DetectResult<Option<MatchResult>> {
        if position >= tokens.len() {
            return Err(DetectError::Collaborator(format!(
                "trigger position {position} outside a {}-token sentence",
                tokens.len()
            )));
        }
        let p = position;
        let flags = &pattern.flags;
        let (lo, hi) = Self::window(tokens, p, pattern);

        let mut roles = Vec::with_capacity(pattern.roles());
        let mut previous: Option<usize> = None;
        let mut anchor: Option<usize> = None;
        let mut stopped = false;

        for (role, words) in pattern.vocabulary.iter().enumerate() {
            if stopped {
                roles.push(Vec::new());
                continue;
            }

            let mut from = match (flags.continue_with_role, anchor) {
                (Some(k), Some(a)) if role > k => a + 1,
                _ => match pattern.start(role) {
                    Some(offset) => match p.checked_add_signed(offset) {
                        Some(start) => lo.max(start),
                        None if offset < 0 => lo,
                        // Past the end of the sentence
                        None => hi + 1,
                    },
                    None => lo,
                },
            };
            if flags.ordered
                && let Some(prev) = previous
            {
                from = from.max(prev + 1);
            }

            let mut hits: Vec<usize> = (from..=hi)
                .filter(|&i| self.accepts(&tokens[i], i, p, words, pattern))
                .collect();
            if flags.last_match
                && let Some(&last) = hits.last()
            {
                hits = vec![last];
            }

            match hits.first() {
                Some(&at) => {
                    previous = Some(at);
                    if flags.continue_with_role == Some(role) {
                        anchor = Some(at);
                    }
                }
                None if flags.stop_at_first_unmatched => stopped = true,
                None => {}
            }
            roles.push(hits.into_iter().map(|i| tokens[i].clone()).collect());
        }

        let result = MatchResult::new(roles);
        Ok((!result.is_empty()).then_some(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::PatternFlags;

    fn toks(sentence: &str) -> Vec<String> {
        sentence.split(' ').map(String::from).collect()
    }

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    fn pattern(triggers: &[&str], vocabulary: &[&[&str]], left: usize, right: usize) -> Pattern {
        Pattern {
            triggers: words(triggers),
            vocabulary: vocabulary.iter().map(|v| words(v)).collect(),
            left,
            right,
            starts: vec![],
            flags: PatternFlags::default(),
        }
    }

    fn verify(sentence: &str, p: usize, pattern: &Pattern) -> Option<Vec<Vec<String>>> {
        WindowVerifier::new(vec!["don't".into()])
            .verify(&toks(sentence), p, pattern)
            .unwrap()
            .map(|r| r.roles().to_vec())
    }

    #[test]
    fn finds_role_inside_window() {
        let pat = pattern(&["on"], &[&["wifi"]], 2, 2);
        assert_eq!(verify("turn on wifi", 1, &pat), Some(vec![words(&["wifi"])]));
        assert_eq!(verify("turn wifi on", 2, &pat), Some(vec![words(&["wifi"])]));
    }

    #[test]
    fn outside_window_is_no_match() {
        let pat = pattern(&["on"], &[&["wifi"]], 0, 1);
        assert_eq!(verify("turn on the wifi", 1, &pat), None);
    }

    #[test]
    fn position_out_of_range_is_collaborator_fault() {
        let pat = pattern(&["on"], &[&["wifi"]], 1, 1);
        let err = WindowVerifier::default()
            .verify(&toks("on wifi"), 5, &pat)
            .unwrap_err();
        assert!(matches!(err, DetectError::Collaborator(_)));
    }

    #[test]
    fn reserved_tokens_never_match() {
        let pat = pattern(&["x"], &[&["don't"]], 3, 3);
        assert_eq!(verify("x don't", 0, &pat), None);
    }

    #[test]
    fn repeated_commands_clip_window() {
        let mut pat = pattern(&["on", "off"], &[&["wifi"]], 3, 3);
        pat.flags.ignore_repeated_commands = true;
        // "off" at 3 bounds the window of "on" at 1 to [0, 2]
        assert_eq!(verify("turn on now off wifi", 1, &pat), None);
        assert_eq!(verify("wifi on off", 2, &pat), None);
        assert_eq!(verify("wifi on off", 1, &pat), Some(vec![words(&["wifi"])]));
    }

    #[test]
    fn repeated_triggers_clip_only_same_token() {
        let mut pat = pattern(&["on", "off"], &[&["wifi"]], 3, 3);
        pat.flags.ignore_repeated_triggers = true;
        // A different trigger word does not clip
        assert_eq!(
            verify("turn on now off wifi", 1, &pat),
            Some(vec![words(&["wifi"])])
        );
        assert_eq!(verify("wifi on on", 2, &pat), None);
    }

    #[test]
    fn exclude_trigger_position() {
        let mut pat = pattern(&["day"], &[&["day", "what"]], 2, 0);
        assert_eq!(verify("which day", 1, &pat), Some(vec![words(&["day"])]));
        pat.flags.exclude_trigger = true;
        assert_eq!(verify("which day", 1, &pat), None);
    }

    #[test]
    fn exclude_trigger_words() {
        let mut pat = pattern(&["on", "off"], &[&["off", "wifi"]], 2, 2);
        assert_eq!(verify("on off", 0, &pat), Some(vec![words(&["off"])]));
        pat.flags.exclude_trigger_words = true;
        assert_eq!(verify("on off", 0, &pat), None);
    }

    #[test]
    fn all_hits_in_read_order_unless_last_match() {
        let mut pat = pattern(&["volume"], &[&["up", "down"]], 2, 2);
        assert_eq!(
            verify("up volume down", 1, &pat),
            Some(vec![words(&["up", "down"])])
        );
        pat.flags.last_match = true;
        assert_eq!(verify("up volume down", 1, &pat), Some(vec![words(&["down"])]));
    }

    #[test]
    fn ordered_roles() {
        let mut pat = pattern(&["on"], &[&["airplane"], &["mode"]], 4, 0);
        assert_eq!(
            verify("mode airplane on", 2, &pat),
            Some(vec![words(&["airplane"]), words(&["mode"])])
        );
        pat.flags.ordered = true;
        assert_eq!(
            verify("mode airplane on", 2, &pat),
            Some(vec![words(&["airplane"]), vec![]])
        );
    }

    #[test]
    fn stop_at_first_unmatched() {
        let mut pat = pattern(&["call"], &[&["mom"], &["now"]], 0, 3);
        assert_eq!(
            verify("call now", 0, &pat),
            Some(vec![vec![], words(&["now"])])
        );
        pat.flags.stop_at_first_unmatched = true;
        assert_eq!(verify("call now", 0, &pat), None);
    }

    #[test]
    fn start_offsets() {
        let mut pat = pattern(&["set"], &[&["alarm"]], 3, 3);
        pat.starts = vec![1];
        assert_eq!(verify("alarm set", 1, &pat), None);
        assert_eq!(verify("set alarm", 0, &pat), Some(vec![words(&["alarm"])]));
    }

    #[test]
    fn start_offset_never_precedes_window() {
        let mut pat = pattern(&["set"], &[&["alarm"]], 1, 0);
        pat.starts = vec![-5];
        assert_eq!(verify("alarm x set", 2, &pat), None);
    }

    #[test]
    fn huge_start_offsets_stay_in_bounds() {
        let mut pat = pattern(&["set"], &[&["alarm"]], 3, 3);
        pat.starts = vec![isize::MAX];
        assert_eq!(verify("please set alarm", 1, &pat), None);
        pat.starts = vec![isize::MIN];
        assert_eq!(verify("please set alarm", 1, &pat), Some(vec![words(&["alarm"])]));
    }

    #[test]
    fn continue_with_role() {
        let mut pat = pattern(&["remind"], &[&["me"], &["to", "me"]], 0, 5);
        assert_eq!(
            verify("remind me to", 0, &pat),
            Some(vec![words(&["me"]), words(&["me", "to"])])
        );
        pat.flags.continue_with_role = Some(0);
        assert_eq!(
            verify("remind me to", 0, &pat),
            Some(vec![words(&["me"]), words(&["to"])])
        );
    }
}
