use std::collections::HashSet;

use crate::error::DetectResult;
use crate::parse::Normalizer;

/// Lowercasing, punctuation-stripping normalizer with simple anaphora resolution.
///
/// - `do not`, `dont` and `don't` all become the negation marker.
/// - `it` becomes the latest earlier token that is a catalog referent,
///   or the anaphora marker when there is none.
#[derive(Debug, Clone)]
pub struct BasicNormalizer {
    referents: HashSet<String>,
    negation_marker: String,
    anaphora_marker: String,
}

impl BasicNormalizer {
    pub fn new(referents: HashSet<String>, negation_marker: &str, anaphora_marker: &str) -> Self {
        Self {
            referents,
            negation_marker: negation_marker.to_string(),
            anaphora_marker: anaphora_marker.to_string(),
        }
    }

    /// Lowercase, fold typographic apostrophes, and split on anything that
    /// is not part of a word.
    fn words(sentence: &str) -> Vec<String> {
        let cleaned: String = sentence
            .chars()
            .map(|c| match c {
                '\u{2019}' | '\u{2018}' => '\'',
                c if c.is_alphanumeric() || c == '\'' || c == '_' => c,
                _ => ' ',
            })
            .collect::<String>()
            .to_lowercase();

        cleaned
            .split_whitespace()
            .map(|w| w.trim_matches('\''))
            .filter(|w| !w.is_empty())
            .map(String::from)
            .collect()
    }

    fn referent(&self, tokens: &[String]) -> String {
        tokens
            .iter()
            .rev()
            .find(|t| self.referents.contains(*t))
            .cloned()
            .unwrap_or_else(|| self.anaphora_marker.clone())
    }
}

impl Normalizer for BasicNormalizer {
    fn normalize(&self, sentence: &str) -> DetectResult<Vec<String>> {
        let words = Self::words(sentence);
        let mut tokens: Vec<String> = Vec::with_capacity(words.len());

        let mut iter = words.iter().peekable();
        while let Some(word) = iter.next() {
            match word.as_str() {
                "do" if iter.peek().is_some_and(|next| *next == "not") => {
                    iter.next();
                    tokens.push(self.negation_marker.clone());
                }
                "dont" | "don't" => tokens.push(self.negation_marker.clone()),
                "it" => {
                    let referent = self.referent(&tokens);
                    tokens.push(referent);
                }
                _ => tokens.push(word.clone()),
            }
        }
        Ok(tokens)
    }
}
