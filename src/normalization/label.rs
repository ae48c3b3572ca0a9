use std::borrow::Cow;

use itertools::Itertools;
use regex::Regex;

/// Canonicalizes raw catalog labels before scoring.
///
/// Normalization steps:
/// - trim and lowercase
/// - remove configured manufacturer names wherever they appear
/// - collapse runs of whitespace
/// - drop trailing periods (catalog edition strings end with one)
///
/// The period trim runs last: a period only becomes trailing once the token
/// before it is gone, and `normalize` must stay idempotent.
pub struct Normalizer {
    manufacturer: Option<Regex>,
}

impl Normalizer {
    /// Build a normalizer stripping the given manufacturer names. Matching
    /// is case-insensitive and bounded at word boundaries, so "sony" does
    /// not fire inside "sonya".
    pub fn new(manufacturer_tokens: &[String]) -> Self {
        let alternation = manufacturer_tokens
            .iter()
            .map(|t| regex::escape(t.trim()))
            .filter(|t| !t.is_empty())
            .join("|");
        let manufacturer = if alternation.is_empty() {
            None
        } else {
            // escaped literal alternation, always a valid pattern
            Some(
                Regex::new(&format!(r"(?i)\b(?:{alternation})\b"))
                    .expect("manufacturer pattern"),
            )
        };
        Self { manufacturer }
    }

    pub fn normalize(&self, label: &str) -> String {
        let lower = label.trim().to_lowercase();
        let stripped = match &self.manufacturer {
            Some(re) => re.replace_all(&lower, " "),
            None => Cow::Borrowed(lower.as_str()),
        };
        let collapsed = stripped.split_whitespace().join(" ");
        collapsed.trim_end_matches('.').trim_end().to_string()
    }
}
