use std::collections::BTreeSet;

use itertools::Itertools;
use strsim::normalized_levenshtein;

/// Plain edit-distance ratio on the 0-100 scale used throughout the crate.
/// Identical strings score exactly 100.
pub fn ratio(a: &str, b: &str) -> f64 {
    normalized_levenshtein(a, b) * 100.0
}

/// Word-order-insensitive ratio: both sides are compared with their tokens
/// sorted.
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    ratio(&sorted_tokens(a), &sorted_tokens(b))
}

/// Token-set ratio: the sorted token intersection is compared against each
/// side's intersection-plus-remainder, and the two full sides against each
/// other. A strict token subset scores a perfect 100 regardless of the
/// extra tokens, which is why [`Scorer::score`] second-guesses it.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();
    if tokens_a.is_empty() && tokens_b.is_empty() {
        return 100.0;
    }
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }
    let sect = tokens_a.intersection(&tokens_b).join(" ");
    let only_a = tokens_a.difference(&tokens_b).join(" ");
    let only_b = tokens_b.difference(&tokens_a).join(" ");
    let combined_a = join_nonempty(&sect, &only_a);
    let combined_b = join_nonempty(&sect, &only_b);
    ratio(&sect, &combined_a)
        .max(ratio(&sect, &combined_b))
        .max(ratio(&combined_a, &combined_b))
}

/// The order-insensitive ratio used for ranking: the better of the
/// token-sort and token-set ratios.
pub fn token_ratio(a: &str, b: &str) -> f64 {
    token_sort_ratio(a, b).max(token_set_ratio(a, b))
}

fn sorted_tokens(s: &str) -> String {
    s.split_whitespace().sorted_unstable().join(" ")
}

fn join_nonempty(head: &str, tail: &str) -> String {
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (_, true) => head.to_string(),
        _ => format!("{head} {tail}"),
    }
}

/// Applies the catalog-specific corrections on top of the raw token ratios.
#[derive(Debug, Clone, Copy)]
pub struct Scorer {
    suspicious_exact_divisor: f64,
}

impl Scorer {
    pub fn new(suspicious_exact_divisor: f64) -> Self {
        Self {
            suspicious_exact_divisor,
        }
    }

    /// Token ratio with the suspicious-exact correction: a perfect token-set
    /// score between strings that are not literally equal usually means a
    /// short label swallowed whole by a longer one ("playstation" inside
    /// "playstation 2"), so the score is divided down instead of trusted.
    pub fn score(&self, a: &str, b: &str) -> f64 {
        let base = token_ratio(a, b);
        if a != b && token_set_ratio(a, b) >= 100.0 {
            return base / self.suspicious_exact_divisor;
        }
        base
    }

    /// [`Scorer::score`] scaled by a length penalty, for ranking catalog
    /// candidate names against query variants. A candidate name much longer
    /// than the query accumulates incidental token overlap and must not win
    /// on that alone.
    pub fn adjusted_score(&self, query: &str, candidate: &str) -> f64 {
        let query_len = query.chars().count() as f64;
        let candidate_len = candidate.chars().count().max(1) as f64;
        self.score(query, candidate) * (query_len / candidate_len).min(1.0)
    }
}
