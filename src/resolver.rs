use indexmap::{IndexMap, IndexSet};
use rayon::prelude::*;
use tracing::debug;

use crate::config::MatchConfig;
use crate::model::{CandidateQuery, CandidateRecord, MatchResult, ReferenceEntry, Resolution};
use crate::normalization::{Normalizer, VariantGenerator};
use crate::scoring::Scorer;

/// Best catalog candidate for a query, with the score and the query surface
/// form that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateMatch<'a> {
    pub record: &'a CandidateRecord,
    pub score: f64,
    pub evaluated_against: String,
}

impl CandidateMatch<'_> {
    pub fn to_result(&self) -> MatchResult {
        MatchResult {
            matched_id: Resolution::Matched(self.record.id),
            score: self.score,
            evaluated_against: self.evaluated_against.clone(),
        }
    }
}

/// Ties normalization, variant expansion, and scoring together into the two
/// resolution modes: platform labels against a small reference taxonomy,
/// and titles against already-fetched catalog search hits.
///
/// Resolution is a pure function of its inputs; a `Resolver` holds only
/// configuration and compiled patterns, so batches fan out freely.
pub struct Resolver {
    config: MatchConfig,
    normalizer: Normalizer,
    variants: VariantGenerator,
    scorer: Scorer,
}

impl Resolver {
    pub fn new(config: MatchConfig) -> Self {
        let normalizer = Normalizer::new(&config.manufacturer_tokens);
        let scorer = Scorer::new(config.suspicious_exact_divisor);
        Self {
            config,
            normalizer,
            variants: VariantGenerator::new(),
            scorer,
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(MatchConfig::default())
    }

    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    pub fn normalizer(&self) -> &Normalizer {
        &self.normalizer
    }

    pub fn variant_generator(&self) -> &VariantGenerator {
        &self.variants
    }

    /// Nearest-neighbor classification of a raw label over the reference
    /// set, with a rejection floor. The first-encountered maximum wins ties,
    /// so output is deterministic for a fixed reference order. PC-family
    /// labels short-circuit to no-match when the config asks for it.
    pub fn resolve_platform(
        &self,
        raw_label: &str,
        reference_set: &[ReferenceEntry],
    ) -> MatchResult {
        if self.config.skip_pc_platforms && self.config.is_pc_platform(raw_label) {
            debug!(label = raw_label, "pc-family label, skipped");
            return MatchResult::no_match();
        }
        let query = self.normalizer.normalize(raw_label);
        let mut best: Option<(&ReferenceEntry, f64)> = None;
        for entry in reference_set {
            let canonical = self.normalizer.normalize(&entry.name);
            let score = self.scorer.score(&query, &canonical);
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((entry, score));
            }
        }
        match best {
            Some((entry, score)) if score >= self.config.platform_threshold => {
                debug!(label = raw_label, id = entry.id, score, "platform resolved");
                MatchResult {
                    matched_id: Resolution::Matched(entry.id),
                    score,
                    evaluated_against: entry.name.clone(),
                }
            }
            Some((entry, score)) => {
                debug!(
                    label = raw_label,
                    score,
                    threshold = self.config.platform_threshold,
                    "best platform score below threshold"
                );
                MatchResult {
                    matched_id: Resolution::NoMatch,
                    score,
                    evaluated_against: entry.name.clone(),
                }
            }
            None => MatchResult::no_match(),
        }
    }

    /// [`Resolver::resolve_platform`] over many labels in parallel. Each
    /// label is independent, so this is a plain fan-out.
    pub fn resolve_platform_batch(
        &self,
        labels: &[String],
        reference_set: &[ReferenceEntry],
    ) -> Vec<MatchResult> {
        labels
            .par_iter()
            .map(|label| self.resolve_platform(label, reference_set))
            .collect()
    }

    /// Picks the catalog candidate whose name best matches any surface form
    /// of the title (generated variants plus alternate titles). Candidates
    /// sharing an id are collapsed, later records replacing earlier ones.
    /// Returns `None` when no candidates are supplied, or when a configured
    /// candidate threshold rejects the best score.
    pub fn resolve_candidate<'a>(
        &self,
        title: &str,
        alternate_titles: &[String],
        candidates: &'a [CandidateRecord],
    ) -> Option<CandidateMatch<'a>> {
        let mut queries: IndexSet<String> =
            self.variants.generate(title).into_iter().collect();
        for alt in alternate_titles {
            let alt = alt.trim().to_lowercase();
            if !alt.is_empty() {
                queries.insert(alt);
            }
        }
        if queries.is_empty() {
            debug!(title, "no usable query forms");
            return None;
        }

        let mut merged: IndexMap<i64, &CandidateRecord> = IndexMap::new();
        for record in candidates {
            merged.insert(record.id, record);
        }

        let mut best: Option<CandidateMatch<'a>> = None;
        for record in merged.values() {
            let name = record.name.trim().to_lowercase();
            let mut record_best: Option<(f64, &String)> = None;
            for query in &queries {
                let score = self.scorer.adjusted_score(query, &name);
                if record_best.map_or(true, |(s, _)| score > s) {
                    record_best = Some((score, query));
                }
            }
            let (score, query) = match record_best {
                Some(found) => found,
                None => continue,
            };
            if best.as_ref().map_or(true, |b| score > b.score) {
                best = Some(CandidateMatch {
                    record,
                    score,
                    evaluated_against: query.clone(),
                });
            }
        }

        if let (Some(found), Some(threshold)) = (&best, self.config.candidate_threshold) {
            if found.score < threshold {
                debug!(title, score = found.score, threshold, "best candidate below threshold");
                return None;
            }
        }
        match &best {
            Some(found) => debug!(
                title,
                candidate_id = found.record.id,
                score = found.score,
                "candidate resolved"
            ),
            None => debug!(title, "no candidates supplied"),
        }
        best
    }

    /// [`Resolver::resolve_candidate`] over many queries in parallel.
    pub fn resolve_candidate_batch<'a>(
        &self,
        queries: &'a [CandidateQuery],
    ) -> Vec<Option<CandidateMatch<'a>>> {
        queries
            .par_iter()
            .map(|q| self.resolve_candidate(&q.title, &q.alternate_titles, &q.candidates))
            .collect()
    }
}
