//! Entity-resolution core for noisy catalog strings: normalization, variant
//! generation, fuzzy scoring, and best-match selection against a reference
//! taxonomy or a set of catalog search hits. The core never performs I/O;
//! collaborators fetch candidates and persist results.

pub mod config;
pub mod logging;
pub mod model;
pub mod normalization;
pub mod resolver;
pub mod scoring;

pub use config::MatchConfig;
pub use model::{CandidateQuery, CandidateRecord, MatchResult, ReferenceEntry, Resolution};
pub use resolver::{CandidateMatch, Resolver};
pub use scoring::Scorer;
