use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::info;

use catalog_match::logging;
use catalog_match::model::{CandidateQuery, MatchResult, ReferenceEntry, Resolution};
use catalog_match::resolver::{CandidateMatch, Resolver};
use catalog_match::MatchConfig;

#[derive(Parser, Debug)]
#[command(name = "resolve", version, about = "Offline catalog entity resolution")]
struct Cli {
    /// JSON file overriding the default match configuration
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
#[command(rename_all = "kebab-case")]
enum Commands {
    /// Resolve raw platform labels against a reference taxonomy file
    Platform {
        /// Reference taxonomy JSON: display name -> {id, name, ...}
        #[arg(long)]
        reference: PathBuf,
        /// Labels to resolve; read from --input when omitted
        labels: Vec<String>,
        /// File with one label per line
        #[arg(long)]
        input: Option<PathBuf>,
        /// Override the acceptance threshold
        #[arg(long)]
        threshold: Option<f64>,
        /// Emit no-match for PC-family labels without scoring them
        #[arg(long, default_value_t = false)]
        skip_pc: bool,
        #[arg(long, value_enum, default_value = "jsonl")]
        format: OutputFormat,
    },
    /// Pick the best catalog candidate for each query in a JSON file
    Candidate {
        /// JSON array of {title, alternate_titles, candidates}
        #[arg(long)]
        queries: PathBuf,
        /// Optional rejection floor for the best candidate score
        #[arg(long)]
        threshold: Option<f64>,
        #[arg(long, value_enum, default_value = "jsonl")]
        format: OutputFormat,
    },
    /// Print the variant expansion for a title
    Variants { title: String },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum OutputFormat {
    Jsonl,
    Csv,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_tracing("info")?;
    let mut config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Platform {
            reference,
            labels,
            input,
            threshold,
            skip_pc,
            format,
        } => {
            if let Some(t) = threshold {
                config.platform_threshold = t;
            }
            config.skip_pc_platforms = skip_pc;
            let reference = load_reference(&reference)?;
            let labels = collect_labels(labels, input.as_deref())?;
            let resolver = Resolver::new(config);
            let results = resolver.resolve_platform_batch(&labels, &reference);
            emit_platform(&labels, &results, format)?;
            info!(
                total = labels.len(),
                matched = results.iter().filter(|r| r.matched_id.is_match()).count(),
                "platform resolution finished"
            );
        }
        Commands::Candidate {
            queries,
            threshold,
            format,
        } => {
            if threshold.is_some() {
                config.candidate_threshold = threshold;
            }
            let queries = load_queries(&queries)?;
            let resolver = Resolver::new(config);
            let matches = resolver.resolve_candidate_batch(&queries);
            emit_candidates(&queries, &matches, format)?;
            info!(
                total = queries.len(),
                matched = matches.iter().filter(|m| m.is_some()).count(),
                "candidate resolution finished"
            );
        }
        Commands::Variants { title } => {
            let resolver = Resolver::new(config);
            for variant in resolver.variant_generator().generate(&title) {
                println!("{variant}");
            }
        }
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<MatchConfig> {
    match path {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("parsing config {}", path.display()))
        }
        None => Ok(MatchConfig::default()),
    }
}

/// Loads the taxonomy map written by the reference-build step (display name
/// -> platform record). Only id and name are used; file order is kept.
fn load_reference(path: &Path) -> Result<Vec<ReferenceEntry>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading reference taxonomy {}", path.display()))?;
    let map: IndexMap<String, ReferenceEntry> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing reference taxonomy {}", path.display()))?;
    Ok(map.into_values().collect())
}

fn load_queries(path: &Path) -> Result<Vec<CandidateQuery>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading queries {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing queries {}", path.display()))
}

fn collect_labels(labels: Vec<String>, input: Option<&Path>) -> Result<Vec<String>> {
    if !labels.is_empty() {
        return Ok(labels);
    }
    let path = input.context("no labels given and no --input file")?;
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading labels {}", path.display()))?;
    Ok(raw
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect())
}

#[derive(Serialize)]
struct PlatformRow<'a> {
    label: &'a str,
    #[serde(flatten)]
    result: &'a MatchResult,
}

fn emit_platform(labels: &[String], results: &[MatchResult], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Jsonl => {
            for (label, result) in labels.iter().zip(results) {
                println!("{}", serde_json::to_string(&PlatformRow { label, result })?);
            }
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(io::stdout());
            writer.write_record(["label", "matched_id", "score", "evaluated_against"])?;
            for (label, result) in labels.iter().zip(results) {
                let matched = result.matched_id.to_string();
                let score = format!("{:.2}", result.score);
                writer.write_record([
                    label.as_str(),
                    matched.as_str(),
                    score.as_str(),
                    result.evaluated_against.as_str(),
                ])?;
            }
            writer.flush()?;
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct CandidateRow<'a> {
    title: &'a str,
    matched_id: Resolution,
    matched_name: &'a str,
    score: f64,
    evaluated_against: &'a str,
}

fn emit_candidates(
    queries: &[CandidateQuery],
    matches: &[Option<CandidateMatch<'_>>],
    format: OutputFormat,
) -> Result<()> {
    let rows: Vec<CandidateRow> = queries
        .iter()
        .zip(matches)
        .map(|(query, found)| match found {
            Some(found) => CandidateRow {
                title: &query.title,
                matched_id: Resolution::Matched(found.record.id),
                matched_name: &found.record.name,
                score: found.score,
                evaluated_against: &found.evaluated_against,
            },
            None => CandidateRow {
                title: &query.title,
                matched_id: Resolution::NoMatch,
                matched_name: "",
                score: 0.0,
                evaluated_against: "",
            },
        })
        .collect();

    match format {
        OutputFormat::Jsonl => {
            for row in &rows {
                println!("{}", serde_json::to_string(row)?);
            }
        }
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(io::stdout());
            writer.write_record([
                "title",
                "matched_id",
                "matched_name",
                "score",
                "evaluated_against",
            ])?;
            for row in &rows {
                let matched = row.matched_id.to_string();
                let score = format!("{:.2}", row.score);
                writer.write_record([
                    row.title,
                    matched.as_str(),
                    row.matched_name,
                    score.as_str(),
                    row.evaluated_against,
                ])?;
            }
            writer.flush()?;
        }
    }
    Ok(())
}
