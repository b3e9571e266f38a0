//! Command-line interface for citeground.
//!
//! Provides commands for cleaning citation-bearing text against an agent
//! run, inspecting per-citation outcomes, probing the matcher directly and
//! showing the resolved configuration.

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use crate::anchor::{extract_anchor_text, find_quote, offset_to_line_col};
use crate::citations::{validate_citations, CitationOutcome, ValidateOptions, ValidationReport};
use crate::config::{self, ResolvedConfig};
use crate::domain::{AgentRun, IndexingScheme};

/// citeground - Ground inline transcript citations in model output
#[derive(Parser, Debug)]
#[command(name = "citeground")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rewrite citations so every range citation is grounded
    Clean {
        /// Agent run file (.json, .yaml or .yml)
        #[arg(short, long)]
        run: PathBuf,

        /// Citation-bearing text (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Block addressing for multi-transcript runs
        #[arg(short, long, value_enum)]
        scheme: Option<SchemeArg>,
    },

    /// Report what would happen to each citation
    Check {
        /// Agent run file (.json, .yaml or .yml)
        #[arg(short, long)]
        run: PathBuf,

        /// Citation-bearing text (reads from stdin if not provided)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Block addressing for multi-transcript runs
        #[arg(short, long, value_enum)]
        scheme: Option<SchemeArg>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Find a quotation in a text file
    Find {
        /// File to search
        #[arg(long)]
        haystack: PathBuf,

        /// Quotation to look for
        needle: String,
    },

    /// Show resolved configuration (debug)
    Config,
}

/// Indexing scheme for CLI (maps to IndexingScheme)
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SchemeArg {
    /// T selects the transcript, B the block within it
    PerTranscript,

    /// B counts blocks across all transcripts
    Continuous,
}

impl From<SchemeArg> for IndexingScheme {
    fn from(s: SchemeArg) -> Self {
        match s {
            SchemeArg::PerTranscript => IndexingScheme::PerTranscript,
            SchemeArg::Continuous => IndexingScheme::Continuous,
        }
    }
}

impl Cli {
    /// Execute the CLI command
    pub async fn execute(self) -> Result<()> {
        match self.command {
            Commands::Clean { run, input, scheme } => clean(&run, input, scheme).await,
            Commands::Check {
                run,
                input,
                scheme,
                json,
            } => check(&run, input, scheme, json).await,
            Commands::Find { haystack, needle } => find(&haystack, &needle).await,
            Commands::Config => show_config(),
        }
    }
}

/// Run file, text and options shared by `clean` and `check`
struct Prepared {
    run: AgentRun,
    text: String,
    options: ValidateOptions,
}

async fn prepare(
    run_path: &Path,
    input: Option<PathBuf>,
    scheme: Option<SchemeArg>,
) -> Result<Prepared> {
    let cfg = config::config()?;

    let run_size = tokio::fs::metadata(run_path)
        .await
        .with_context(|| format!("Failed to stat run file: {}", run_path.display()))?
        .len();
    cfg.limits.validate_run_size(run_size)?;

    let run = AgentRun::load(run_path).await?;
    let text = read_input(input).await?;
    cfg.limits.validate_input(&text)?;

    let mut options = cfg.validate_options();
    if let Some(scheme) = scheme {
        options.scheme = scheme.into();
    }

    info!(
        run_id = %run.id,
        transcripts = run.transcripts.len(),
        blocks = run.block_count(),
        scheme = %options.scheme,
        "Loaded agent run"
    );

    Ok(Prepared { run, text, options })
}

/// Read text from a file, or from stdin when no file is given
async fn read_input(input: Option<PathBuf>) -> Result<String> {
    match input {
        Some(path) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read input file: {}", path.display())),
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read from stdin")?;
            Ok(buffer)
        }
    }
}

/// Print the cleaned text to stdout
async fn clean(run_path: &Path, input: Option<PathBuf>, scheme: Option<SchemeArg>) -> Result<()> {
    let prepared = prepare(run_path, input, scheme).await?;
    let validation = validate_citations(&prepared.text, &prepared.run, &prepared.options);

    let summary = validation.report.summary();
    if summary.demoted > 0 {
        info!(demoted = summary.demoted, "Demoted ungrounded citations");
    }

    print!("{}", validation.text);
    Ok(())
}

/// Print per-citation outcomes
async fn check(
    run_path: &Path,
    input: Option<PathBuf>,
    scheme: Option<SchemeArg>,
    json: bool,
) -> Result<()> {
    let prepared = prepare(run_path, input, scheme).await?;
    let validation = validate_citations(&prepared.text, &prepared.run, &prepared.options);

    if json {
        let out = serde_json::to_string_pretty(&validation.report)
            .context("Failed to serialize report")?;
        println!("{}", out);
        return Ok(());
    }

    print_report(&prepared.text, &validation.report);
    Ok(())
}

fn print_report(text: &str, report: &ValidationReport) {
    if report.citations.is_empty() {
        println!("No citations found");
        return;
    }

    println!("{:<12} {:<10} {:<12} {}", "OUTCOME", "POSITION", "DETAIL", "CITATION");
    println!("{}", "-".repeat(80));

    for citation in &report.citations {
        let pos = offset_to_line_col(text, citation.span[0]);
        let position = format!("{}:{}", pos.line, pos.col);

        let detail = match &citation.outcome {
            CitationOutcome::Grounded {
                status,
                match_count,
                ..
            } => format!("{} x{}", status, match_count),
            CitationOutcome::Unresolved { reason } => reason.to_string(),
            _ => String::new(),
        };

        println!(
            "{:<12} {:<10} {:<12} {}",
            citation.outcome.label(),
            position,
            detail,
            truncate(&citation.raw, 60)
        );

        if let CitationOutcome::Grounded { anchor_text, .. } = &citation.outcome {
            println!("{:>36}{}", "", anchor_text.replace('\n', " "));
        }
    }

    let summary = report.summary();
    println!();
    println!("Summary ({} indexing):", report.scheme);
    println!("  Total:      {}", summary.total);
    println!("  Grounded:   {}", summary.grounded);
    println!("  Demoted:    {}", summary.demoted);
    println!("  Block only: {}", summary.block_only);
    println!("  Unresolved: {}", summary.unresolved);
}

/// Shorten to at most `max` characters, marking the cut
fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let kept: String = s.chars().take(max.saturating_sub(3)).collect();
    format!("{}...", kept)
}

/// Print every match of `needle` in a file
async fn find(haystack_path: &Path, needle: &str) -> Result<()> {
    let cfg = config::config()?;
    let haystack = tokio::fs::read_to_string(haystack_path)
        .await
        .with_context(|| format!("Failed to read haystack file: {}", haystack_path.display()))?;
    cfg.limits.validate_input(&haystack)?;

    let result = find_quote(&haystack, needle);
    println!("Status: {} ({} match(es))", result.status(), result.matches.len());

    for m in &result.matches {
        let pos = offset_to_line_col(&haystack, m.start);
        println!();
        println!("  Bytes:    {} - {}", m.start, m.end);
        println!("  Position: line {}, col {}", pos.line, pos.col);
        println!(
            "  Context:  {}",
            extract_anchor_text(&haystack, m.start, m.end, cfg.anchor_window).replace('\n', " ")
        );
    }

    Ok(())
}

/// Show the resolved configuration (for debugging)
fn show_config() -> Result<()> {
    let cfg: &ResolvedConfig = config::config()?;

    println!(
        "Config file: {}",
        cfg.config_file
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(none - using defaults)".to_string())
    );
    println!();
    println!("Citations:");
    println!("  Indexing scheme: {}", cfg.scheme);
    println!("  Anchor window:   {} bytes", cfg.anchor_window);
    println!();
    println!("Limits:");
    println!("  Max input size:    {} bytes", cfg.limits.max_input_bytes);
    println!("  Max run file size: {} bytes", cfg.limits.max_run_bytes);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_check() {
        let cli = Cli::try_parse_from([
            "citeground",
            "check",
            "--run",
            "run.json",
            "--scheme",
            "continuous",
            "--json",
        ])
        .unwrap();

        match cli.command {
            Commands::Check {
                run, scheme, json, input,
            } => {
                assert_eq!(run, PathBuf::from("run.json"));
                assert!(matches!(scheme, Some(SchemeArg::Continuous)));
                assert!(json);
                assert!(input.is_none());
            }
            other => panic!("Unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_parses_find() {
        let cli = Cli::try_parse_from(["citeground", "find", "--haystack", "a.txt", "I understand"])
            .unwrap();
        assert!(matches!(cli.command, Commands::Find { ref needle, .. } if needle == "I understand"));
    }

    #[test]
    fn test_scheme_arg_mapping() {
        assert_eq!(
            IndexingScheme::from(SchemeArg::PerTranscript),
            IndexingScheme::PerTranscript
        );
        assert_eq!(
            IndexingScheme::from(SchemeArg::Continuous),
            IndexingScheme::Continuous
        );
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefghij", 6), "abc...");
    }
}
