//! citeground - Citation grounding for language-model output
//!
//! Model output that summarizes a conversation transcript cites the
//! transcript inline, optionally quoting the cited block. Quotations can be
//! hallucinated or garbled, so this crate checks each one against the block
//! it names and rewrites the text so that only verifiable quotations
//! survive.
//!
//! # Architecture
//!
//! - Matching is whitespace tolerant but otherwise exact
//! - Offsets always index the original block text
//! - Ungrounded range citations are demoted to block citations, not dropped
//! - The rewrite only removes characters and is idempotent
//!
//! # Modules
//!
//! - `anchor`: Quotation search and span utilities
//! - `citations`: Token scanner, rewriter and validation report
//! - `domain`: Transcript data model and block lookup
//! - `config`: File and environment configuration
//! - `safety`: Input size limits for the CLI
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Clean model output against a run
//! citeground clean --run run.json --input summary.txt
//!
//! # See what happened to each citation
//! citeground check --run run.yaml < summary.txt
//! ```

pub mod anchor;
pub mod citations;
pub mod cli;
pub mod config;
pub mod domain;
pub mod safety;

// Re-export main types at crate root for convenience
pub use anchor::{find_matches, AnchorResult, Match, MatchStatus};
pub use citations::{
    clean_citations, validate_citations, CitationOutcome, CitationToken, ValidateOptions,
    Validation, ValidationReport,
};
pub use domain::{AgentRun, BlockIndex, IndexingScheme, Message, Role, Transcript};
