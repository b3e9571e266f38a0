//! Per-citation validation outcomes.

use serde::{Deserialize, Serialize};

use super::token::CitationToken;
use crate::anchor::{LineCol, Match, MatchStatus};
use crate::domain::{IndexingScheme, UnresolvedReason};

/// What happened to one citation during validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CitationOutcome {
    /// Range citation whose quotation was found in the cited block
    Grounded {
        status: MatchStatus,
        match_count: usize,
        /// First occurrence, as byte offsets into the block text
        first_match: Match,
        line_col: LineCol,
        anchor_text: String,
        slice_sha256: String,
    },

    /// Range citation whose quotation was not found; range removed
    Demoted,

    /// Block citation with a resolvable block; kept as-is
    BlockOnly,

    /// The cited block does not exist; kept as-is
    Unresolved { reason: UnresolvedReason },
}

impl CitationOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            CitationOutcome::Grounded { .. } => "grounded",
            CitationOutcome::Demoted => "demoted",
            CitationOutcome::BlockOnly => "block_only",
            CitationOutcome::Unresolved { .. } => "unresolved",
        }
    }
}

/// One citation found in the input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationReport {
    /// Byte offsets `[start, end]` of the token in the input text
    pub span: [usize; 2],

    /// Token exactly as it appeared in the input
    pub raw: String,

    /// Parsed token; absent when an index overflows
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<CitationToken>,

    #[serde(flatten)]
    pub outcome: CitationOutcome,
}

/// Counts per outcome
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub total: usize,
    pub grounded: usize,
    pub demoted: usize,
    pub block_only: usize,
    pub unresolved: usize,
}

/// Everything `validate_citations` decided, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub scheme: IndexingScheme,
    pub citations: Vec<CitationReport>,
}

impl ValidationReport {
    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary {
            total: self.citations.len(),
            ..Default::default()
        };

        for citation in &self.citations {
            match citation.outcome {
                CitationOutcome::Grounded { .. } => summary.grounded += 1,
                CitationOutcome::Demoted => summary.demoted += 1,
                CitationOutcome::BlockOnly => summary.block_only += 1,
                CitationOutcome::Unresolved { .. } => summary.unresolved += 1,
            }
        }

        summary
    }

    /// Whether validation changed nothing
    pub fn is_clean(&self) -> bool {
        self.summary().demoted == 0
    }
}
