//! Citation rewrite pass.
//!
//! Walks the citation tokens of a text once, checks each range citation
//! against the block it names, and demotes the ones whose quotation cannot
//! be found. Literal text and every other token are copied through
//! byte-for-byte, so the output is never longer than the input and a
//! second pass changes nothing.

use tracing::debug;

use super::parser::{scan, FoundCitation};
use super::report::{CitationOutcome, CitationReport, ValidationReport};
use crate::anchor::{compute_slice_hash, extract_anchor_text, find_quote, offset_to_line_col};
use crate::domain::{AgentRun, BlockIndex, IndexingScheme, UnresolvedReason};

/// Default bytes of context captured around a grounded quotation
pub const DEFAULT_ANCHOR_WINDOW: usize = 80;

/// Knobs for a validation call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidateOptions {
    /// How `T<t>B<b>` maps to blocks
    pub scheme: IndexingScheme,

    /// Context size for `CitationOutcome::Grounded::anchor_text`
    pub anchor_window: usize,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            scheme: IndexingScheme::default(),
            anchor_window: DEFAULT_ANCHOR_WINDOW,
        }
    }
}

/// Cleaned text plus the decision made for every citation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub text: String,
    pub report: ValidationReport,
}

/// Remove every unverifiable range from the citations in `text`
///
/// Uses the default indexing scheme. See [`validate_citations`].
pub fn clean_citations(text: &str, run: &AgentRun) -> String {
    validate_citations(text, run, &ValidateOptions::default()).text
}

/// Validate and rewrite the citations in `text` against `run`
///
/// - Range citations whose quotation occurs in the cited block are kept
/// - Range citations whose quotation does not occur are demoted to `[T<t>B<b>]`
/// - Block citations and citations to missing blocks are kept unchanged
///
/// Never fails; untrusted model output is handled best-effort.
pub fn validate_citations(text: &str, run: &AgentRun, options: &ValidateOptions) -> Validation {
    let blocks = BlockIndex::build(run, options.scheme);

    let mut cleaned = String::with_capacity(text.len());
    let mut citations = Vec::new();
    let mut cursor = 0;

    for found in scan(text) {
        cleaned.push_str(&text[cursor..found.span.start]);

        let outcome = judge(&found, &blocks, options.anchor_window);
        match outcome {
            CitationOutcome::Demoted => {
                debug!(
                    citation = %found.block_only(),
                    quote_len = found.range_text.map(str::len).unwrap_or(0),
                    "Demoting ungrounded range citation"
                );
                cleaned.push_str(&found.block_only());
            }
            _ => cleaned.push_str(found.raw),
        }

        citations.push(CitationReport {
            span: [found.span.start, found.span.end],
            raw: found.raw.to_string(),
            token: found.to_token(),
            outcome,
        });
        cursor = found.span.end;
    }
    cleaned.push_str(&text[cursor..]);

    let report = ValidationReport {
        scheme: options.scheme,
        citations,
    };

    let summary = report.summary();
    if summary.total > 0 {
        debug!(
            total = summary.total,
            grounded = summary.grounded,
            demoted = summary.demoted,
            unresolved = summary.unresolved,
            "Validated citations"
        );
    }

    Validation {
        text: cleaned,
        report,
    }
}

/// Decide the outcome for a single citation
fn judge(found: &FoundCitation<'_>, blocks: &BlockIndex<'_>, window: usize) -> CitationOutcome {
    let Some((transcript_index, block_index)) = found.indices else {
        return CitationOutcome::Unresolved {
            reason: UnresolvedReason::IndexOverflow,
        };
    };

    let block_text = match blocks.resolve(transcript_index, block_index) {
        Ok(text) => text,
        Err(reason) => return CitationOutcome::Unresolved { reason },
    };

    let Some(quote) = found.range_text else {
        return CitationOutcome::BlockOnly;
    };

    let result = find_quote(block_text, quote);
    match result.selected_match() {
        Some(first) => CitationOutcome::Grounded {
            status: result.status(),
            match_count: result.matches.len(),
            first_match: first,
            line_col: offset_to_line_col(block_text, first.start),
            anchor_text: extract_anchor_text(block_text, first.start, first.end, window),
            slice_sha256: compute_slice_hash(block_text, first.start, first.end),
        },
        None => CitationOutcome::Demoted,
    }
}
