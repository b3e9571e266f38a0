//! Whitespace-tolerant anchoring of quotations inside block text.
//!
//! This module locates a claimed quotation inside the text it is supposed
//! to come from. Comparison collapses every run of whitespace to a single
//! separator but is otherwise exact, and all reported offsets index the
//! original, non-normalized text so callers can slice or highlight it.
//!
//! # Design Principles
//!
//! - **All or nothing**: A quotation either aligns completely or is not found.
//! - **Original offsets**: Spans are UTF-8 byte offsets into the raw haystack.
//! - **Non-overlapping**: Scanning resumes at the end of each match.
//! - **Pure**: No I/O, no state, safe to call from any thread.
//!
//! # Example
//!
//! ```
//! use citeground::anchor::{find_matches, MatchStatus, find_quote};
//!
//! let block = "I  understand\tthe task.";
//! let matches = find_matches(block, "I understand the task");
//! assert_eq!(matches.len(), 1);
//! assert_eq!(matches[0].slice(block), "I  understand\tthe task");
//!
//! assert_eq!(find_quote(block, "missing").status(), MatchStatus::Unresolved);
//! ```

pub mod spans;
pub mod types;

pub use spans::{
    compute_hash, compute_slice_hash, extract_anchor_text, find_matches, find_quote,
    normalize_whitespace, offset_to_line_col,
};

pub use types::{AnchorResult, LineCol, Match, MatchStatus};
