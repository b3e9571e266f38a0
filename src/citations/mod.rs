//! Citation grounding for model output.
//!
//! Model output cites transcript blocks inline, either as a whole block
//! (`[T0B1]`) or with a claimed quotation (`[T0B1:<RANGE>...</RANGE>]`).
//! This module scans those tokens, checks each quotation against the cited
//! block using [`crate::anchor`], and rewrites the text so every remaining
//! range citation is grounded.
//!
//! ```
//! use citeground::citations::clean_citations;
//! use citeground::domain::{AgentRun, Message, Transcript};
//!
//! let run = AgentRun::new(
//!     "run-1",
//!     vec![Transcript::new(
//!         "t0",
//!         vec![
//!             Message::user("Can you help?"),
//!             Message::assistant("I understand the task and will help you."),
//!         ],
//!     )],
//! );
//!
//! let text = "[T0B1:<RANGE>I understand</RANGE>][T0B1:<RANGE>nonexistent</RANGE>][T0B1]";
//! assert_eq!(
//!     clean_citations(text, &run),
//!     "[T0B1:<RANGE>I understand</RANGE>][T0B1][T0B1]"
//! );
//! ```

pub mod parser;
pub mod report;
pub mod rewriter;
pub mod token;

pub use parser::{extract_citations, scan, FoundCitation};
pub use report::{CitationOutcome, CitationReport, ReportSummary, ValidationReport};
pub use rewriter::{
    clean_citations, validate_citations, ValidateOptions, Validation, DEFAULT_ANCHOR_WINDOW,
};
pub use token::CitationToken;
