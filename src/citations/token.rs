//! Citation token data model.
//!
//! Tokens look like `[T0B1]` (block citation) or
//! `[T0B1:<RANGE>quoted text</RANGE>]` (range citation).

use serde::{Deserialize, Serialize};

pub const RANGE_OPEN: &str = "<RANGE>";
pub const RANGE_CLOSE: &str = "</RANGE>";

/// A parsed citation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CitationToken {
    /// Transcript the citation points into (`T<n>`)
    pub transcript_index: usize,

    /// Block inside the transcript (`B<n>`)
    pub block_index: usize,

    /// Claimed verbatim quotation, absent for a block citation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range_text: Option<String>,
}

impl CitationToken {
    /// A block-only citation
    pub fn block(transcript_index: usize, block_index: usize) -> Self {
        Self {
            transcript_index,
            block_index,
            range_text: None,
        }
    }

    /// A range citation quoting `range_text`
    pub fn range(transcript_index: usize, block_index: usize, range_text: impl Into<String>) -> Self {
        Self {
            transcript_index,
            block_index,
            range_text: Some(range_text.into()),
        }
    }

    pub fn is_range(&self) -> bool {
        self.range_text.is_some()
    }

    /// The same citation without its range
    pub fn block_only(&self) -> Self {
        Self::block(self.transcript_index, self.block_index)
    }
}

impl std::fmt::Display for CitationToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.range_text {
            Some(range) => write!(
                f,
                "[T{}B{}:{}{}{}]",
                self.transcript_index, self.block_index, RANGE_OPEN, range, RANGE_CLOSE
            ),
            None => write!(f, "[T{}B{}]", self.transcript_index, self.block_index),
        }
    }
}

impl std::str::FromStr for CitationToken {
    type Err = String;

    /// Parse a string that consists of exactly one citation token
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let found = super::parser::scan(s);
        match found.as_slice() {
            [only] if only.span == (0..s.len()) => only
                .to_token()
                .ok_or_else(|| format!("Citation index out of range: {}", s)),
            _ => Err(format!("Not a citation token: {}", s)),
        }
    }
}
