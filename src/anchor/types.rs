//! Match and anchor result types.

use serde::{Deserialize, Serialize};

/// A located occurrence of a quotation in a haystack
///
/// Offsets are UTF-8 byte indices into the original haystack and always
/// fall on char boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    /// Byte offset of the first matched character
    pub start: usize,
    /// Byte offset one past the last matched character
    pub end: usize,
}

impl Match {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Length of the matched span in bytes
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Borrow the matched slice from the haystack it was found in
    pub fn slice<'a>(&self, haystack: &'a str) -> &'a str {
        &haystack[self.start..self.end]
    }
}

impl From<Match> for (usize, usize) {
    fn from(m: Match) -> Self {
        (m.start, m.end)
    }
}

/// Result of anchoring a quotation in a block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnchorResult {
    /// All non-overlapping occurrences, left to right
    pub matches: Vec<Match>,
}

impl AnchorResult {
    /// Returns the status based on match count
    pub fn status(&self) -> MatchStatus {
        match self.matches.len() {
            0 => MatchStatus::Unresolved,
            1 => MatchStatus::Resolved,
            _ => MatchStatus::Ambiguous,
        }
    }

    /// Returns the selected match (first one, deterministic)
    pub fn selected_match(&self) -> Option<Match> {
        self.matches.first().copied()
    }

    /// Whether at least one occurrence was found
    pub fn is_grounded(&self) -> bool {
        !self.matches.is_empty()
    }
}

/// Status of quotation anchoring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchStatus {
    /// Exactly one occurrence found
    Resolved,
    /// Multiple occurrences found, first selected
    Ambiguous,
    /// No occurrence found
    Unresolved,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Resolved => "resolved",
            MatchStatus::Ambiguous => "ambiguous",
            MatchStatus::Unresolved => "unresolved",
        }
    }
}

impl std::fmt::Display for MatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Line and column position (1-indexed for editor compatibility)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineCol {
    pub line: usize,
    pub col: usize,
}
