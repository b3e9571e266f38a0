//! Citation token scanner.
//!
//! The grammar is fixed: `\[T<int>B<int>(:<RANGE>.*?</RANGE>)?\]`, with the
//! range body matched non-greedily and allowed to span lines. Anything
//! else, including malformed or unterminated tokens, is literal text.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use super::token::CitationToken;

static CITATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\[T([0-9]+)B([0-9]+)(?::<RANGE>(.*?)</RANGE>)?\]")
        .expect("valid citation regex")
});

/// A citation token located in a larger text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundCitation<'a> {
    /// Byte span of the whole token in the scanned text
    pub span: Range<usize>,

    /// The token exactly as written
    pub raw: &'a str,

    /// `(transcript, block)`; `None` if either index overflows `usize`
    pub indices: Option<(usize, usize)>,

    /// Quotation body, if this is a range citation
    pub range_text: Option<&'a str>,

    /// Length of `[T<t>B<b>` within `raw`
    head_len: usize,
}

impl<'a> FoundCitation<'a> {
    pub fn is_range(&self) -> bool {
        self.range_text.is_some()
    }

    /// Owned token, if the indices are representable
    pub fn to_token(&self) -> Option<CitationToken> {
        let (transcript_index, block_index) = self.indices?;
        Some(CitationToken {
            transcript_index,
            block_index,
            range_text: self.range_text.map(str::to_string),
        })
    }

    /// The raw token with any range suffix removed
    ///
    /// Keeps the original `[T..B..` spelling so demotion only ever deletes
    /// characters.
    pub fn block_only(&self) -> String {
        format!("{}]", &self.raw[..self.head_len])
    }
}

/// Locate every citation token in `text`, left to right
pub fn scan(text: &str) -> Vec<FoundCitation<'_>> {
    CITATION_RE
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let transcript = caps.get(1)?;
            let block = caps.get(2)?;

            let indices = transcript
                .as_str()
                .parse::<usize>()
                .ok()
                .zip(block.as_str().parse::<usize>().ok());

            Some(FoundCitation {
                span: whole.range(),
                raw: whole.as_str(),
                indices,
                range_text: caps.get(3).map(|m| m.as_str()),
                head_len: block.end() - whole.start(),
            })
        })
        .collect()
}

/// Parse every well-formed citation token in `text`
///
/// Tokens whose indices do not fit in `usize` are skipped.
pub fn extract_citations(text: &str) -> Vec<CitationToken> {
    scan(text).iter().filter_map(FoundCitation::to_token).collect()
}
