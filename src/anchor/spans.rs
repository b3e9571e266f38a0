//! Span computation for quotation anchoring
//!
//! Locates quotations in block text, converts byte offsets to line/column
//! positions and hashes matched slices.
//!
//! # Matching Rules
//!
//! - **Whitespace collapsing**: Any run of whitespace in the needle matches
//!   any non-empty run of whitespace in the haystack
//! - **Exact otherwise**: Case and punctuation sensitive, no word boundaries
//! - **UTF-8 byte offsets**: All offsets are byte indices into the raw haystack

use sha2::{Digest, Sha256};

use super::types::{AnchorResult, LineCol, Match};

/// Find all occurrences of `needle` in `haystack`, tolerating whitespace
///
/// The needle is split into words on whitespace. A match is a span of the
/// haystack that starts with the first word and continues through every
/// following word, each separated from the previous one by at least one
/// whitespace character. Leading and trailing whitespace of the needle is
/// ignored and never included in a match.
///
/// Occurrences are reported left to right and never overlap: after a match
/// the scan resumes at its end.
///
/// # Arguments
/// * `haystack` - The original block text
/// * `needle` - The claimed quotation
///
/// # Returns
/// * `Vec<Match>` - Offsets into the original `haystack`; empty when the
///   needle is empty or whitespace-only, or when nothing aligns
pub fn find_matches(haystack: &str, needle: &str) -> Vec<Match> {
    let words: Vec<&str> = needle.split_whitespace().collect();
    let Some((first, rest)) = words.split_first() else {
        return Vec::new();
    };

    let mut matches = Vec::new();
    let mut cursor = 0;

    while cursor < haystack.len() {
        let Some(offset) = haystack[cursor..].find(first) else {
            break;
        };
        let start = cursor + offset;

        match align_words(haystack, start + first.len(), rest) {
            Some(end) => {
                matches.push(Match::new(start, end));
                cursor = end;
            }
            None => {
                // Retry from the next character; candidates may overlap
                cursor = start + char_len_at(haystack, start);
            }
        }
    }

    matches
}

/// Align the remaining needle words starting at `pos`
///
/// Returns the end offset of the last word, or `None` if any word fails
/// to line up.
fn align_words(haystack: &str, mut pos: usize, words: &[&str]) -> Option<usize> {
    for word in words {
        let after_gap = skip_whitespace(haystack, pos);
        if after_gap == pos {
            return None;
        }
        if !haystack[after_gap..].starts_with(word) {
            return None;
        }
        pos = after_gap + word.len();
    }
    Some(pos)
}

fn skip_whitespace(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .find(|(_, c)| !c.is_whitespace())
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

fn char_len_at(text: &str, pos: usize) -> usize {
    text[pos..].chars().next().map(char::len_utf8).unwrap_or(1)
}

/// Normalize whitespace: collapse runs of whitespace to single space, trim
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Find a quotation in block text with full match result
///
/// # Arguments
/// * `haystack` - The block text
/// * `quote` - The quotation to search for
///
/// # Returns
/// * `AnchorResult` with all non-overlapping matches
pub fn find_quote(haystack: &str, quote: &str) -> AnchorResult {
    AnchorResult {
        matches: find_matches(haystack, quote),
    }
}

/// Compute SHA256 hash of a byte slice, returning hex string with prefix
///
/// # Returns
/// * String in format "sha256:abc123..."
pub fn compute_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let result = hasher.finalize();
    format!("sha256:{}", hex::encode(result))
}

/// Compute the hash of `text[start..end]`
///
/// Out-of-range offsets are clamped to the text length.
pub fn compute_slice_hash(text: &str, start: usize, end: usize) -> String {
    let bytes = text.as_bytes();
    let end = end.min(bytes.len());
    let start = start.min(end);
    compute_hash(&bytes[start..end])
}

/// Extract anchor text around a span
///
/// Returns roughly `window` characters of context around the span, with
/// `...` marking each truncated side.
///
/// # Arguments
/// * `text` - The full block text
/// * `start` - Start byte offset of span
/// * `end` - End byte offset of span
/// * `window` - Total bytes of context to aim for
pub fn extract_anchor_text(text: &str, start: usize, end: usize, window: usize) -> String {
    let len = text.len();
    let end = end.min(len);
    let start = start.min(end);

    let span_len = end - start;
    let remaining = window.saturating_sub(span_len);
    let each_side = remaining / 2;

    // Expand backwards, respecting UTF-8 boundaries
    let mut anchor_start = start.saturating_sub(each_side);
    while anchor_start > 0 && !text.is_char_boundary(anchor_start) {
        anchor_start -= 1;
    }

    // Expand forwards, respecting UTF-8 boundaries
    let mut anchor_end = (end + each_side).min(len);
    while anchor_end < len && !text.is_char_boundary(anchor_end) {
        anchor_end += 1;
    }

    let prefix = if anchor_start > 0 { "..." } else { "" };
    let suffix = if anchor_end < len { "..." } else { "" };

    format!("{}{}{}", prefix, &text[anchor_start..anchor_end], suffix)
}

/// Convert byte offset to line/column position
///
/// Line and column are 1-indexed; the column counts characters, not bytes.
pub fn offset_to_line_col(text: &str, offset: usize) -> LineCol {
    let mut offset = offset.min(text.len());
    while offset > 0 && !text.is_char_boundary(offset) {
        offset -= 1;
    }
    let prefix = &text[..offset];

    let line = prefix.matches('\n').count() + 1;
    let line_start = prefix.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let col = text[line_start..offset].chars().count() + 1;

    LineCol { line, col }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(haystack: &str, needle: &str) -> Vec<(usize, usize)> {
        find_matches(haystack, needle)
            .into_iter()
            .map(Into::into)
            .collect()
    }

    #[test]
    fn test_find_matches_single() {
        assert_eq!(spans("Hello world, this is a test.", "this is"), vec![(13, 20)]);
    }

    #[test]
    fn test_find_matches_multiple() {
        assert_eq!(
            spans("foo bar foo baz foo", "foo"),
            vec![(0, 3), (8, 11), (16, 19)]
        );
    }

    #[test]
    fn test_find_matches_none() {
        assert!(find_matches("Hello world", "xyz").is_empty());
    }

    #[test]
    fn test_empty_inputs() {
        assert!(find_matches("anything", "").is_empty());
        assert!(find_matches("anything", " \t\n ").is_empty());
        assert!(find_matches("", "needle").is_empty());
        assert!(find_matches("", "").is_empty());
    }

    #[test]
    fn test_collapsed_haystack_whitespace() {
        let haystack = "I  understand   the    task";
        let found = find_matches(haystack, "I understand the task");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].slice(haystack), haystack);
    }

    #[test]
    fn test_collapsed_needle_whitespace() {
        let haystack = "please I understand the task now";
        let found = find_matches(haystack, "I \t understand\n\nthe  task");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].slice(haystack), "I understand the task");
    }

    #[test]
    fn test_needle_padding_ignored() {
        let haystack = "alpha beta gamma";
        assert_eq!(spans(haystack, "  beta "), vec![(6, 10)]);
    }

    #[test]
    fn test_separator_requires_whitespace() {
        // "ab" must not match "a b": the needle separator needs a gap
        assert!(find_matches("ab", "a b").is_empty());
        // ...and a gap in the haystack must be matched by one in the needle
        assert!(find_matches("a b", "ab").is_empty());
    }

    #[test]
    fn test_overlapping_candidates_resume_at_end() {
        assert_eq!(spans("aaaa", "aa"), vec![(0, 2), (2, 4)]);
        assert_eq!(spans("aaa", "aa"), vec![(0, 2)]);
    }

    #[test]
    fn test_failed_candidate_retries_next_position() {
        // First "a" candidate fails to align, the second succeeds
        assert_eq!(spans("a x a b", "a b"), vec![(4, 7)]);
    }

    #[test]
    fn test_substring_of_larger_token() {
        assert_eq!(spans("misunderstanding", "understand"), vec![(3, 13)]);
    }

    #[test]
    fn test_case_and_punctuation_sensitive() {
        assert!(find_matches("I understand.", "i understand").is_empty());
        assert!(find_matches("I understand", "I understand.").is_empty());
    }

    #[test]
    fn test_multibyte_text() {
        let haystack = "café  crème brûlée";
        let found = find_matches(haystack, "crème brûlée");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].slice(haystack), "crème brûlée");

        let found = find_matches("ééé", "é");
        assert_eq!(found.len(), 3);
    }

    #[test]
    fn test_normalize_whitespace() {
        assert_eq!(normalize_whitespace("  a \t b\n\nc  "), "a b c");
        assert_eq!(normalize_whitespace(""), "");
    }

    #[test]
    fn test_compute_hash() {
        let hash = compute_hash(b"hello");
        assert!(hash.starts_with("sha256:"));
        assert_eq!(hash.len(), 7 + 64);
    }

    #[test]
    fn test_compute_slice_hash_clamps() {
        assert_eq!(compute_slice_hash("hello", 0, 5), compute_hash(b"hello"));
        assert_eq!(compute_slice_hash("hello", 2, 99), compute_hash(b"llo"));
    }

    #[test]
    fn test_offset_to_line_col() {
        let text = "line1\nline2\nline3";

        let pos = offset_to_line_col(text, 0);
        assert_eq!((pos.line, pos.col), (1, 1));

        let pos = offset_to_line_col(text, 6);
        assert_eq!((pos.line, pos.col), (2, 1));

        let pos = offset_to_line_col(text, 8);
        assert_eq!((pos.line, pos.col), (2, 3));
    }

    #[test]
    fn test_extract_anchor_text() {
        let text = "This is a long transcript with many words and content for testing.";
        let anchor = extract_anchor_text(text, 30, 40, 40);
        assert!(anchor.len() <= 46);
        assert!(anchor.contains("many word"));
        assert!(anchor.starts_with("..."));
        assert!(anchor.ends_with("..."));

        assert_eq!(extract_anchor_text("short", 0, 5, 80), "short");
    }
}
