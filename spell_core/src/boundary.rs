//! Locale word boundaries and the extra word-joiner rule.
//!
//! Boundary queries run over a single line of text (words never cross line
//! breaks) with char-based offsets. The default oracle uses UAX-29 word
//! segmentation; dictionaries may widen words further with joiner
//! characters such as `'` and `-`.

use std::ops::Range;

use unicode_segmentation::UnicodeSegmentation;

use crate::document::Document;

/// Lines longer than this are not segmented at all.
///
/// Pathological single-line inputs (minified sources, base64 blobs) are
/// treated as having no word boundaries instead of paying their cost.
pub const MAX_SEGMENT_CHARS: usize = 1024;

/// Word-break queries over one window of text.
///
/// Offsets are char indices into the window. Both queries are exclusive:
/// `word_end_after` reports the first word end strictly after `offset`,
/// `word_start_before` the last word start strictly before `offset`.
pub trait BoundaryOracle {
    fn word_end_after(&self, text: &str, offset: usize) -> Option<usize>;
    fn word_start_before(&self, text: &str, offset: usize) -> Option<usize>;
}

/// Default oracle on top of UAX-29 word boundaries.
///
/// A boundary segment counts as a word when it contains an alphanumeric
/// char, so punctuation and whitespace segments never produce spans.
#[derive(Debug, Clone)]
pub struct UnicodeBoundaries {
    max_chars: usize,
}

impl Default for UnicodeBoundaries {
    fn default() -> Self {
        Self::new()
    }
}

impl UnicodeBoundaries {
    pub fn new() -> Self {
        Self {
            max_chars: MAX_SEGMENT_CHARS,
        }
    }

    /// Oracle with a custom size guard, for tests and unusual hosts.
    pub fn with_limit(max_chars: usize) -> Self {
        Self { max_chars }
    }

    /// Char-offset spans of every word in `text`, empty when the guard trips.
    fn words(&self, text: &str) -> Vec<Range<usize>> {
        if text.chars().count() > self.max_chars {
            return Vec::new();
        }
        let mut words = Vec::new();
        let mut pos = 0;
        for (_, segment) in text.split_word_bound_indices() {
            let chars = segment.chars().count();
            if segment.chars().any(|c| c.is_alphanumeric()) {
                words.push(pos..pos + chars);
            }
            pos += chars;
        }
        words
    }
}

impl BoundaryOracle for UnicodeBoundaries {
    fn word_end_after(&self, text: &str, offset: usize) -> Option<usize> {
        self.words(text).into_iter().map(|w| w.end).find(|&end| end > offset)
    }

    fn word_start_before(&self, text: &str, offset: usize) -> Option<usize> {
        self.words(text)
            .into_iter()
            .map(|w| w.start)
            .take_while(|&start| start < offset)
            .last()
    }
}

/// The joiner characters a dictionary adds on top of locale boundaries.
///
/// Immutable once built; the empty set is the default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtraWordChars {
    chars: String,
}

impl ExtraWordChars {
    pub fn new(chars: &str) -> Self {
        Self {
            chars: chars.to_owned(),
        }
    }

    /// Builds the set from raw backend bytes.
    ///
    /// Native dictionaries occasionally hand out invalid UTF-8; the data is
    /// truncated at the last valid boundary rather than propagated.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match std::str::from_utf8(bytes) {
            Ok(chars) => Self::new(chars),
            Err(err) => {
                log::warn!(
                    "extra word characters are not valid UTF-8, truncating to {} bytes",
                    err.valid_up_to()
                );
                let valid = &bytes[..err.valid_up_to()];
                Self::new(std::str::from_utf8(valid).unwrap_or(""))
            }
        }
    }

    pub fn contains(&self, ch: char) -> bool {
        self.chars.contains(ch)
    }

    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.chars
    }
}

fn char_at(text: &str, idx: usize) -> Option<char> {
    text.chars().nth(idx)
}

/// Extends a word end across joiners: one joiner char, then a
/// word-constituent char, repeated until neither holds. A trailing joiner
/// with nothing after it ends the word normally.
fn extend_forward(
    text: &str,
    oracle: &dyn BoundaryOracle,
    joiners: &ExtraWordChars,
    mut end: usize,
) -> usize {
    if joiners.is_empty() {
        return end;
    }
    loop {
        let Some(joiner) = char_at(text, end) else {
            return end;
        };
        if !joiners.contains(joiner) {
            return end;
        }
        match char_at(text, end + 1) {
            Some(c) if c.is_alphanumeric() => match oracle.word_end_after(text, end + 1) {
                Some(next_end) => end = next_end,
                None => return end,
            },
            _ => return end,
        }
    }
}

/// Mirror of [`extend_forward`] for word starts.
fn extend_backward(
    text: &str,
    oracle: &dyn BoundaryOracle,
    joiners: &ExtraWordChars,
    mut start: usize,
) -> usize {
    if joiners.is_empty() {
        return start;
    }
    while start >= 2 {
        let Some(joiner) = char_at(text, start - 1) else {
            return start;
        };
        if !joiners.contains(joiner) {
            return start;
        }
        match char_at(text, start - 2) {
            Some(c) if c.is_alphanumeric() => match oracle.word_start_before(text, start - 1) {
                Some(next_start) => start = next_start,
                None => return start,
            },
            _ => return start,
        }
    }
    start
}

/// First word in `text` ending strictly after `from`, joiner-extended.
///
/// The returned span may start before `from`: a position inside a word
/// resolves to that whole word.
pub fn next_word(
    text: &str,
    oracle: &dyn BoundaryOracle,
    joiners: &ExtraWordChars,
    from: usize,
) -> Option<Range<usize>> {
    let end = oracle.word_end_after(text, from)?;
    let start = oracle.word_start_before(text, end)?;
    let start = extend_backward(text, oracle, joiners, start);
    let end = extend_forward(text, oracle, joiners, end);
    Some(start..end)
}

/// The word touching `offset` in the document: containing it, or starting
/// or ending exactly at it. `None` when `offset` sits in whitespace or
/// punctuation away from any word.
pub fn word_at<D: Document + ?Sized>(
    doc: &D,
    oracle: &dyn BoundaryOracle,
    joiners: &ExtraWordChars,
    offset: usize,
) -> Option<Range<usize>> {
    let line = doc.line_span(offset);
    let text = doc.slice(line.clone());
    let rel = offset - line.start;
    let word = next_word(&text, oracle, joiners, rel.saturating_sub(1))?;
    if word.start <= rel && rel <= word.end {
        Some(line.start + word.start..line.start + word.end)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::RopeDocument;

    fn oracle() -> UnicodeBoundaries {
        UnicodeBoundaries::new()
    }

    fn no_joiners() -> ExtraWordChars {
        ExtraWordChars::default()
    }

    fn dash_apostrophe() -> ExtraWordChars {
        ExtraWordChars::new("-'")
    }

    #[test]
    fn test_word_end_after() {
        let text = "this is a series of words";
        assert_eq!(oracle().word_end_after(text, 0), Some(4));
        assert_eq!(oracle().word_end_after(text, 4), Some(7));
        assert_eq!(oracle().word_end_after(text, 12), Some(16));
        assert_eq!(oracle().word_end_after(text, 25), None);
    }

    #[test]
    fn test_word_start_before() {
        let text = "this is a series of words";
        assert_eq!(oracle().word_start_before(text, 0), None);
        assert_eq!(oracle().word_start_before(text, 4), Some(0));
        assert_eq!(oracle().word_start_before(text, 16), Some(10));
    }

    #[test]
    fn test_size_guard_reports_no_boundaries() {
        let long = "word ".repeat(300);
        assert!(long.chars().count() > MAX_SEGMENT_CHARS);
        assert_eq!(oracle().word_end_after(&long, 0), None);
        assert_eq!(oracle().word_start_before(&long, 100), None);

        let small = UnicodeBoundaries::with_limit(3);
        assert_eq!(small.word_end_after("word", 0), None);
    }

    #[test]
    fn test_next_word_backs_up_into_word() {
        let text = "this is a series of words";
        // Position inside "series" resolves to the whole word.
        assert_eq!(next_word(text, &oracle(), &no_joiners(), 12), Some(10..16));
    }

    #[test]
    fn test_joiner_extends_across_hyphen() {
        let text = "have join-words.";
        let word = next_word(text, &oracle(), &dash_apostrophe(), 5).unwrap();
        assert_eq!(&text[5..15], "join-words");
        assert_eq!(word, 5..15);
    }

    #[test]
    fn test_joiner_chain_stays_single_word() {
        let text = "a well-known-fact here";
        let word = next_word(text, &oracle(), &dash_apostrophe(), 2).unwrap();
        assert_eq!(word, 2..17);
        assert_eq!(&text[word], "well-known-fact");
    }

    #[test]
    fn test_trailing_joiner_ends_word() {
        let text = "ends- here";
        let word = next_word(text, &oracle(), &dash_apostrophe(), 0).unwrap();
        assert_eq!(word, 0..4);
    }

    #[test]
    fn test_word_at_positions() {
        let doc = RopeDocument::from_str("ab cd");
        let joiners = no_joiners();
        let ora = oracle();
        assert_eq!(word_at(&doc, &ora, &joiners, 0), Some(0..2));
        assert_eq!(word_at(&doc, &ora, &joiners, 1), Some(0..2));
        // Touching the end of "ab".
        assert_eq!(word_at(&doc, &ora, &joiners, 2), Some(0..2));
        // Touching the start of "cd".
        assert_eq!(word_at(&doc, &ora, &joiners, 3), Some(3..5));
        assert_eq!(word_at(&doc, &ora, &joiners, 5), Some(3..5));
    }

    #[test]
    fn test_word_at_in_whitespace_is_none() {
        let doc = RopeDocument::from_str("ab  cd");
        assert_eq!(word_at(&doc, &oracle(), &no_joiners(), 3), None);
    }

    #[test]
    fn test_word_at_joined_word_from_the_joiner() {
        let doc = RopeDocument::from_str("join-words");
        let word = word_at(&doc, &oracle(), &dash_apostrophe(), 4);
        assert_eq!(word, Some(0..10));
    }

    #[test]
    fn test_word_at_stays_on_its_line() {
        let doc = RopeDocument::from_str("one\ntwo");
        assert_eq!(word_at(&doc, &oracle(), &no_joiners(), 5), Some(4..7));
        assert_eq!(word_at(&doc, &oracle(), &no_joiners(), 3), Some(0..3));
    }

    #[test]
    fn test_extra_word_chars_from_bytes_truncates_invalid_utf8() {
        let chars = ExtraWordChars::from_bytes(b"-'\xff\xfe'");
        assert_eq!(chars.as_str(), "-'");
        assert!(chars.contains('-'));
        assert!(chars.contains('\''));
    }

    #[test]
    fn test_extra_word_chars_from_valid_bytes() {
        let chars = ExtraWordChars::from_bytes("-'".as_bytes());
        assert_eq!(chars.as_str(), "-'");
    }
}
