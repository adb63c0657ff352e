//! Read access to the host text buffer.
//!
//! The engine only ever reads the document; mutation stays with the host,
//! which reports edits through the adapter's notification hooks. All
//! offsets are char indices.

use std::ops::Range;

use ropey::Rope;

/// Random-access view of the checked document.
pub trait Document {
    /// Total length in chars.
    fn len_chars(&self) -> usize;

    /// Char at `offset`, if in range.
    fn char_at(&self, offset: usize) -> Option<char>;

    /// Copies out `range` as a string.
    fn slice(&self, range: Range<usize>) -> String;

    /// Content range of the line containing `offset`, newline excluded.
    fn line_span(&self, offset: usize) -> Range<usize>;

    /// True when the whole of `range` lies in a host-marked no-check span.
    fn is_excluded(&self, range: Range<usize>) -> bool {
        let _ = range;
        false
    }
}

/// Rope-backed document with host-driven mutation and an excluded-range
/// list for spans that must never be spell-checked (code blocks, URLs).
#[derive(Debug, Clone, Default)]
pub struct RopeDocument {
    rope: Rope,
    excluded: Vec<Range<usize>>,
}

impl RopeDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_str(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            excluded: Vec::new(),
        }
    }

    /// Inserts `text` at `offset`, shifting excluded ranges with the edit.
    pub fn insert(&mut self, offset: usize, text: &str) {
        let offset = offset.min(self.rope.len_chars());
        let grown = text.chars().count();
        self.rope.insert(offset, text);
        for range in &mut self.excluded {
            if range.start >= offset {
                range.start += grown;
            }
            if range.end > offset {
                range.end += grown;
            }
        }
    }

    /// Removes `range`, shifting and shrinking excluded ranges with it.
    pub fn remove(&mut self, range: Range<usize>) {
        let start = range.start.min(self.rope.len_chars());
        let end = range.end.min(self.rope.len_chars());
        if start >= end {
            return;
        }
        self.rope.remove(start..end);
        let removed = end - start;
        let shift = |pos: usize| {
            if pos <= start {
                pos
            } else if pos >= end {
                pos - removed
            } else {
                start
            }
        };
        for range in &mut self.excluded {
            range.start = shift(range.start);
            range.end = shift(range.end);
        }
        self.excluded.retain(|range| range.start < range.end);
    }

    /// Replaces the excluded-range list wholesale.
    pub fn set_excluded(&mut self, ranges: Vec<Range<usize>>) {
        self.excluded = ranges;
    }

    pub fn excluded(&self) -> &[Range<usize>] {
        &self.excluded
    }

    /// Converts a char offset to a 0-indexed (line, column) position.
    pub fn char_to_line_col(&self, offset: usize) -> (usize, usize) {
        let offset = offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(offset);
        (line, offset - self.rope.line_to_char(line))
    }

    /// Converts a 0-indexed (line, column) position to a char offset,
    /// clamping the column to the line length.
    pub fn line_col_to_char(&self, line: usize, col: usize) -> usize {
        if line >= self.rope.len_lines() {
            return self.rope.len_chars();
        }
        let start = self.rope.line_to_char(line);
        start + col.min(self.line_len(line))
    }

    /// Line length in chars, excluding the trailing newline.
    fn line_len(&self, line: usize) -> usize {
        let slice = self.rope.line(line);
        let len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            len - 1
        } else {
            len
        }
    }
}

impl std::fmt::Display for RopeDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.rope)
    }
}

impl Document for RopeDocument {
    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn char_at(&self, offset: usize) -> Option<char> {
        if offset < self.rope.len_chars() {
            Some(self.rope.char(offset))
        } else {
            None
        }
    }

    fn slice(&self, range: Range<usize>) -> String {
        let start = range.start.min(self.rope.len_chars());
        let end = range.end.min(self.rope.len_chars());
        if start >= end {
            return String::new();
        }
        self.rope.slice(start..end).to_string()
    }

    fn line_span(&self, offset: usize) -> Range<usize> {
        let offset = offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(offset);
        let start = self.rope.line_to_char(line);
        start..start + self.line_len(line)
    }

    fn is_excluded(&self, range: Range<usize>) -> bool {
        self.excluded
            .iter()
            .any(|ex| ex.start <= range.start && range.end <= ex.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_access() {
        let doc = RopeDocument::from_str("hello\nworld");
        assert_eq!(doc.len_chars(), 11);
        assert_eq!(doc.char_at(0), Some('h'));
        assert_eq!(doc.char_at(5), Some('\n'));
        assert_eq!(doc.char_at(11), None);
        assert_eq!(doc.slice(6..11), "world");
    }

    #[test]
    fn test_line_span() {
        let doc = RopeDocument::from_str("hello\nworld");
        assert_eq!(doc.line_span(0), 0..5);
        assert_eq!(doc.line_span(5), 0..5);
        assert_eq!(doc.line_span(6), 6..11);
        assert_eq!(doc.line_span(11), 6..11);
    }

    #[test]
    fn test_line_span_of_empty_document() {
        let doc = RopeDocument::new();
        assert_eq!(doc.line_span(0), 0..0);
    }

    #[test]
    fn test_insert_and_remove() {
        let mut doc = RopeDocument::from_str("helo world");
        doc.insert(3, "l");
        assert_eq!(doc.to_string(), "hello world");
        doc.remove(5..11);
        assert_eq!(doc.to_string(), "hello");
    }

    #[test]
    fn test_position_translation() {
        let doc = RopeDocument::from_str("abc\ndefgh");
        assert_eq!(doc.char_to_line_col(0), (0, 0));
        assert_eq!(doc.char_to_line_col(3), (0, 3));
        assert_eq!(doc.char_to_line_col(4), (1, 0));
        assert_eq!(doc.char_to_line_col(6), (1, 2));
        assert_eq!(doc.line_col_to_char(1, 2), 6);
        assert_eq!(doc.line_col_to_char(0, 99), 3);
        assert_eq!(doc.line_col_to_char(9, 0), 9);
    }

    #[test]
    fn test_excluded_query() {
        let mut doc = RopeDocument::from_str("see `code` here");
        doc.set_excluded(vec![4..10]);
        assert!(doc.is_excluded(5..9));
        assert!(doc.is_excluded(4..10));
        assert!(!doc.is_excluded(3..9));
        assert!(!doc.is_excluded(10..14));
    }

    #[test]
    fn test_excluded_ranges_shift_on_insert() {
        let mut doc = RopeDocument::from_str("aa bb cc");
        doc.set_excluded(vec![3..5]);
        doc.insert(0, "xx ");
        assert_eq!(doc.excluded(), &[6..8]);
        // Inserting inside the range grows it.
        doc.insert(7, "y");
        assert_eq!(doc.excluded(), &[6..9]);
    }

    #[test]
    fn test_excluded_ranges_shrink_on_remove() {
        let mut doc = RopeDocument::from_str("aa bb cc");
        doc.set_excluded(vec![3..5]);
        doc.remove(0..2);
        assert_eq!(doc.excluded(), &[1..3]);
        doc.remove(1..3);
        assert!(doc.excluded().is_empty());
    }
}
