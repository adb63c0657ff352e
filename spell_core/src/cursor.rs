//! Lazy word iteration over the unchecked parts of a document.

use std::ops::Range;

use crate::boundary::{next_word, BoundaryOracle, ExtraWordChars};
use crate::document::Document;
use crate::region::{RegionTracker, RunState};

/// A lazy, finite, non-restartable walk of word spans.
///
/// Starting from an offset, the cursor visits only content the region
/// tracker still reports as unchecked, skipping checked runs wholesale. A
/// start that lands inside a word backs up to that word's beginning, so a
/// resumed scan never sees a truncated word. Spans lying entirely inside a
/// host-excluded range are skipped; empty spans are never produced.
pub struct WordCursor<'a, D: Document + ?Sized> {
    doc: &'a D,
    region: &'a RegionTracker,
    oracle: &'a dyn BoundaryOracle,
    joiners: &'a ExtraWordChars,
    offset: usize,
    /// Segmentation window for the line currently being walked.
    line: Option<(Range<usize>, String)>,
}

impl<'a, D: Document + ?Sized> WordCursor<'a, D> {
    pub fn new(
        doc: &'a D,
        region: &'a RegionTracker,
        oracle: &'a dyn BoundaryOracle,
        joiners: &'a ExtraWordChars,
        start: usize,
    ) -> Self {
        debug_assert_eq!(region.len(), doc.len_chars());
        Self {
            doc,
            region,
            oracle,
            joiners,
            offset: start,
            line: None,
        }
    }

    fn line_at(&mut self, offset: usize) -> (Range<usize>, &str) {
        let stale = match &self.line {
            Some((span, _)) => !(span.start <= offset && offset <= span.end),
            None => true,
        };
        if stale {
            let span = self.doc.line_span(offset);
            let text = self.doc.slice(span.clone());
            self.line = Some((span, text));
        }
        let (span, text) = self.line.as_ref().expect("line cache filled above");
        (span.clone(), text.as_str())
    }
}

impl<D: Document + ?Sized> Iterator for WordCursor<'_, D> {
    type Item = Range<usize>;

    fn next(&mut self) -> Option<Range<usize>> {
        let oracle = self.oracle;
        let joiners = self.joiners;
        loop {
            let pos = self.region.next_in_state(self.offset, RunState::Unchecked)?;
            let (line, word) = {
                let (line, text) = self.line_at(pos);
                let word = next_word(text, oracle, joiners, pos - line.start);
                (line, word)
            };
            match word {
                Some(word) => {
                    let span = line.start + word.start..line.start + word.end;
                    self.offset = span.end;
                    if self.doc.is_excluded(span.clone()) {
                        continue;
                    }
                    return Some(span);
                }
                None => {
                    // No further word on this line; hop over the newline.
                    if line.end >= self.doc.len_chars() {
                        return None;
                    }
                    self.offset = line.end + 1;
                }
            }
        }
    }
}
