//! The visual marking surface for misspelled spans.
//!
//! The engine never renders; it only toggles ranges on a sink. Hosts back
//! the trait with their own marker machinery, or keep a [`SpanSet`] as the
//! model behind it.

use std::ops::Range;

/// Receiver for error-annotation toggles, offsets in chars.
pub trait AnnotationSink {
    /// Marks `range` as misspelled.
    fn apply(&mut self, range: Range<usize>);

    /// Removes any marking that overlaps `range`.
    fn clear(&mut self, range: Range<usize>);
}

/// Ordered, coalesced set of annotated ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpanSet {
    spans: Vec<Range<usize>>,
}

impl SpanSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// True when `offset` lies inside an annotated range.
    pub fn contains(&self, offset: usize) -> bool {
        self.spans
            .iter()
            .any(|span| span.start <= offset && offset < span.end)
    }

    /// Annotated ranges in offset order.
    pub fn iter(&self) -> impl Iterator<Item = Range<usize>> + '_ {
        self.spans.iter().cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn clear_all(&mut self) {
        self.spans.clear();
    }

    /// Shifts ranges right of an insertion, growing any range it lands in.
    pub fn shift_insert(&mut self, offset: usize, length: usize) {
        for span in &mut self.spans {
            if span.start >= offset {
                span.start += length;
            }
            if span.end > offset {
                span.end += length;
            }
        }
    }

    /// Collapses ranges over a deletion of `length` chars at `offset`.
    pub fn shift_remove(&mut self, offset: usize, length: usize) {
        let end = offset + length;
        let shift = |pos: usize| {
            if pos <= offset {
                pos
            } else if pos >= end {
                pos - length
            } else {
                offset
            }
        };
        for span in &mut self.spans {
            span.start = shift(span.start);
            span.end = shift(span.end);
        }
        self.spans.retain(|span| span.start < span.end);
    }
}

impl AnnotationSink for SpanSet {
    fn apply(&mut self, range: Range<usize>) {
        if range.start >= range.end {
            return;
        }
        let mut merged = range;
        let mut out = Vec::with_capacity(self.spans.len() + 1);
        let mut placed = false;
        for span in self.spans.drain(..) {
            if span.end < merged.start {
                out.push(span);
            } else if span.start > merged.end {
                if !placed {
                    out.push(merged.clone());
                    placed = true;
                }
                out.push(span);
            } else {
                merged.start = merged.start.min(span.start);
                merged.end = merged.end.max(span.end);
            }
        }
        if !placed {
            out.push(merged);
        }
        self.spans = out;
    }

    fn clear(&mut self, range: Range<usize>) {
        if range.start >= range.end {
            return;
        }
        let mut out = Vec::with_capacity(self.spans.len() + 1);
        for span in self.spans.drain(..) {
            if span.end <= range.start || span.start >= range.end {
                out.push(span);
                continue;
            }
            if span.start < range.start {
                out.push(span.start..range.start);
            }
            if span.end > range.end {
                out.push(range.end..span.end);
            }
        }
        self.spans = out;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spans(set: &SpanSet) -> Vec<Range<usize>> {
        set.iter().collect()
    }

    #[test]
    fn test_apply_keeps_order_and_merges() {
        let mut set = SpanSet::new();
        set.apply(10..14);
        set.apply(0..3);
        set.apply(13..20);
        assert_eq!(spans(&set), vec![0..3, 10..20]);
        assert!(set.contains(0));
        assert!(set.contains(19));
        assert!(!set.contains(3));
    }

    #[test]
    fn test_apply_merges_adjacent() {
        let mut set = SpanSet::new();
        set.apply(0..5);
        set.apply(5..8);
        assert_eq!(spans(&set), vec![0..8]);
    }

    #[test]
    fn test_clear_splits_span() {
        let mut set = SpanSet::new();
        set.apply(0..10);
        set.clear(3..6);
        assert_eq!(spans(&set), vec![0..3, 6..10]);
    }

    #[test]
    fn test_clear_removes_covered_spans() {
        let mut set = SpanSet::new();
        set.apply(2..4);
        set.apply(6..8);
        set.clear(0..10);
        assert!(set.is_empty());
    }

    #[test]
    fn test_clear_all() {
        let mut set = SpanSet::new();
        set.apply(2..4);
        set.apply(6..8);
        set.clear_all();
        assert!(set.is_empty());
    }

    #[test]
    fn test_empty_ranges_are_ignored() {
        let mut set = SpanSet::new();
        set.apply(3..3);
        assert!(set.is_empty());
        set.apply(0..4);
        set.clear(2..2);
        assert_eq!(spans(&set), vec![0..4]);
    }

    #[test]
    fn test_shift_insert() {
        let mut set = SpanSet::new();
        set.apply(5..8);
        set.apply(12..15);
        set.shift_insert(0, 2);
        assert_eq!(spans(&set), vec![7..10, 14..17]);
        // Insertion inside a span grows it.
        set.shift_insert(8, 3);
        assert_eq!(spans(&set), vec![7..13, 17..20]);
    }

    #[test]
    fn test_shift_remove() {
        let mut set = SpanSet::new();
        set.apply(5..8);
        set.apply(12..15);
        set.shift_remove(0, 2);
        assert_eq!(spans(&set), vec![3..6, 10..13]);
        // Deleting across a span collapses it.
        set.shift_remove(2, 5);
        assert_eq!(spans(&set), vec![5..8]);
    }
}
