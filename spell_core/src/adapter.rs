//! Glue between a live document and the checker: reacts to edits and
//! cursor motion, keeps the region map in lockstep, and drives the
//! time-sliced background scan.
//!
//! The host owns the document and the annotation sink and passes them into
//! each call; the adapter owns everything else. Everything runs on the one
//! logical thread that owns the document: the host pumps
//! [`SpellAdapter::tick`] from its idle loop, and mutation notifications
//! are synchronous, so a scan can never observe a half-updated region map.

use std::ops::Range;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::annotations::AnnotationSink;
use crate::boundary::{word_at, BoundaryOracle, ExtraWordChars, UnicodeBoundaries};
use crate::checker::{Checker, Dictionary};
use crate::cursor::WordCursor;
use crate::document::Document;
use crate::region::{RegionTracker, RunState};

/// Wall-clock budget for one scan slice.
pub const SCAN_QUANTUM: Duration = Duration::from_millis(2);

/// Debounce for cursor-motion invalidation. Keyboard repeat is typically
/// ~30 ms, so anything longer coalesces held-key movement into one settle.
pub const SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Words at least this long are never memoized for the cursor menu.
const MAX_WORD_CHARS: usize = 100;

/// Observable phase of the background scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// No unchecked content is pending.
    Idle,
    /// A scan is scheduled or running.
    Scanning,
    /// The last slice hit its deadline; the scan resumes on the next tick.
    Suspended,
}

/// The misspelled word under the cursor, kept for host correction menus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CursorWord {
    pub text: String,
    pub corrections: Vec<String>,
}

/// Incremental spell-check driver for one document.
pub struct SpellAdapter {
    region: RegionTracker,
    checker: Option<Arc<Checker>>,
    oracle: Box<dyn BoundaryOracle>,
    enabled: bool,
    armed: bool,
    state: ScanState,
    quantum: Duration,
    settle_delay: Duration,
    cursor_position: usize,
    incoming_cursor_position: usize,
    pending_settle: Option<Instant>,
    cursor_word: Option<CursorWord>,
}

impl SpellAdapter {
    /// Creates an enabled adapter over `doc`, seeding the region map with
    /// the whole document unchecked and arming the first scan.
    pub fn new<D: Document + ?Sized>(doc: &D, checker: Option<Arc<Checker>>) -> Self {
        let mut region = RegionTracker::new();
        region.insert(0, doc.len_chars(), RunState::Unchecked);
        let mut adapter = Self {
            region,
            checker,
            oracle: Box::new(UnicodeBoundaries::new()),
            enabled: true,
            armed: false,
            state: ScanState::Idle,
            quantum: SCAN_QUANTUM,
            settle_delay: SETTLE_DELAY,
            cursor_position: 0,
            incoming_cursor_position: 0,
            pending_settle: None,
            cursor_word: None,
        };
        adapter.arm();
        adapter
    }

    /// Swaps in a different boundary oracle.
    pub fn with_oracle(mut self, oracle: Box<dyn BoundaryOracle>) -> Self {
        self.oracle = oracle;
        self
    }

    /// Overrides the per-slice scan budget.
    pub fn set_quantum(&mut self, quantum: Duration) {
        self.quantum = quantum;
    }

    /// Overrides the cursor settle delay.
    pub fn set_settle_delay(&mut self, delay: Duration) {
        self.settle_delay = delay;
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn scan_state(&self) -> ScanState {
        self.state
    }

    pub fn checker(&self) -> Option<&Arc<Checker>> {
        self.checker.as_ref()
    }

    /// The region map, exposed for host introspection and tests.
    pub fn region(&self) -> &RegionTracker {
        &self.region
    }

    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    /// The memoized misspelled word under the cursor, if any.
    pub fn cursor_word(&self) -> Option<&CursorWord> {
        self.cursor_word.as_ref()
    }

    /// Cooperative entry point, called from the host's idle loop.
    ///
    /// Fires a due cursor-settle task, then runs at most one scan slice
    /// bounded by the quantum. Returns true while work remains, so hosts
    /// keep ticking until it goes quiet.
    pub fn tick<D, S>(&mut self, doc: &D, sink: &mut S, now: Instant) -> bool
    where
        D: Document + ?Sized,
        S: AnnotationSink + ?Sized,
    {
        if self.pending_settle.is_some_and(|due| due <= now) {
            self.pending_settle = None;
            self.settle_cursor(doc, sink);
        }
        if self.armed {
            self.state = ScanState::Scanning;
            if self.update_range(doc, sink, now + self.quantum) {
                self.state = ScanState::Suspended;
            } else {
                self.armed = false;
                self.state = ScanState::Idle;
            }
        }
        self.armed || self.pending_settle.is_some()
    }

    /// Host notification: `length` chars are about to be inserted at
    /// `position`. Grows the map ahead of the text change.
    pub fn before_insert(&mut self, position: usize, length: usize) {
        if !self.enabled {
            return;
        }
        self.region.insert(position, length, RunState::Unchecked);
    }

    /// Host notification: the insertion at `position` has landed.
    ///
    /// Invalidates the whole enclosing word span, since an insertion can
    /// join or split words beyond the literally inserted chars.
    pub fn after_insert<D, S>(&mut self, doc: &D, sink: &mut S, position: usize, length: usize)
    where
        D: Document + ?Sized,
        S: AnnotationSink + ?Sized,
    {
        if !self.enabled {
            return;
        }
        self.mark_unchecked(doc, sink, position, length);
    }

    /// Host notification: `length` chars at `position` are about to go.
    pub fn before_delete(&mut self, position: usize, length: usize) {
        if !self.enabled {
            return;
        }
        self.region.remove(position, length);
    }

    /// Host notification: the deletion has landed and the span collapsed
    /// onto `position`; `_length` is the removed char count.
    pub fn after_delete<D, S>(&mut self, doc: &D, sink: &mut S, position: usize, _length: usize)
    where
        D: Document + ?Sized,
        S: AnnotationSink + ?Sized,
    {
        if !self.enabled {
            return;
        }
        self.mark_unchecked(doc, sink, position, 0);
    }

    /// Host notification: the edit cursor moved to `position`.
    ///
    /// The reaction is debounced: a new movement cancels the pending one
    /// and reschedules at `now + settle_delay`.
    pub fn cursor_moved(&mut self, position: usize, now: Instant) {
        if !self.enabled {
            return;
        }
        self.incoming_cursor_position = position;
        self.pending_settle = Some(now + self.settle_delay);
    }

    /// Turns checking on or off.
    ///
    /// Disabling clears every annotation and drops all region tracking;
    /// re-enabling seeds a full-document unchecked run, so the whole
    /// document is re-checked.
    pub fn set_enabled<D, S>(&mut self, doc: &D, sink: &mut S, enabled: bool)
    where
        D: Document + ?Sized,
        S: AnnotationSink + ?Sized,
    {
        if self.enabled == enabled {
            return;
        }
        self.enabled = enabled;
        if enabled {
            log::debug!("spell checking enabled, re-checking document");
            self.region = RegionTracker::new();
            self.region.insert(0, doc.len_chars(), RunState::Unchecked);
            self.arm();
        } else {
            log::debug!("spell checking disabled");
            sink.clear(0..doc.len_chars());
            self.region = RegionTracker::new();
            self.pending_settle = None;
            self.cursor_word = None;
            self.disarm();
        }
    }

    /// Replaces the checker, forcing a full re-check at the current length.
    pub fn set_checker(&mut self, checker: Option<Arc<Checker>>) {
        let unchanged = match (&self.checker, &checker) {
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            (None, None) => true,
            _ => false,
        };
        if unchanged {
            return;
        }
        log::debug!("checker replaced, scheduling full re-check");
        self.checker = checker;
        self.disarm();
        let len = self.region.len();
        if len > 0 {
            self.region.replace(0, len, RunState::Unchecked);
        }
        self.arm();
    }

    /// Swaps the dictionary on the current checker (creating a checker when
    /// none is set) and re-checks the document.
    pub fn set_dictionary<D, S>(
        &mut self,
        doc: &D,
        sink: &mut S,
        dictionary: Option<Arc<dyn Dictionary>>,
    ) where
        D: Document + ?Sized,
        S: AnnotationSink + ?Sized,
    {
        match &self.checker {
            Some(checker) => checker.set_dictionary(dictionary),
            None => self.checker = Some(Arc::new(Checker::new(dictionary))),
        }
        self.invalidate_all(doc, sink);
    }

    /// Adds `word` to the user dictionary and re-checks everything, since
    /// a newly learned word may clear annotations anywhere.
    pub fn add_word<D, S>(&mut self, doc: &D, sink: &mut S, word: &str)
    where
        D: Document + ?Sized,
        S: AnnotationSink + ?Sized,
    {
        if let Some(checker) = &self.checker {
            checker.add_word(word);
            self.invalidate_all(doc, sink);
        }
    }

    /// Session-ignores `word` and re-checks everything.
    pub fn ignore_word<D, S>(&mut self, doc: &D, sink: &mut S, word: &str)
    where
        D: Document + ?Sized,
        S: AnnotationSink + ?Sized,
    {
        if let Some(checker) = &self.checker {
            checker.ignore_word(word);
            self.invalidate_all(doc, sink);
        }
    }

    /// Host notification: a no-check span at `range` was added or removed.
    pub fn excluded_changed<S>(&mut self, sink: &mut S, range: Range<usize>)
    where
        S: AnnotationSink + ?Sized,
    {
        if !self.enabled || range.start >= range.end {
            return;
        }
        self.region
            .replace(range.start, range.end - range.start, RunState::Unchecked);
        sink.clear(range);
        self.arm();
    }

    /// Drops all progress and queues a full re-check of the document.
    pub fn invalidate_all<D, S>(&mut self, doc: &D, sink: &mut S)
    where
        D: Document + ?Sized,
        S: AnnotationSink + ?Sized,
    {
        if !self.enabled {
            return;
        }
        log::debug!("invalidating entire document");
        let len = doc.len_chars();
        self.region = RegionTracker::new();
        self.region.insert(0, len, RunState::Unchecked);
        sink.clear(0..len);
        self.arm();
    }

    /// Schedules a scan if one is not already pending. Idempotent; a
    /// disabled or checker-less adapter stays disarmed.
    fn arm(&mut self) {
        if self.enabled && self.checker.is_some() {
            self.armed = true;
            if self.state == ScanState::Idle {
                self.state = ScanState::Scanning;
            }
        } else {
            self.disarm();
        }
    }

    fn disarm(&mut self) {
        self.armed = false;
        self.state = ScanState::Idle;
    }

    fn joiners(&self) -> ExtraWordChars {
        self.checker
            .as_ref()
            .map(|checker| checker.extra_word_chars())
            .unwrap_or_default()
    }

    /// The joiner-extended word touching `offset`, if any.
    fn word_touching<D: Document + ?Sized>(&self, doc: &D, offset: usize) -> Option<Range<usize>> {
        let joiners = self.joiners();
        word_at(doc, self.oracle.as_ref(), &joiners, offset)
    }

    /// Invalidates `position..position + length` widened to the word
    /// boundaries touching either side, clears its annotations, and arms.
    fn mark_unchecked<D, S>(&mut self, doc: &D, sink: &mut S, position: usize, length: usize)
    where
        D: Document + ?Sized,
        S: AnnotationSink + ?Sized,
    {
        let begin = self
            .word_touching(doc, position)
            .map_or(position, |word| word.start);
        let end_position = position + length;
        let end = self
            .word_touching(doc, end_position)
            .map_or(end_position, |word| word.end);
        if begin < end {
            self.region.replace(begin, end - begin, RunState::Unchecked);
            sink.clear(begin..end);
            self.arm();
        }
    }

    /// One scan slice. Returns true when suspended at the deadline with
    /// work left, false when no unchecked content remains.
    fn update_range<D, S>(&mut self, doc: &D, sink: &mut S, deadline: Instant) -> bool
    where
        D: Document + ?Sized,
        S: AnnotationSink + ?Sized,
    {
        let Some(checker) = self.checker.clone() else {
            return false;
        };
        let Some(begin) = self.region.find_first(RunState::Unchecked) else {
            // Normalize to a single checked run and go quiet.
            let len = self.region.len();
            if len > 0 {
                self.region.replace(0, len, RunState::Checked);
            }
            return false;
        };

        let joiners = checker.extra_word_chars();
        let mut scanned_words = 0usize;
        let mut last_end = begin;
        let mut suspended = false;
        {
            let mut cursor =
                WordCursor::new(doc, &self.region, self.oracle.as_ref(), &joiners, begin);
            for span in &mut cursor {
                let word = doc.slice(span.clone());
                if checker.check_word(&word) {
                    sink.clear(span.clone());
                } else {
                    sink.apply(span.clone());
                }
                last_end = span.end;
                scanned_words += 1;
                if Instant::now() >= deadline {
                    suspended = true;
                    break;
                }
            }
        }

        // An exhausted cursor has seen everything to the end of the
        // document, wordless tails included; a suspended one only vouches
        // for offsets up to the last word it produced.
        let scan_end = if suspended { last_end } else { self.region.len() };
        if scan_end > begin {
            self.region.replace(begin, scan_end - begin, RunState::Checked);
        }
        log::trace!(
            "scan slice {begin}..{scan_end}: {scanned_words} words, {}",
            if suspended { "suspended" } else { "complete" }
        );

        // Never leave a squiggle under the word being edited.
        let current = self.word_touching(doc, self.cursor_position);
        if let Some(word) = current {
            sink.clear(word);
        }

        suspended
    }

    /// The debounced cursor-settle task: re-check the word just left and
    /// the word just entered, then memoize the word under the cursor.
    fn settle_cursor<D, S>(&mut self, doc: &D, sink: &mut S)
    where
        D: Document + ?Sized,
        S: AnnotationSink + ?Sized,
    {
        let old_word = self.word_touching(doc, self.cursor_position);
        if let Some(word) = old_word {
            self.mark_unchecked(doc, sink, word.start, word.end - word.start);
        }
        self.cursor_position = self.incoming_cursor_position;
        let new_word = self.word_touching(doc, self.cursor_position);
        if let Some(word) = new_word {
            self.mark_unchecked(doc, sink, word.start, word.end - word.start);
        }
        self.remember_cursor_word(doc);
    }

    fn remember_cursor_word<D: Document + ?Sized>(&mut self, doc: &D) {
        self.cursor_word = None;
        let Some(checker) = self.checker.clone() else {
            return;
        };
        let Some(word) = self.word_touching(doc, self.cursor_position) else {
            return;
        };
        if word.end - word.start >= MAX_WORD_CHARS {
            return;
        }
        let text = doc.slice(word);
        if checker.check_word(&text) {
            return;
        }
        let corrections = checker.list_corrections(&text).unwrap_or_default();
        self.cursor_word = Some(CursorWord { text, corrections });
    }
}
