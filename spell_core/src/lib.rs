//! Spell Core - incremental spell checking for live text documents.
//!
//! This crate tracks which parts of a mutable document have been
//! spell-checked, re-checks only what changed, and never blocks
//! interactive editing: scans run in short time slices from the host's
//! idle loop. Dictionaries, rendering, and the widget layer stay outside;
//! the engine talks to them through the [`Dictionary`], [`Document`], and
//! [`AnnotationSink`] interfaces.

pub mod adapter;
pub mod annotations;
pub mod boundary;
pub mod checker;
pub mod cursor;
pub mod document;
pub mod region;

pub use adapter::{CursorWord, ScanState, SpellAdapter, SCAN_QUANTUM, SETTLE_DELAY};
pub use annotations::{AnnotationSink, SpanSet};
pub use boundary::{BoundaryOracle, ExtraWordChars, UnicodeBoundaries};
pub use checker::{Checker, Dictionary, DictionaryError};
pub use cursor::WordCursor;
pub use document::{Document, RopeDocument};
pub use region::{RegionTracker, RunState};
