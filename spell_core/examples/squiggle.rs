//! Console walk-through of the engine: wire a rope document, a word-list
//! dictionary, and a span-set sink into the adapter, then edit and watch
//! the annotations follow.
//!
//! Run with `RUST_LOG=trace cargo run --example squiggle` to see the scan
//! slices.

use std::sync::Arc;
use std::time::{Duration, Instant};

use spell_core::{
    Checker, Dictionary, DictionaryError, Document, RopeDocument, SpanSet, SpellAdapter,
};

/// Accepts only the words it was given.
struct WordList {
    words: Vec<String>,
}

impl WordList {
    fn new(words: &[&str]) -> Self {
        Self {
            words: words.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl Dictionary for WordList {
    fn language(&self) -> &str {
        "en_US"
    }

    fn contains_word(&self, word: &str) -> Result<bool, DictionaryError> {
        Ok(self.words.iter().any(|w| w.eq_ignore_ascii_case(word)))
    }

    fn list_corrections(&self, word: &str) -> Option<Vec<String>> {
        let first = word.chars().next()?;
        let mut ranked: Vec<String> = self
            .words
            .iter()
            .filter(|w| w.starts_with(first))
            .cloned()
            .collect();
        ranked.truncate(3);
        if ranked.is_empty() {
            None
        } else {
            Some(ranked)
        }
    }

    fn add_word(&self, _word: &str) {}

    fn ignore_word(&self, _word: &str) {}

    fn extra_word_chars(&self) -> &str {
        "-'"
    }
}

fn pump(adapter: &mut SpellAdapter, doc: &RopeDocument, sink: &mut SpanSet) {
    while adapter.tick(doc, sink, Instant::now()) {}
}

fn report(doc: &RopeDocument, sink: &SpanSet) {
    println!("text: {doc}");
    if sink.is_empty() {
        println!("  no misspellings");
    }
    for span in sink.iter() {
        println!("  misspelled at {span:?}: {}", doc.slice(span.clone()));
    }
}

fn main() {
    env_logger::init();

    let dictionary = Arc::new(WordList::new(&[
        "the", "quick", "brown", "fox", "jumps", "over", "a", "lazy", "dog",
    ]));
    let checker = Arc::new(Checker::new(Some(dictionary)));

    let mut doc = RopeDocument::from_str("the qick brown fox");
    let mut sink = SpanSet::new();
    let mut adapter = SpellAdapter::new(&doc, Some(checker));
    adapter.set_settle_delay(Duration::ZERO);

    pump(&mut adapter, &doc, &mut sink);
    report(&doc, &sink);

    // Fix the typo the way a host editor would.
    println!("\ninserting 'u' into 'qick'...");
    adapter.before_insert(5, 1);
    doc.insert(5, "u");
    sink.shift_insert(5, 1);
    adapter.after_insert(&doc, &mut sink, 5, 1);
    pump(&mut adapter, &doc, &mut sink);
    report(&doc, &sink);

    // And append a fresh mistake.
    let end = doc.len_chars();
    println!("\nappending ' jumsp'...");
    adapter.before_insert(end, 6);
    doc.insert(end, " jumsp");
    adapter.after_insert(&doc, &mut sink, end, 6);
    pump(&mut adapter, &doc, &mut sink);
    report(&doc, &sink);

    // Park the cursor on the typo, as if the user clicked it.
    adapter.cursor_moved(doc.len_chars() - 2, Instant::now());
    pump(&mut adapter, &doc, &mut sink);
    if let Some(word) = adapter.cursor_word() {
        println!("\nword under cursor: {} -> {:?}", word.text, word.corrections);
    }
}
