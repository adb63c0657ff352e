//! Word correctness queries against a pluggable dictionary backend.

use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, Weak};

use thiserror::Error;

use crate::boundary::ExtraWordChars;

/// Failure reported by a dictionary backend.
///
/// The checker treats every failure as "word is correct" and keeps going;
/// an unreachable backend must never paint the document red.
#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("dictionary backend is unavailable")]
    Unavailable,
    #[error("dictionary backend failed: {0}")]
    Backend(String),
}

/// A loaded dictionary for one language.
///
/// Implementations wrap whatever backend the host links (a native speller,
/// a word-list file); this crate ships none.
pub trait Dictionary: Send + Sync {
    /// Language code the dictionary serves, such as `en_US`.
    fn language(&self) -> &str;

    /// Whether `word` is known.
    fn contains_word(&self, word: &str) -> Result<bool, DictionaryError>;

    /// Ranked corrections for `word`, or `None` when the backend has none.
    fn list_corrections(&self, word: &str) -> Option<Vec<String>>;

    /// Adds `word` to the user's dictionary.
    fn add_word(&self, word: &str);

    /// Accepts `word` for this session only.
    fn ignore_word(&self, word: &str);

    /// Characters that join words beyond the locale boundary rules.
    fn extra_word_chars(&self) -> &str {
        ""
    }
}

/// Spell checker over an optional, swappable dictionary.
///
/// With no dictionary configured every word is correct and scans are
/// no-ops. Purely numeric tokens are always correct and never reach the
/// dictionary.
#[derive(Default)]
pub struct Checker {
    dictionary: Mutex<Option<Arc<dyn Dictionary>>>,
}

impl Checker {
    pub fn new(dictionary: Option<Arc<dyn Dictionary>>) -> Self {
        Self {
            dictionary: Mutex::new(dictionary),
        }
    }

    /// The process-wide default checker.
    ///
    /// The registry keeps only a weak slot: callers own the instance, and
    /// once every strong reference is gone the next call builds a fresh
    /// one (with no dictionary until the host supplies it).
    pub fn default_instance() -> Arc<Checker> {
        static DEFAULT: OnceLock<Mutex<Weak<Checker>>> = OnceLock::new();
        let slot = DEFAULT.get_or_init(|| Mutex::new(Weak::new()));
        let mut slot = slot.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = slot.upgrade() {
            return existing;
        }
        let fresh = Arc::new(Checker::default());
        *slot = Arc::downgrade(&fresh);
        fresh
    }

    fn slot(&self) -> MutexGuard<'_, Option<Arc<dyn Dictionary>>> {
        self.dictionary.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The current dictionary, if one is configured.
    pub fn dictionary(&self) -> Option<Arc<dyn Dictionary>> {
        self.slot().clone()
    }

    /// Swaps the dictionary. Callers re-checking a document should also
    /// invalidate their region tracking.
    pub fn set_dictionary(&self, dictionary: Option<Arc<dyn Dictionary>>) {
        log::debug!(
            "dictionary changed to {:?}",
            dictionary.as_ref().map(|d| d.language().to_owned())
        );
        *self.slot() = dictionary;
    }

    /// Language code of the current dictionary.
    pub fn language(&self) -> Option<String> {
        self.slot().as_ref().map(|d| d.language().to_owned())
    }

    /// Whether `word` should be considered correctly spelled.
    pub fn check_word(&self, word: &str) -> bool {
        if word.is_empty() {
            return true;
        }
        let Some(dictionary) = self.dictionary() else {
            return true;
        };
        if word_is_number(word) {
            return true;
        }
        match dictionary.contains_word(word) {
            Ok(known) => known,
            Err(err) => {
                log::warn!("dictionary query for {word:?} failed, treating as correct: {err}");
                true
            }
        }
    }

    /// Ranked corrections for `word`, when a dictionary is configured.
    pub fn list_corrections(&self, word: &str) -> Option<Vec<String>> {
        self.dictionary()?.list_corrections(word)
    }

    pub fn add_word(&self, word: &str) {
        if let Some(dictionary) = self.dictionary() {
            dictionary.add_word(word);
        }
    }

    pub fn ignore_word(&self, word: &str) {
        if let Some(dictionary) = self.dictionary() {
            dictionary.ignore_word(word);
        }
    }

    /// Joiner set of the current dictionary, empty without one.
    pub fn extra_word_chars(&self) -> ExtraWordChars {
        match self.dictionary() {
            Some(dictionary) => ExtraWordChars::new(dictionary.extra_word_chars()),
            None => ExtraWordChars::default(),
        }
    }
}

/// ASCII decimal digits only; `3.5` and `0x10` are not numbers here.
fn word_is_number(word: &str) -> bool {
    !word.is_empty() && word.bytes().all(|b| b.is_ascii_digit())
}
