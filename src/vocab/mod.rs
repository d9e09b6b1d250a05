//! Vocabulary and dimension-ordering interfaces
//!
//! The similarity engine never builds vocabularies itself. It reads words,
//! their context counts and a canonical dimension layout through the traits
//! below. [`dictionary::Dictionary`] and [`order::OrderVector`] are in-memory
//! implementations for callers that have counts at hand.

pub mod dictionary;
pub mod order;

use std::cmp::Ordering;

/// Context-occurrence counts of a single word.
///
/// Both lookups are total: unseen context words or tags count as zero.
pub trait ContextCounts {
    /// The word this entry describes
    fn word(&self) -> &str;

    /// How often `context_word` occurred in this word's context
    fn context_word_count(&self, context_word: &str) -> u32;

    /// How often `tag` occurred in this word's context
    fn context_tag_count(&self, tag: &str) -> u32;
}

/// An enumerable set of words, each resolvable to its entry.
pub trait Vocabulary {
    /// Entry type exposing the counts for one word
    type Entry: ContextCounts;

    /// All distinct words, in no particular order
    fn words(&self) -> impl Iterator<Item = &str> + '_;

    /// Look up the entry for `word`
    fn entry(&self, word: &str) -> Option<&Self::Entry>;

    /// Number of distinct words
    fn word_count(&self) -> usize {
        self.words().count()
    }
}

/// The run-global layout `[context words..., context tags...]` that makes
/// two entries' vectors comparable index by index.
pub trait DimensionOrdering {
    /// Number of context-word dimensions
    fn words_size(&self) -> usize;

    /// Number of context-tag dimensions
    fn tags_size(&self) -> usize;

    /// Context word at position `index` (`index < words_size()`)
    fn word_at(&self, index: usize) -> &str;

    /// Context tag at position `index` (`index < tags_size()`)
    fn tag_at(&self, index: usize) -> &str;

    /// Total vector length
    fn dimensions(&self) -> usize {
        self.words_size() + self.tags_size()
    }
}

/// Case-insensitive lexicographic order with a case-sensitive tie-break.
///
/// Words differing only in case still get a fixed relative order, so sorting
/// a vocabulary is deterministic regardless of how it was enumerated.
pub fn case_insensitive_cmp(a: &str, b: &str) -> Ordering {
    a.chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase))
        .then_with(|| a.cmp(b))
}

/// Distinct words of `vocab` in canonical (case-insensitive) order
pub fn canonical_words<V: Vocabulary>(vocab: &V) -> Vec<&str> {
    let mut words: Vec<&str> = vocab.words().collect();
    words.sort_unstable_by(|a, b| case_insensitive_cmp(a, b));
    words.dedup();
    words
}
