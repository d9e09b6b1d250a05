//! In-memory vocabulary with context-occurrence counters
//!
//! Uses FxHashMap for O(1) count lookups, which sit on the hot path of
//! vector construction.

use super::order::OrderVector;
use super::{case_insensitive_cmp, ContextCounts, Vocabulary};
use crate::errors::{Result, SimilarityError};
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

/// Context counts for one word
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DictionaryEntry {
    word: String,
    /// Context word -> occurrence count
    #[serde(default)]
    context_words: FxHashMap<String, u32>,
    /// Context tag -> occurrence count
    #[serde(default)]
    context_tags: FxHashMap<String, u32>,
}

impl DictionaryEntry {
    /// Create an entry with no recorded context
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            context_words: FxHashMap::default(),
            context_tags: FxHashMap::default(),
        }
    }

    /// The word this entry describes
    pub fn word(&self) -> &str {
        &self.word
    }

    /// Builder method: add `count` occurrences of a context word
    pub fn with_context_word(mut self, context_word: &str, count: u32) -> Self {
        self.add_context_word(context_word, count);
        self
    }

    /// Builder method: add `count` occurrences of a context tag
    pub fn with_context_tag(mut self, tag: &str, count: u32) -> Self {
        self.add_context_tag(tag, count);
        self
    }

    /// Record one more occurrence of `context_word`
    pub fn record_context_word(&mut self, context_word: &str) {
        self.add_context_word(context_word, 1);
    }

    /// Record one more occurrence of `tag`
    pub fn record_context_tag(&mut self, tag: &str) {
        self.add_context_tag(tag, 1);
    }

    /// Add `count` occurrences of `context_word`
    pub fn add_context_word(&mut self, context_word: &str, count: u32) {
        if count == 0 {
            return;
        }
        let slot = self
            .context_words
            .entry(context_word.to_string())
            .or_insert(0);
        *slot = slot.saturating_add(count);
    }

    /// Add `count` occurrences of `tag`
    pub fn add_context_tag(&mut self, tag: &str, count: u32) {
        if count == 0 {
            return;
        }
        let slot = self.context_tags.entry(tag.to_string()).or_insert(0);
        *slot = slot.saturating_add(count);
    }

    /// Iterate over recorded context words and their counts
    pub fn context_words(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.context_words.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Iterate over recorded context tags and their counts
    pub fn context_tags(&self) -> impl Iterator<Item = (&str, u32)> + '_ {
        self.context_tags.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Check if no context has been recorded
    pub fn has_no_context(&self) -> bool {
        self.context_words.is_empty() && self.context_tags.is_empty()
    }

    fn merge(&mut self, other: DictionaryEntry) {
        for (k, v) in other.context_words {
            self.add_context_word(&k, v);
        }
        for (k, v) in other.context_tags {
            self.add_context_tag(&k, v);
        }
    }
}

impl ContextCounts for DictionaryEntry {
    fn word(&self) -> &str {
        &self.word
    }

    #[inline]
    fn context_word_count(&self, context_word: &str) -> u32 {
        self.context_words.get(context_word).copied().unwrap_or(0)
    }

    #[inline]
    fn context_tag_count(&self, tag: &str) -> u32 {
        self.context_tags.get(tag).copied().unwrap_or(0)
    }
}

/// Word -> [`DictionaryEntry`] store.
///
/// Serializes as a list of entries in canonical word order; duplicate words
/// in a deserialized list have their counts merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<DictionaryEntry>", into = "Vec<DictionaryEntry>")]
pub struct Dictionary {
    entries: FxHashMap<String, DictionaryEntry>,
}

impl Dictionary {
    /// Create an empty dictionary
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a dictionary with pre-allocated capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Insert an entry, merging counts into an existing entry for the same
    /// word. Zero counts (which deserialized entries may carry) are dropped.
    pub fn insert(&mut self, entry: DictionaryEntry) {
        self.entries
            .entry(entry.word.clone())
            .or_insert_with_key(|word| DictionaryEntry::new(word.as_str()))
            .merge(entry);
    }

    /// Get the entry for `word`, creating an empty one if missing
    pub fn get_or_create(&mut self, word: &str) -> &mut DictionaryEntry {
        self.entries
            .entry(word.to_string())
            .or_insert_with(|| DictionaryEntry::new(word))
    }

    /// Look up `word`, failing with `NotFound` when it is absent
    pub fn get(&self, word: &str) -> Result<&DictionaryEntry> {
        self.entries
            .get(word)
            .ok_or_else(|| SimilarityError::not_found(word))
    }

    /// Check if `word` has an entry
    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    /// Number of distinct words
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the dictionary is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build the dimension ordering covering every context word and tag
    /// recorded in any entry, each group sorted lexicographically.
    pub fn order_vector(&self) -> OrderVector {
        let mut words: FxHashSet<&str> = FxHashSet::default();
        let mut tags: FxHashSet<&str> = FxHashSet::default();
        for entry in self.entries.values() {
            words.extend(entry.context_words.keys().map(String::as_str));
            tags.extend(entry.context_tags.keys().map(String::as_str));
        }

        let mut words: Vec<String> = words.into_iter().map(str::to_string).collect();
        let mut tags: Vec<String> = tags.into_iter().map(str::to_string).collect();
        words.sort_unstable();
        tags.sort_unstable();
        OrderVector::new(words, tags)
    }

    /// Parse a dictionary from its JSON list form
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Render the dictionary as JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

impl Vocabulary for Dictionary {
    type Entry = DictionaryEntry;

    fn words(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }

    fn entry(&self, word: &str) -> Option<&DictionaryEntry> {
        self.entries.get(word)
    }

    fn word_count(&self) -> usize {
        self.entries.len()
    }
}

impl From<Vec<DictionaryEntry>> for Dictionary {
    fn from(entries: Vec<DictionaryEntry>) -> Self {
        let mut dict = Dictionary::with_capacity(entries.len());
        for entry in entries {
            dict.insert(entry);
        }
        dict
    }
}

impl From<Dictionary> for Vec<DictionaryEntry> {
    fn from(dict: Dictionary) -> Self {
        let mut entries: Vec<DictionaryEntry> = dict.entries.into_values().collect();
        entries.sort_by(|a, b| case_insensitive_cmp(&a.word, &b.word));
        entries
    }
}

impl FromIterator<DictionaryEntry> for Dictionary {
    fn from_iter<I: IntoIterator<Item = DictionaryEntry>>(iter: I) -> Self {
        let mut dict = Dictionary::new();
        for entry in iter {
            dict.insert(entry);
        }
        dict
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::DimensionOrdering;

    fn sample() -> Dictionary {
        [
            DictionaryEntry::new("dog")
                .with_context_word("bark", 3)
                .with_context_tag("NN", 2),
            DictionaryEntry::new("cat")
                .with_context_word("meow", 4)
                .with_context_word("bark", 1),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_counts_default_to_zero() {
        let dict = sample();
        let dog = dict.get("dog").unwrap();
        assert_eq!(dog.context_word_count("bark"), 3);
        assert_eq!(dog.context_word_count("meow"), 0);
        assert_eq!(dog.context_tag_count("NN"), 2);
        assert_eq!(dog.context_tag_count("VB"), 0);
    }

    #[test]
    fn test_missing_word_is_not_found() {
        let dict = sample();
        let err = dict.get("fish").unwrap_err();
        assert!(err.is_not_found());
        assert!(!dict.contains("fish"));
    }

    #[test]
    fn test_record_and_merge() {
        let mut dict = Dictionary::new();
        dict.get_or_create("dog").record_context_word("bark");
        dict.get_or_create("dog").record_context_word("bark");
        dict.get_or_create("dog").record_context_tag("NN");
        dict.insert(DictionaryEntry::new("dog").with_context_word("bark", 5));

        let dog = dict.get("dog").unwrap();
        assert_eq!(dog.context_word_count("bark"), 7);
        assert_eq!(dog.context_tag_count("NN"), 1);
        assert_eq!(dict.len(), 1);
    }

    #[test]
    fn test_zero_count_is_not_recorded() {
        let entry = DictionaryEntry::new("x").with_context_word("y", 0);
        assert!(entry.has_no_context());
    }

    #[test]
    fn test_entry_word_matches_key() {
        let mut dict = Dictionary::new();
        assert_eq!(dict.get_or_create("dog").word(), "dog");
        dict.insert(DictionaryEntry::new("cat").with_context_word("meow", 1));
        for word in dict.words() {
            assert_eq!(dict.get(word).unwrap().word(), word);
        }
    }

    #[test]
    fn test_json_zero_counts_are_dropped() {
        let json = r#"[{"word": "x", "context_words": {"y": 0}, "context_tags": {"NN": 0}}]"#;
        let dict = Dictionary::from_json(json).unwrap();
        let x = dict.get("x").unwrap();
        assert!(x.has_no_context());
        assert_eq!(x.context_words().count(), 0);

        let order = dict.order_vector();
        assert_eq!(order.words_size(), 0);
        assert_eq!(order.tags_size(), 0);
    }

    #[test]
    fn test_order_vector_covers_all_dimensions() {
        let order = sample().order_vector();
        assert_eq!(order.words_size(), 2);
        assert_eq!(order.tags_size(), 1);
        assert_eq!(order.word_at(0), "bark");
        assert_eq!(order.word_at(1), "meow");
        assert_eq!(order.tag_at(0), "NN");
    }

    #[test]
    fn test_json_roundtrip() {
        let dict = sample();
        let json = dict.to_json().unwrap();
        // Canonical order: "cat" before "dog".
        assert!(json.find("\"cat\"").unwrap() < json.find("\"dog\"").unwrap());
        let back = Dictionary::from_json(&json).unwrap();
        assert_eq!(back, dict);
    }

    #[test]
    fn test_json_duplicates_merge() {
        let json = r#"[
            {"word": "dog", "context_words": {"bark": 1}},
            {"word": "dog", "context_words": {"bark": 2}, "context_tags": {"NN": 1}}
        ]"#;
        let dict = Dictionary::from_json(json).unwrap();
        assert_eq!(dict.len(), 1);
        let dog = dict.get("dog").unwrap();
        assert_eq!(dog.context_word_count("bark"), 3);
        assert_eq!(dog.context_tag_count("NN"), 1);
    }

    #[test]
    fn test_bad_json_is_serialization_error() {
        let err = Dictionary::from_json("not json").unwrap_err();
        assert!(matches!(err, SimilarityError::Serialization { .. }));
    }
}
