//! Fixed dimension ordering backed by two string lists

use super::DimensionOrdering;
use serde::{Deserialize, Serialize};

/// The `[context words..., context tags...]` layout of a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderVector {
    words: Vec<String>,
    tags: Vec<String>,
}

impl OrderVector {
    /// Create an ordering from explicit word and tag sequences
    pub fn new(words: Vec<String>, tags: Vec<String>) -> Self {
        Self { words, tags }
    }

    /// Create an ordering from string slices
    pub fn from_slices(words: &[&str], tags: &[&str]) -> Self {
        Self::new(
            words.iter().map(|s| s.to_string()).collect(),
            tags.iter().map(|s| s.to_string()).collect(),
        )
    }

    /// Context words in dimension order
    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// Context tags in dimension order
    pub fn tags(&self) -> &[String] {
        &self.tags
    }
}

impl DimensionOrdering for OrderVector {
    fn words_size(&self) -> usize {
        self.words.len()
    }

    fn tags_size(&self) -> usize {
        self.tags.len()
    }

    fn word_at(&self, index: usize) -> &str {
        &self.words[index]
    }

    fn tag_at(&self, index: usize) -> &str {
        &self.tags[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let order = OrderVector::from_slices(&["the", "of"], &["DT"]);
        assert_eq!(order.words_size(), 2);
        assert_eq!(order.tags_size(), 1);
        assert_eq!(order.dimensions(), 3);
        assert_eq!(order.word_at(1), "of");
        assert_eq!(order.tag_at(0), "DT");
    }

    #[test]
    fn test_empty() {
        let order = OrderVector::default();
        assert_eq!(order.dimensions(), 0);
        assert!(order.words().is_empty());
        assert!(order.tags().is_empty());
    }
}
