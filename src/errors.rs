//! Error types for rapid_wordsim
//!
//! This module defines the error types used throughout the library.
//! Every failure is terminal for the call that produced it; none of them
//! leave a partially updated run behind.

use thiserror::Error;

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, SimilarityError>;

/// Main error type for rapid_wordsim
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimilarityError {
    /// A requested word has no entry in the vocabulary
    #[error("Word not found in vocabulary: {word:?}")]
    NotFound { word: String },

    /// Cosine similarity is undefined because at least one operand has
    /// a zero-magnitude context vector
    #[error("Similarity undefined for ({word_a:?}, {word_b:?}): zero-magnitude context vector")]
    UndefinedSimilarity { word_a: String, word_b: String },

    /// Configuration validation failed
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// The vocabulary is larger than the configured limit
    #[error("Vocabulary limit exceeded: {actual} words (limit {limit})")]
    LimitExceeded { limit: usize, actual: usize },

    /// An observer stopped the all-pairs scan between rows
    #[error("Scan cancelled after {completed_rows} of {total_rows} rows")]
    Cancelled {
        completed_rows: usize,
        total_rows: usize,
    },

    /// JSON serialization/deserialization error
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl SimilarityError {
    /// Create a not-found error
    pub fn not_found(word: impl Into<String>) -> Self {
        Self::NotFound { word: word.into() }
    }

    /// Create an undefined-similarity error
    pub fn undefined_similarity(word_a: impl Into<String>, word_b: impl Into<String>) -> Self {
        Self::UndefinedSimilarity {
            word_a: word_a.into(),
            word_b: word_b.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            message: message.into(),
        }
    }

    /// Create a limit-exceeded error
    pub fn limit_exceeded(limit: usize, actual: usize) -> Self {
        Self::LimitExceeded { limit, actual }
    }

    /// Create a cancellation error
    pub fn cancelled(completed_rows: usize, total_rows: usize) -> Self {
        Self::Cancelled {
            completed_rows,
            total_rows,
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Check if this error came from a missing vocabulary word
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this error indicates a zero-magnitude operand
    pub fn is_undefined_similarity(&self) -> bool {
        matches!(self, Self::UndefinedSimilarity { .. })
    }

    /// Check if this error indicates an observer-requested stop
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

impl From<serde_json::Error> for SimilarityError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SimilarityError::not_found("zebra");
        assert!(err.to_string().contains("not found"));
        assert!(err.to_string().contains("zebra"));

        let err = SimilarityError::limit_exceeded(10, 25);
        assert!(err.to_string().contains("25 words"));
        assert!(err.to_string().contains("limit 10"));

        let err = SimilarityError::cancelled(3, 7);
        assert!(err.to_string().contains("3 of 7"));
    }

    #[test]
    fn test_predicates() {
        assert!(SimilarityError::not_found("x").is_not_found());
        assert!(!SimilarityError::not_found("x").is_cancelled());
        assert!(SimilarityError::undefined_similarity("a", "b").is_undefined_similarity());
        assert!(SimilarityError::cancelled(0, 1).is_cancelled());
    }

    #[test]
    fn test_from_serde_json() {
        let err: SimilarityError = serde_json::from_str::<Vec<u32>>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, SimilarityError::Serialization { .. }));
    }
}
