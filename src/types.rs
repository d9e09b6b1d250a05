//! Core types for rapid_wordsim
//!
//! Scored word pairs, the batch configuration, and the score order shared by
//! the bounded set and the final ranking.

use crate::errors::{Result, SimilarityError};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

// ============================================================================
// Score ordering
// ============================================================================

/// Total order over similarity scores.
///
/// NaN ranks below every real score and equal to other NaNs, so undefined
/// similarities are the first to be evicted from a top-K set. `-0.0` and
/// `0.0` compare equal.
pub fn score_cmp(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => a.partial_cmp(&b).unwrap_or(Ordering::Equal),
    }
}

// ============================================================================
// SimilarityResult
// ============================================================================

/// A scored unordered word pair.
///
/// Ordering and equality look at `score` only. Two results with the same
/// score are *equal*, which is what makes a [`BoundedTopKSet`] collapse
/// equal-scoring pairs.
///
/// [`BoundedTopKSet`]: crate::topk::bounded::BoundedTopKSet
#[derive(Debug, Clone, Copy, Serialize)]
pub struct SimilarityResult<'a> {
    /// The word first in canonical order
    pub word_a: &'a str,
    /// The word second in canonical order
    pub word_b: &'a str,
    /// Cosine similarity of the two context vectors
    pub score: f64,
}

impl<'a> SimilarityResult<'a> {
    /// Create a new result
    pub fn new(word_a: &'a str, word_b: &'a str, score: f64) -> Self {
        Self {
            word_a,
            word_b,
            score,
        }
    }

    /// Check if this result pairs the two given words, in either order
    pub fn involves(&self, w1: &str, w2: &str) -> bool {
        (self.word_a == w1 && self.word_b == w2) || (self.word_a == w2 && self.word_b == w1)
    }

    /// Check if the score is a real number
    pub fn is_defined(&self) -> bool {
        !self.score.is_nan()
    }
}

impl PartialEq for SimilarityResult<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SimilarityResult<'_> {}

impl PartialOrd for SimilarityResult<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for SimilarityResult<'_> {
    fn cmp(&self, other: &Self) -> Ordering {
        score_cmp(self.score, other.score)
    }
}

// ============================================================================
// Undefined scores
// ============================================================================

/// What the all-pairs scan does with a pair whose similarity is undefined
/// (one or both context vectors have zero magnitude).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UndefinedScorePolicy {
    /// Abort the scan with `UndefinedSimilarity`
    #[default]
    Fail,
    /// Leave the pair out of the ranking
    Skip,
    /// Rank the pair with a NaN score, below every real score
    Propagate,
}

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for the all-pairs top-K scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityConfig {
    /// Number of most similar pairs to keep
    pub top_k: usize,
    /// Handling of zero-magnitude operands
    #[serde(default)]
    pub undefined_scores: UndefinedScorePolicy,
    /// Free each word's vector once every pair it leads has been scored
    #[serde(default = "default_release")]
    pub release_consumed_vectors: bool,
    /// Granularity of progress notifications, in percent of comparisons
    #[serde(default = "default_progress_step")]
    pub progress_step_percent: u8,
    /// Maximum vocabulary size before rejecting (runtime limit)
    #[serde(default)]
    pub max_words: Option<usize>,
}

fn default_release() -> bool {
    true
}

fn default_progress_step() -> u8 {
    1
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            top_k: 10,
            undefined_scores: UndefinedScorePolicy::Fail,
            release_consumed_vectors: default_release(),
            progress_step_percent: default_progress_step(),
            max_words: None,
        }
    }
}

impl SimilarityConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !(1..=100).contains(&self.progress_step_percent) {
            return Err(SimilarityError::invalid_config(format!(
                "progress_step_percent must be between 1 and 100, got {}",
                self.progress_step_percent
            )));
        }

        if self.max_words == Some(0) {
            return Err(SimilarityError::invalid_config("max_words must be > 0"));
        }

        Ok(())
    }

    /// Check a vocabulary size against `max_words`
    pub fn check_vocabulary_size(&self, words: usize) -> Result<()> {
        match self.max_words {
            Some(limit) if words > limit => Err(SimilarityError::limit_exceeded(limit, words)),
            _ => Ok(()),
        }
    }

    /// Builder method: set the number of pairs to keep
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Builder method: set the undefined-score policy
    pub fn with_undefined_scores(mut self, policy: UndefinedScorePolicy) -> Self {
        self.undefined_scores = policy;
        self
    }

    /// Builder method: enable or disable row-wise vector release
    pub fn with_release_consumed_vectors(mut self, release: bool) -> Self {
        self.release_consumed_vectors = release;
        self
    }

    /// Builder method: set progress granularity
    pub fn with_progress_step_percent(mut self, step: u8) -> Self {
        self.progress_step_percent = step;
        self
    }

    /// Builder method: set maximum vocabulary size
    pub fn with_max_words(mut self, max: usize) -> Self {
        self.max_words = Some(max);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_cmp_nan_lowest() {
        assert_eq!(score_cmp(f64::NAN, -1.0), Ordering::Less);
        assert_eq!(score_cmp(0.0, f64::NAN), Ordering::Greater);
        assert_eq!(score_cmp(f64::NAN, f64::NAN), Ordering::Equal);
        assert_eq!(score_cmp(f64::NAN, f64::NEG_INFINITY), Ordering::Less);
    }

    #[test]
    fn test_score_cmp_signed_zero() {
        assert_eq!(score_cmp(-0.0, 0.0), Ordering::Equal);
        assert_eq!(score_cmp(0.25, 0.5), Ordering::Less);
    }

    #[test]
    fn test_results_equal_by_score_only() {
        let a = SimilarityResult::new("a", "c", 0.5);
        let b = SimilarityResult::new("b", "c", 0.5);
        let c = SimilarityResult::new("a", "b", 0.0);
        assert_eq!(a, b);
        assert!(c < a);
        assert!(a.involves("c", "a"));
        assert!(!a.involves("b", "c"));
    }

    #[test]
    fn test_result_serializes() {
        let r = SimilarityResult::new("dog", "cat", 0.75);
        let json = serde_json::to_string(&r).unwrap();
        assert_eq!(json, r#"{"word_a":"dog","word_b":"cat","score":0.75}"#);
    }

    #[test]
    fn test_config_validation() {
        assert!(SimilarityConfig::default().validate().is_ok());

        let bad = SimilarityConfig::default().with_progress_step_percent(0);
        assert!(bad.validate().is_err());

        let bad = SimilarityConfig::default().with_progress_step_percent(101);
        assert!(bad.validate().is_err());

        let bad = SimilarityConfig::default().with_max_words(0);
        assert!(bad.validate().is_err());
    }

    #[test]
    fn test_vocabulary_limit() {
        let cfg = SimilarityConfig::default().with_max_words(3);
        assert!(cfg.check_vocabulary_size(3).is_ok());
        let err = cfg.check_vocabulary_size(4).unwrap_err();
        assert_eq!(err, SimilarityError::limit_exceeded(3, 4));
    }

    #[test]
    fn test_config_serde_defaults() {
        let cfg: SimilarityConfig = serde_json::from_str(r#"{"top_k": 5}"#).unwrap();
        assert_eq!(cfg.top_k, 5);
        assert_eq!(cfg.undefined_scores, UndefinedScorePolicy::Fail);
        assert!(cfg.release_consumed_vectors);
        assert_eq!(cfg.progress_step_percent, 1);
        assert_eq!(cfg.max_words, None);
    }

    #[test]
    fn test_policy_serde_names() {
        let json = serde_json::to_string(&UndefinedScorePolicy::Propagate).unwrap();
        assert_eq!(json, r#""propagate""#);
        let back: UndefinedScorePolicy = serde_json::from_str(r#""skip""#).unwrap();
        assert_eq!(back, UndefinedScorePolicy::Skip);
    }
}
