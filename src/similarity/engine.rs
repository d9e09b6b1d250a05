//! Cosine similarity engine and the exhaustive top-K pair scan.
//!
//! The engine never writes to vocabulary entries. Everything derived during
//! a run (vectors, nonzero indices, magnitudes) lives in a run-local cache
//! indexed by each word's canonical position and is dropped when the run
//! ends.

use super::observer::{
    NoopObserver, ProgressTracker, RunObserver, StageClock, StageReport, STAGE_SCAN,
    STAGE_VECTORS,
};
use super::vector::{self, ContextVector};
use crate::errors::{Result, SimilarityError};
use crate::topk::bounded::BoundedTopKSet;
use crate::types::{SimilarityConfig, SimilarityResult, UndefinedScorePolicy};
use crate::vocab::{canonical_words, ContextCounts, DimensionOrdering, Vocabulary};
use serde::Serialize;
use std::cell::OnceCell;
use std::time::Duration;

/// Number of unordered pairs among `n` words
pub fn pair_count(n: usize) -> u64 {
    let n = n as u64;
    n * n.saturating_sub(1) / 2
}

// ============================================================================
// Run cache
// ============================================================================

/// Derived data for one word, owned by a single run
struct RunEntry<'v, E> {
    word: &'v str,
    entry: &'v E,
    vector: ContextVector,
    magnitude: OnceCell<f64>,
}

impl<'v, E: ContextCounts> RunEntry<'v, E> {
    fn new<D: DimensionOrdering>(word: &'v str, entry: &'v E, ordering: &D) -> Self {
        Self {
            word,
            entry,
            vector: ContextVector::build(entry, ordering),
            magnitude: OnceCell::new(),
        }
    }

    #[inline]
    fn magnitude<D: DimensionOrdering>(&self, ordering: &D) -> f64 {
        *self
            .magnitude
            .get_or_init(|| vector::magnitude(self.entry, ordering))
    }

    /// Cosine similarity with `self` as the cache-owning operand, or `None`
    /// when either magnitude is zero.
    #[inline]
    fn cosine<D: DimensionOrdering>(&mut self, other: &Self, ordering: &D) -> Option<f64> {
        let denom = self.magnitude(ordering) * other.magnitude(ordering);
        if denom == 0.0 {
            return None;
        }
        Some(self.vector.dot(&other.vector) / denom)
    }
}

// ============================================================================
// Run outcome
// ============================================================================

/// Counters and timings of one top-K run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunStats {
    /// Distinct words scanned
    pub words: usize,
    /// Vector length (`words_size + tags_size`)
    pub dimensions: usize,
    /// Pairs scored
    pub comparisons: u64,
    /// Pairs whose similarity was undefined (skipped or propagated)
    pub undefined: u64,
    /// Pairs in the final ranking
    pub retained: usize,
    /// Time spent building vectors
    pub vectors_elapsed: Duration,
    /// Time spent scanning pairs
    pub scan_elapsed: Duration,
}

/// Ranked pairs plus run statistics
#[derive(Debug, Clone)]
pub struct TopKOutcome<'v> {
    /// Retained pairs, ascending by score
    pub results: Vec<SimilarityResult<'v>>,
    /// What the run did
    pub stats: RunStats,
}

impl<'v> TopKOutcome<'v> {
    /// Retained pairs, most similar first
    pub fn most_similar_first(&self) -> Vec<SimilarityResult<'v>> {
        self.results.iter().rev().copied().collect()
    }
}

// ============================================================================
// Engine
// ============================================================================

/// Cosine similarity over context vectors of a vocabulary.
///
/// # Example
///
/// ```
/// use rapid_wordsim::{Dictionary, DictionaryEntry, SimilarityEngine};
///
/// let dict: Dictionary = [
///     DictionaryEntry::new("a").with_context_word("x", 1),
///     DictionaryEntry::new("b").with_context_word("y", 1),
///     DictionaryEntry::new("c").with_context_word("x", 1).with_context_word("y", 1),
/// ]
/// .into_iter()
/// .collect();
/// let order = dict.order_vector();
///
/// let engine = SimilarityEngine::new(&dict, &order);
/// let top = engine.top_k_most_similar_pairs(1).unwrap();
/// assert_eq!(top.len(), 1);
/// assert!((top[0].score - std::f64::consts::FRAC_1_SQRT_2).abs() < 1e-12);
/// ```
#[derive(Debug)]
pub struct SimilarityEngine<'v, V, D> {
    vocab: &'v V,
    ordering: &'v D,
    config: SimilarityConfig,
}

impl<'v, V, D> SimilarityEngine<'v, V, D>
where
    V: Vocabulary,
    D: DimensionOrdering,
{
    /// Create an engine with the default configuration
    pub fn new(vocab: &'v V, ordering: &'v D) -> Self {
        Self {
            vocab,
            ordering,
            config: SimilarityConfig::default(),
        }
    }

    /// Create an engine with a validated configuration
    pub fn with_config(vocab: &'v V, ordering: &'v D, config: SimilarityConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            vocab,
            ordering,
            config,
        })
    }

    /// The active configuration
    pub fn config(&self) -> &SimilarityConfig {
        &self.config
    }

    /// Look up `word`, failing with `NotFound` when it is absent
    pub fn entry(&self, word: &str) -> Result<&'v V::Entry> {
        self.vocab
            .entry(word)
            .ok_or_else(|| SimilarityError::not_found(word))
    }

    /// Linearize `entry` against this engine's dimension ordering
    pub fn build_vector(&self, entry: &V::Entry) -> Vec<u32> {
        vector::build_vector(entry, self.ordering)
    }

    /// Euclidean norm of `entry`'s context vector
    pub fn magnitude(&self, entry: &V::Entry) -> f64 {
        vector::magnitude(entry, self.ordering)
    }

    /// Dot product of two entries' context vectors
    pub fn dot_product(&self, a: &V::Entry, b: &V::Entry) -> f64 {
        let mut va = ContextVector::build(a, self.ordering);
        let vb = ContextVector::build(b, self.ordering);
        va.dot(&vb)
    }

    /// Cosine similarity of two entries, independent of any run.
    ///
    /// Fails with `UndefinedSimilarity` when either entry has no context
    /// inside the ordering.
    pub fn cosine_similarity(&self, a: &V::Entry, b: &V::Entry) -> Result<f64> {
        let denom = self.magnitude(a) * self.magnitude(b);
        if denom == 0.0 {
            return Err(SimilarityError::undefined_similarity(a.word(), b.word()));
        }
        Ok(self.dot_product(a, b) / denom)
    }

    /// Score two words by name
    pub fn compare_words(&self, w1: &str, w2: &str) -> Result<SimilarityResult<'v>> {
        let e1 = self.entry(w1)?;
        let e2 = self.entry(w2)?;
        let score = self.cosine_similarity(e1, e2)?;
        Ok(SimilarityResult::new(e1.word(), e2.word(), score))
    }

    /// The `k` most similar unordered word pairs, ascending by score
    pub fn top_k_most_similar_pairs(&self, k: usize) -> Result<Vec<SimilarityResult<'v>>> {
        Ok(self.top_k_with_observer(k, &mut NoopObserver)?.results)
    }

    /// Run with `config.top_k`, reporting to `observer`
    pub fn run(&self, observer: &mut impl RunObserver) -> Result<TopKOutcome<'v>> {
        self.top_k_with_observer(self.config.top_k, observer)
    }

    /// Score every unordered pair once and keep the `k` best.
    ///
    /// Words are visited in case-insensitive order; all vectors are built
    /// before scanning. After row `i` has been scored against every later
    /// word, its nonzero index cache is dropped (and, with
    /// `release_consumed_vectors`, its vector too) since no later row reads
    /// it again.
    pub fn top_k_with_observer(
        &self,
        k: usize,
        observer: &mut impl RunObserver,
    ) -> Result<TopKOutcome<'v>> {
        let words = canonical_words(self.vocab);
        self.config.check_vocabulary_size(words.len())?;

        let n = words.len();
        let dimensions = self.ordering.dimensions();
        let mut stats = RunStats {
            words: n,
            dimensions,
            ..RunStats::default()
        };

        // Stage 1: build every vector up front
        let mut cache = {
            trace_stage!(STAGE_VECTORS);
            observer.on_stage_start(STAGE_VECTORS);
            let clock = StageClock::start();
            let cache = words
                .iter()
                .map(|&word| Ok(RunEntry::new(word, self.entry(word)?, self.ordering)))
                .collect::<Result<Vec<_>>>()?;
            stats.vectors_elapsed = clock.elapsed();
            observer.on_stage_end(
                STAGE_VECTORS,
                &StageReport::new(stats.vectors_elapsed, n as u64),
            );
            observer.on_vectors_built(n, dimensions);
            trace_event!(debug, words = n, dimensions, "context vectors resident");
            cache
        };

        // Stage 2: all pairs
        let top = {
            trace_stage!(STAGE_SCAN);
            observer.on_stage_start(STAGE_SCAN);
            let clock = StageClock::start();
            let mut top = BoundedTopKSet::new(k);
            let mut progress = ProgressTracker::new(pair_count(n), self.config.progress_step_percent);

            for i in 0..n {
                let (head, tail) = cache.split_at_mut(i + 1);
                let outer = &mut head[i];

                for inner in tail.iter() {
                    match outer.cosine(inner, self.ordering) {
                        Some(score) => {
                            top.add(SimilarityResult::new(outer.word, inner.word, score));
                        }
                        None => {
                            stats.undefined += 1;
                            match self.config.undefined_scores {
                                UndefinedScorePolicy::Fail => {
                                    return Err(SimilarityError::undefined_similarity(
                                        outer.word, inner.word,
                                    ));
                                }
                                UndefinedScorePolicy::Skip => {}
                                UndefinedScorePolicy::Propagate => {
                                    top.add(SimilarityResult::new(
                                        outer.word,
                                        inner.word,
                                        f64::NAN,
                                    ));
                                }
                            }
                        }
                    }
                    if let Some(percent) = progress.tick() {
                        observer.on_progress(percent, progress.done(), pair_count(n));
                    }
                }

                outer.vector.clear_index();
                if self.config.release_consumed_vectors {
                    outer.vector.release();
                }

                if observer.on_row_complete(i, n).is_break() {
                    trace_event!(info, completed_rows = i + 1, total_rows = n, "scan cancelled");
                    return Err(SimilarityError::cancelled(i + 1, n));
                }
            }

            stats.comparisons = progress.done();
            stats.scan_elapsed = clock.elapsed();
            observer.on_stage_end(STAGE_SCAN, &StageReport::new(stats.scan_elapsed, stats.comparisons));
            top
        };

        let results = top.into_sorted_vec();
        stats.retained = results.len();
        trace_event!(
            debug,
            comparisons = stats.comparisons,
            retained = stats.retained,
            undefined = stats.undefined,
            "top-k scan finished"
        );

        Ok(TopKOutcome { results, stats })
    }
}
