//! # rapid_wordsim
//!
//! Exhaustive top-K word similarity for distributional vector-space models.
//!
//! Every word of a vocabulary is described by how often each context word
//! and context tag occurred around it. This crate linearizes those counts
//! into vectors under a fixed dimension ordering, scores every unordered
//! word pair by cosine similarity, and keeps only the K best pairs without
//! ever materializing the full score matrix.
//!
//! ## Features
//!
//! - **Sparse-aware**: the outer operand of each dot product caches its
//!   nonzero positions, so inner-loop comparisons cost O(nonzero)
//! - **Bounded memory**: results go through a fixed-capacity top-K set and
//!   consumed vectors are released row by row
//! - **Deterministic**: words are scanned in case-insensitive order
//! - **Observable**: optional `tracing` spans plus progress and cancellation
//!   hooks

#[macro_use]
mod macros;

pub mod errors;
pub mod similarity;
pub mod topk;
pub mod types;
pub mod vocab;

// Re-export commonly used types
pub use errors::{Result, SimilarityError};
pub use types::{score_cmp, SimilarityConfig, SimilarityResult, UndefinedScorePolicy};

// Re-export main functionality
pub use similarity::{
    CancelOnFlag, ContextVector, NoopObserver, ProgressObserver, RunObserver, RunStats,
    SimilarityEngine, StageReport, TopKOutcome,
};
pub use topk::{bounded::BoundedTopKSet, Comparator, FnComparator, NaturalOrder};
pub use vocab::{
    case_insensitive_cmp, dictionary::Dictionary, dictionary::DictionaryEntry,
    order::OrderVector, ContextCounts, DimensionOrdering, Vocabulary,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
