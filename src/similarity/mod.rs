//! Cosine similarity over context-occurrence vectors
//!
//! - [`vector`]: vector construction, magnitude, and the cached sparse dot product
//! - [`engine`]: single-pair queries and the exhaustive top-K pair scan
//! - [`observer`]: stage timing, progress and cancellation hooks

pub mod engine;
pub mod observer;
pub mod vector;

pub use engine::{pair_count, RunStats, SimilarityEngine, TopKOutcome};
pub use observer::{CancelOnFlag, NoopObserver, ProgressObserver, RunObserver, StageReport};
pub use vector::ContextVector;
