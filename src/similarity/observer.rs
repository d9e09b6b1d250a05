//! Run observation: stage timing, progress and cancellation hooks.
//!
//! The all-pairs scan notifies a [`RunObserver`] at each stage boundary,
//! whenever progress crosses a configured percentage step, and after every
//! outer-loop row. The row boundary is the only point where a run can be
//! stopped safely, so [`RunObserver::on_row_complete`] is also the
//! cancellation hook.

use serde::Serialize;
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Stage name: building every word's context vector
pub const STAGE_VECTORS: &str = "build_vectors";
/// Stage name: scoring every unordered pair
pub const STAGE_SCAN: &str = "scan_pairs";

/// Wall-clock timer for one stage
#[derive(Debug, Clone, Copy)]
pub struct StageClock(Instant);

impl StageClock {
    /// Start timing
    pub fn start() -> Self {
        Self(Instant::now())
    }

    /// Time since `start`
    pub fn elapsed(&self) -> Duration {
        self.0.elapsed()
    }
}

/// What an observer learns when a stage ends
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StageReport {
    /// Time spent in the stage
    pub elapsed: Duration,
    /// Number of items the stage produced (vectors built, pairs scored)
    pub items: u64,
}

impl StageReport {
    /// Create a report
    pub fn new(elapsed: Duration, items: u64) -> Self {
        Self { elapsed, items }
    }
}

/// Callbacks fired during a top-K run. Every method defaults to a no-op.
pub trait RunObserver {
    /// A stage is about to start
    fn on_stage_start(&mut self, _stage: &'static str) {}

    /// A stage finished
    fn on_stage_end(&mut self, _stage: &'static str, _report: &StageReport) {}

    /// All context vectors are resident
    fn on_vectors_built(&mut self, _words: usize, _dimensions: usize) {}

    /// Comparisons crossed another progress step
    fn on_progress(&mut self, _percent: u8, _comparisons: u64, _total: u64) {}

    /// Every pair led by `row` has been scored. Return `Break` to stop the
    /// run here.
    fn on_row_complete(&mut self, _row: usize, _total_rows: usize) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }
}

impl<O: RunObserver + ?Sized> RunObserver for &mut O {
    fn on_stage_start(&mut self, stage: &'static str) {
        (**self).on_stage_start(stage)
    }

    fn on_stage_end(&mut self, stage: &'static str, report: &StageReport) {
        (**self).on_stage_end(stage, report)
    }

    fn on_vectors_built(&mut self, words: usize, dimensions: usize) {
        (**self).on_vectors_built(words, dimensions)
    }

    fn on_progress(&mut self, percent: u8, comparisons: u64, total: u64) {
        (**self).on_progress(percent, comparisons, total)
    }

    fn on_row_complete(&mut self, row: usize, total_rows: usize) -> ControlFlow<()> {
        (**self).on_row_complete(row, total_rows)
    }
}

/// Observer that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl RunObserver for NoopObserver {}

/// Observer reporting whole-percent progress through `tracing`.
///
/// Also remembers what it saw, so callers without a subscriber can still
/// inspect how far a run got.
#[derive(Debug, Clone, Default)]
pub struct ProgressObserver {
    last_percent: Option<u8>,
    reports: usize,
    rows_completed: usize,
}

impl ProgressObserver {
    /// Create a fresh observer
    pub fn new() -> Self {
        Self::default()
    }

    /// The last percentage reported, if any
    pub fn last_percent(&self) -> Option<u8> {
        self.last_percent
    }

    /// Number of progress notifications received
    pub fn reports(&self) -> usize {
        self.reports
    }

    /// Number of outer-loop rows finished
    pub fn rows_completed(&self) -> usize {
        self.rows_completed
    }
}

impl RunObserver for ProgressObserver {
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    fn on_vectors_built(&mut self, words: usize, dimensions: usize) {
        trace_event!(info, words, dimensions, "context vectors built");
    }

    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    fn on_progress(&mut self, percent: u8, comparisons: u64, total: u64) {
        trace_event!(info, comparisons, total, "{}% ...", percent);
        self.last_percent = Some(percent);
        self.reports += 1;
    }

    fn on_row_complete(&mut self, _row: usize, _total_rows: usize) -> ControlFlow<()> {
        self.rows_completed += 1;
        ControlFlow::Continue(())
    }
}

/// Wraps another observer and stops the run once `flag` is raised.
///
/// The flag is checked after each outer-loop row, so it may be set from
/// another thread while the run is in progress.
#[derive(Debug)]
pub struct CancelOnFlag<'a, O> {
    flag: &'a AtomicBool,
    inner: O,
}

impl<'a, O: RunObserver> CancelOnFlag<'a, O> {
    /// Wrap `inner`, cancelling when `flag` becomes true
    pub fn new(flag: &'a AtomicBool, inner: O) -> Self {
        Self { flag, inner }
    }

    /// Unwrap the inner observer
    pub fn into_inner(self) -> O {
        self.inner
    }
}

impl<O: RunObserver> RunObserver for CancelOnFlag<'_, O> {
    fn on_stage_start(&mut self, stage: &'static str) {
        self.inner.on_stage_start(stage)
    }

    fn on_stage_end(&mut self, stage: &'static str, report: &StageReport) {
        self.inner.on_stage_end(stage, report)
    }

    fn on_vectors_built(&mut self, words: usize, dimensions: usize) {
        self.inner.on_vectors_built(words, dimensions)
    }

    fn on_progress(&mut self, percent: u8, comparisons: u64, total: u64) {
        self.inner.on_progress(percent, comparisons, total)
    }

    fn on_row_complete(&mut self, row: usize, total_rows: usize) -> ControlFlow<()> {
        self.inner.on_row_complete(row, total_rows)?;
        if self.flag.load(Ordering::Relaxed) {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    }
}

/// Turns a stream of comparisons into progress steps.
#[derive(Debug, Clone)]
pub(crate) struct ProgressTracker {
    total: u64,
    done: u64,
    step: u64,
    next: u64,
}

impl ProgressTracker {
    pub(crate) fn new(total: u64, step_percent: u8) -> Self {
        let step = u64::from(step_percent.max(1));
        Self {
            total,
            done: 0,
            step,
            next: step,
        }
    }

    pub(crate) fn done(&self) -> u64 {
        self.done
    }

    /// Count one comparison; returns the percentage reached when it crosses
    /// the next step.
    #[inline]
    pub(crate) fn tick(&mut self) -> Option<u8> {
        self.done += 1;
        if self.next > 100 || self.done * 100 < self.next * self.total {
            return None;
        }
        let percent = self.done * 100 / self.total;
        self.next = (percent / self.step + 1) * self.step;
        Some(percent as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_every_percent() {
        let mut tracker = ProgressTracker::new(200, 1);
        let reported: Vec<u8> = (0..200).filter_map(|_| tracker.tick()).collect();
        assert_eq!(reported.len(), 100);
        assert_eq!(reported.first(), Some(&1));
        assert_eq!(reported.last(), Some(&100));
        assert_eq!(tracker.done(), 200);
    }

    #[test]
    fn test_progress_coarse_steps() {
        let mut tracker = ProgressTracker::new(3, 25);
        let reported: Vec<u8> = (0..3).filter_map(|_| tracker.tick()).collect();
        assert_eq!(reported, vec![33, 66, 100]);
    }

    #[test]
    fn test_progress_step_skips_small_totals() {
        let mut tracker = ProgressTracker::new(1000, 10);
        let reported: Vec<u8> = (0..1000).filter_map(|_| tracker.tick()).collect();
        assert_eq!(reported, vec![10, 20, 30, 40, 50, 60, 70, 80, 90, 100]);
    }

    #[test]
    fn test_progress_observer_records() {
        let mut obs = ProgressObserver::new();
        obs.on_progress(40, 4, 10);
        obs.on_progress(80, 8, 10);
        assert_eq!(obs.last_percent(), Some(80));
        assert_eq!(obs.reports(), 2);
        assert!(obs.on_row_complete(0, 5).is_continue());
        assert_eq!(obs.rows_completed(), 1);
    }

    #[test]
    fn test_cancel_on_flag() {
        let flag = AtomicBool::new(false);
        let mut obs = CancelOnFlag::new(&flag, ProgressObserver::new());
        assert!(obs.on_row_complete(0, 3).is_continue());
        flag.store(true, Ordering::Relaxed);
        assert!(obs.on_row_complete(1, 3).is_break());
        assert_eq!(obs.into_inner().rows_completed(), 2);
    }

    #[test]
    fn test_stage_clock_monotonic() {
        let clock = StageClock::start();
        let first = clock.elapsed();
        assert!(clock.elapsed() >= first);
    }
}
