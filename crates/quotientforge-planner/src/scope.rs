//! Solve-level scope.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Progress of one `solve` call, as seen by termination conditions.
#[derive(Debug, Clone)]
pub struct SolveScope {
    level_count: usize,
    frontier: usize,
    start_time: Option<Instant>,
    iteration_count: u64,
    terminate_early_flag: Option<Arc<AtomicBool>>,
}

impl SolveScope {
    pub fn new(level_count: usize, frontier: usize) -> Self {
        Self {
            level_count,
            frontier,
            start_time: None,
            iteration_count: 0,
            terminate_early_flag: None,
        }
    }

    pub fn set_terminate_early_flag(&mut self, flag: Arc<AtomicBool>) {
        self.terminate_early_flag = Some(flag);
    }

    /// Returns true if another thread requested early termination.
    pub fn is_terminate_early(&self) -> bool {
        self.terminate_early_flag
            .as_ref()
            .is_some_and(|f| f.load(Ordering::SeqCst))
    }

    pub fn start_solving(&mut self) {
        self.start_time = Some(Instant::now());
        self.iteration_count = 0;
    }

    pub fn elapsed(&self) -> Option<Duration> {
        self.start_time.map(|t| t.elapsed())
    }

    /// Counts one grow step and returns the new total.
    pub fn increment_iteration_count(&mut self) -> u64 {
        self.iteration_count += 1;
        self.iteration_count
    }

    /// Grow steps taken during this solve call.
    pub fn iteration_count(&self) -> u64 {
        self.iteration_count
    }

    pub fn frontier(&self) -> usize {
        self.frontier
    }

    pub fn set_frontier(&mut self, frontier: usize) {
        self.frontier = frontier;
    }

    pub fn level_count(&self) -> usize {
        self.level_count
    }
}
