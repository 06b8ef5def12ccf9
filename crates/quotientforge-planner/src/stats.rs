//! Solve statistics.
//!
//! Stack-allocated counters describing one `solve` call.

use std::time::{Duration, Instant};

use quotientforge_core::PlannerStatus;

/// Statistics for one solve call.
///
/// # Example
///
/// ```
/// use quotientforge_planner::stats::SolveStats;
///
/// let mut stats = SolveStats::new(2);
/// stats.start();
/// stats.record_grow(0);
/// stats.record_grow(0);
/// stats.record_grow(1);
///
/// assert_eq!(stats.iterations, 3);
/// assert_eq!(stats.grows_per_level, vec![2, 1]);
/// ```
#[derive(Debug, Clone)]
pub struct SolveStats {
    start_time: Option<Instant>,
    duration: Duration,
    /// Grow steps across all levels.
    pub iterations: u64,
    /// Grow steps per level, indexed by level.
    pub grows_per_level: Vec<u64>,
    /// Frontier when the call started.
    pub starting_frontier: usize,
    /// Frontier when the call returned.
    pub ending_frontier: usize,
    /// How the call ended; `None` while it is still running.
    pub status: Option<PlannerStatus>,
}

impl SolveStats {
    pub fn new(level_count: usize) -> Self {
        Self {
            start_time: None,
            duration: Duration::ZERO,
            iterations: 0,
            grows_per_level: vec![0; level_count],
            starting_frontier: 0,
            ending_frontier: 0,
            status: None,
        }
    }

    /// Marks the start of solving.
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    pub fn record_grow(&mut self, level: usize) {
        self.iterations += 1;
        if let Some(count) = self.grows_per_level.get_mut(level) {
            *count += 1;
        }
    }

    /// Freezes the duration and records the outcome.
    pub fn finish(&mut self, status: PlannerStatus, frontier: usize) {
        self.duration = self.elapsed();
        self.status = Some(status);
        self.ending_frontier = frontier;
    }

    /// Time since start while running, total duration once finished.
    pub fn elapsed(&self) -> Duration {
        if self.status.is_some() {
            return self.duration;
        }
        self.start_time.map(|t| t.elapsed()).unwrap_or_default()
    }

    /// Grow steps per second.
    pub fn iterations_per_second(&self) -> f64 {
        let secs = self.elapsed().as_secs_f64();
        if secs > 0.0 {
            self.iterations as f64 / secs
        } else {
            0.0
        }
    }

    /// Number of levels solved during this call.
    pub fn levels_solved(&self) -> usize {
        self.ending_frontier.saturating_sub(self.starting_frontier)
    }
}
