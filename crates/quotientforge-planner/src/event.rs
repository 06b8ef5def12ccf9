//! Event system for orchestrator monitoring.
//!
//! Listeners are handed to the orchestrator at construction and receive
//! notifications about the multi-level search as it happens.
//!
//! # Event Types
//!
//! - **Solve Events**: solving started/ended
//! - **Level Events**: level activated, grown, solved
//! - **Frontier Events**: frontier advanced
//!
//! # Usage
//!
//! ```
//! use std::sync::Arc;
//! use quotientforge_planner::event::{CountingEventListener, OrchestratorEventSupport};
//!
//! let counter = Arc::new(CountingEventListener::new());
//! let mut support = OrchestratorEventSupport::new();
//! support.add_listener(counter.clone());
//!
//! support.fire_level_activated(0);
//! assert_eq!(counter.level_activated_count(), 1);
//! ```

use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use tracing::{debug, info, trace};

use quotientforge_core::{PathGeometric, PlannerStatus};

/// Listener for orchestrator events.
///
/// All methods default to doing nothing, so implementors only override what
/// they care about.
pub trait OrchestratorEventListener: Send + Sync + Debug {
    /// Called when a solve call begins.
    fn on_solving_started(&self, _frontier: usize) {}

    /// Called when a level's planner enters the priority structure for the
    /// first time since setup or clear.
    fn on_level_activated(&self, _level: usize) {}

    /// Called after every grow step with the planner's new importance.
    fn on_level_grown(&self, _level: usize, _importance: f64) {}

    /// Called when a level is solved and its path recorded.
    fn on_level_solved(&self, _level: usize, _path: &PathGeometric) {}

    /// Called when the frontier moves from `from` to `to`.
    fn on_frontier_advanced(&self, _from: usize, _to: usize) {}

    /// Called when a solve call returns.
    fn on_solving_ended(&self, _status: PlannerStatus) {}
}

/// Central event broadcaster for orchestrator events.
///
/// All listener methods are called synchronously in registration order.
#[derive(Default, Clone)]
pub struct OrchestratorEventSupport {
    listeners: Vec<Arc<dyn OrchestratorEventListener>>,
}

impl OrchestratorEventSupport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_listener(&mut self, listener: Arc<dyn OrchestratorEventListener>) {
        self.listeners.push(listener);
    }

    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn has_listeners(&self) -> bool {
        !self.listeners.is_empty()
    }

    pub fn fire_solving_started(&self, frontier: usize) {
        for listener in &self.listeners {
            listener.on_solving_started(frontier);
        }
    }

    pub fn fire_level_activated(&self, level: usize) {
        for listener in &self.listeners {
            listener.on_level_activated(level);
        }
    }

    pub fn fire_level_grown(&self, level: usize, importance: f64) {
        for listener in &self.listeners {
            listener.on_level_grown(level, importance);
        }
    }

    pub fn fire_level_solved(&self, level: usize, path: &PathGeometric) {
        for listener in &self.listeners {
            listener.on_level_solved(level, path);
        }
    }

    pub fn fire_frontier_advanced(&self, from: usize, to: usize) {
        for listener in &self.listeners {
            listener.on_frontier_advanced(from, to);
        }
    }

    pub fn fire_solving_ended(&self, status: PlannerStatus) {
        for listener in &self.listeners {
            listener.on_solving_ended(status);
        }
    }
}

impl Debug for OrchestratorEventSupport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OrchestratorEventSupport")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Forwards every event to `tracing`.
#[derive(Debug, Clone, Default)]
pub struct LoggingEventListener {
    prefix: String,
}

impl LoggingEventListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a logging listener with a custom prefix.
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl OrchestratorEventListener for LoggingEventListener {
    fn on_solving_started(&self, frontier: usize) {
        info!(prefix = %self.prefix, event = "solving_started", frontier);
    }

    fn on_level_activated(&self, level: usize) {
        debug!(prefix = %self.prefix, event = "level_activated", level);
    }

    fn on_level_grown(&self, level: usize, importance: f64) {
        trace!(prefix = %self.prefix, event = "level_grown", level, importance);
    }

    fn on_level_solved(&self, level: usize, path: &PathGeometric) {
        info!(
            prefix = %self.prefix,
            event = "level_solved",
            level,
            states = path.state_count(),
            length = path.length(),
        );
    }

    fn on_frontier_advanced(&self, from: usize, to: usize) {
        info!(prefix = %self.prefix, event = "frontier_advanced", from, to);
    }

    fn on_solving_ended(&self, status: PlannerStatus) {
        info!(prefix = %self.prefix, event = "solving_ended", status = %status);
    }
}

/// A counting listener that tracks event occurrences.
///
/// Useful for testing and statistics collection.
#[derive(Debug, Default)]
pub struct CountingEventListener {
    solving_started_count: AtomicUsize,
    level_activated_count: AtomicUsize,
    level_grown_count: AtomicUsize,
    level_solved_count: AtomicUsize,
    frontier_advanced_count: AtomicUsize,
    solving_ended_count: AtomicUsize,
}

impl CountingEventListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn solving_started_count(&self) -> usize {
        self.solving_started_count.load(Ordering::SeqCst)
    }

    pub fn level_activated_count(&self) -> usize {
        self.level_activated_count.load(Ordering::SeqCst)
    }

    pub fn level_grown_count(&self) -> usize {
        self.level_grown_count.load(Ordering::SeqCst)
    }

    pub fn level_solved_count(&self) -> usize {
        self.level_solved_count.load(Ordering::SeqCst)
    }

    pub fn frontier_advanced_count(&self) -> usize {
        self.frontier_advanced_count.load(Ordering::SeqCst)
    }

    pub fn solving_ended_count(&self) -> usize {
        self.solving_ended_count.load(Ordering::SeqCst)
    }

    /// Resets all counters to zero.
    pub fn reset(&self) {
        for counter in [
            &self.solving_started_count,
            &self.level_activated_count,
            &self.level_grown_count,
            &self.level_solved_count,
            &self.frontier_advanced_count,
            &self.solving_ended_count,
        ] {
            counter.store(0, Ordering::SeqCst);
        }
    }
}

impl OrchestratorEventListener for CountingEventListener {
    fn on_solving_started(&self, _frontier: usize) {
        self.solving_started_count.fetch_add(1, Ordering::SeqCst);
    }

    fn on_level_activated(&self, _level: usize) {
        self.level_activated_count.fetch_add(1, Ordering::SeqCst);
    }

    fn on_level_grown(&self, _level: usize, _importance: f64) {
        self.level_grown_count.fetch_add(1, Ordering::SeqCst);
    }

    fn on_level_solved(&self, _level: usize, _path: &PathGeometric) {
        self.level_solved_count.fetch_add(1, Ordering::SeqCst);
    }

    fn on_frontier_advanced(&self, _from: usize, _to: usize) {
        self.frontier_advanced_count.fetch_add(1, Ordering::SeqCst);
    }

    fn on_solving_ended(&self, _status: PlannerStatus) {
        self.solving_ended_count.fetch_add(1, Ordering::SeqCst);
    }
}

/// One recorded orchestrator event.
#[derive(Debug, Clone, PartialEq)]
pub enum OrchestratorEvent {
    SolvingStarted { frontier: usize },
    LevelActivated { level: usize },
    LevelGrown { level: usize },
    LevelSolved { level: usize },
    FrontierAdvanced { from: usize, to: usize },
    SolvingEnded { status: PlannerStatus },
}

/// Records the full event sequence, for replaying schedules in tests.
#[derive(Debug, Default)]
pub struct RecordingEventListener {
    events: Mutex<Vec<OrchestratorEvent>>,
}

impl RecordingEventListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    pub fn events(&self) -> Vec<OrchestratorEvent> {
        self.lock().clone()
    }

    /// Levels in the order they were grown.
    pub fn grown_levels(&self) -> Vec<usize> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                OrchestratorEvent::LevelGrown { level } => Some(*level),
                _ => None,
            })
            .collect()
    }

    /// Levels in the order they were activated.
    pub fn activated_levels(&self) -> Vec<usize> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                OrchestratorEvent::LevelActivated { level } => Some(*level),
                _ => None,
            })
            .collect()
    }

    /// `(from, to)` of every frontier advance, in order.
    pub fn frontier_advances(&self) -> Vec<(usize, usize)> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                OrchestratorEvent::FrontierAdvanced { from, to } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    fn record(&self, event: OrchestratorEvent) {
        self.lock().push(event);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<OrchestratorEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl OrchestratorEventListener for RecordingEventListener {
    fn on_solving_started(&self, frontier: usize) {
        self.record(OrchestratorEvent::SolvingStarted { frontier });
    }

    fn on_level_activated(&self, level: usize) {
        self.record(OrchestratorEvent::LevelActivated { level });
    }

    fn on_level_grown(&self, level: usize, _importance: f64) {
        self.record(OrchestratorEvent::LevelGrown { level });
    }

    fn on_level_solved(&self, level: usize, _path: &PathGeometric) {
        self.record(OrchestratorEvent::LevelSolved { level });
    }

    fn on_frontier_advanced(&self, from: usize, to: usize) {
        self.record(OrchestratorEvent::FrontierAdvanced { from, to });
    }

    fn on_solving_ended(&self, status: PlannerStatus) {
        self.record(OrchestratorEvent::SolvingEnded { status });
    }
}

#[cfg(test)]
#[path = "event_tests.rs"]
mod tests;
