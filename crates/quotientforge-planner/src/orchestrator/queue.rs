//! Priority structure over active levels.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A level waiting to be grown, with the importance it had when inserted.
#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    importance: f64,
    level: usize,
}

impl Eq for QueueEntry {}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Higher importance first; among equals the lower level wins.
        self.importance
            .total_cmp(&other.importance)
            .then_with(|| other.level.cmp(&self.level))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Max-heap of level indices keyed by importance.
///
/// Holds indices into the orchestrator's planner arena, never the planners
/// themselves. Ties on importance pop the lowest level first, so the pop
/// order is a pure function of the pushed `(level, importance)` pairs.
#[derive(Debug, Clone, Default)]
pub(crate) struct LevelQueue {
    heap: BinaryHeap<QueueEntry>,
}

impl LevelQueue {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Inserts a level. Negative or NaN importance is treated as zero.
    pub(crate) fn push(&mut self, level: usize, importance: f64) {
        let importance = if importance > 0.0 { importance } else { 0.0 };
        self.heap.push(QueueEntry { importance, level });
    }

    /// Removes and returns the most important level.
    pub(crate) fn pop(&mut self) -> Option<usize> {
        self.heap.pop().map(|entry| entry.level)
    }

    pub(crate) fn contains(&self, level: usize) -> bool {
        self.heap.iter().any(|entry| entry.level == level)
    }

    /// Queued levels in ascending order.
    pub(crate) fn levels(&self) -> Vec<usize> {
        let mut levels: Vec<usize> = self.heap.iter().map(|entry| entry.level).collect();
        levels.sort_unstable();
        levels
    }

    pub(crate) fn len(&self) -> usize {
        self.heap.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub(crate) fn clear(&mut self) {
        self.heap.clear();
    }
}
