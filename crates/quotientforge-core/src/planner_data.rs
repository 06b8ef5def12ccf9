//! Read-only diagnostics sink for search trees.
//!
//! Level planners export their vertices and edges into a [`PlannerData`]
//! so callers can inspect or visualize all trees at once.

use crate::state::State;

/// A tree vertex tagged with the level it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannerDataVertex {
    pub level: usize,
    pub state: State,
    pub is_start: bool,
    pub is_goal: bool,
}

/// A directed edge between two vertex indices of the same [`PlannerData`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlannerDataEdge {
    pub from: usize,
    pub to: usize,
}

/// Aggregated vertices and edges of one or more search trees.
#[derive(Debug, Clone, Default)]
pub struct PlannerData {
    vertices: Vec<PlannerDataVertex>,
    edges: Vec<PlannerDataEdge>,
}

impl PlannerData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a vertex and returns its index.
    pub fn add_vertex(&mut self, vertex: PlannerDataVertex) -> usize {
        self.vertices.push(vertex);
        self.vertices.len() - 1
    }

    /// Adds an edge between previously added vertices.
    ///
    /// Returns false (and adds nothing) if either index is unknown.
    pub fn add_edge(&mut self, from: usize, to: usize) -> bool {
        if from >= self.vertices.len() || to >= self.vertices.len() {
            return false;
        }
        self.edges.push(PlannerDataEdge { from, to });
        true
    }

    pub fn vertices(&self) -> &[PlannerDataVertex] {
        &self.vertices
    }

    pub fn edges(&self) -> &[PlannerDataEdge] {
        &self.edges
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Number of vertices exported by the given level.
    pub fn vertex_count_on_level(&self, level: usize) -> usize {
        self.vertices.iter().filter(|v| v.level == level).count()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.edges.clear();
    }
}
