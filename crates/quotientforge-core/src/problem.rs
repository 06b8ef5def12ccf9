//! Problem descriptions: where a level's search starts and where it must end.

use crate::error::{QuotientForgeError, Result};
use crate::space::SpaceInformation;
use crate::state::State;

/// Start state, goal state and the radius within which the goal counts as reached.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProblemDefinition {
    start: State,
    goal: State,
    goal_threshold: f64,
}

impl ProblemDefinition {
    /// Default goal radius.
    pub const DEFAULT_GOAL_THRESHOLD: f64 = 0.05;

    pub fn new(start: impl Into<State>, goal: impl Into<State>) -> Self {
        Self {
            start: start.into(),
            goal: goal.into(),
            goal_threshold: Self::DEFAULT_GOAL_THRESHOLD,
        }
    }

    pub fn with_goal_threshold(mut self, goal_threshold: f64) -> Self {
        self.goal_threshold = goal_threshold;
        self
    }

    pub fn start(&self) -> &State {
        &self.start
    }

    pub fn goal(&self) -> &State {
        &self.goal
    }

    pub fn goal_threshold(&self) -> f64 {
        self.goal_threshold
    }

    /// Dimension of the start state.
    pub fn dimension(&self) -> usize {
        self.start.dimension()
    }

    pub fn is_goal_satisfied(&self, state: &State) -> bool {
        state.distance(&self.goal) <= self.goal_threshold
    }

    /// Projects start and goal onto a space of lower or equal dimension by
    /// keeping their leading coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`QuotientForgeError::Projection`] if start and goal disagree on
    /// their dimension or the target space has more coordinates than they do.
    pub fn project_onto(&self, space: &dyn SpaceInformation) -> Result<ProblemDefinition> {
        if self.start.dimension() != self.goal.dimension() {
            return Err(QuotientForgeError::Projection(format!(
                "start has {} coordinates but goal has {}",
                self.start.dimension(),
                self.goal.dimension()
            )));
        }
        let dimension = space.dimension();
        match (self.start.project(dimension), self.goal.project(dimension)) {
            (Some(start), Some(goal)) => Ok(ProblemDefinition {
                start,
                goal,
                goal_threshold: self.goal_threshold,
            }),
            _ => Err(QuotientForgeError::Projection(format!(
                "cannot derive a {dimension}-dimensional problem from a {}-dimensional one",
                self.start.dimension()
            ))),
        }
    }
}
