//! Outcome of a solve call.

use std::fmt;

/// Result of a multi-level solve call.
///
/// Search outcomes and misuse signals are kept apart so a caller can never
/// confuse "never ran" with "ran and found nothing".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlannerStatus {
    /// The top level was solved; the final path is available.
    ExactSolution,

    /// The termination condition fired before the top level was solved.
    Timeout,

    /// The frontier reached the configured stop level.
    StopLevelReached { level: usize },

    /// No active planner remained below the frontier.
    Exhausted,

    /// The planner has no levels or inconsistent per-level inputs.
    InvalidConfiguration,

    /// `solve` was called before a successful `setup`.
    NotSetUp,
}

impl PlannerStatus {
    /// Returns true only for [`PlannerStatus::ExactSolution`].
    pub fn is_success(&self) -> bool {
        matches!(self, PlannerStatus::ExactSolution)
    }

    /// Returns true if the search actually ran, whatever it found.
    pub fn is_search_outcome(&self) -> bool {
        !matches!(
            self,
            PlannerStatus::InvalidConfiguration | PlannerStatus::NotSetUp
        )
    }
}

impl fmt::Display for PlannerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlannerStatus::ExactSolution => write!(f, "Exact solution"),
            PlannerStatus::Timeout => write!(f, "Timeout"),
            PlannerStatus::StopLevelReached { level } => {
                write!(f, "Stopped at level {level}")
            }
            PlannerStatus::Exhausted => write!(f, "Exhausted"),
            PlannerStatus::InvalidConfiguration => write!(f, "Invalid configuration"),
            PlannerStatus::NotSetUp => write!(f, "Not set up"),
        }
    }
}
