//! Iteration count termination.

use super::Termination;
use crate::scope::SolveScope;

/// Terminates after a number of grow steps within one solve call.
///
/// # Example
///
/// ```
/// use quotientforge_planner::termination::IterationCountTermination;
///
/// // Terminate after 1000 grow steps
/// let term = IterationCountTermination::new(1000);
/// ```
#[derive(Debug, Clone)]
pub struct IterationCountTermination {
    limit: u64,
}

impl IterationCountTermination {
    pub fn new(limit: u64) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> u64 {
        self.limit
    }
}

impl Termination for IterationCountTermination {
    fn is_terminated(&self, scope: &SolveScope) -> bool {
        scope.iteration_count() >= self.limit
    }
}
