//! Closure-based termination.

use std::fmt::{self, Debug};

use super::Termination;
use crate::scope::SolveScope;

/// Terminates when a caller-supplied predicate returns true.
///
/// # Example
///
/// ```
/// use quotientforge_planner::termination::FnTermination;
///
/// // Stop as soon as level 1 becomes the frontier
/// let term = FnTermination::new(|scope| scope.frontier() >= 1);
/// ```
pub struct FnTermination<F> {
    predicate: F,
}

impl<F> FnTermination<F>
where
    F: Fn(&SolveScope) -> bool + Send,
{
    pub fn new(predicate: F) -> Self {
        Self { predicate }
    }
}

impl<F> Debug for FnTermination<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnTermination").finish_non_exhaustive()
    }
}

impl<F> Termination for FnTermination<F>
where
    F: Fn(&SolveScope) -> bool + Send,
{
    fn is_terminated(&self, scope: &SolveScope) -> bool {
        (self.predicate)(scope)
    }
}
