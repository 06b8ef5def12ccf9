//! Termination conditions for the solve loop.
//!
//! A termination condition is polled once per loop iteration, between grow
//! steps. It never interrupts a grow step in progress.

mod composite;
mod external;
mod iteration_count;
mod predicate;
mod time;

use std::fmt::Debug;

use crate::scope::SolveScope;

pub use composite::{AndTermination, OrTermination};
pub use external::ExternalTermination;
pub use iteration_count::IterationCountTermination;
pub use predicate::FnTermination;
pub use time::TimeTermination;

/// Trait for determining when to stop solving.
pub trait Termination: Send + Debug {
    /// Returns true if solving should terminate.
    fn is_terminated(&self, scope: &SolveScope) -> bool;
}

/// Never terminates; solving ends only on success, stop level or exhaustion.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTermination;

impl Termination for NoTermination {
    fn is_terminated(&self, _scope: &SolveScope) -> bool {
        false
    }
}

impl<T: Termination> Termination for Option<T> {
    fn is_terminated(&self, scope: &SolveScope) -> bool {
        match self {
            Some(t) => t.is_terminated(scope),
            None => false,
        }
    }
}

impl<T: Termination + Sync> Termination for &T {
    fn is_terminated(&self, scope: &SolveScope) -> bool {
        (**self).is_terminated(scope)
    }
}
