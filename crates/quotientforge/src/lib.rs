//! QuotientForge - Hierarchical Quotient-Space Motion Planning in Rust
//!
//! Describe your configuration space as a sequence of simplifications, from
//! coarsest to full, and call [`plan`].
//!
//! # Example
//!
//! ```rust
//! use quotientforge::prelude::*;
//!
//! let spaces = vec![
//!     RealVectorSpace::unit(1).unwrap().into_ptr(),
//!     RealVectorSpace::unit(2).unwrap().into_ptr(),
//! ];
//! let problem = ProblemDefinition::new([0.1, 0.1], [0.9, 0.9]);
//! let config = PlannerConfig::new()
//!     .with_random_seed(1)
//!     .with_iteration_limit(50_000);
//!
//! let outcome = plan(spaces, &problem, &config).unwrap();
//! assert_eq!(outcome.status, PlannerStatus::ExactSolution);
//! assert!(outcome.final_solution().is_some());
//! ```

// Core types
pub use quotientforge_core::{
    BoxObstacle, PathGeometric, PlannerData, PlannerDataEdge, PlannerDataVertex, PlannerStatus,
    ProblemDefinition, QuotientForgeError, RealVectorSpace, Result, SpaceInformation, SpacePtr,
    State,
};

// Configuration
pub use quotientforge_config::{
    ConfigError, LevelPlannerConfig, ParamSet, PlannerConfig, TerminationConfig,
};

// Planner engine
pub use quotientforge_planner::{
    qrrt_orchestrator, termination, LevelContext, LevelPlanner, LevelPlannerFactory,
    LoggingEventListener, Orchestrator, OrchestratorEventListener, QrrtOrchestrator,
    QuotientRrt, QuotientRrtFactory, SolveStats, TerminationBuilder,
};

mod planner;
pub use planner::{plan, PlanOutcome};

#[cfg(feature = "console")]
pub mod console;

pub mod prelude {
    pub use super::{plan, PlanOutcome};
    pub use super::{
        BoxObstacle, PathGeometric, PlannerStatus, ProblemDefinition, RealVectorSpace,
        SpaceInformation, SpacePtr, State,
    };
    pub use super::{LevelPlannerConfig, PlannerConfig};
    pub use super::{LevelPlanner, Orchestrator, QuotientRrt};
}
