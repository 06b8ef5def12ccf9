//! QuotientForge Planner Engine
//!
//! This crate provides the multi-level planning engine including:
//! - Orchestrator scheduling growth across abstraction levels
//! - Level planner contract and the quotient-space RRT
//! - Termination conditions
//! - Event system for monitoring
//! - Configuration wiring (builder module)

pub mod builder;
pub mod event;
pub mod level;
pub mod orchestrator;
pub mod qrrt;
pub mod scope;
pub mod stats;
pub mod termination;

#[cfg(test)]
mod test_utils;

pub use builder::{
    qrrt_orchestrator, ConfiguredTermination, QrrtOrchestrator, QuotientRrtFactory,
    TerminationBuilder,
};
pub use event::{
    CountingEventListener, LoggingEventListener, OrchestratorEvent, OrchestratorEventListener,
    OrchestratorEventSupport, RecordingEventListener,
};
pub use level::{LevelContext, LevelPlanner, LevelPlannerFactory};
pub use orchestrator::{Orchestrator, PARAM_STOP_LEVEL};
pub use qrrt::QuotientRrt;
pub use scope::SolveScope;
pub use stats::SolveStats;
pub use termination::{
    AndTermination, ExternalTermination, FnTermination, IterationCountTermination, NoTermination,
    OrTermination, Termination, TimeTermination,
};
