//! QuotientForge Core - Core types and traits for multi-level motion planning
//!
//! This crate provides the fundamental abstractions shared by every level of
//! a quotient-space planner:
//! - States and real-vector space descriptions with validity checking
//! - Problem descriptions (start/goal) and their projection onto lower levels
//! - Geometric solution paths
//! - Planner status values and the diagnostics sink
//! - The error taxonomy

pub mod error;
pub mod path;
pub mod planner_data;
pub mod problem;
pub mod space;
pub mod state;
pub mod status;


pub use error::{QuotientForgeError, Result};
pub use path::PathGeometric;
pub use planner_data::{PlannerData, PlannerDataEdge, PlannerDataVertex};
pub use problem::ProblemDefinition;
pub use space::{BoxObstacle, RealVectorSpace, SpaceInformation, SpacePtr};
pub use state::State;
pub use status::PlannerStatus;
