//! The contract between the orchestrator and the planner of one level.
//!
//! The orchestrator never looks inside a level's search. It asks a level
//! planner to grow by one bounded unit of work, reads back an importance
//! score, and collects the path once the level is solved.

use std::fmt::Debug;

use rand::rngs::StdRng;

use quotientforge_core::{PathGeometric, PlannerData, ProblemDefinition, Result, SpacePtr};

/// A search tree growing on one abstraction level.
///
/// # Type Parameters
///
/// All levels of one orchestrator share the same planner type, so `grow`
/// receives the level below as `&Self` and may read its tree directly.
pub trait LevelPlanner: Send + Debug {
    /// Returns the name of this planner type.
    fn name(&self) -> &'static str;

    /// Index of the level this planner works on.
    fn level(&self) -> usize;

    /// Space description of this level.
    fn space(&self) -> &SpacePtr;

    /// Dimension of this level's space.
    fn dimension(&self) -> usize {
        self.space().dimension()
    }

    /// Installs the level's problem. Trees grown for a previous problem are
    /// invalid afterwards and must be discarded by the next `setup` or `clear`.
    fn set_problem_definition(&mut self, problem: ProblemDefinition);

    fn problem_definition(&self) -> Option<&ProblemDefinition>;

    /// Validates inputs and prepares the tree.
    ///
    /// # Errors
    ///
    /// Fails if no problem is installed or the problem does not fit the space.
    fn setup(&mut self) -> Result<()>;

    /// Discards the tree and counters, keeping space, problem and settings.
    fn clear(&mut self);

    /// Performs one bounded unit of tree expansion.
    ///
    /// `parent` is the planner of the level below, if any. It is only read.
    fn grow(&mut self, parent: Option<&Self>, rng: &mut StdRng);

    /// Non-negative score; higher means expand sooner. Only compared against
    /// other levels of the same orchestrator.
    fn importance(&self) -> f64;

    fn is_solved(&self) -> bool;

    /// Path from start to goal. `None` until the level is solved.
    fn solution_path(&self) -> Option<PathGeometric>;

    /// Samples drawn so far.
    fn total_samples(&self) -> usize;

    /// Samples that passed the validity check.
    fn feasible_samples(&self) -> usize;

    /// Exports the tree into the diagnostics sink.
    fn planner_data(&self, data: &mut PlannerData);
}

/// What a factory needs to build the planner of one level.
#[derive(Debug, Clone)]
pub struct LevelContext {
    pub level: usize,
    pub space: SpacePtr,
    /// Space of the level below; `None` on level 0.
    pub parent_space: Option<SpacePtr>,
}

/// Builds one level planner per level.
///
/// Implemented for every `Fn(LevelContext) -> P` closure.
pub trait LevelPlannerFactory<P>: Send {
    fn create(&self, context: LevelContext) -> P;
}

impl<P, F> LevelPlannerFactory<P> for F
where
    F: Fn(LevelContext) -> P + Send,
{
    fn create(&self, context: LevelContext) -> P {
        self(context)
    }
}
