//! Planning entry point that hides the orchestrator wiring.

use tracing::info;

use quotientforge_config::PlannerConfig;
use quotientforge_core::{PathGeometric, PlannerStatus, ProblemDefinition, Result, SpacePtr};
use quotientforge_planner::{qrrt_orchestrator, SolveStats, TerminationBuilder};

/// Result of one [`plan`] call.
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    pub status: PlannerStatus,
    /// One slot per level, coarsest first; filled for every solved level.
    pub solutions: Vec<Option<PathGeometric>>,
    pub stats: Option<SolveStats>,
}

impl PlanOutcome {
    /// Path on the full space, if the top level was solved.
    pub fn final_solution(&self) -> Option<&PathGeometric> {
        self.solutions.last().and_then(Option::as_ref)
    }

    /// Number of levels with a solution.
    pub fn solved_levels(&self) -> usize {
        self.solutions.iter().filter(|s| s.is_some()).count()
    }
}

/// Plans on `spaces` with a quotient-space RRT per level.
///
/// `problem` is given on the full space and projected onto every level. The
/// termination section of `config` bounds the search; without one the call
/// runs until the top level or the stop level is solved.
///
/// # Errors
///
/// Returns an error if there are no spaces, `problem` cannot be projected
/// onto some level, or a level rejects its problem during setup.
pub fn plan(
    spaces: Vec<SpacePtr>,
    problem: &ProblemDefinition,
    config: &PlannerConfig,
) -> Result<PlanOutcome> {
    let mut orchestrator = qrrt_orchestrator(spaces, config);
    orchestrator.set_problem_definition(problem)?;
    orchestrator.setup()?;

    let termination = TerminationBuilder::from_planner_config(config);
    let status = orchestrator.solve(&termination);
    info!(
        event = "plan_finished",
        status = %status,
        solved_levels = orchestrator.frontier(),
        levels = orchestrator.levels(),
    );

    Ok(PlanOutcome {
        status,
        solutions: orchestrator.solutions().to_vec(),
        stats: orchestrator.last_stats().cloned(),
    })
}
