//! Multi-level orchestration.
//!
//! The orchestrator owns one planner per abstraction level and decides which
//! one to grow next. Level `i + 1` is never grown before level `i` is solved:
//! the lowest unsolved level is the *frontier*, and only planners at or below
//! the frontier are ever placed in the priority structure. Within that set
//! the most important planner is grown first.
//!
//! Planners live in an arena indexed by level; the priority structure holds
//! indices into it, so nothing dangles across `clear` or `setup`.

mod queue;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, info, trace, warn};

use quotientforge_config::{ParamSet, PlannerConfig};
use quotientforge_core::{
    PathGeometric, PlannerData, PlannerStatus, ProblemDefinition, QuotientForgeError, Result,
    SpacePtr,
};

use crate::event::{OrchestratorEventListener, OrchestratorEventSupport};
use crate::level::{LevelContext, LevelPlanner, LevelPlannerFactory};
use crate::scope::SolveScope;
use crate::stats::SolveStats;
use crate::termination::Termination;

use queue::LevelQueue;

/// Name of the stop-level parameter.
pub const PARAM_STOP_LEVEL: &str = "stop_level";

/// Schedules growth across a sequence of level planners.
///
/// # Type Parameters
/// * `P` - Level planner type, shared by every level
/// * `F` - Factory building one `P` per level
///
/// # Example
///
/// ```
/// use quotientforge_core::{PlannerStatus, ProblemDefinition, RealVectorSpace};
/// use quotientforge_planner::termination::IterationCountTermination;
/// use quotientforge_planner::{Orchestrator, QuotientRrt};
///
/// let spaces = vec![
///     RealVectorSpace::unit(1).unwrap().into_ptr(),
///     RealVectorSpace::unit(2).unwrap().into_ptr(),
/// ];
/// let mut orchestrator = Orchestrator::new(spaces, QuotientRrt::new).with_seed(42);
/// orchestrator
///     .set_problem_definition(&ProblemDefinition::new([0.1, 0.1], [0.9, 0.9]))
///     .unwrap();
/// orchestrator.setup().unwrap();
///
/// let status = orchestrator.solve(&IterationCountTermination::new(50_000));
/// assert_eq!(status, PlannerStatus::ExactSolution);
/// assert!(orchestrator.final_solution().is_some());
/// ```
pub struct Orchestrator<P, F> {
    spaces: Vec<SpacePtr>,
    problems: Vec<ProblemDefinition>,
    factory: F,
    levels: Vec<P>,
    solutions: Vec<Option<PathGeometric>>,
    queue: LevelQueue,
    frontier: usize,
    found_level_solution: bool,
    params: ParamSet,
    seed: u64,
    rng: StdRng,
    is_setup: bool,
    events: OrchestratorEventSupport,
    terminate_early_flag: Arc<AtomicBool>,
    solving: Arc<AtomicBool>,
    last_stats: Option<SolveStats>,
}

impl<P: std::fmt::Debug, F> std::fmt::Debug for Orchestrator<P, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("levels", &self.spaces.len())
            .field("frontier", &self.frontier)
            .field("active", &self.queue.levels())
            .field("stop_level", &self.params.value(PARAM_STOP_LEVEL))
            .field("is_setup", &self.is_setup)
            .finish()
    }
}

impl<P, F> Orchestrator<P, F>
where
    P: LevelPlanner,
    F: LevelPlannerFactory<P>,
{
    /// Creates an orchestrator over `spaces`, ordered coarsest to finest.
    ///
    /// Problems must be installed with
    /// [`set_problem_definition`](Self::set_problem_definition) or
    /// [`set_problem_definitions`](Self::set_problem_definitions) before `setup`.
    pub fn new(spaces: Vec<SpacePtr>, factory: F) -> Self {
        let seed = rand::random();
        let mut params = ParamSet::new();
        params.declare(PARAM_STOP_LEVEL, spaces.len());
        Self {
            spaces,
            problems: Vec::new(),
            factory,
            levels: Vec::new(),
            solutions: Vec::new(),
            queue: LevelQueue::new(),
            frontier: 0,
            found_level_solution: false,
            params,
            seed,
            rng: StdRng::seed_from_u64(seed),
            is_setup: false,
            events: OrchestratorEventSupport::new(),
            terminate_early_flag: Arc::new(AtomicBool::new(false)),
            solving: Arc::new(AtomicBool::new(false)),
            last_stats: None,
        }
    }

    /// Fixes the random seed so schedules are reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Applies seed and stop level from configuration.
    pub fn with_config(mut self, config: &PlannerConfig) -> Self {
        if let Some(seed) = config.random_seed {
            self = self.with_seed(seed);
        }
        if let Some(level) = config.stop_level {
            self.set_stop_level(level);
        }
        self
    }

    /// Registers an event listener.
    pub fn with_listener(mut self, listener: Arc<dyn OrchestratorEventListener>) -> Self {
        self.events.add_listener(listener);
        self
    }

    // === Lifecycle ===

    /// Builds one planner per level and activates level 0.
    ///
    /// # Errors
    ///
    /// Fails if there are no levels, if the problem count differs from the
    /// level count, or if any level planner's own setup fails. On failure the
    /// previous planners, solutions and frontier are kept as they were.
    pub fn setup(&mut self) -> Result<()> {
        let levels = self.build_levels(&self.problems)?;
        self.commit_levels(levels);
        Ok(())
    }

    /// Creates and sets up a planner per level without touching `self`.
    fn build_levels(&self, problems: &[ProblemDefinition]) -> Result<Vec<P>> {
        if self.spaces.is_empty() {
            warn!(event = "setup_failed", "no levels to plan on");
            return Err(QuotientForgeError::Config(
                "at least one level is required".to_string(),
            ));
        }
        if problems.len() != self.spaces.len() {
            let err = QuotientForgeError::LevelCountMismatch {
                expected: self.spaces.len(),
                actual: problems.len(),
            };
            warn!(event = "setup_failed", error = %err);
            return Err(err);
        }

        let mut levels = Vec::with_capacity(self.spaces.len());
        for (level, (space, problem)) in self.spaces.iter().zip(problems).enumerate() {
            let context = LevelContext {
                level,
                space: space.clone(),
                parent_space: level.checked_sub(1).map(|below| self.spaces[below].clone()),
            };
            let mut planner = self.factory.create(context);
            planner.set_problem_definition(problem.clone());
            planner
                .setup()
                .inspect_err(|err| warn!(event = "setup_failed", level, error = %err))?;
            levels.push(planner);
        }
        Ok(levels)
    }

    fn commit_levels(&mut self, levels: Vec<P>) {
        self.levels = levels;
        self.is_setup = true;
        self.reset_search();

        info!(
            event = "setup",
            levels = self.levels.len(),
            planner = self.levels[0].name(),
            dimensions = ?self.dimensions_per_level(),
        );
    }

    /// Discards all trees and solutions and reactivates level 0 only.
    ///
    /// Afterwards the orchestrator behaves like a freshly set-up one with the
    /// same spaces, problems and seed.
    pub fn clear(&mut self) {
        for planner in &mut self.levels {
            planner.clear();
        }
        self.reset_search();
        debug!(event = "cleared", levels = self.levels.len());
    }

    /// Derives one problem per level by projecting `problem` onto each space.
    ///
    /// If already set up, planners are rebuilt for the new problems.
    ///
    /// # Errors
    ///
    /// Returns a configuration error, leaving prior state unchanged, if there
    /// are no levels, the problem cannot be projected onto some level, or a
    /// rebuilt level planner rejects its problem.
    pub fn set_problem_definition(&mut self, problem: &ProblemDefinition) -> Result<()> {
        if self.spaces.is_empty() {
            warn!(event = "problem_rejected", "no levels to derive problems for");
            return Err(QuotientForgeError::Config(
                "cannot derive problems without levels".to_string(),
            ));
        }
        let derived = self
            .spaces
            .iter()
            .map(|space| problem.project_onto(space.as_ref()))
            .collect::<Result<Vec<_>>>()
            .inspect_err(|err| warn!(event = "problem_rejected", error = %err))?;
        self.install_problems(derived)
    }

    /// Installs one problem per level, coarsest first.
    ///
    /// # Errors
    ///
    /// Returns [`QuotientForgeError::LevelCountMismatch`] if `problems.len()`
    /// differs from the level count, or the level planner's error if a set-up
    /// orchestrator cannot rebuild a level. Prior state is left unchanged.
    pub fn set_problem_definitions(&mut self, problems: Vec<ProblemDefinition>) -> Result<()> {
        if problems.len() != self.spaces.len() {
            let err = QuotientForgeError::LevelCountMismatch {
                expected: self.spaces.len(),
                actual: problems.len(),
            };
            warn!(event = "problem_rejected", error = %err);
            return Err(err);
        }
        self.install_problems(problems)
    }

    fn install_problems(&mut self, problems: Vec<ProblemDefinition>) -> Result<()> {
        if self.is_setup {
            let levels = self.build_levels(&problems)?;
            self.problems = problems;
            self.commit_levels(levels);
        } else {
            self.problems = problems;
        }
        Ok(())
    }

    fn reset_search(&mut self) {
        self.frontier = 0;
        self.found_level_solution = false;
        self.solutions = vec![None; self.levels.len()];
        self.queue.clear();
        self.rng = StdRng::seed_from_u64(self.seed);
        self.last_stats = None;
        if !self.levels.is_empty() {
            self.activate(0);
        }
    }

    // === Solving ===

    /// Grows levels until the top level is solved, the frontier reaches the
    /// stop level, the termination condition fires, or no work remains.
    ///
    /// The termination condition is polled once per iteration, between grow
    /// steps. Lower-level solutions found before it fires stay queryable.
    /// Calling `solve` again continues from the current frontier.
    pub fn solve<T: Termination>(&mut self, termination: &T) -> PlannerStatus {
        if self.spaces.is_empty() {
            warn!(event = "solve_rejected", "no levels to plan on");
            return PlannerStatus::InvalidConfiguration;
        }
        if !self.is_setup {
            warn!(event = "solve_rejected", "solve called before a successful setup");
            return PlannerStatus::NotSetUp;
        }

        let level_count = self.levels.len();
        self.solving.store(true, Ordering::SeqCst);
        self.terminate_early_flag.store(false, Ordering::SeqCst);

        let mut scope = SolveScope::new(level_count, self.frontier);
        scope.set_terminate_early_flag(self.terminate_early_flag.clone());
        scope.start_solving();
        let mut stats = SolveStats::new(level_count);
        stats.start();
        stats.starting_frontier = self.frontier;

        info!(
            event = "solve_start",
            levels = level_count,
            frontier = self.frontier,
            stop_level = self.stop_level(),
        );
        self.events.fire_solving_started(self.frontier);

        let status = loop {
            if self.frontier >= level_count {
                break PlannerStatus::ExactSolution;
            }
            let stop_level = self.stop_level();
            if self.frontier >= stop_level {
                break PlannerStatus::StopLevelReached { level: stop_level };
            }
            if scope.is_terminate_early() || termination.is_terminated(&scope) {
                break PlannerStatus::Timeout;
            }
            // The frontier level is always queued while frontier < level count,
            // so this only fires if that invariant is broken.
            let Some(level) = self.queue.pop() else {
                break PlannerStatus::Exhausted;
            };

            self.found_level_solution = false;
            Self::grow_level(&mut self.levels, level, &mut self.rng);
            scope.increment_iteration_count();
            stats.record_grow(level);

            let planner = &self.levels[level];
            let importance = planner.importance();
            trace!(event = "grow", level, importance);
            self.events.fire_level_grown(level, importance);

            match planner.is_solved().then(|| planner.solution_path()).flatten() {
                Some(path) => {
                    self.record_solution(level, path);
                    if level == self.frontier {
                        self.advance_frontier(&mut scope);
                    }
                }
                None => self.queue.push(level, importance),
            }
        };

        debug_assert!(self.frontier >= stats.starting_frontier);
        debug_assert!(
            status != PlannerStatus::ExactSolution
                || self.solutions.last().is_some_and(Option::is_some)
        );

        stats.finish(status, self.frontier);
        info!(
            event = "solve_end",
            status = %status,
            frontier = self.frontier,
            iterations = stats.iterations,
            duration_ms = stats.elapsed().as_millis() as u64,
        );
        self.events.fire_solving_ended(status);
        self.last_stats = Some(stats);
        self.solving.store(false, Ordering::SeqCst);
        status
    }

    /// Grows `levels[level]` with a shared borrow of the level below.
    fn grow_level(levels: &mut [P], level: usize, rng: &mut StdRng) {
        let (below, rest) = levels.split_at_mut(level);
        rest[0].grow(below.last(), rng);
    }

    fn record_solution(&mut self, level: usize, path: PathGeometric) {
        info!(
            event = "level_solved",
            level,
            states = path.state_count(),
            samples = self.levels[level].total_samples(),
        );
        self.events.fire_level_solved(level, &path);
        self.solutions[level] = Some(path);
        self.found_level_solution = true;
    }

    fn advance_frontier(&mut self, scope: &mut SolveScope) {
        let from = self.frontier;
        self.frontier += 1;
        scope.set_frontier(self.frontier);
        info!(event = "frontier_advanced", from, to = self.frontier);
        self.events.fire_frontier_advanced(from, self.frontier);
        if self.frontier < self.levels.len() {
            self.activate(self.frontier);
        }
    }

    fn activate(&mut self, level: usize) {
        self.queue.push(level, self.levels[level].importance());
        debug!(event = "level_activated", level);
        self.events.fire_level_activated(level);
    }

    /// Requests the running solve to stop at its next iteration.
    ///
    /// Returns false if no solve is in progress.
    pub fn terminate_early(&self) -> bool {
        if self.solving.load(Ordering::SeqCst) {
            self.terminate_early_flag.store(true, Ordering::SeqCst);
            true
        } else {
            false
        }
    }

    /// Flag that, once set, makes the running solve return `Timeout`.
    ///
    /// The handle can be moved to another thread before `solve` is called.
    pub fn terminate_early_handle(&self) -> Arc<AtomicBool> {
        self.terminate_early_flag.clone()
    }

    pub fn is_solving(&self) -> bool {
        self.solving.load(Ordering::SeqCst)
    }

    // === Diagnostics ===

    /// Exports every level's tree. Does not touch search state.
    pub fn planner_data(&self, data: &mut PlannerData) {
        for planner in &self.levels {
            planner.planner_data(data);
        }
    }

    /// Number of levels.
    pub fn levels(&self) -> usize {
        self.spaces.len()
    }

    /// Feasible samples per level; empty before setup.
    pub fn feasible_nodes(&self) -> Vec<usize> {
        self.levels.iter().map(|p| p.feasible_samples()).collect()
    }

    /// Total samples per level; empty before setup.
    pub fn nodes(&self) -> Vec<usize> {
        self.levels.iter().map(|p| p.total_samples()).collect()
    }

    pub fn dimensions_per_level(&self) -> Vec<usize> {
        self.spaces.iter().map(|s| s.dimension()).collect()
    }

    /// Lowest unsolved level; equals the level count once everything is solved.
    pub fn frontier(&self) -> usize {
        self.frontier
    }

    /// One slot per level, filled exactly when that level is solved.
    pub fn solutions(&self) -> &[Option<PathGeometric>] {
        &self.solutions
    }

    pub fn solution(&self, level: usize) -> Option<&PathGeometric> {
        self.solutions.get(level).and_then(Option::as_ref)
    }

    /// Path on the full space, once the top level is solved.
    pub fn final_solution(&self) -> Option<&PathGeometric> {
        self.solutions.last().and_then(Option::as_ref)
    }

    /// Whether the most recent grow step solved its level.
    pub fn found_level_solution(&self) -> bool {
        self.found_level_solution
    }

    pub fn is_setup(&self) -> bool {
        self.is_setup
    }

    /// Levels currently in the priority structure, ascending.
    pub fn active_levels(&self) -> Vec<usize> {
        self.queue.levels()
    }

    pub fn is_active(&self, level: usize) -> bool {
        self.queue.contains(level)
    }

    pub fn level_planner(&self, level: usize) -> Option<&P> {
        self.levels.get(level)
    }

    pub fn problem_definitions(&self) -> &[ProblemDefinition] {
        &self.problems
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Statistics of the most recent solve call since setup or clear.
    pub fn last_stats(&self) -> Option<&SolveStats> {
        self.last_stats.as_ref()
    }

    // === Stop level and parameters ===

    /// Makes `solve` return once the frontier reaches `level`.
    ///
    /// Values above the level count are kept but act as the level count.
    pub fn set_stop_level(&mut self, level: usize) {
        if level > self.spaces.len() {
            warn!(
                event = "stop_level_clamped",
                requested = level,
                levels = self.spaces.len(),
            );
        }
        // Declared as UInt in `new`, so the typed write cannot fail.
        let _ = self.params.set(PARAM_STOP_LEVEL, level);
        debug!(event = "stop_level_set", level);
    }

    /// Effective stop level, never above the level count.
    pub fn stop_level(&self) -> usize {
        self.params
            .get::<usize>(PARAM_STOP_LEVEL)
            .unwrap_or(self.spaces.len())
            .min(self.spaces.len())
    }

    /// Sets a parameter from text. Returns false on unknown names or parse
    /// failures, which are logged.
    ///
    /// `stop_level` goes through [`set_stop_level`](Self::set_stop_level).
    pub fn set_param(&mut self, name: &str, value: &str) -> bool {
        if !self.params.set_param(name, value) {
            return false;
        }
        if name == PARAM_STOP_LEVEL {
            if let Some(level) = self.params.get::<usize>(PARAM_STOP_LEVEL) {
                self.set_stop_level(level);
            }
        }
        true
    }

    pub fn params(&self) -> std::collections::BTreeMap<String, String> {
        self.params.params()
    }

    pub fn param_names(&self) -> Vec<String> {
        self.params.param_names()
    }

    pub fn param_values(&self) -> Vec<String> {
        self.params.param_values()
    }
}

#[cfg(test)]
mod tests;
