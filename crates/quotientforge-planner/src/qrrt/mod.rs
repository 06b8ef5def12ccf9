//! Rapidly-exploring quotient-space tree.
//!
//! One RRT per level. A level's tree is only started once the level below
//! is solved, and its samples are drawn around the lower level's tree: a
//! random vertex of the parent tree is lifted into this level by keeping its
//! coordinates and sampling the remaining axes uniformly.
//!
//! Reference: A. Orthey and M. Toussaint, "Rapidly-Exploring Quotient-Space
//! Trees: Motion Planning using Sequential Simplifications", 2019.

use rand::rngs::StdRng;
use rand::Rng;
use tracing::{trace, warn};

use quotientforge_config::{LevelPlannerConfig, ParamSet};
use quotientforge_core::{
    PathGeometric, PlannerData, PlannerDataVertex, ProblemDefinition, QuotientForgeError, Result,
    SpacePtr, State,
};

use crate::level::{LevelContext, LevelPlanner};

/// Fraction of the space extent used as range when none is configured.
const DEFAULT_RANGE_FRACTION: f64 = 0.2;

const PARAM_RANGE: &str = "range";
const PARAM_GOAL_BIAS: &str = "goal_bias";

#[derive(Debug, Clone)]
struct TreeVertex {
    state: State,
    parent: Option<usize>,
}

/// RRT on one quotient-space level.
///
/// # Example
///
/// ```
/// use quotientforge_core::{ProblemDefinition, RealVectorSpace};
/// use quotientforge_planner::{LevelContext, LevelPlanner, QuotientRrt};
///
/// let space = RealVectorSpace::unit(2).unwrap().into_ptr();
/// let mut planner = QuotientRrt::new(LevelContext { level: 0, space, parent_space: None });
/// planner.set_problem_definition(ProblemDefinition::new([0.1, 0.1], [0.9, 0.9]));
/// planner.setup().unwrap();
///
/// assert_eq!(planner.importance(), 0.5); // start vertex only
/// ```
#[derive(Debug, Clone)]
pub struct QuotientRrt {
    level: usize,
    space: SpacePtr,
    parent_space: Option<SpacePtr>,
    problem: Option<ProblemDefinition>,
    params: ParamSet,
    goal_threshold: Option<f64>,
    max_distance: f64,
    vertices: Vec<TreeVertex>,
    goal_vertex: Option<usize>,
    total_samples: usize,
    feasible_samples: usize,
    is_setup: bool,
}

impl QuotientRrt {
    pub fn new(context: LevelContext) -> Self {
        let mut params = ParamSet::new();
        // Zero selects a range derived from the space extent at setup.
        params.declare(PARAM_RANGE, 0.0f64);
        params.declare(PARAM_GOAL_BIAS, LevelPlannerConfig::DEFAULT_GOAL_BIAS);
        Self {
            level: context.level,
            space: context.space,
            parent_space: context.parent_space,
            problem: None,
            params,
            goal_threshold: None,
            max_distance: 0.0,
            vertices: Vec::new(),
            goal_vertex: None,
            total_samples: 0,
            feasible_samples: 0,
            is_setup: false,
        }
    }

    /// Applies shared level planner settings.
    pub fn with_config(mut self, config: &LevelPlannerConfig) -> Self {
        if let Some(range) = config.range {
            self.set_range(range);
        }
        self.set_goal_bias(config.goal_bias);
        self.goal_threshold = config.goal_threshold;
        self
    }

    /// Maximum extension distance. Takes effect at the next `setup`.
    ///
    /// Returns false and keeps the previous value unless `distance` is finite
    /// and positive.
    pub fn set_range(&mut self, distance: f64) -> bool {
        if !(distance.is_finite() && distance > 0.0) {
            warn!(
                event = "param_rejected",
                level = self.level,
                name = PARAM_RANGE,
                value = distance,
            );
            return false;
        }
        self.params.set(PARAM_RANGE, distance).is_ok()
    }

    /// Configured range; zero until set, meaning derived at setup.
    pub fn range(&self) -> f64 {
        self.params.get(PARAM_RANGE).unwrap_or_default()
    }

    /// Probability of sampling the goal. Returns false and keeps the
    /// previous value outside `[0, 1]`.
    pub fn set_goal_bias(&mut self, goal_bias: f64) -> bool {
        if !(0.0..=1.0).contains(&goal_bias) {
            warn!(
                event = "param_rejected",
                level = self.level,
                name = PARAM_GOAL_BIAS,
                value = goal_bias,
            );
            return false;
        }
        self.params.set(PARAM_GOAL_BIAS, goal_bias).is_ok()
    }

    pub fn goal_bias(&self) -> f64 {
        self.params
            .get(PARAM_GOAL_BIAS)
            .unwrap_or(LevelPlannerConfig::DEFAULT_GOAL_BIAS)
    }

    /// Tunables of this planner (`range`, `goal_bias`).
    pub fn params(&self) -> &ParamSet {
        &self.params
    }

    /// Sets a tunable from text. Returns false on unknown names, parse
    /// failures and out-of-range values.
    pub fn set_param(&mut self, name: &str, value: &str) -> bool {
        let setter: fn(&mut Self, f64) -> bool = match name {
            PARAM_RANGE => Self::set_range,
            PARAM_GOAL_BIAS => Self::set_goal_bias,
            _ => return self.params.set_param(name, value),
        };
        match value.trim().parse::<f64>() {
            Ok(parsed) => setter(self, parsed),
            Err(_) => {
                warn!(event = "param_rejected", level = self.level, name, value);
                false
            }
        }
    }

    /// Range in effect for the current setup.
    pub fn max_distance(&self) -> f64 {
        self.max_distance
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn effective_problem(&self) -> Option<ProblemDefinition> {
        let problem = self.problem.clone()?;
        Some(match self.goal_threshold {
            Some(threshold) => problem.with_goal_threshold(threshold),
            None => problem,
        })
    }

    fn sample(
        &self,
        parent: Option<&Self>,
        problem: &ProblemDefinition,
        rng: &mut StdRng,
    ) -> State {
        if rng.random::<f64>() < self.goal_bias() {
            return problem.goal().clone();
        }
        match parent.filter(|p| !p.vertices.is_empty()) {
            Some(parent) => {
                let base = &parent.vertices[rng.random_range(0..parent.vertices.len())].state;
                self.lift(base, rng)
            }
            None => self.space.sample_uniform(rng),
        }
    }

    /// Keeps the coordinates of `base` and samples the remaining axes.
    fn lift(&self, base: &State, rng: &mut StdRng) -> State {
        let dimension = self.space.dimension();
        let inherited = base.dimension().min(dimension);
        let fiber: Vec<f64> = (inherited..dimension)
            .map(|axis| self.space.sample_coordinate(axis, rng))
            .collect();
        State::new(base.values()[..inherited].iter().copied().chain(fiber))
    }

    fn nearest(&self, target: &State) -> Option<usize> {
        self.vertices
            .iter()
            .enumerate()
            .map(|(i, v)| (i, self.space.distance(&v.state, target)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(i, _)| i)
    }

    fn steer(&self, from: &State, to: &State) -> State {
        let distance = self.space.distance(from, to);
        if distance <= self.max_distance {
            to.clone()
        } else {
            from.interpolate(to, self.max_distance / distance)
        }
    }

    fn reset_tree(&mut self) {
        self.vertices.clear();
        self.goal_vertex = None;
        self.total_samples = 0;
        self.feasible_samples = 0;
        if let Some(problem) = &self.problem {
            self.vertices.push(TreeVertex {
                state: problem.start().clone(),
                parent: None,
            });
        }
    }
}

impl LevelPlanner for QuotientRrt {
    fn name(&self) -> &'static str {
        "QRRT"
    }

    fn level(&self) -> usize {
        self.level
    }

    fn space(&self) -> &SpacePtr {
        &self.space
    }

    fn set_problem_definition(&mut self, problem: ProblemDefinition) {
        self.problem = Some(problem);
        self.is_setup = false;
    }

    fn problem_definition(&self) -> Option<&ProblemDefinition> {
        self.problem.as_ref()
    }

    fn setup(&mut self) -> Result<()> {
        let dimension = self.space.dimension();
        let problem = self.problem.as_ref().ok_or_else(|| {
            QuotientForgeError::Config(format!("level {} has no problem definition", self.level))
        })?;
        if problem.dimension() != dimension || problem.goal().dimension() != dimension {
            return Err(QuotientForgeError::DimensionMismatch {
                level: self.level,
                expected: dimension,
                actual: problem.dimension(),
            });
        }
        if let Some(parent) = &self.parent_space {
            if parent.dimension() > dimension {
                return Err(QuotientForgeError::Config(format!(
                    "level {} has {} dimensions but the level below has {}",
                    self.level,
                    dimension,
                    parent.dimension()
                )));
            }
        }
        if !self.space.is_valid(problem.start()) {
            return Err(QuotientForgeError::Config(format!(
                "start state {} is invalid on level {}",
                problem.start(),
                self.level
            )));
        }

        let range = self.range();
        self.max_distance = if range > 0.0 {
            range
        } else {
            self.space.maximum_extent() * DEFAULT_RANGE_FRACTION
        };
        self.reset_tree();
        self.is_setup = true;
        Ok(())
    }

    fn clear(&mut self) {
        self.reset_tree();
    }

    fn grow(&mut self, parent: Option<&Self>, rng: &mut StdRng) {
        if !self.is_setup || self.goal_vertex.is_some() {
            return;
        }
        let Some(problem) = self.effective_problem() else {
            return;
        };

        let target = self.sample(parent, &problem, rng);
        self.total_samples += 1;
        if !self.space.is_valid(&target) {
            return;
        }
        self.feasible_samples += 1;

        let Some(nearest) = self.nearest(&target) else {
            return;
        };
        let from = &self.vertices[nearest].state;
        let new_state = self.steer(from, &target);
        if !self.space.check_motion(from, &new_state) {
            return;
        }

        let reached_goal = problem.is_goal_satisfied(&new_state);
        self.vertices.push(TreeVertex {
            state: new_state,
            parent: Some(nearest),
        });
        if reached_goal {
            self.goal_vertex = Some(self.vertices.len() - 1);
            trace!(
                event = "goal_reached",
                level = self.level,
                vertices = self.vertices.len(),
                samples = self.total_samples,
            );
        }
    }

    fn importance(&self) -> f64 {
        1.0 / (self.vertices.len() as f64 + 1.0)
    }

    fn is_solved(&self) -> bool {
        self.goal_vertex.is_some()
    }

    fn solution_path(&self) -> Option<PathGeometric> {
        let mut states = Vec::new();
        let mut current = self.goal_vertex;
        while let Some(index) = current {
            let vertex = &self.vertices[index];
            states.push(vertex.state.clone());
            current = vertex.parent;
        }
        if states.is_empty() {
            return None;
        }
        states.reverse();
        Some(PathGeometric::new(states))
    }

    fn total_samples(&self) -> usize {
        self.total_samples
    }

    fn feasible_samples(&self) -> usize {
        self.feasible_samples
    }

    fn planner_data(&self, data: &mut PlannerData) {
        let indices: Vec<usize> = self
            .vertices
            .iter()
            .enumerate()
            .map(|(i, v)| {
                data.add_vertex(PlannerDataVertex {
                    level: self.level,
                    state: v.state.clone(),
                    is_start: i == 0,
                    is_goal: self.goal_vertex == Some(i),
                })
            })
            .collect();
        for (i, v) in self.vertices.iter().enumerate() {
            if let Some(parent) = v.parent {
                data.add_edge(indices[parent], indices[i]);
            }
        }
    }
}
