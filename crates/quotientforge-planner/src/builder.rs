//! Wiring between configuration types and planner components.

use std::time::Duration;

use quotientforge_config::{LevelPlannerConfig, PlannerConfig, TerminationConfig};
use quotientforge_core::SpacePtr;

use crate::level::{LevelContext, LevelPlannerFactory};
use crate::orchestrator::Orchestrator;
use crate::qrrt::QuotientRrt;
use crate::scope::SolveScope;
use crate::termination::{IterationCountTermination, Termination, TimeTermination};

/// Termination assembled from a [`TerminationConfig`].
///
/// Stops as soon as any configured limit is hit. With no limits it never
/// stops.
#[derive(Debug, Clone, Default)]
pub struct ConfiguredTermination {
    time: Option<TimeTermination>,
    iterations: Option<IterationCountTermination>,
}

impl ConfiguredTermination {
    pub fn time_limit(&self) -> Option<Duration> {
        self.time.as_ref().map(TimeTermination::limit)
    }

    pub fn iteration_limit(&self) -> Option<u64> {
        self.iterations.as_ref().map(IterationCountTermination::limit)
    }

    pub fn is_unbounded(&self) -> bool {
        self.time.is_none() && self.iterations.is_none()
    }
}

impl Termination for ConfiguredTermination {
    fn is_terminated(&self, scope: &SolveScope) -> bool {
        self.time.is_terminated(scope) || self.iterations.is_terminated(scope)
    }
}

/// Builder for constructing terminations from configuration.
pub struct TerminationBuilder;

impl TerminationBuilder {
    pub fn build(config: &TerminationConfig) -> ConfiguredTermination {
        ConfiguredTermination {
            time: config.time_limit().map(TimeTermination::new),
            iterations: config.iteration_limit.map(IterationCountTermination::new),
        }
    }

    /// Builds from the termination section of a planner config, if present.
    pub fn from_planner_config(config: &PlannerConfig) -> ConfiguredTermination {
        config
            .termination
            .as_ref()
            .map(Self::build)
            .unwrap_or_default()
    }
}

/// Creates one [`QuotientRrt`] per level with shared settings.
#[derive(Debug, Clone, Default)]
pub struct QuotientRrtFactory {
    config: LevelPlannerConfig,
}

impl QuotientRrtFactory {
    pub fn new(config: LevelPlannerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LevelPlannerConfig {
        &self.config
    }
}

impl LevelPlannerFactory<QuotientRrt> for QuotientRrtFactory {
    fn create(&self, context: LevelContext) -> QuotientRrt {
        QuotientRrt::new(context).with_config(&self.config)
    }
}

/// Orchestrator running a quotient-space RRT on every level.
pub type QrrtOrchestrator = Orchestrator<QuotientRrt, QuotientRrtFactory>;

/// Builds a [`QrrtOrchestrator`] over `spaces` from a planner config.
///
/// The termination section is not part of the orchestrator; build it with
/// [`TerminationBuilder`] and pass it to `solve`.
pub fn qrrt_orchestrator(spaces: Vec<SpacePtr>, config: &PlannerConfig) -> QrrtOrchestrator {
    Orchestrator::new(spaces, QuotientRrtFactory::new(config.level_planner.clone()))
        .with_config(config)
}
