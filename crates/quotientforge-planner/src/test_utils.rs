//! Scripted level planners and log capture for orchestrator tests.

use std::io;
use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::Rng;

use quotientforge_core::{
    PathGeometric, PlannerData, PlannerDataVertex, ProblemDefinition, QuotientForgeError, Result,
    SpacePtr,
};

use crate::level::{LevelContext, LevelPlanner};

/// Behaviour of one scripted level.
#[derive(Debug, Clone, Copy)]
pub struct Script {
    /// Importance reported while unsolved.
    pub importance: f64,
    /// Solves on this many grows; `None` never solves.
    pub solve_after: Option<usize>,
    /// Makes `setup` fail.
    pub fail_setup: bool,
}

impl Script {
    pub fn solves_after(grows: usize) -> Self {
        Self {
            importance: 1.0,
            solve_after: Some(grows),
            fail_setup: false,
        }
    }

    pub fn never_solves() -> Self {
        Self {
            importance: 1.0,
            solve_after: None,
            fail_setup: false,
        }
    }

    pub fn with_importance(mut self, importance: f64) -> Self {
        self.importance = importance;
        self
    }

    pub fn failing_setup(mut self) -> Self {
        self.fail_setup = true;
        self
    }
}

/// A planner whose progress is a counter.
#[derive(Debug)]
pub struct ScriptedPlanner {
    level: usize,
    space: SpacePtr,
    script: Script,
    problem: Option<ProblemDefinition>,
    grows: usize,
    /// Whether each grow saw a solved parent, in grow order.
    pub parent_solved_on_grow: Vec<bool>,
    /// Random draws consumed, one per grow.
    pub draws: Vec<u64>,
    pub setup_calls: usize,
    pub clear_calls: usize,
}

impl ScriptedPlanner {
    pub fn new(context: LevelContext, script: Script) -> Self {
        Self {
            level: context.level,
            space: context.space,
            script,
            problem: None,
            grows: 0,
            parent_solved_on_grow: Vec::new(),
            draws: Vec::new(),
            setup_calls: 0,
            clear_calls: 0,
        }
    }

    pub fn grows(&self) -> usize {
        self.grows
    }
}

/// Factory closure assigning `scripts[level]` to each level.
pub fn scripted(scripts: Vec<Script>) -> impl Fn(LevelContext) -> ScriptedPlanner + Send {
    move |context: LevelContext| {
        let script = scripts[context.level];
        ScriptedPlanner::new(context, script)
    }
}

impl LevelPlanner for ScriptedPlanner {
    fn name(&self) -> &'static str {
        "Scripted"
    }

    fn level(&self) -> usize {
        self.level
    }

    fn space(&self) -> &SpacePtr {
        &self.space
    }

    fn set_problem_definition(&mut self, problem: ProblemDefinition) {
        self.problem = Some(problem);
    }

    fn problem_definition(&self) -> Option<&ProblemDefinition> {
        self.problem.as_ref()
    }

    fn setup(&mut self) -> Result<()> {
        self.setup_calls += 1;
        if self.script.fail_setup {
            return Err(QuotientForgeError::InvalidState(format!(
                "scripted failure on level {}",
                self.level
            )));
        }
        self.clear();
        Ok(())
    }

    fn clear(&mut self) {
        self.clear_calls += 1;
        self.grows = 0;
        self.parent_solved_on_grow.clear();
        self.draws.clear();
    }

    fn grow(&mut self, parent: Option<&Self>, rng: &mut StdRng) {
        self.parent_solved_on_grow
            .push(parent.is_some_and(|p| p.is_solved()));
        self.draws.push(rng.random());
        self.grows += 1;
    }

    fn importance(&self) -> f64 {
        self.script.importance
    }

    fn is_solved(&self) -> bool {
        self.script.solve_after.is_some_and(|n| self.grows >= n)
    }

    fn solution_path(&self) -> Option<PathGeometric> {
        if !self.is_solved() {
            return None;
        }
        let problem = self.problem.as_ref()?;
        Some(PathGeometric::new(vec![
            problem.start().clone(),
            problem.goal().clone(),
        ]))
    }

    fn total_samples(&self) -> usize {
        self.grows
    }

    fn feasible_samples(&self) -> usize {
        self.grows
    }

    fn planner_data(&self, data: &mut PlannerData) {
        if let Some(problem) = &self.problem {
            data.add_vertex(PlannerDataVertex {
                level: self.level,
                state: problem.start().clone(),
                is_start: true,
                is_goal: false,
            });
        }
    }
}

#[derive(Clone)]
struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

impl io::Write for CaptureWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Runs `f` with a thread-local subscriber and returns everything it logged.
pub fn capture_logs(f: impl FnOnce()) -> String {
    let buffer = Arc::new(Mutex::new(Vec::new()));
    let writer = CaptureWriter(buffer.clone());
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .finish();
    tracing::subscriber::with_default(subscriber, f);
    let bytes = buffer.lock().unwrap();
    String::from_utf8_lossy(&bytes).into_owned()
}
