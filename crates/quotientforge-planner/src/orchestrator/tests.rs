//! Tests for the multi-level orchestrator.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use quotientforge_core::{
    PlannerData, PlannerStatus, ProblemDefinition, QuotientForgeError, SpaceInformation,
};
use quotientforge_test::worlds::{blocked_world, open_world, wall_world};

use super::*;
use crate::event::{OrchestratorEvent, RecordingEventListener};
use crate::qrrt::QuotientRrt;
use crate::termination::{IterationCountTermination, NoTermination};
use crate::test_utils::{capture_logs, scripted, Script, ScriptedPlanner};

type ScriptedFactory = Box<dyn Fn(LevelContext) -> ScriptedPlanner + Send>;
type ScriptedOrchestrator = Orchestrator<ScriptedPlanner, ScriptedFactory>;

fn orchestrator(scripts: Vec<Script>) -> ScriptedOrchestrator {
    let world = open_world(scripts.len());
    let factory: ScriptedFactory = Box::new(scripted(scripts));
    let mut orchestrator = Orchestrator::new(world.spaces, factory).with_seed(11);
    orchestrator.set_problem_definition(&world.problem).unwrap();
    orchestrator
}

fn recorded(scripts: Vec<Script>) -> (ScriptedOrchestrator, Arc<RecordingEventListener>) {
    let recorder = Arc::new(RecordingEventListener::new());
    let orchestrator = orchestrator(scripts).with_listener(recorder.clone());
    (orchestrator, recorder)
}

fn grows(orchestrator: &ScriptedOrchestrator) -> Vec<usize> {
    (0..orchestrator.levels())
        .map(|level| orchestrator.level_planner(level).map_or(0, |p| p.grows()))
        .collect()
}

#[test]
fn test_setup_activates_only_level_zero() {
    let mut orchestrator = orchestrator(vec![Script::never_solves(); 3]);
    orchestrator.setup().unwrap();

    assert!(orchestrator.is_setup());
    assert_eq!(orchestrator.frontier(), 0);
    assert_eq!(orchestrator.active_levels(), vec![0]);
    assert_eq!(orchestrator.solutions().len(), 3);
    assert!(orchestrator.solutions().iter().all(Option::is_none));
    assert_eq!(orchestrator.dimensions_per_level(), vec![1, 2, 3]);
}

#[test]
fn test_single_level_solved_on_first_grow() {
    let (mut orchestrator, recorder) = recorded(vec![Script::solves_after(1)]);
    orchestrator.setup().unwrap();
    assert_eq!(orchestrator.levels(), 1);

    let status = orchestrator.solve(&NoTermination);

    assert_eq!(status, PlannerStatus::ExactSolution);
    assert_eq!(recorder.grown_levels(), vec![0]);
    assert_eq!(orchestrator.last_stats().unwrap().iterations, 1);
    assert!(orchestrator.solution(0).is_some());
}

#[test]
fn test_setup_without_problems_fails() {
    let world = open_world(3);
    let mut orchestrator = Orchestrator::new(world.spaces, scripted(vec![Script::never_solves(); 3]));

    let err = orchestrator.setup().unwrap_err();
    assert_eq!(
        err,
        QuotientForgeError::LevelCountMismatch {
            expected: 3,
            actual: 0
        }
    );
    assert!(!orchestrator.is_setup());
    assert_eq!(orchestrator.solve(&NoTermination), PlannerStatus::NotSetUp);
}

#[test]
fn test_no_levels_is_invalid_configuration() {
    let mut orchestrator = Orchestrator::new(Vec::new(), scripted(Vec::new()));

    assert!(orchestrator.setup().unwrap_err().is_configuration());
    assert!(orchestrator
        .set_problem_definition(&ProblemDefinition::new([0.1], [0.9]))
        .is_err());
    assert_eq!(
        orchestrator.solve(&NoTermination),
        PlannerStatus::InvalidConfiguration
    );
}

#[test]
fn test_level_setup_failure_keeps_orchestrator_unset() {
    let mut orchestrator = orchestrator(vec![
        Script::solves_after(1),
        Script::solves_after(1).failing_setup(),
    ]);

    assert!(matches!(
        orchestrator.setup(),
        Err(QuotientForgeError::InvalidState(_))
    ));
    assert!(!orchestrator.is_setup());
    assert!(orchestrator.level_planner(0).is_none());
    assert!(orchestrator.active_levels().is_empty());
}

#[test]
fn test_solve_before_setup() {
    let mut orchestrator = orchestrator(vec![Script::solves_after(1); 2]);
    assert_eq!(orchestrator.solve(&NoTermination), PlannerStatus::NotSetUp);
    assert!(orchestrator.last_stats().is_none());
}

#[test]
fn test_all_levels_solve_in_order() {
    let (mut orchestrator, recorder) = recorded(vec![Script::solves_after(2); 3]);
    orchestrator.setup().unwrap();

    let status = orchestrator.solve(&NoTermination);

    assert_eq!(status, PlannerStatus::ExactSolution);
    assert_eq!(orchestrator.frontier(), 3);
    assert!(orchestrator.active_levels().is_empty());
    assert!(orchestrator.found_level_solution());
    assert_eq!(recorder.grown_levels(), vec![0, 0, 1, 1, 2, 2]);
    assert_eq!(recorder.activated_levels(), vec![0, 1, 2]);
    assert_eq!(recorder.frontier_advances(), vec![(0, 1), (1, 2), (2, 3)]);

    let path = orchestrator.final_solution().unwrap();
    assert_eq!(path.state_count(), 2);
    assert_eq!(path.first().unwrap().dimension(), 3);
    assert!(orchestrator.solutions().iter().all(Option::is_some));
}

#[test]
fn test_higher_levels_only_grow_over_solved_parents() {
    let mut orchestrator = orchestrator(vec![
        Script::solves_after(3),
        Script::solves_after(2),
        Script::solves_after(4),
    ]);
    orchestrator.setup().unwrap();
    orchestrator.solve(&NoTermination);

    let level0 = orchestrator.level_planner(0).unwrap();
    assert!(level0.parent_solved_on_grow.iter().all(|solved| !solved));
    for level in 1..3 {
        let planner = orchestrator.level_planner(level).unwrap();
        assert!(!planner.parent_solved_on_grow.is_empty());
        assert!(planner.parent_solved_on_grow.iter().all(|solved| *solved));
    }
    assert_eq!(grows(&orchestrator), vec![3, 2, 4]);
}

#[test]
fn test_frontier_is_monotonic() {
    let (mut orchestrator, recorder) = recorded(vec![Script::solves_after(5); 4]);
    orchestrator.setup().unwrap();
    orchestrator.solve(&IterationCountTermination::new(7));
    orchestrator.solve(&IterationCountTermination::new(7));
    orchestrator.solve(&NoTermination);

    let advances = recorder.frontier_advances();
    assert_eq!(advances.len(), 4);
    for (from, to) in &advances {
        assert_eq!(*to, from + 1);
    }
    assert!(advances.windows(2).all(|w| w[0].1 == w[1].0));
}

#[test]
fn test_stop_level_withholds_higher_levels() {
    let mut orchestrator = orchestrator(vec![Script::solves_after(1); 3]);
    orchestrator.set_stop_level(1);
    orchestrator.setup().unwrap();

    let status = orchestrator.solve(&NoTermination);

    assert_eq!(status, PlannerStatus::StopLevelReached { level: 1 });
    assert_eq!(orchestrator.frontier(), 1);
    assert!(orchestrator.solution(0).is_some());
    assert!(orchestrator.solution(1).is_none());
    assert!(!orchestrator.is_active(2));
    assert_eq!(grows(&orchestrator), vec![1, 0, 0]);
}

#[test]
fn test_stop_level_above_level_count_acts_as_level_count() {
    let mut orchestrator = orchestrator(vec![Script::solves_after(1); 2]);
    orchestrator.set_stop_level(10);
    assert_eq!(orchestrator.stop_level(), 2);

    orchestrator.setup().unwrap();
    assert_eq!(orchestrator.solve(&NoTermination), PlannerStatus::ExactSolution);
}

#[test]
fn test_stop_level_zero_grows_nothing() {
    let mut orchestrator = orchestrator(vec![Script::solves_after(1); 2]);
    orchestrator.set_stop_level(0);
    orchestrator.setup().unwrap();

    assert_eq!(
        orchestrator.solve(&NoTermination),
        PlannerStatus::StopLevelReached { level: 0 }
    );
    assert_eq!(grows(&orchestrator), vec![0, 0]);
}

#[test]
fn test_termination_keeps_partial_solutions() {
    let mut orchestrator = orchestrator(vec![
        Script::solves_after(1),
        Script::never_solves(),
        Script::solves_after(1),
    ]);
    orchestrator.setup().unwrap();

    let status = orchestrator.solve(&IterationCountTermination::new(10));

    assert_eq!(status, PlannerStatus::Timeout);
    assert_eq!(orchestrator.frontier(), 1);
    assert!(orchestrator.solution(0).is_some());
    assert!(orchestrator.final_solution().is_none());
    assert_eq!(orchestrator.active_levels(), vec![1]);
    assert_eq!(grows(&orchestrator), vec![1, 9, 0]);

    let stats = orchestrator.last_stats().unwrap();
    assert_eq!(stats.iterations, 10);
    assert_eq!(stats.grows_per_level, vec![1, 9, 0]);
    assert_eq!(stats.levels_solved(), 1);
    assert_eq!(stats.status, Some(PlannerStatus::Timeout));
}

#[test]
fn test_solve_resumes_from_current_frontier() {
    let mut orchestrator = orchestrator(vec![Script::solves_after(3); 2]);
    orchestrator.setup().unwrap();

    assert_eq!(
        orchestrator.solve(&IterationCountTermination::new(4)),
        PlannerStatus::Timeout
    );
    assert_eq!(orchestrator.frontier(), 1);

    assert_eq!(orchestrator.solve(&NoTermination), PlannerStatus::ExactSolution);
    assert_eq!(grows(&orchestrator), vec![3, 3]);
    let stats = orchestrator.last_stats().unwrap();
    assert_eq!(stats.starting_frontier, 1);
    assert_eq!(stats.ending_frontier, 2);
    assert_eq!(stats.iterations, 2);
}

#[test]
fn test_solve_after_full_solution_returns_immediately() {
    let mut orchestrator = orchestrator(vec![Script::solves_after(1); 2]);
    orchestrator.setup().unwrap();
    orchestrator.solve(&NoTermination);

    assert_eq!(orchestrator.solve(&NoTermination), PlannerStatus::ExactSolution);
    assert_eq!(orchestrator.last_stats().unwrap().iterations, 0);
}

#[test]
fn test_clear_restores_fresh_state() {
    let mut orchestrator = orchestrator(vec![Script::solves_after(2); 3]);
    orchestrator.setup().unwrap();
    orchestrator.solve(&IterationCountTermination::new(3));
    let clears_before = orchestrator.level_planner(1).unwrap().clear_calls;

    orchestrator.clear();

    assert!(orchestrator.is_setup());
    assert_eq!(orchestrator.frontier(), 0);
    assert_eq!(orchestrator.active_levels(), vec![0]);
    assert!(orchestrator.solutions().iter().all(Option::is_none));
    assert!(orchestrator.last_stats().is_none());
    assert_eq!(grows(&orchestrator), vec![0, 0, 0]);
    assert_eq!(
        orchestrator.level_planner(1).unwrap().clear_calls,
        clears_before + 1
    );
}

#[test]
fn test_clear_reproduces_schedule() {
    let (mut orchestrator, recorder) = recorded(vec![
        Script::solves_after(2),
        Script::solves_after(3),
        Script::solves_after(1),
    ]);
    orchestrator.setup().unwrap();
    recorder.clear();

    orchestrator.solve(&NoTermination);
    let first_events = recorder.events();
    let first_draws: Vec<Vec<u64>> = (0..3)
        .map(|l| orchestrator.level_planner(l).unwrap().draws.clone())
        .collect();

    orchestrator.clear();
    recorder.clear();
    orchestrator.solve(&NoTermination);

    assert_eq!(recorder.events(), first_events);
    let second_draws: Vec<Vec<u64>> = (0..3)
        .map(|l| orchestrator.level_planner(l).unwrap().draws.clone())
        .collect();
    assert_eq!(first_draws, second_draws);
}

#[test]
fn test_clear_is_idempotent() {
    let mut orchestrator = orchestrator(vec![Script::solves_after(1); 2]);
    orchestrator.setup().unwrap();
    orchestrator.solve(&NoTermination);

    orchestrator.clear();
    orchestrator.clear();

    assert_eq!(orchestrator.active_levels(), vec![0]);
    assert_eq!(orchestrator.solve(&NoTermination), PlannerStatus::ExactSolution);
}

#[test]
fn test_planner_data_does_not_disturb_search() {
    let mut orchestrator = orchestrator(vec![Script::solves_after(2); 3]);
    orchestrator.setup().unwrap();
    orchestrator.solve(&IterationCountTermination::new(3));

    let frontier = orchestrator.frontier();
    let active = orchestrator.active_levels();
    let solutions = orchestrator.solutions().to_vec();

    let mut data = PlannerData::new();
    orchestrator.planner_data(&mut data);

    assert_eq!(data.vertex_count(), 3);
    assert_eq!(data.vertex_count_on_level(2), 1);
    assert_eq!(orchestrator.frontier(), frontier);
    assert_eq!(orchestrator.active_levels(), active);
    assert_eq!(orchestrator.solutions(), solutions.as_slice());
}

#[test]
fn test_params_round_trip() {
    let mut orchestrator = orchestrator(vec![Script::solves_after(1); 3]);

    assert_eq!(orchestrator.param_names(), vec!["stop_level".to_string()]);
    assert_eq!(orchestrator.param_values(), vec!["3".to_string()]);

    assert!(orchestrator.set_param("stop_level", "2"));
    assert_eq!(orchestrator.stop_level(), 2);
    assert_eq!(orchestrator.params()["stop_level"], "2");

    assert!(!orchestrator.set_param("stop_level", "two"));
    assert!(!orchestrator.set_param("range", "0.5"));
    assert_eq!(orchestrator.stop_level(), 2);
}

#[test]
fn test_stop_level_param_behaves_like_setter() {
    let mut by_param = orchestrator(vec![Script::solves_after(1); 2]);
    let logs = capture_logs(|| assert!(by_param.set_param("stop_level", "99")));

    assert!(logs.contains("stop_level_clamped"));
    assert_eq!(by_param.stop_level(), 2);

    let mut by_setter = orchestrator(vec![Script::solves_after(1); 2]);
    by_setter.set_stop_level(99);
    assert_eq!(by_param.params(), by_setter.params());

    let logs = capture_logs(|| assert!(by_param.set_param("stop_level", "1")));
    assert!(!logs.contains("stop_level_clamped"));
    assert_eq!(by_param.stop_level(), 1);
}

#[test]
fn test_set_problem_definitions_rejects_wrong_count() {
    let world = open_world(3);
    let mut orchestrator = orchestrator(vec![Script::solves_after(1); 3]);
    let before = orchestrator.problem_definitions().to_vec();

    let err = orchestrator
        .set_problem_definitions(world.level_problems()[..2].to_vec())
        .unwrap_err();

    assert_eq!(
        err,
        QuotientForgeError::LevelCountMismatch {
            expected: 3,
            actual: 2
        }
    );
    assert_eq!(orchestrator.problem_definitions(), before.as_slice());
}

#[test]
fn test_set_problem_definition_rejects_low_dimensional_problem() {
    let mut orchestrator = orchestrator(vec![Script::solves_after(1); 3]);
    orchestrator.setup().unwrap();
    orchestrator.solve(&IterationCountTermination::new(1));

    let result = orchestrator.set_problem_definition(&ProblemDefinition::new([0.2, 0.2], [0.8, 0.8]));

    assert!(matches!(result, Err(QuotientForgeError::Projection(_))));
    assert_eq!(orchestrator.problem_definitions()[2].dimension(), 3);
    assert_eq!(orchestrator.frontier(), 1);
    assert!(orchestrator.solution(0).is_some());
}

#[test]
fn test_set_problem_definition_rebuilds_set_up_orchestrator() {
    let mut orchestrator = orchestrator(vec![Script::solves_after(1); 2]);
    orchestrator.setup().unwrap();
    orchestrator.solve(&NoTermination);

    orchestrator
        .set_problem_definition(&ProblemDefinition::new([0.3, 0.3], [0.7, 0.2]))
        .unwrap();

    assert!(orchestrator.is_setup());
    assert_eq!(orchestrator.frontier(), 0);
    assert!(orchestrator.final_solution().is_none());
    assert_eq!(grows(&orchestrator), vec![0, 0]);
    let level1 = orchestrator.level_planner(1).unwrap();
    assert_eq!(level1.problem_definition().unwrap().start().values(), &[0.3, 0.3]);
}

#[test]
fn test_rejected_problem_keeps_solved_search() {
    let world = wall_world(2);
    let mut orchestrator = Orchestrator::new(world.spaces.clone(), QuotientRrt::new).with_seed(5);
    orchestrator.set_problem_definition(&world.problem).unwrap();
    orchestrator.setup().unwrap();
    assert_eq!(
        orchestrator.solve(&IterationCountTermination::new(50_000)),
        PlannerStatus::ExactSolution
    );
    let problems = orchestrator.problem_definitions().to_vec();
    let solutions = orchestrator.solutions().to_vec();
    let nodes = orchestrator.nodes();

    // Start lies inside the level-1 wall but projects to a free level-0 state.
    let inside_wall = ProblemDefinition::new([0.5, 0.3], [0.9, 0.1]);
    let result = orchestrator.set_problem_definition(&inside_wall);

    assert!(matches!(result, Err(QuotientForgeError::Config(_))));
    assert!(orchestrator.is_setup());
    assert_eq!(orchestrator.frontier(), 2);
    assert_eq!(orchestrator.problem_definitions(), problems.as_slice());
    assert_eq!(orchestrator.solutions(), solutions.as_slice());
    assert_eq!(orchestrator.nodes(), nodes);
    assert_eq!(orchestrator.solve(&NoTermination), PlannerStatus::ExactSolution);
}

#[test]
fn test_rejected_problem_before_setup_leaves_nothing_built() {
    let world = wall_world(2);
    let mut orchestrator = Orchestrator::new(world.spaces.clone(), QuotientRrt::new);
    orchestrator
        .set_problem_definition(&ProblemDefinition::new([0.5, 0.3], [0.9, 0.1]))
        .unwrap();

    assert!(orchestrator.setup().is_err());
    assert!(!orchestrator.is_setup());
    assert_eq!(orchestrator.frontier(), 0);
    assert!(orchestrator.solutions().is_empty());
    assert!(orchestrator.active_levels().is_empty());
    assert_eq!(orchestrator.solve(&NoTermination), PlannerStatus::NotSetUp);
}

#[test]
fn test_only_frontier_level_is_ever_active() {
    let mut orchestrator = orchestrator(vec![
        Script::solves_after(2),
        Script::solves_after(3),
        Script::solves_after(1),
    ]);
    orchestrator.setup().unwrap();

    let mut statuses = Vec::new();
    while statuses.len() < 10 {
        let status = orchestrator.solve(&IterationCountTermination::new(1));
        statuses.push(status);

        let frontier = orchestrator.frontier();
        if frontier < orchestrator.levels() {
            assert_eq!(orchestrator.active_levels(), vec![frontier]);
        } else {
            assert!(orchestrator.active_levels().is_empty());
        }
        if status.is_success() {
            break;
        }
    }

    assert_eq!(statuses.len(), 6);
    assert_eq!(statuses.last(), Some(&PlannerStatus::ExactSolution));
    assert!(!statuses.contains(&PlannerStatus::Exhausted));
}

#[derive(Debug)]
struct StopAfterGrows {
    flag: Arc<AtomicBool>,
    grows: AtomicUsize,
    limit: usize,
}

impl OrchestratorEventListener for StopAfterGrows {
    fn on_level_grown(&self, _level: usize, _importance: f64) {
        if self.grows.fetch_add(1, Ordering::SeqCst) + 1 >= self.limit {
            self.flag.store(true, Ordering::SeqCst);
        }
    }
}

#[test]
fn test_terminate_early_from_listener() {
    let orchestrator = orchestrator(vec![Script::never_solves(); 2]);
    let flag = orchestrator.terminate_early_handle();
    let mut orchestrator = orchestrator.with_listener(Arc::new(StopAfterGrows {
        flag,
        grows: AtomicUsize::new(0),
        limit: 3,
    }));
    orchestrator.setup().unwrap();

    assert!(!orchestrator.terminate_early());
    assert_eq!(orchestrator.solve(&NoTermination), PlannerStatus::Timeout);
    assert_eq!(orchestrator.last_stats().unwrap().iterations, 3);
    assert!(!orchestrator.is_solving());
}

#[test]
fn test_listener_sees_start_and_end() {
    let (mut orchestrator, recorder) = recorded(vec![Script::solves_after(1)]);
    orchestrator.setup().unwrap();
    recorder.clear();

    orchestrator.solve(&NoTermination);

    let events = recorder.events();
    assert_eq!(events.first(), Some(&OrchestratorEvent::SolvingStarted { frontier: 0 }));
    assert_eq!(
        events.last(),
        Some(&OrchestratorEvent::SolvingEnded {
            status: PlannerStatus::ExactSolution
        })
    );
}

#[test]
fn test_with_config_applies_seed_and_stop_level() {
    let config = PlannerConfig::new().with_random_seed(5).with_stop_level(1);
    let orchestrator = orchestrator(vec![Script::solves_after(1); 3]).with_config(&config);

    assert_eq!(orchestrator.seed(), 5);
    assert_eq!(orchestrator.stop_level(), 1);
}

#[test]
fn test_qrrt_solves_wall_world() {
    let world = wall_world(3);
    let mut orchestrator = Orchestrator::new(world.spaces.clone(), QuotientRrt::new).with_seed(7);
    orchestrator.set_problem_definition(&world.problem).unwrap();
    orchestrator.setup().unwrap();

    let status = orchestrator.solve(&IterationCountTermination::new(50_000));

    assert_eq!(status, PlannerStatus::ExactSolution);
    let path = orchestrator.final_solution().unwrap();
    assert_eq!(path.first(), Some(world.problem.start()));
    assert!(world.problem.is_goal_satisfied(path.last().unwrap()));
    for state in path.states() {
        assert!(world.spaces[2].is_valid(state));
    }

    let nodes = orchestrator.nodes();
    let feasible = orchestrator.feasible_nodes();
    assert_eq!(nodes.len(), 3);
    assert!(nodes.iter().zip(&feasible).all(|(n, f)| f <= n));

    let mut data = PlannerData::new();
    orchestrator.planner_data(&mut data);
    for level in 0..3 {
        assert!(data.vertex_count_on_level(level) > 0);
    }
}

#[test]
fn test_qrrt_blocked_world_times_out_with_coarse_solution() {
    let world = blocked_world(2);
    let mut orchestrator = Orchestrator::new(world.spaces.clone(), QuotientRrt::new).with_seed(3);
    orchestrator.set_problem_definition(&world.problem).unwrap();
    orchestrator.setup().unwrap();

    let status = orchestrator.solve(&IterationCountTermination::new(2_000));

    assert_eq!(status, PlannerStatus::Timeout);
    assert_eq!(orchestrator.frontier(), 1);
    assert!(orchestrator.solution(0).is_some());
    assert_eq!(orchestrator.active_levels(), vec![1]);
}
