//! Tests for planner configuration and the parameter registry.

use std::collections::BTreeMap;
use std::time::Duration;

use super::*;

#[test]
fn test_toml_parsing() {
    let toml = r#"
        random_seed = 42
        stop_level = 1

        [termination]
        seconds_spent_limit = 3
        millis_spent_limit = 500
        iteration_limit = 10000

        [level_planner]
        range = 0.25
        goal_bias = 0.1
    "#;

    let config = PlannerConfig::from_toml_str(toml).unwrap();
    assert_eq!(config.random_seed, Some(42));
    assert_eq!(config.stop_level, Some(1));
    assert_eq!(config.time_limit(), Some(Duration::from_millis(3500)));
    assert_eq!(config.termination.unwrap().iteration_limit, Some(10000));
    assert_eq!(config.level_planner.range, Some(0.25));
    assert_eq!(config.level_planner.goal_bias, 0.1);
}

#[test]
fn test_yaml_parsing() {
    let yaml = r#"
        random_seed: 42
        termination:
          iteration_limit: 500
        level_planner:
          goal_threshold: 0.02
    "#;

    let config = PlannerConfig::from_yaml_str(yaml).unwrap();
    assert_eq!(config.random_seed, Some(42));
    assert_eq!(config.time_limit(), None);
    assert_eq!(config.level_planner.goal_threshold, Some(0.02));
    assert_eq!(
        config.level_planner.goal_bias,
        LevelPlannerConfig::DEFAULT_GOAL_BIAS
    );
}

#[test]
fn test_invalid_goal_bias_rejected() {
    let err = PlannerConfig::from_toml_str(
        r#"
        [level_planner]
        goal_bias = 1.5
    "#,
    )
    .unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_negative_range_rejected() {
    let err = PlannerConfig::from_yaml_str("level_planner:\n  range: -1.0\n").unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
}

#[test]
fn test_missing_file_falls_back_to_default() {
    let config = PlannerConfig::load("does/not/exist.toml").unwrap_or_default();
    assert_eq!(config, PlannerConfig::default());
}

#[test]
fn test_builder() {
    let config = PlannerConfig::new()
        .with_random_seed(123)
        .with_termination_seconds(60)
        .with_iteration_limit(1000)
        .with_stop_level(2);

    assert_eq!(config.random_seed, Some(123));
    assert_eq!(config.stop_level, Some(2));
    let termination = config.termination.unwrap();
    assert_eq!(termination.seconds_spent_limit, Some(60));
    assert_eq!(termination.iteration_limit, Some(1000));
    assert!(!termination.is_unbounded());
    assert!(TerminationConfig::default().is_unbounded());
}

#[test]
fn test_param_round_trip() {
    let mut params = ParamSet::new();
    params.declare("stop_level", 3usize);
    params.declare("range", 0.5f64);
    params.declare("verbose", false);
    params.declare("offset", -2i64);
    params.declare("label", String::from("qrrt"));

    for (name, value) in [
        ("stop_level", "7"),
        ("range", "0.125"),
        ("verbose", "true"),
        ("offset", "-12"),
        ("label", "tree"),
    ] {
        assert!(params.set_param(name, value), "{name}");
        assert_eq!(params.params()[name], value);
    }
}

#[test]
fn test_param_canonical_formatting() {
    let mut params = ParamSet::new();
    params.declare("verbose", false);
    params.declare("range", 0.5f64);

    assert!(params.set_param("verbose", "1"));
    assert_eq!(params.value("verbose").as_deref(), Some("true"));
    assert!(params.set_param("range", " 2.0 "));
    assert_eq!(params.value("range").as_deref(), Some("2"));
}

#[test]
fn test_param_parse_failure_keeps_value() {
    let mut params = ParamSet::new();
    params.declare("stop_level", 3u64);

    assert!(!params.set_param("stop_level", "-1"));
    assert!(!params.set_param("stop_level", "three"));
    assert_eq!(params.get::<u64>("stop_level"), Some(3));

    let err = params.try_set_param("stop_level", "x").unwrap_err();
    assert!(matches!(err, ParamError::Parse { kind: ParamKind::UInt, .. }));
}

#[test]
fn test_unknown_param() {
    let mut params = ParamSet::new();
    assert!(!params.set_param("missing", "1"));
    assert_eq!(
        params.try_set_param("missing", "1"),
        Err(ParamError::Unknown("missing".to_string()))
    );
}

#[test]
fn test_typed_set_checks_kind() {
    let mut params = ParamSet::new();
    params.declare("range", 0.5f64);

    assert!(params.set("range", 0.75f64).is_ok());
    assert_eq!(params.get::<f64>("range"), Some(0.75));
    assert!(matches!(
        params.set("range", 1u64),
        Err(ParamError::TypeMismatch { .. })
    ));
    assert_eq!(params.get::<u64>("range"), None);
}

#[test]
fn test_names_and_values_align() {
    let mut params = ParamSet::new();
    params.declare("b", 2u64);
    params.declare("a", 1u64);

    assert_eq!(params.param_names(), vec!["a", "b"]);
    assert_eq!(params.param_values(), vec!["1", "2"]);
    assert_eq!(params.len(), 2);
}

#[test]
fn test_set_params_reports_any_failure() {
    let mut params = ParamSet::new();
    params.declare("a", 1u64);
    params.declare("b", 2u64);

    let mut kv = BTreeMap::new();
    kv.insert("a".to_string(), "5".to_string());
    kv.insert("b".to_string(), "bad".to_string());

    assert!(!params.set_params(&kv));
    assert_eq!(params.get::<u64>("a"), Some(5));
    assert_eq!(params.get::<u64>("b"), Some(2));
}

#[test]
fn test_include_with_prefix_and_remove() {
    let mut level = ParamSet::new();
    level.declare("range", 0.2f64);

    let mut params = ParamSet::new();
    params.declare("stop_level", 2u64);
    params.include(&level, "level.");

    assert!(params.contains("level.range"));
    assert!(params.remove("level.range"));
    assert!(!params.remove("level.range"));
    assert_eq!(params.len(), 1);

    params.clear();
    assert!(params.is_empty());
}

#[test]
fn test_display_lists_params() {
    let mut params = ParamSet::new();
    params.declare("stop_level", 2u64);
    assert_eq!(format!("{params}"), "stop_level = 2\n");
}
