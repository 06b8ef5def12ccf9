//! Configuration system for QuotientForge.
//!
//! Two layers live here:
//!
//! - [`ParamSet`]: a registry of named, typed tunables that can be set and
//!   read back as strings, so planners can be configured generically.
//! - [`PlannerConfig`]: a serde-backed configuration loaded from TOML or YAML
//!   files to control termination, stop level and level-planner settings
//!   without code changes.
//!
//! # Examples
//!
//! ```
//! use quotientforge_config::PlannerConfig;
//! use std::time::Duration;
//!
//! let config = PlannerConfig::from_toml_str(r#"
//!     random_seed = 7
//!     stop_level = 2
//!
//!     [termination]
//!     seconds_spent_limit = 10
//!
//!     [level_planner]
//!     range = 0.2
//!     goal_bias = 0.1
//! "#).unwrap();
//!
//! assert_eq!(config.time_limit(), Some(Duration::from_secs(10)));
//! assert_eq!(config.stop_level, Some(2));
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use quotientforge_config::PlannerConfig;
//!
//! let config = PlannerConfig::load("planner.toml").unwrap_or_default();
//! ```

mod params;

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use params::{ParamError, ParamKind, ParamSet, ParamValue, ParamValueType};

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Main planner configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PlannerConfig {
    /// Random seed for reproducible schedules.
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// Level at which solving stops early, if any.
    #[serde(default)]
    pub stop_level: Option<usize>,

    /// Termination configuration.
    #[serde(default)]
    pub termination: Option<TerminationConfig>,

    /// Settings shared by every level planner.
    #[serde(default)]
    pub level_planner: LevelPlannerConfig,
}

impl PlannerConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist, contains invalid TOML or fails
    /// validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks value ranges that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.level_planner.validate()
    }

    /// Sets the termination time limit.
    pub fn with_termination_seconds(mut self, seconds: u64) -> Self {
        self.termination = Some(TerminationConfig {
            seconds_spent_limit: Some(seconds),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Sets the termination iteration limit.
    pub fn with_iteration_limit(mut self, iterations: u64) -> Self {
        self.termination = Some(TerminationConfig {
            iteration_limit: Some(iterations),
            ..self.termination.unwrap_or_default()
        });
        self
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Sets the stop level.
    pub fn with_stop_level(mut self, level: usize) -> Self {
        self.stop_level = Some(level);
        self
    }

    /// Replaces the level planner settings.
    pub fn with_level_planner(mut self, level_planner: LevelPlannerConfig) -> Self {
        self.level_planner = level_planner;
        self
    }

    /// Returns the termination time limit, if configured.
    ///
    /// Convenience method that delegates to `termination.time_limit()`.
    pub fn time_limit(&self) -> Option<Duration> {
        self.termination.as_ref().and_then(|t| t.time_limit())
    }
}

/// Termination configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TerminationConfig {
    /// Maximum seconds to spend solving.
    pub seconds_spent_limit: Option<u64>,

    /// Maximum milliseconds to spend solving, added to the seconds limit.
    pub millis_spent_limit: Option<u64>,

    /// Maximum number of grow steps across all levels.
    pub iteration_limit: Option<u64>,
}

impl TerminationConfig {
    /// Returns the time limit as a Duration, if any.
    pub fn time_limit(&self) -> Option<Duration> {
        let millis =
            self.seconds_spent_limit.unwrap_or(0) * 1000 + self.millis_spent_limit.unwrap_or(0);
        if millis > 0 {
            Some(Duration::from_millis(millis))
        } else {
            None
        }
    }

    /// Returns true if no limit is configured at all.
    pub fn is_unbounded(&self) -> bool {
        self.time_limit().is_none() && self.iteration_limit.is_none()
    }
}

/// Level planner configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case", default)]
pub struct LevelPlannerConfig {
    /// Maximum extension distance; derived from the space extent when unset.
    pub range: Option<f64>,

    /// Probability of sampling the goal instead of a random state.
    pub goal_bias: f64,

    /// Goal radius overriding the one carried by the problem description.
    pub goal_threshold: Option<f64>,
}

impl LevelPlannerConfig {
    pub const DEFAULT_GOAL_BIAS: f64 = 0.05;

    fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.goal_bias) {
            return Err(ConfigError::Invalid(format!(
                "goal_bias must lie in [0, 1], got {}",
                self.goal_bias
            )));
        }
        if let Some(range) = self.range {
            if range <= 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "range must be positive, got {range}"
                )));
            }
        }
        if let Some(threshold) = self.goal_threshold {
            if threshold < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "goal_threshold must not be negative, got {threshold}"
                )));
            }
        }
        Ok(())
    }
}

impl Default for LevelPlannerConfig {
    fn default() -> Self {
        Self {
            range: None,
            goal_bias: Self::DEFAULT_GOAL_BIAS,
            goal_threshold: None,
        }
    }
}

#[cfg(test)]
mod tests;
