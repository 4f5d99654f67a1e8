//! Show configuration.
//!
//! Loaded from YAML in the layout the rehearsal team already keeps:
//!
//! ```yaml
//! show:
//!   run_count: 12
//!   start_time: "7:00 PM"
//!   step_minutes: 10
//!   seed: 7
//!   intermission:
//!     every_n_runs: 4
//!     length_minutes: 15
//!     prefer_default_before: true
//!     prefer_default_after: true
//! roles:
//!   - name: Domin
//!     offset_start_min: 0
//!     offset_end_min: 8
//!   - name: Alquist
//!     offset_start_min: 1
//!     offset_end_min: 9
//! performers: [Moose, Luca, Ren]
//! default_object: Robot
//! objects:
//!   - name: Shirt
//!     performers: all
//!   - name: Robot
//!     performers: [None]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{ClockTime, ObjectSpec, Performer, RoleSpec};
use crate::rules::ScoringWeights;
use crate::scheduler::{DefaultPreference, SegmentPlan};
use crate::validation::{self, ValidationError};

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {}", join_messages(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_messages(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(|e| e.message.as_str())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Complete show configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowConfig {
    /// Run count, clock, and intermission settings.
    pub show: ShowSettings,
    /// The two on-stage roles, Role A first.
    #[serde(alias = "characters")]
    pub roles: Vec<RoleSpec>,
    /// Performer roster; may include `"None"`.
    pub performers: Vec<Performer>,
    /// Objects in planning order.
    pub objects: Vec<ObjectSpec>,
    /// Object preferred next to intermissions (usually one needing nobody).
    #[serde(default)]
    pub default_object: Option<String>,
    /// Soft-score weights.
    #[serde(default)]
    pub weights: ScoringWeights,
}

/// Show-level settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowSettings {
    /// Number of runs.
    pub run_count: usize,
    /// Minutes between run starts.
    #[serde(default = "default_step_minutes")]
    pub step_minutes: i64,
    /// Start time of run 1.
    #[serde(default = "default_start_time")]
    pub start_time: ClockTime,
    /// Seed for the planner's shuffles; OS entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Intermission cadence and default-object preference.
    #[serde(default)]
    pub intermission: IntermissionSettings,
}

/// Intermission settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IntermissionSettings {
    /// Insert an intermission after every N runs (0 = never).
    #[serde(default)]
    pub every_n_runs: usize,
    /// Intermission length in minutes.
    #[serde(default)]
    pub length_minutes: i64,
    /// Default-object preference around intermissions.
    #[serde(flatten)]
    pub preference: DefaultPreference,
}

fn default_step_minutes() -> i64 {
    10
}

fn default_start_time() -> ClockTime {
    ClockTime::hm(19, 0)
}

impl ShowConfig {
    /// Loads and validates a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_yaml_file(path)?.validated()
    }

    /// Parses a YAML config file without validating it.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses a YAML string without validating it.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(s)?)
    }

    /// Serialises to YAML.
    pub fn to_yaml_string(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    /// Returns `self` if it passes validation.
    pub fn validated(self) -> Result<Self, ConfigError> {
        validation::validate_config(&self).map_err(ConfigError::Invalid)?;
        Ok(self)
    }

    /// Segment layout implied by the intermission settings.
    pub fn segment_plan(&self) -> SegmentPlan {
        let every = self.show.intermission.every_n_runs;
        SegmentPlan::new(
            self.show.run_count,
            (every > 0).then_some(every),
            self.show.intermission.length_minutes,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Eligibility;

    const SAMPLE: &str = r#"
show:
  run_count: 6
  start_time: "7:00 PM"
  step_minutes: 10
  seed: 1
  intermission:
    every_n_runs: 3
    length_minutes: 15
    prefer_default_before: true
    prefer_default_after: true
characters:
  - name: Domin
    offset_start_min: 0
    offset_end_min: 8
  - name: Alquist
    offset_start_min: 1
    offset_end_min: 9
performers: [Moose, Luca, Ren]
default_object: Robot
objects:
  - name: Shirt
    performers: all
  - name: Hat
    performers: [Moose, Luca]
  - name: Robot
    performers: [None]
"#;

    #[test]
    fn test_yaml_parsing() {
        let config = ShowConfig::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(config.show.run_count, 6);
        assert_eq!(config.show.start_time, ClockTime::hm(19, 0));
        assert_eq!(config.show.seed, Some(1));
        assert!(config.show.intermission.preference.before_intermission);
        assert_eq!(config.roles[1].name, "Alquist");
        assert_eq!(config.roles[1].exit_offset_min, 9);
        assert_eq!(config.performers.len(), 3);
        assert!(config.objects[0].performers.is_wildcard());
        assert_eq!(
            config.objects[2].performers,
            Eligibility::Performers(vec![Performer::Unstaffed])
        );
        assert_eq!(config.default_object.as_deref(), Some("Robot"));
        assert_eq!(config.weights, ScoringWeights::default());
    }

    #[test]
    fn test_defaults() {
        let config = ShowConfig::from_yaml_str(
            "show:\n  run_count: 2\nroles: [{name: A}, {name: B}]\nperformers: [P1]\nobjects: [{name: X}, {name: Y}]\n",
        )
        .unwrap();
        assert_eq!(config.show.step_minutes, 10);
        assert_eq!(config.show.seed, None);
        assert_eq!(config.show.intermission.every_n_runs, 0);
        assert!(!config.show.intermission.preference.is_enabled());
        assert_eq!(config.segment_plan().segments().len(), 1);
    }

    #[test]
    fn test_segment_plan_from_config() {
        let config = ShowConfig::from_yaml_str(SAMPLE).unwrap();
        let plan = config.segment_plan();
        assert_eq!(plan.every_n_runs(), Some(3));
        assert_eq!(plan.intermission_minutes(), 15);
    }

    #[test]
    fn test_validated_rejects_bad_config() {
        let mut config = ShowConfig::from_yaml_str(SAMPLE).unwrap();
        config.roles.pop();
        let err = config.validated().unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
        assert!(err.to_string().contains("role"));
    }

    #[test]
    fn test_bad_clock_is_yaml_error() {
        let text = SAMPLE.replace("\"7:00 PM\"", "\"after dinner\"");
        assert!(matches!(
            ShowConfig::from_yaml_str(&text),
            Err(ConfigError::Yaml(_))
        ));
    }

    #[test]
    fn test_yaml_roundtrip_keeps_roster() {
        let config = ShowConfig::from_yaml_str(SAMPLE).unwrap();
        let text = config.to_yaml_string().unwrap();
        let back = ShowConfig::from_yaml_str(&text).unwrap();
        assert_eq!(back.performers, config.performers);
        assert_eq!(back.show.start_time, config.show.start_time);
    }
}
