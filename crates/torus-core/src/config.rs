//! Configuration loading and typed config structures for the torus simulation.
//!
//! The canonical configuration lives in `torus-config.yaml` at the project
//! root. This module defines strongly-typed structs that mirror the YAML
//! structure, and provides a loader that reads and validates the file.
//! Every section and field is optional; missing values take the defaults
//! documented on each field.

use std::path::Path;

use serde::Deserialize;
use torus_types::{SentienceProfile, Unit};

use crate::policy::{
    AdjustmentPolicy, DEFAULT_LOWER_THRESHOLD, DEFAULT_STEP, DEFAULT_UPPER_THRESHOLD, PolicyError,
};
use crate::state::SimulationState;

/// Environment variable overriding `simulation.max_ticks`.
pub const ENV_MAX_TICKS: &str = "TORUS_MAX_TICKS";

/// Environment variable overriding `simulation.tick_interval_ms`.
pub const ENV_TICK_INTERVAL_MS: &str = "TORUS_TICK_INTERVAL_MS";

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// The `policy` section does not describe a valid policy.
    #[error("invalid policy configuration: {source}")]
    Policy {
        /// The underlying policy error.
        #[from]
        source: PolicyError,
    },
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level configuration.
///
/// Mirrors the structure of `torus-config.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TorusConfig {
    /// Run-loop boundaries and pacing.
    #[serde(default)]
    pub simulation: SimulationBoundsConfig,

    /// Starting values for the simulation state.
    #[serde(default)]
    pub initial_state: InitialStateConfig,

    /// Energy adjustment policy.
    #[serde(default)]
    pub policy: PolicyConfig,

    /// Behaviour prediction settings.
    #[serde(default)]
    pub prediction: PredictionConfig,

    /// Feedback intake settings.
    #[serde(default)]
    pub feedback: FeedbackConfig,

    /// Energy-state rendering settings.
    #[serde(default)]
    pub render: RenderConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TorusConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `TORUS_MAX_TICKS` overrides `simulation.max_ticks`
    /// - `TORUS_TICK_INTERVAL_MS` overrides `simulation.tick_interval_ms`
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read,
    /// [`ConfigError::Yaml`] if the content is not valid YAML (including
    /// out-of-range state values), or [`ConfigError::Policy`] if the policy
    /// section is inconsistent.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        Self::from_file_with(path, |key| std::env::var(key).ok())
    }

    /// Like [`from_file`](Self::from_file), with overrides read through
    /// `lookup` instead of the process environment.
    pub fn from_file_with(
        path: &Path,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let mut config = Self::parse(&contents)?;
        config.simulation.apply_overrides(lookup);
        Ok(config)
    }

    /// Parse and validate configuration from a YAML string.
    ///
    /// Does not consult the environment.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        // serde_yml rejects an empty document; treat it as all defaults.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        AdjustmentPolicy::from_config(&self.policy)?;
        Ok(())
    }
}

/// Run-loop boundaries and pacing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SimulationBoundsConfig {
    /// Stop after this many ticks (0 = unlimited; default: 1000).
    #[serde(default = "default_max_ticks")]
    pub max_ticks: u64,

    /// Stop after this many wall-clock seconds (0 = unlimited; default: 0).
    #[serde(default)]
    pub max_real_time_seconds: u64,

    /// Real-time milliseconds between ticks (default: 1000).
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl SimulationBoundsConfig {
    /// Apply overrides from a key lookup (normally the process environment).
    ///
    /// Values that do not parse as `u64` are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup(ENV_MAX_TICKS).and_then(|v| v.trim().parse().ok()) {
            self.max_ticks = val;
        }
        if let Some(val) = lookup(ENV_TICK_INTERVAL_MS).and_then(|v| v.trim().parse().ok()) {
            self.tick_interval_ms = val;
        }
    }
}

impl Default for SimulationBoundsConfig {
    fn default() -> Self {
        Self {
            max_ticks: default_max_ticks(),
            max_real_time_seconds: 0,
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

/// Starting values for the simulation state.
///
/// Every value must lie in `[0, 1]`; out-of-range values fail parsing.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct InitialStateConfig {
    /// Starting energy level (default: 0.5).
    #[serde(default = "default_half")]
    pub energy_level: Unit,

    /// Starting quartz state (default: 0.5).
    #[serde(default = "default_half")]
    pub quartz_state: Unit,

    /// Starting sentience sub-scores (default: 0.5 / 0.5 / 0.3).
    #[serde(default)]
    pub sentience: SentienceProfile,
}

impl InitialStateConfig {
    /// Build the simulation state described by this section.
    pub const fn build(&self) -> SimulationState {
        SimulationState::new(self.energy_level, self.sentience, self.quartz_state)
    }
}

impl Default for InitialStateConfig {
    fn default() -> Self {
        Self {
            energy_level: Unit::HALF,
            quartz_state: Unit::HALF,
            sentience: SentienceProfile::default(),
        }
    }
}

/// Energy adjustment policy parameters.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PolicyConfig {
    /// Energy below this raises an increase signal (default: 0.3).
    #[serde(default = "default_lower_threshold")]
    pub lower_threshold: f64,

    /// Energy above this raises a decrease signal (default: 0.7).
    #[serde(default = "default_upper_threshold")]
    pub upper_threshold: f64,

    /// Magnitude of one adjustment step (default: 0.05).
    #[serde(default = "default_step")]
    pub step: f64,

    /// Whether signals actually move the energy level (default: true).
    #[serde(default = "default_true")]
    pub apply_adjustments: bool,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Self {
            lower_threshold: default_lower_threshold(),
            upper_threshold: default_upper_threshold(),
            step: default_step(),
            apply_adjustments: true,
        }
    }
}

/// Behaviour prediction settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub struct PredictionConfig {
    /// Seed for the prediction RNG. When absent the RNG is seeded from the
    /// operating system and predictions are not reproducible.
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Feedback intake settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FeedbackConfig {
    /// Number of feedback entries retained in memory (default: 64).
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    /// Whether the engine reads feedback lines from stdin (default: true).
    #[serde(default = "default_true")]
    pub read_stdin: bool,
}

impl Default for FeedbackConfig {
    fn default() -> Self {
        Self {
            history_capacity: default_history_capacity(),
            read_stdin: true,
        }
    }
}

/// Energy-state rendering settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RenderConfig {
    /// Render every N ticks (0 = never; default: 10).
    #[serde(default = "default_render_interval_ticks")]
    pub interval_ticks: u64,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            interval_ticks: default_render_interval_ticks(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter used when `RUST_LOG` is unset (default: "info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output (default: false).
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

const fn default_max_ticks() -> u64 {
    1000
}

const fn default_tick_interval_ms() -> u64 {
    1000
}

const fn default_half() -> Unit {
    Unit::HALF
}

const fn default_lower_threshold() -> f64 {
    DEFAULT_LOWER_THRESHOLD
}

const fn default_upper_threshold() -> f64 {
    DEFAULT_UPPER_THRESHOLD
}

const fn default_step() -> f64 {
    DEFAULT_STEP
}

const fn default_history_capacity() -> usize {
    64
}

const fn default_render_interval_ticks() -> u64 {
    10
}

fn default_log_level() -> String {
    "info".to_owned()
}

const fn default_true() -> bool {
    true
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = TorusConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.simulation.max_ticks, 1000);
        assert_eq!(config.simulation.tick_interval_ms, 1000);
        assert_eq!(config.feedback.history_capacity, 64);
        assert_eq!(config.render.interval_ticks, 10);
        assert_eq!(config.prediction.seed, None);
        assert_eq!(config.initial_state.build(), SimulationState::default());
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
simulation:
  max_ticks: 25
  max_real_time_seconds: 60
  tick_interval_ms: 250

initial_state:
  energy_level: 0.2
  quartz_state: 0.9
  sentience:
    emotional: 0.1
    physical: 0.2
    mental: 0.3

policy:
  lower_threshold: 0.25
  upper_threshold: 0.75
  step: 0.1
  apply_adjustments: false

prediction:
  seed: 1234

feedback:
  history_capacity: 8
  read_stdin: false

render:
  interval_ticks: 5

logging:
  level: "debug"
  json: true
"#;

        let config = TorusConfig::parse(yaml).unwrap();

        assert_eq!(config.simulation.max_ticks, 25);
        assert_eq!(config.simulation.max_real_time_seconds, 60);
        assert_eq!(config.simulation.tick_interval_ms, 250);
        assert!((config.initial_state.energy_level.get() - 0.2).abs() < f64::EPSILON);
        assert!((config.initial_state.sentience.mental.get() - 0.3).abs() < f64::EPSILON);
        assert!(!config.policy.apply_adjustments);
        assert_eq!(config.prediction.seed, Some(1234));
        assert_eq!(config.feedback.history_capacity, 8);
        assert!(!config.feedback.read_stdin);
        assert_eq!(config.render.interval_ticks, 5);
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn parse_minimal_yaml() {
        let yaml = "prediction:\n  seed: 7\n";
        let config = TorusConfig::parse(yaml).unwrap();

        // Seed is overridden
        assert_eq!(config.prediction.seed, Some(7));
        // Everything else uses defaults
        assert_eq!(config.simulation.max_ticks, 1000);
        assert_eq!(config.policy, PolicyConfig::default());
    }

    #[test]
    fn parse_empty_yaml() {
        let config = TorusConfig::parse("");
        assert!(config.is_ok());
    }

    #[test]
    fn out_of_range_initial_state_is_rejected() {
        let yaml = "initial_state:\n  energy_level: 1.5\n";
        let result = TorusConfig::parse(yaml);
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn inverted_policy_is_rejected() {
        let yaml = "policy:\n  lower_threshold: 0.9\n  upper_threshold: 0.1\n";
        let result = TorusConfig::parse(yaml);
        assert!(matches!(result, Err(ConfigError::Policy { .. })));
    }

    #[test]
    fn step_wider_than_hold_band_is_rejected() {
        let yaml = "policy:\n  lower_threshold: 0.3\n  upper_threshold: 0.7\n  step: 0.5\n";
        let result = TorusConfig::parse(yaml);
        assert!(matches!(
            result,
            Err(ConfigError::Policy {
                source: PolicyError::StepExceedsBand { .. }
            })
        ));
    }

    #[test]
    fn overrides_replace_bounds() {
        let mut vars = BTreeMap::new();
        vars.insert(ENV_MAX_TICKS, "12".to_owned());
        vars.insert(ENV_TICK_INTERVAL_MS, " 50 ".to_owned());

        let mut bounds = SimulationBoundsConfig::default();
        bounds.apply_overrides(|key| vars.get(key).cloned());
        assert_eq!(bounds.max_ticks, 12);
        assert_eq!(bounds.tick_interval_ms, 50);
    }

    #[test]
    fn unparsable_overrides_are_ignored() {
        let mut bounds = SimulationBoundsConfig::default();
        bounds.apply_overrides(|_| Some("lots".to_owned()));
        assert_eq!(bounds, SimulationBoundsConfig::default());
    }

    #[test]
    fn load_project_config_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("torus-config.yaml");
        if path.exists() {
            let config = TorusConfig::from_file(&path);
            assert!(config.is_ok(), "Failed to load project config: {config:?}");
        }
    }
}
