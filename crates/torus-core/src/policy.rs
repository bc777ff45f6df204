//! Threshold-driven energy adjustment.
//!
//! The policy classifies the current energy level against a lower and an
//! upper threshold and, when enabled, moves the energy level one fixed step
//! toward the band:
//!
//! - `energy < lower_threshold` => [`AdjustmentSignal::Increase`], `+step`
//! - `energy > upper_threshold` => [`AdjustmentSignal::Decrease`], `-step`
//! - otherwise                  => [`AdjustmentSignal::Hold`], no change
//!
//! Thresholds are exclusive, so values exactly on a threshold hold. Steps
//! saturate at the `[0, 1]` bounds. A step never exceeds the band width
//! `upper_threshold - lower_threshold`, so one step from outside the band
//! cannot jump clean over it and repeated application settles on `Hold`.

use serde::Serialize;
use torus_types::{AdjustmentSignal, OutOfRangeError, Unit};
use tracing::info;

use crate::config::PolicyConfig;
use crate::state::SimulationState;

/// Default lower threshold.
pub const DEFAULT_LOWER_THRESHOLD: f64 = 0.3;

/// Default upper threshold.
pub const DEFAULT_UPPER_THRESHOLD: f64 = 0.7;

/// Default step applied per adjustment.
pub const DEFAULT_STEP: f64 = 0.05;

/// Errors building an [`AdjustmentPolicy`] from configuration.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PolicyError {
    /// A threshold lies outside `[0, 1]`.
    #[error("policy threshold out of range: {source}")]
    Threshold {
        /// The underlying range error.
        #[from]
        source: OutOfRangeError,
    },

    /// The lower threshold is above the upper threshold.
    #[error("lower threshold {lower} exceeds upper threshold {upper}")]
    InvertedThresholds {
        /// Configured lower threshold.
        lower: f64,
        /// Configured upper threshold.
        upper: f64,
    },

    /// The step is not in `(0, 1]`.
    #[error("policy step must be in (0, 1], got {step}")]
    InvalidStep {
        /// Configured step.
        step: f64,
    },

    /// The step is wider than the hold band, so adjustments would
    /// oscillate across it instead of settling.
    #[error("policy step {step} exceeds hold band width {band} between {lower} and {upper}")]
    StepExceedsBand {
        /// Configured step.
        step: f64,
        /// Width of the hold band.
        band: f64,
        /// Configured lower threshold.
        lower: f64,
        /// Configured upper threshold.
        upper: f64,
    },
}

/// The change a single policy application made to the energy level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EnergyAdjustment {
    /// The signal that drove the adjustment.
    pub signal: AdjustmentSignal,
    /// Energy level before the adjustment.
    pub before: Unit,
    /// Energy level after the adjustment.
    pub after: Unit,
}

impl EnergyAdjustment {
    /// Whether the energy level actually moved.
    pub fn changed(&self) -> bool {
        self.before != self.after
    }
}

/// Threshold classifier plus step applier for the energy level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdjustmentPolicy {
    lower_threshold: Unit,
    upper_threshold: Unit,
    step: Unit,
    apply_adjustments: bool,
}

impl Default for AdjustmentPolicy {
    fn default() -> Self {
        Self {
            lower_threshold: Unit::saturating(DEFAULT_LOWER_THRESHOLD),
            upper_threshold: Unit::saturating(DEFAULT_UPPER_THRESHOLD),
            step: Unit::saturating(DEFAULT_STEP),
            apply_adjustments: true,
        }
    }
}

impl AdjustmentPolicy {
    /// Build a policy from explicit values.
    pub fn new(lower: f64, upper: f64, step: f64) -> Result<Self, PolicyError> {
        let lower_threshold = Unit::new(lower)?;
        let upper_threshold = Unit::new(upper)?;
        if lower_threshold > upper_threshold {
            return Err(PolicyError::InvertedThresholds { lower, upper });
        }
        if !(step > 0.0 && step <= 1.0) {
            return Err(PolicyError::InvalidStep { step });
        }
        // Tolerance absorbs representation error, e.g. 0.7 - 0.3 < 0.4.
        let band = upper_threshold.get() - lower_threshold.get();
        if step - band > f64::EPSILON {
            return Err(PolicyError::StepExceedsBand {
                step,
                band,
                lower,
                upper,
            });
        }
        Ok(Self {
            lower_threshold,
            upper_threshold,
            step: Unit::saturating(step),
            apply_adjustments: true,
        })
    }

    /// Build a policy from the `policy` configuration section.
    pub fn from_config(config: &PolicyConfig) -> Result<Self, PolicyError> {
        let policy = Self::new(config.lower_threshold, config.upper_threshold, config.step)?;
        Ok(policy.with_apply_adjustments(config.apply_adjustments))
    }

    /// Enable or disable state mutation in [`apply`](Self::apply).
    #[must_use]
    pub const fn with_apply_adjustments(mut self, enabled: bool) -> Self {
        self.apply_adjustments = enabled;
        self
    }

    /// Lower threshold.
    pub const fn lower_threshold(&self) -> Unit {
        self.lower_threshold
    }

    /// Upper threshold.
    pub const fn upper_threshold(&self) -> Unit {
        self.upper_threshold
    }

    /// Step size.
    pub const fn step(&self) -> Unit {
        self.step
    }

    /// Whether [`apply`](Self::apply) mutates the state.
    pub const fn applies_adjustments(&self) -> bool {
        self.apply_adjustments
    }

    /// Classify an energy level without logging.
    pub fn classify(&self, energy_level: Unit) -> AdjustmentSignal {
        if energy_level < self.lower_threshold {
            AdjustmentSignal::Increase
        } else if energy_level > self.upper_threshold {
            AdjustmentSignal::Decrease
        } else {
            AdjustmentSignal::Hold
        }
    }

    /// Classify the state's energy level, logging any requested change.
    pub fn evaluate(&self, state: &SimulationState) -> AdjustmentSignal {
        let energy_level = state.energy_level();
        let signal = self.classify(energy_level);
        match signal {
            AdjustmentSignal::Increase => info!(
                energy_level = energy_level.get(),
                threshold = self.lower_threshold.get(),
                "Increasing energy parameters"
            ),
            AdjustmentSignal::Decrease => info!(
                energy_level = energy_level.get(),
                threshold = self.upper_threshold.get(),
                "Decreasing energy parameters"
            ),
            AdjustmentSignal::Hold => {}
        }
        signal
    }

    /// Move the energy level one step in the direction of `signal`.
    ///
    /// A no-op when adjustments are disabled or the signal is `Hold`.
    pub fn apply(&self, state: &mut SimulationState, signal: AdjustmentSignal) -> EnergyAdjustment {
        let before = state.energy_level();
        let after = if self.apply_adjustments && signal.is_change() {
            state.adjust_energy(signal.direction() * self.step.get())
        } else {
            before
        };
        EnergyAdjustment {
            signal,
            before,
            after,
        }
    }
}
