//! The bounded scalar state of the torus.
//!
//! [`SimulationState`] holds the energy level, the three sentience
//! sub-scores, the quartz state, and an optional map of thermodynamic
//! properties. All bounded fields are [`Unit`]s, so the `[0, 1]` invariant
//! holds by construction; setters that take raw `f64` values reject
//! out-of-range input with [`StateError::OutOfRange`].
//!
//! Derived quantities ([`energy_flow`], [`sentience_score`]) are pure. The
//! only mutations are the explicit setters, [`adjust_energy`] (used by the
//! adjustment policy), and [`update_thermodynamic_properties`].
//!
//! The tick cycle never touches the thermodynamic map. It stays empty
//! unless a caller records readings through
//! [`update_thermodynamic_properties`].
//!
//! [`energy_flow`]: SimulationState::energy_flow
//! [`sentience_score`]: SimulationState::sentience_score
//! [`adjust_energy`]: SimulationState::adjust_energy
//! [`update_thermodynamic_properties`]: SimulationState::update_thermodynamic_properties

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use torus_types::{
    AdjustmentSignal, OutOfRangeError, SentienceDimension, SentienceProfile,
    ThermodynamicProperty, Unit,
};
use tracing::info;

use crate::policy::AdjustmentPolicy;
use crate::predict::BehaviorPredictor;

/// Weight of the quartz state in the energy flow.
pub const QUARTZ_FLOW_WEIGHT: f64 = 0.1;

/// A bounded state field, used to label validation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateField {
    /// The base energy level.
    EnergyLevel,
    /// The quartz state.
    QuartzState,
    /// One sentience sub-score.
    Sentience(SentienceDimension),
}

impl core::fmt::Display for StateField {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::EnergyLevel => f.write_str("energy_level"),
            Self::QuartzState => f.write_str("quartz_state"),
            Self::Sentience(dim) => write!(f, "sentience.{dim}"),
        }
    }
}

/// Errors raised when mutating the simulation state.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StateError {
    /// A bounded field was given a value outside `[0, 1]`.
    #[error("{field} out of range: {source}")]
    OutOfRange {
        /// The field that rejected the value.
        field: StateField,
        /// The underlying range error.
        source: OutOfRangeError,
    },

    /// A thermodynamic property was given a non-finite value.
    #[error("{property} must be finite, got {value}")]
    NonFinite {
        /// The property being updated.
        property: ThermodynamicProperty,
        /// The rejected value.
        value: f64,
    },
}

/// Bounded scalar state of the torus simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    /// Base energy level.
    energy_level: Unit,

    /// Emotional, physical, and mental sub-scores.
    sentience: SentienceProfile,

    /// Quartz state, a secondary contribution to the energy flow.
    quartz_state: Unit,

    /// Optional thermodynamic readings; empty until first updated.
    #[serde(default)]
    thermodynamic_properties: BTreeMap<ThermodynamicProperty, f64>,
}

impl Default for SimulationState {
    fn default() -> Self {
        Self {
            energy_level: Unit::HALF,
            sentience: SentienceProfile::default(),
            quartz_state: Unit::HALF,
            thermodynamic_properties: BTreeMap::new(),
        }
    }
}

impl SimulationState {
    /// Build a state from validated components.
    pub const fn new(energy_level: Unit, sentience: SentienceProfile, quartz_state: Unit) -> Self {
        Self {
            energy_level,
            sentience,
            quartz_state,
            thermodynamic_properties: BTreeMap::new(),
        }
    }

    /// Build a state from raw values, validating each one.
    ///
    /// `sentience` is `[emotional, physical, mental]`.
    pub fn from_raw(
        energy_level: f64,
        sentience: [f64; 3],
        quartz_state: f64,
    ) -> Result<Self, StateError> {
        let mut state = Self::default();
        state.set_energy_level(energy_level)?;
        state.set_quartz_state(quartz_state)?;
        for (dimension, value) in SentienceDimension::ALL.into_iter().zip(sentience) {
            state.set_sentience(dimension, value)?;
        }
        Ok(state)
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Current energy level.
    pub const fn energy_level(&self) -> Unit {
        self.energy_level
    }

    /// Current quartz state.
    pub const fn quartz_state(&self) -> Unit {
        self.quartz_state
    }

    /// Current sentience profile.
    pub const fn sentience(&self) -> &SentienceProfile {
        &self.sentience
    }

    /// All recorded thermodynamic properties.
    pub const fn thermodynamic_properties(&self) -> &BTreeMap<ThermodynamicProperty, f64> {
        &self.thermodynamic_properties
    }

    /// A single thermodynamic property, if it has been recorded.
    pub fn thermodynamic_property(&self, property: ThermodynamicProperty) -> Option<f64> {
        self.thermodynamic_properties.get(&property).copied()
    }

    // -----------------------------------------------------------------------
    // Setters
    // -----------------------------------------------------------------------

    /// Set the energy level.
    pub fn set_energy_level(&mut self, value: f64) -> Result<(), StateError> {
        self.energy_level = checked(StateField::EnergyLevel, value)?;
        Ok(())
    }

    /// Set the quartz state.
    pub fn set_quartz_state(&mut self, value: f64) -> Result<(), StateError> {
        self.quartz_state = checked(StateField::QuartzState, value)?;
        Ok(())
    }

    /// Set one sentience sub-score.
    pub fn set_sentience(
        &mut self,
        dimension: SentienceDimension,
        value: f64,
    ) -> Result<(), StateError> {
        let unit = checked(StateField::Sentience(dimension), value)?;
        self.sentience.set(dimension, unit);
        Ok(())
    }

    /// Move the energy level by `delta`, saturating at the interval bounds.
    ///
    /// Returns the new energy level.
    pub fn adjust_energy(&mut self, delta: f64) -> Unit {
        self.energy_level = Unit::saturating(self.energy_level.get() + delta);
        self.energy_level
    }

    /// Record temperature and pressure readings.
    ///
    /// Caller-driven: nothing in the tick cycle invokes this. Both values
    /// are validated before either is stored.
    pub fn update_thermodynamic_properties(
        &mut self,
        temperature: f64,
        pressure: f64,
    ) -> Result<(), StateError> {
        for (property, value) in [
            (ThermodynamicProperty::Temperature, temperature),
            (ThermodynamicProperty::Pressure, pressure),
        ] {
            if !value.is_finite() {
                return Err(StateError::NonFinite { property, value });
            }
        }

        self.thermodynamic_properties
            .insert(ThermodynamicProperty::Temperature, temperature);
        self.thermodynamic_properties
            .insert(ThermodynamicProperty::Pressure, pressure);

        info!(
            properties = ?self.thermodynamic_properties,
            "Updated thermodynamic properties"
        );
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Derived quantities
    // -----------------------------------------------------------------------

    /// Base energy plus the weighted quartz contribution.
    ///
    /// Not clamped: the result lies in `[0, 1 + QUARTZ_FLOW_WEIGHT]`.
    pub fn energy_flow(&self) -> f64 {
        self.quartz_state
            .get()
            .mul_add(QUARTZ_FLOW_WEIGHT, self.energy_level.get())
    }

    /// Unweighted mean of the three sentience sub-scores.
    pub fn sentience_score(&self) -> f64 {
        self.sentience.mean()
    }

    /// Ask `predictor` for a behaviour estimate in `[0, 1)`.
    pub fn predict_behavior(&self, predictor: &mut dyn BehaviorPredictor) -> f64 {
        predictor.predict(self)
    }

    /// Classify the energy level with the default thresholds (0.3 / 0.7).
    ///
    /// Logs a message when the result is [`AdjustmentSignal::Increase`] or
    /// [`AdjustmentSignal::Decrease`]. Does not mutate the state.
    pub fn evaluate_adjustment_policy(&self) -> AdjustmentSignal {
        AdjustmentPolicy::default().evaluate(self)
    }
}

fn checked(field: StateField, value: f64) -> Result<Unit, StateError> {
    Unit::new(value).map_err(|source| StateError::OutOfRange { field, source })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::predict::UniformPredictor;

    const TOLERANCE: f64 = 1e-12;

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < TOLERANCE,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn default_scenario() {
        let state = SimulationState::default();
        assert_close(state.energy_level().get(), 0.5);
        assert_close(state.quartz_state().get(), 0.5);
        assert_close(state.energy_flow(), 0.55);
        assert_close(state.sentience_score(), 1.3 / 3.0);
        assert_eq!(state.evaluate_adjustment_policy(), AdjustmentSignal::Hold);
        assert!(state.thermodynamic_properties().is_empty());
    }

    #[test]
    fn energy_flow_formula_over_grid() {
        let steps = [0.0, 0.1, 0.25, 0.5, 0.75, 0.9, 1.0];
        for e in steps {
            for q in steps {
                let state = SimulationState::from_raw(e, [0.5, 0.5, 0.5], q).unwrap();
                assert_close(state.energy_flow(), e + 0.1 * q);
            }
        }
    }

    #[test]
    fn energy_flow_is_not_clamped() {
        let state = SimulationState::from_raw(1.0, [0.0, 0.0, 0.0], 1.0).unwrap();
        assert_close(state.energy_flow(), 1.1);
    }

    #[test]
    fn sentience_score_is_mean() {
        let state = SimulationState::from_raw(0.5, [0.9, 0.0, 0.3], 0.5).unwrap();
        assert_close(state.sentience_score(), 0.4);

        let uniform = SimulationState::from_raw(0.5, [1.0, 1.0, 1.0], 0.5).unwrap();
        assert_close(uniform.sentience_score(), 1.0);
    }

    #[test]
    fn policy_thresholds() {
        let cases = [
            (0.0, AdjustmentSignal::Increase),
            (0.2, AdjustmentSignal::Increase),
            (0.299, AdjustmentSignal::Increase),
            (0.3, AdjustmentSignal::Hold),
            (0.5, AdjustmentSignal::Hold),
            (0.7, AdjustmentSignal::Hold),
            (0.701, AdjustmentSignal::Decrease),
            (0.8, AdjustmentSignal::Decrease),
            (1.0, AdjustmentSignal::Decrease),
        ];
        for (energy, expected) in cases {
            let mut state = SimulationState::default();
            state.set_energy_level(energy).unwrap();
            assert_eq!(
                state.evaluate_adjustment_policy(),
                expected,
                "energy {energy}"
            );
        }
    }

    #[test]
    fn evaluation_does_not_mutate() {
        let mut state = SimulationState::default();
        state.set_energy_level(0.1).unwrap();
        let before = state.clone();
        let _ = state.evaluate_adjustment_policy();
        assert_eq!(state, before);
    }

    #[test]
    fn setters_reject_out_of_range() {
        let mut state = SimulationState::default();

        let err = state.set_energy_level(1.2).unwrap_err();
        assert!(matches!(
            err,
            StateError::OutOfRange {
                field: StateField::EnergyLevel,
                ..
            }
        ));
        assert_close(state.energy_level().get(), 0.5);

        assert!(state.set_quartz_state(-0.1).is_err());
        assert!(state.set_quartz_state(f64::NAN).is_err());

        let err = state
            .set_sentience(SentienceDimension::Mental, 2.0)
            .unwrap_err();
        assert_eq!(err.to_string(), "sentience.mental out of range: value 2 is outside the unit interval [0, 1]");
    }

    #[test]
    fn from_raw_validates_every_field() {
        assert!(SimulationState::from_raw(0.5, [0.5, 1.5, 0.5], 0.5).is_err());
        assert!(SimulationState::from_raw(0.5, [0.5, 0.5, 0.5], 7.0).is_err());
        assert!(SimulationState::from_raw(-1.0, [0.5, 0.5, 0.5], 0.5).is_err());
    }

    #[test]
    fn adjust_energy_saturates() {
        let mut state = SimulationState::default();
        assert_close(state.adjust_energy(0.25).get(), 0.75);
        assert_close(state.adjust_energy(10.0).get(), 1.0);
        assert_close(state.adjust_energy(-3.0).get(), 0.0);
    }

    #[test]
    fn thermodynamic_properties_start_empty_and_update() {
        let mut state = SimulationState::default();
        assert_eq!(
            state.thermodynamic_property(ThermodynamicProperty::Temperature),
            None
        );

        state.update_thermodynamic_properties(293.15, 101.3).unwrap();
        assert_close(
            state
                .thermodynamic_property(ThermodynamicProperty::Temperature)
                .unwrap(),
            293.15,
        );
        assert_close(
            state
                .thermodynamic_property(ThermodynamicProperty::Pressure)
                .unwrap(),
            101.3,
        );
    }

    #[test]
    fn thermodynamic_update_is_all_or_nothing() {
        let mut state = SimulationState::default();
        let err = state
            .update_thermodynamic_properties(300.0, f64::INFINITY)
            .unwrap_err();
        assert!(matches!(
            err,
            StateError::NonFinite {
                property: ThermodynamicProperty::Pressure,
                ..
            }
        ));
        assert!(state.thermodynamic_properties().is_empty());
    }

    #[test]
    fn predict_behavior_stays_in_half_open_interval() {
        let state = SimulationState::default();
        let mut predictor = UniformPredictor::from_seed(7);
        for _ in 0..10_000 {
            let p = state.predict_behavior(&mut predictor);
            assert!((0.0..1.0).contains(&p), "prediction {p} out of range");
        }
    }

    #[test]
    fn snapshot_round_trip_keeps_thermodynamics() {
        let mut state = SimulationState::from_raw(0.2, [0.1, 0.2, 0.3], 0.9).unwrap();
        state.update_thermodynamic_properties(250.0, 90.0).unwrap();

        let json = serde_json::to_string(&state).unwrap();
        let restored: SimulationState = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, state);
    }

    #[test]
    fn snapshot_without_thermodynamics_defaults_to_empty() {
        let json = r#"{
            "energy_level": 0.4,
            "sentience": {"emotional": 0.5, "physical": 0.5, "mental": 0.3},
            "quartz_state": 0.5
        }"#;
        let state: SimulationState = serde_json::from_str(json).unwrap();
        assert!(state.thermodynamic_properties().is_empty());
    }

    #[test]
    fn snapshot_with_out_of_range_energy_is_rejected() {
        let json = r#"{
            "energy_level": 1.4,
            "sentience": {"emotional": 0.5, "physical": 0.5, "mental": 0.3},
            "quartz_state": 0.5
        }"#;
        let state: Result<SimulationState, _> = serde_json::from_str(json);
        assert!(state.is_err());
    }
}
