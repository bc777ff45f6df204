//! The closed unit interval `[0, 1]` as a validated scalar.
//!
//! Every bounded quantity in the torus state (energy level, quartz state,
//! each sentience sub-score) is a [`Unit`]. Construction through
//! [`Unit::new`] rejects out-of-range and `NaN` inputs; [`Unit::saturating`]
//! clamps instead and is used where the engine itself moves a value (policy
//! steps). Deserialization goes through the validating constructor, so a
//! snapshot or config file can never smuggle in an out-of-range value.

use serde::{Deserialize, Serialize};

/// A value fell outside the unit interval `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("value {value} is outside the unit interval [0, 1]")]
pub struct OutOfRangeError {
    /// The rejected input.
    pub value: f64,
}

/// A finite `f64` in the closed interval `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Unit(f64);

impl Unit {
    /// The lower bound, `0.0`.
    pub const ZERO: Self = Self(0.0);

    /// The midpoint, `0.5`.
    pub const HALF: Self = Self(0.5);

    /// The upper bound, `1.0`.
    pub const ONE: Self = Self(1.0);

    /// Validate `value` as a unit-interval scalar.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `value` is `NaN` or outside `[0, 1]`.
    pub fn new(value: f64) -> Result<Self, OutOfRangeError> {
        if (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(OutOfRangeError { value })
        }
    }

    /// Clamp `value` into `[0, 1]`. `NaN` maps to zero.
    pub fn saturating(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        Self(value.clamp(0.0, 1.0))
    }

    /// Return the inner value.
    pub const fn get(self) -> f64 {
        self.0
    }
}

impl Default for Unit {
    fn default() -> Self {
        Self::ZERO
    }
}

impl TryFrom<f64> for Unit {
    type Error = OutOfRangeError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Unit> for f64 {
    fn from(unit: Unit) -> Self {
        unit.0
    }
}

impl core::fmt::Display for Unit {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}
