//! Composite value types shared across the workspace.

use serde::{Deserialize, Serialize};

use crate::enums::SentienceDimension;
use crate::unit::Unit;

/// Default emotional sub-score.
const DEFAULT_EMOTIONAL: f64 = 0.5;

/// Default physical sub-score.
const DEFAULT_PHYSICAL: f64 = 0.5;

/// Default mental sub-score.
const DEFAULT_MENTAL: f64 = 0.3;

/// The three sentience sub-scores, each bounded to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SentienceProfile {
    /// Emotional sub-score.
    pub emotional: Unit,
    /// Physical sub-score.
    pub physical: Unit,
    /// Mental sub-score.
    pub mental: Unit,
}

impl SentienceProfile {
    /// Build a profile from already-validated sub-scores.
    pub const fn new(emotional: Unit, physical: Unit, mental: Unit) -> Self {
        Self {
            emotional,
            physical,
            mental,
        }
    }

    /// Return the sub-score for one dimension.
    pub const fn get(&self, dimension: SentienceDimension) -> Unit {
        match dimension {
            SentienceDimension::Emotional => self.emotional,
            SentienceDimension::Physical => self.physical,
            SentienceDimension::Mental => self.mental,
        }
    }

    /// Replace the sub-score for one dimension.
    pub const fn set(&mut self, dimension: SentienceDimension, value: Unit) {
        match dimension {
            SentienceDimension::Emotional => self.emotional = value,
            SentienceDimension::Physical => self.physical = value,
            SentienceDimension::Mental => self.mental = value,
        }
    }

    /// Unweighted mean of the three sub-scores.
    pub fn mean(&self) -> f64 {
        (self.emotional.get() + self.physical.get() + self.mental.get()) / 3.0
    }
}

impl Default for SentienceProfile {
    fn default() -> Self {
        Self {
            emotional: Unit::saturating(DEFAULT_EMOTIONAL),
            physical: Unit::saturating(DEFAULT_PHYSICAL),
            mental: Unit::saturating(DEFAULT_MENTAL),
        }
    }
}
