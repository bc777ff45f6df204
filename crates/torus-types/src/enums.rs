//! Enumeration types for the Quartz Torus simulation.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Adjustment
// ---------------------------------------------------------------------------

/// Tri-state outcome of the energy adjustment policy.
///
/// Each signal is produced fresh per evaluation; nothing about the previous
/// signal is carried into the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentSignal {
    /// Energy is below the lower threshold and should rise.
    Increase,
    /// Energy is above the upper threshold and should fall.
    Decrease,
    /// Energy is inside the band; leave it alone.
    Hold,
}

impl AdjustmentSignal {
    /// Sign of the step this signal asks for: `1.0`, `-1.0`, or `0.0`.
    pub const fn direction(self) -> f64 {
        match self {
            Self::Increase => 1.0,
            Self::Decrease => -1.0,
            Self::Hold => 0.0,
        }
    }

    /// Whether this signal asks for any change at all.
    pub const fn is_change(self) -> bool {
        !matches!(self, Self::Hold)
    }
}

impl core::fmt::Display for AdjustmentSignal {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            Self::Increase => "increase",
            Self::Decrease => "decrease",
            Self::Hold => "hold",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// Sentience
// ---------------------------------------------------------------------------

/// One of the three sentience sub-dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentienceDimension {
    /// Emotional sub-score.
    Emotional,
    /// Physical sub-score.
    Physical,
    /// Mental sub-score.
    Mental,
}

impl SentienceDimension {
    /// All dimensions in canonical order.
    pub const ALL: [Self; 3] = [Self::Emotional, Self::Physical, Self::Mental];
}

impl core::fmt::Display for SentienceDimension {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            Self::Emotional => "emotional",
            Self::Physical => "physical",
            Self::Mental => "mental",
        };
        f.write_str(label)
    }
}

// ---------------------------------------------------------------------------
// Thermodynamics
// ---------------------------------------------------------------------------

/// Keys of the optional thermodynamic property map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThermodynamicProperty {
    /// Ambient temperature.
    Temperature,
    /// Ambient pressure.
    Pressure,
}

impl core::fmt::Display for ThermodynamicProperty {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let label = match self {
            Self::Temperature => "temperature",
            Self::Pressure => "pressure",
        };
        f.write_str(label)
    }
}
