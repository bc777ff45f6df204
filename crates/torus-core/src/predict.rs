//! Behaviour prediction.
//!
//! The [`BehaviorPredictor`] trait is the seam for a future user-behaviour
//! model. The only shipped implementation, [`UniformPredictor`], draws a
//! uniform sample from `[0, 1)` and ignores the state entirely.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::PredictionConfig;
use crate::state::SimulationState;

/// A source of behaviour predictions.
///
/// Implementations must return a value in `[0, 1)`.
pub trait BehaviorPredictor: Send + core::fmt::Debug {
    /// Produce a prediction for the given state.
    fn predict(&mut self, state: &SimulationState) -> f64;
}

/// Uniform random predictor backed by [`StdRng`].
#[derive(Debug, Clone)]
pub struct UniformPredictor {
    rng: StdRng,
}

impl UniformPredictor {
    /// Create a reproducible predictor from a fixed seed.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create a predictor seeded from operating-system entropy.
    pub fn from_os_entropy() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Create a predictor from the `prediction` configuration section.
    pub fn from_config(config: &PredictionConfig) -> Self {
        config
            .seed
            .map_or_else(Self::from_os_entropy, Self::from_seed)
    }
}

impl BehaviorPredictor for UniformPredictor {
    fn predict(&mut self, _state: &SimulationState) -> f64 {
        self.rng.random::<f64>()
    }
}
