//! Tick cycle: one step of the torus simulation.
//!
//! Each tick runs through these phases:
//!
//! 1. **Advance** -- increment the clock.
//! 2. **Feedback** -- drain the [`FeedbackSource`] and record every entry.
//! 3. **Observe** -- compute energy flow, sentience score, and a behaviour
//!    prediction from the current state.
//! 4. **Evaluate** -- classify the energy level with the adjustment policy.
//! 5. **Adjust** -- apply the policy step (unless the policy is
//!    observational-only).
//!
//! The cycle is deterministic given the same initial state, a seeded
//! predictor, and the same feedback.

use serde::Serialize;
use torus_types::AdjustmentSignal;
use tracing::debug;

use crate::clock::SimulationClock;
use crate::config::{ConfigError, TorusConfig};
use crate::feedback::{FeedbackLog, FeedbackSource};
use crate::policy::{AdjustmentPolicy, EnergyAdjustment};
use crate::predict::{BehaviorPredictor, UniformPredictor};
use crate::state::SimulationState;

/// Errors that can occur during tick execution.
#[derive(Debug, thiserror::Error)]
pub enum TickError {
    /// A clock operation failed.
    #[error("clock error: {source}")]
    Clock {
        /// The underlying clock error.
        #[from]
        source: crate::clock::ClockError,
    },
}

/// Summary of a single tick's execution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickSummary {
    /// The tick number that was executed.
    pub tick: u64,
    /// Energy flow observed before adjustment.
    pub energy_flow: f64,
    /// Sentience score observed this tick.
    pub sentience_score: f64,
    /// Behaviour prediction drawn this tick.
    pub prediction: f64,
    /// Policy signal and the resulting change.
    pub adjustment: EnergyAdjustment,
    /// Number of feedback entries ingested this tick.
    pub feedback_received: usize,
}

impl TickSummary {
    /// The policy signal evaluated this tick.
    pub const fn signal(&self) -> AdjustmentSignal {
        self.adjustment.signal
    }
}

/// Everything the tick cycle reads and mutates.
#[derive(Debug)]
pub struct Simulation {
    /// The simulation clock.
    pub clock: SimulationClock,
    /// The bounded scalar state.
    pub state: SimulationState,
    /// Energy adjustment policy.
    pub policy: AdjustmentPolicy,
    /// Behaviour predictor.
    pub predictor: Box<dyn BehaviorPredictor>,
    /// Recorded user feedback.
    pub feedback: FeedbackLog,
}

impl Simulation {
    /// Assemble a simulation from explicit parts, starting at tick 0.
    pub fn new(
        state: SimulationState,
        policy: AdjustmentPolicy,
        predictor: Box<dyn BehaviorPredictor>,
        feedback: FeedbackLog,
    ) -> Self {
        Self {
            clock: SimulationClock::new(),
            state,
            policy,
            predictor,
            feedback,
        }
    }

    /// Assemble a simulation from configuration.
    pub fn from_config(config: &TorusConfig) -> Result<Self, ConfigError> {
        let policy = AdjustmentPolicy::from_config(&config.policy)?;
        Ok(Self::new(
            config.initial_state.build(),
            policy,
            Box::new(UniformPredictor::from_config(&config.prediction)),
            FeedbackLog::new(config.feedback.history_capacity),
        ))
    }
}

/// Execute one complete tick of the simulation.
///
/// # Errors
///
/// Returns [`TickError::Clock`] if the tick counter would overflow.
pub fn run_tick(
    sim: &mut Simulation,
    feedback_source: &mut dyn FeedbackSource,
) -> Result<TickSummary, TickError> {
    // 1. Advance
    let tick = sim.clock.advance()?;

    // 2. Feedback
    let pending = feedback_source.drain();
    let feedback_received = pending.len();
    for text in pending {
        let _ = sim.feedback.record(tick, text);
    }

    // 3. Observe
    let energy_flow = sim.state.energy_flow();
    let sentience_score = sim.state.sentience_score();
    let prediction = sim.state.predict_behavior(sim.predictor.as_mut());

    // 4. Evaluate
    let signal = sim.policy.evaluate(&sim.state);

    // 5. Adjust
    let adjustment = sim.policy.apply(&mut sim.state, signal);

    debug!(
        tick,
        energy_flow,
        sentience_score,
        prediction,
        signal = %signal,
        energy_before = adjustment.before.get(),
        energy_after = adjustment.after.get(),
        feedback_received,
        "Tick complete"
    );

    Ok(TickSummary {
        tick,
        energy_flow,
        sentience_score,
        prediction,
        adjustment,
        feedback_received,
    })
}
