//! Simulation loop runner with operator controls.
//!
//! This module provides [`run_simulation`], the top-level async function
//! that drives the tick loop with support for:
//!
//! - **Bounded simulation**: stop after `max_ticks` or `max_real_time_seconds`
//! - **Pause/resume**: operator can halt and continue the tick loop
//! - **Variable tick speed**: tick interval adjustable at runtime
//! - **Operator stop**: cooperative cancellation via [`OperatorState`]
//!
//! The runner wraps the single-tick [`run_tick`] function and adds the
//! control plane around it.
//!
//! [`run_tick`]: crate::tick::run_tick

use std::sync::Arc;

use tracing::{info, warn};

use crate::feedback::FeedbackSource;
use crate::operator::{OperatorState, SimulationEndReason};
use crate::tick::{self, Simulation, TickError, TickSummary};

/// Errors that can occur during the simulation run.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// A tick execution failed.
    #[error("tick error: {source}")]
    Tick {
        /// The underlying tick error.
        #[from]
        source: TickError,
    },
}

/// Result of the simulation run.
#[derive(Debug)]
pub struct SimulationResult {
    /// The reason the simulation ended.
    pub end_reason: SimulationEndReason,
    /// The last tick summary, if any tick completed.
    pub final_summary: Option<TickSummary>,
    /// Total number of ticks executed.
    pub total_ticks: u64,
}

/// Callback invoked after each tick completes.
pub trait TickCallback: Send {
    /// Called after a tick completes successfully.
    fn on_tick(&mut self, summary: &TickSummary, sim: &Simulation);
}

/// A no-op tick callback.
pub struct NoOpCallback;

impl TickCallback for NoOpCallback {
    fn on_tick(&mut self, _summary: &TickSummary, _sim: &Simulation) {}
}

/// Run the simulation loop until a termination condition is met.
///
/// The loop checks, in order: pause, stop request, wall-clock limit; then
/// runs a tick, notifies `callback`, checks the tick limit, and sleeps for
/// the current tick interval.
///
/// # Errors
///
/// Returns [`RunnerError`] if a tick execution fails unrecoverably.
pub async fn run_simulation(
    sim: &mut Simulation,
    feedback_source: &mut dyn FeedbackSource,
    operator: &Arc<OperatorState>,
    callback: &mut dyn TickCallback,
) -> Result<SimulationResult, RunnerError> {
    let mut last_summary: Option<TickSummary> = None;
    let mut total_ticks: u64 = 0;

    info!(
        max_ticks = operator.max_ticks(),
        max_real_time_seconds = operator.max_real_time_seconds(),
        tick_interval_ms = operator.tick_interval_ms(),
        energy_level = sim.state.energy_level().get(),
        "Simulation starting"
    );

    loop {
        // --- Check pause ---
        if operator.is_paused() {
            info!("Simulation paused, waiting for resume...");
            operator.wait_if_paused().await;
            info!("Simulation resumed");
        }

        // --- Check stop request (before tick) ---
        if operator.is_stop_requested() {
            info!("Operator stop requested");
            return finish(
                operator,
                SimulationEndReason::OperatorStop,
                last_summary,
                total_ticks,
            )
            .await;
        }

        // --- Check time limit (before tick) ---
        if operator.time_limit_reached() {
            info!(
                max_seconds = operator.max_real_time_seconds(),
                elapsed = operator.elapsed_seconds(),
                "Real-time limit reached"
            );
            return finish(
                operator,
                SimulationEndReason::MaxRealTimeReached,
                last_summary,
                total_ticks,
            )
            .await;
        }

        // --- Execute tick ---
        let summary = tick::run_tick(sim, feedback_source)?;
        total_ticks = total_ticks.saturating_add(1);

        // --- Notify callback ---
        callback.on_tick(&summary, sim);

        // --- Check tick limit (after tick) ---
        if operator.tick_limit_reached(summary.tick) {
            info!(
                tick = summary.tick,
                max_ticks = operator.max_ticks(),
                "Tick limit reached"
            );
            return finish(
                operator,
                SimulationEndReason::MaxTicksReached,
                Some(summary),
                total_ticks,
            )
            .await;
        }

        last_summary = Some(summary);

        // --- Sleep for tick interval ---
        let interval_ms = operator.tick_interval_ms();
        if interval_ms > 0 {
            tokio::time::sleep(tokio::time::Duration::from_millis(interval_ms)).await;
        } else {
            tokio::task::yield_now().await;
        }
    }
}

async fn finish(
    operator: &OperatorState,
    end_reason: SimulationEndReason,
    final_summary: Option<TickSummary>,
    total_ticks: u64,
) -> Result<SimulationResult, RunnerError> {
    operator.set_end_reason(end_reason).await;
    Ok(SimulationResult {
        end_reason,
        final_summary,
        total_ticks,
    })
}

/// Log the simulation end sequence.
pub fn log_simulation_end(result: &SimulationResult) {
    info!(
        reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        final_tick = result.final_summary.as_ref().map(|s| s.tick),
        "Simulation ended"
    );

    if let Some(ref summary) = result.final_summary {
        info!(
            tick = summary.tick,
            energy_level = summary.adjustment.after.get(),
            energy_flow = summary.energy_flow,
            sentience_score = summary.sentience_score,
            signal = %summary.signal(),
            "Final tick summary"
        );
    } else {
        warn!("Simulation ended with no ticks executed");
    }
}
