//! Engine binary for the Quartz Torus simulation.
//!
//! Loads configuration, wires feedback intake and operator controls, and
//! runs the bounded tick loop until a termination condition is met.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `torus-config.yaml` (or `$TORUS_CONFIG`,
//!    which must exist)
//! 2. Initialize structured logging (tracing), then report a missing
//!    default config file
//! 3. Assemble the simulation from configuration
//! 4. Create operator state and hook Ctrl-C to a clean stop
//! 5. Start the stdin feedback reader (if enabled)
//! 6. Run the simulation loop
//! 7. Log the result and the final state snapshot

mod config_loader;
mod error;
mod log_callback;
mod stdin_feedback;

use std::path::Path;
use std::sync::Arc;

use torus_core::config::LoggingConfig;
use torus_core::feedback::{ChannelFeedbackSource, FeedbackSource, NoFeedback};
use torus_core::operator::OperatorState;
use torus_core::render::{LogRenderer, RenderSchedule};
use torus_core::runner;
use torus_core::tick::Simulation;
use torus_types::RunId;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config_loader::{DEFAULT_CONFIG_PATH, LoadedConfig};
use crate::error::EngineError;
use crate::log_callback::LogCallback;

/// Application entry point.
///
/// # Errors
///
/// Returns an error if any initialization step or the simulation itself fails.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Load configuration.
    let LoadedConfig {
        config,
        path: config_path,
        found,
    } = config_loader::load_config(Path::new(DEFAULT_CONFIG_PATH), |key| {
        std::env::var(key).ok()
    })?;

    // 2. Initialize structured logging.
    init_logging(&config.logging)?;
    if !found {
        warn!(
            config_path = %config_path.display(),
            "Config file not found, using defaults"
        );
    }

    let run_id = RunId::new();
    info!(%run_id, "torus-engine starting");
    info!(
        config_path = %config_path.display(),
        max_ticks = config.simulation.max_ticks,
        max_real_time_seconds = config.simulation.max_real_time_seconds,
        tick_interval_ms = config.simulation.tick_interval_ms,
        seeded = config.prediction.seed.is_some(),
        "Configuration loaded"
    );

    // 3. Assemble simulation.
    let mut sim = Simulation::from_config(&config)?;
    info!(
        energy_level = sim.state.energy_level().get(),
        quartz_state = sim.state.quartz_state().get(),
        energy_flow = sim.state.energy_flow(),
        sentience_score = sim.state.sentience_score(),
        "Simulation state initialized"
    );

    // 4. Operator state and Ctrl-C.
    let operator = Arc::new(OperatorState::new(&config.simulation));
    {
        let operator = Arc::clone(&operator);
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    info!("Ctrl-C received, requesting stop");
                    operator.request_stop();
                }
                Err(e) => warn!(error = %e, "failed to listen for Ctrl-C"),
            }
        });
    }

    // 5. Feedback intake.
    let mut feedback_source: Box<dyn FeedbackSource> = if config.feedback.read_stdin {
        info!("Please provide your feedback on the agent's performance (one line per entry)");
        Box::new(ChannelFeedbackSource::new(
            stdin_feedback::spawn_stdin_reader(),
        ))
    } else {
        Box::new(NoFeedback)
    };

    let mut callback = LogCallback::new(
        RenderSchedule::new(config.render.interval_ticks),
        Box::new(LogRenderer::new()),
    );

    // 6. Run the simulation.
    let result = runner::run_simulation(
        &mut sim,
        feedback_source.as_mut(),
        &operator,
        &mut callback,
    )
    .await
    .map_err(EngineError::from)?;

    // 7. Log results.
    runner::log_simulation_end(&result);

    let snapshot = serde_json::to_string(&sim.state).map_err(EngineError::from)?;
    info!(
        %run_id,
        snapshot = %snapshot,
        feedback_total = sim.feedback.total_received(),
        frames_failed = callback.frames_failed(),
        "Final state snapshot"
    );

    info!(
        end_reason = ?result.end_reason,
        total_ticks = result.total_ticks,
        "torus-engine shutdown complete"
    );

    Ok(())
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over the configured level when set.
fn init_logging(config: &LoggingConfig) -> Result<(), EngineError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| EngineError::Logging {
        message: format!("{e}"),
    })
}
