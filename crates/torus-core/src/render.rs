//! Energy-state rendering capability.
//!
//! Visualization is not part of the core. [`EnergyStateRenderer`] is the
//! seam a plotting or mesh backend would implement; the core only builds a
//! [`RenderFrame`] and hands it over on schedule. [`LogRenderer`] is the one
//! implementation shipped, and it writes the frame to the log.

use serde::Serialize;
use torus_types::{AdjustmentSignal, SentienceProfile};
use tracing::info;

use crate::state::SimulationState;

/// Errors a renderer may report.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The rendering backend failed.
    #[error("render backend error: {message}")]
    Backend {
        /// Description of the failure.
        message: String,
    },
}

/// Everything a renderer is given for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RenderFrame {
    /// Tick the frame was captured at.
    pub tick: u64,
    /// Energy level.
    pub energy_level: f64,
    /// Quartz state.
    pub quartz_state: f64,
    /// Derived energy flow.
    pub energy_flow: f64,
    /// Sentience sub-scores.
    pub sentience: SentienceProfile,
    /// Derived sentience score.
    pub sentience_score: f64,
    /// Policy signal evaluated this tick.
    pub signal: AdjustmentSignal,
}

impl RenderFrame {
    /// Capture a frame from the current state.
    pub fn capture(tick: u64, state: &SimulationState, signal: AdjustmentSignal) -> Self {
        Self {
            tick,
            energy_level: state.energy_level().get(),
            quartz_state: state.quartz_state().get(),
            energy_flow: state.energy_flow(),
            sentience: *state.sentience(),
            sentience_score: state.sentience_score(),
            signal,
        }
    }
}

/// A backend that can visualize energy states.
pub trait EnergyStateRenderer: Send {
    /// Render one frame.
    fn render(&mut self, frame: &RenderFrame) -> Result<(), RenderError>;
}

/// Renderer that writes frames to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogRenderer {
    frames_rendered: u64,
}

impl LogRenderer {
    /// Create a new log renderer.
    pub const fn new() -> Self {
        Self { frames_rendered: 0 }
    }

    /// Number of frames rendered so far.
    pub const fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }
}

impl EnergyStateRenderer for LogRenderer {
    fn render(&mut self, frame: &RenderFrame) -> Result<(), RenderError> {
        info!(
            tick = frame.tick,
            energy_level = frame.energy_level,
            quartz_state = frame.quartz_state,
            energy_flow = frame.energy_flow,
            sentience_score = frame.sentience_score,
            signal = %frame.signal,
            "Visualizing current energy states"
        );
        self.frames_rendered = self.frames_rendered.saturating_add(1);
        Ok(())
    }
}

/// Decides which ticks get rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderSchedule {
    interval_ticks: u64,
}

impl RenderSchedule {
    /// Render every `interval_ticks` ticks; 0 disables rendering.
    pub const fn new(interval_ticks: u64) -> Self {
        Self { interval_ticks }
    }

    /// Whether the given tick should be rendered.
    pub const fn is_due(&self, tick: u64) -> bool {
        match tick.checked_rem(self.interval_ticks) {
            Some(rem) => rem == 0,
            None => false,
        }
    }
}
