//! Tick callback that logs summaries and renders energy states on schedule.

use torus_core::render::{EnergyStateRenderer, RenderFrame, RenderSchedule};
use torus_core::runner::TickCallback;
use torus_core::tick::{Simulation, TickSummary};
use tracing::{debug, warn};

/// Logs each tick summary as JSON at debug level and hands scheduled
/// frames to the renderer.
pub struct LogCallback {
    schedule: RenderSchedule,
    renderer: Box<dyn EnergyStateRenderer>,
    frames_failed: u64,
}

impl LogCallback {
    /// Create a callback rendering through `renderer` on `schedule`.
    pub fn new(schedule: RenderSchedule, renderer: Box<dyn EnergyStateRenderer>) -> Self {
        Self {
            schedule,
            renderer,
            frames_failed: 0,
        }
    }

    /// Number of frames the renderer rejected.
    pub const fn frames_failed(&self) -> u64 {
        self.frames_failed
    }
}

impl TickCallback for LogCallback {
    fn on_tick(&mut self, summary: &TickSummary, sim: &Simulation) {
        match serde_json::to_string(summary) {
            Ok(json) => debug!(tick = summary.tick, summary = %json, "Tick summary"),
            Err(e) => warn!(tick = summary.tick, error = %e, "failed to serialize tick summary"),
        }

        if self.schedule.is_due(summary.tick) {
            let frame = RenderFrame::capture(summary.tick, &sim.state, summary.signal());
            if let Err(e) = self.renderer.render(&frame) {
                self.frames_failed = self.frames_failed.saturating_add(1);
                warn!(tick = summary.tick, error = %e, "failed to render energy state");
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use torus_core::feedback::{FeedbackLog, NoFeedback};
    use torus_core::policy::AdjustmentPolicy;
    use torus_core::predict::UniformPredictor;
    use torus_core::render::RenderError;
    use torus_core::state::SimulationState;
    use torus_core::tick;

    use super::*;

    /// Renderer that always fails.
    struct Broken;

    impl EnergyStateRenderer for Broken {
        fn render(&mut self, _frame: &RenderFrame) -> Result<(), RenderError> {
            Err(RenderError::Backend {
                message: "no display".to_owned(),
            })
        }
    }

    #[test]
    fn render_failures_are_counted_not_fatal() {
        let mut sim = Simulation::new(
            SimulationState::default(),
            AdjustmentPolicy::default(),
            Box::new(UniformPredictor::from_seed(1)),
            FeedbackLog::new(1),
        );
        let mut callback = LogCallback::new(RenderSchedule::new(2), Box::new(Broken));

        for _ in 0..6 {
            let summary = tick::run_tick(&mut sim, &mut NoFeedback).unwrap();
            callback.on_tick(&summary, &sim);
        }
        assert_eq!(callback.frames_failed(), 3);
    }
}
