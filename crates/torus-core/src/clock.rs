//! Simulation clock.
//!
//! The tick counter is the single source of temporal truth. It starts at 0
//! and is advanced once at the start of every tick with checked arithmetic.

use chrono::{DateTime, Utc};

/// Errors that can occur during clock operations.
#[derive(Debug, thiserror::Error)]
pub enum ClockError {
    /// Tick counter would overflow.
    #[error("tick counter overflow: cannot advance beyond u64::MAX")]
    TickOverflow,
}

/// Tick counter plus the wall-clock time the run started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationClock {
    /// Current tick number (0 before the first tick runs).
    tick: u64,

    /// Wall-clock time the clock was created.
    started_at: DateTime<Utc>,
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SimulationClock {
    /// Create a clock at tick 0.
    pub fn new() -> Self {
        Self {
            tick: 0,
            started_at: Utc::now(),
        }
    }

    /// Create a clock at an arbitrary tick (useful for tests).
    pub fn from_tick(tick: u64) -> Self {
        Self {
            tick,
            started_at: Utc::now(),
        }
    }

    /// Advance the clock by one tick. Returns the new tick number.
    ///
    /// # Errors
    ///
    /// Returns [`ClockError::TickOverflow`] if the tick counter would exceed
    /// `u64::MAX`.
    pub fn advance(&mut self) -> Result<u64, ClockError> {
        self.tick = self.tick.checked_add(1).ok_or(ClockError::TickOverflow)?;
        Ok(self.tick)
    }

    /// Return the current tick number.
    pub const fn tick(&self) -> u64 {
        self.tick
    }

    /// Return the wall-clock start time.
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }
}
