//! Operator control state for runtime simulation management.
//!
//! [`OperatorState`] is the cancellation token and control panel of the
//! run loop. It is shared through [`Arc`](std::sync::Arc) between the loop
//! and whoever steers it (the Ctrl-C handler in the engine, tests). The
//! operator can pause/resume, change tick speed, and request a clean stop.
//!
//! Mutable control fields are atomics so the loop reads them without locks.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, Notify};
use tokio::time::Instant;

use crate::config::SimulationBoundsConfig;

/// Reason why the simulation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SimulationEndReason {
    /// Reached the configured `max_ticks` limit.
    MaxTicksReached,
    /// Reached the configured `max_real_time_seconds` limit.
    MaxRealTimeReached,
    /// An operator issued a stop command.
    OperatorStop,
}

/// Shared operator control state.
#[derive(Debug)]
pub struct OperatorState {
    /// Whether the simulation is currently paused.
    paused: AtomicBool,

    /// Notification used to wake the loop on resume or stop.
    wake_notify: Notify,

    /// Whether a stop has been requested.
    stop_requested: AtomicBool,

    /// Current tick interval in milliseconds (runtime-adjustable).
    tick_interval_ms: AtomicU64,

    /// Monotonic instant when the operator state was created.
    started_at: Instant,

    /// Maximum number of ticks (0 = unlimited).
    max_ticks: u64,

    /// Maximum wall-clock seconds (0 = unlimited).
    max_real_time_seconds: u64,

    /// Reason the simulation ended, if it has.
    end_reason: Mutex<Option<SimulationEndReason>>,
}

impl OperatorState {
    /// Create a new operator state from the `simulation` config section.
    pub fn new(bounds: &SimulationBoundsConfig) -> Self {
        Self {
            paused: AtomicBool::new(false),
            wake_notify: Notify::new(),
            stop_requested: AtomicBool::new(false),
            tick_interval_ms: AtomicU64::new(bounds.tick_interval_ms),
            started_at: Instant::now(),
            max_ticks: bounds.max_ticks,
            max_real_time_seconds: bounds.max_real_time_seconds,
            end_reason: Mutex::new(None),
        }
    }

    // -----------------------------------------------------------------------
    // Pause / Resume
    // -----------------------------------------------------------------------

    /// Check whether the simulation is paused.
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    /// Pause the simulation. The loop will sleep until resumed or stopped.
    pub fn pause(&self) {
        self.paused.store(true, Ordering::Release);
    }

    /// Resume the simulation and wake the loop.
    pub fn resume(&self) {
        self.paused.store(false, Ordering::Release);
        self.wake_notify.notify_one();
    }

    /// Wait until the simulation is no longer paused or a stop is requested.
    ///
    /// Returns immediately if not paused.
    pub async fn wait_if_paused(&self) {
        while self.is_paused() && !self.is_stop_requested() {
            self.wake_notify.notified().await;
        }
    }

    // -----------------------------------------------------------------------
    // Stop
    // -----------------------------------------------------------------------

    /// Request a clean simulation stop. Also wakes a paused loop.
    pub fn request_stop(&self) {
        self.stop_requested.store(true, Ordering::Release);
        self.wake_notify.notify_one();
    }

    /// Check whether a stop has been requested.
    pub fn is_stop_requested(&self) -> bool {
        self.stop_requested.load(Ordering::Acquire)
    }

    /// Record the reason the simulation ended.
    pub async fn set_end_reason(&self, reason: SimulationEndReason) {
        let mut guard = self.end_reason.lock().await;
        *guard = Some(reason);
    }

    /// Get the reason the simulation ended, if it has.
    pub async fn end_reason(&self) -> Option<SimulationEndReason> {
        *self.end_reason.lock().await
    }

    // -----------------------------------------------------------------------
    // Tick Speed
    // -----------------------------------------------------------------------

    /// Get the current tick interval in milliseconds.
    pub fn tick_interval_ms(&self) -> u64 {
        self.tick_interval_ms.load(Ordering::Acquire)
    }

    /// Set the tick interval in milliseconds. Returns the previous interval.
    pub fn set_tick_interval_ms(&self, ms: u64) -> u64 {
        self.tick_interval_ms.swap(ms, Ordering::AcqRel)
    }

    // -----------------------------------------------------------------------
    // Boundaries
    // -----------------------------------------------------------------------

    /// Check whether the tick limit has been reached.
    ///
    /// Returns `true` if `max_ticks > 0` and `current_tick >= max_ticks`.
    pub const fn tick_limit_reached(&self, current_tick: u64) -> bool {
        self.max_ticks > 0 && current_tick >= self.max_ticks
    }

    /// Check whether the wall-clock time limit has been reached.
    pub fn time_limit_reached(&self) -> bool {
        self.max_real_time_seconds > 0 && self.elapsed_seconds() >= self.max_real_time_seconds
    }

    /// Whole seconds elapsed since the operator state was created.
    ///
    /// Measured on the monotonic clock, so system clock changes do not
    /// shorten or extend a run.
    pub fn elapsed_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    /// Configured tick limit (0 = unlimited).
    pub const fn max_ticks(&self) -> u64 {
        self.max_ticks
    }

    /// Configured wall-clock limit in seconds (0 = unlimited).
    pub const fn max_real_time_seconds(&self) -> u64 {
        self.max_real_time_seconds
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;

    fn bounds(max_ticks: u64, max_real_time_seconds: u64) -> SimulationBoundsConfig {
        SimulationBoundsConfig {
            max_ticks,
            max_real_time_seconds,
            tick_interval_ms: 10,
        }
    }

    #[test]
    fn tick_limit() {
        let op = OperatorState::new(&bounds(5, 0));
        assert!(!op.tick_limit_reached(4));
        assert!(op.tick_limit_reached(5));
        assert!(op.tick_limit_reached(6));
    }

    #[test]
    fn zero_tick_limit_is_unlimited() {
        let op = OperatorState::new(&bounds(0, 0));
        assert!(!op.tick_limit_reached(u64::MAX));
        assert!(!op.time_limit_reached());
    }

    #[test]
    fn tick_interval_is_adjustable() {
        let op = OperatorState::new(&bounds(0, 0));
        assert_eq!(op.tick_interval_ms(), 10);
        assert_eq!(op.set_tick_interval_ms(250), 10);
        assert_eq!(op.tick_interval_ms(), 250);
    }

    #[tokio::test(start_paused = true)]
    async fn time_limit_follows_monotonic_clock() {
        let op = OperatorState::new(&bounds(0, 3));
        assert_eq!(op.elapsed_seconds(), 0);
        assert!(!op.time_limit_reached());

        tokio::time::advance(Duration::from_millis(2_999)).await;
        assert_eq!(op.elapsed_seconds(), 2);
        assert!(!op.time_limit_reached());

        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(op.elapsed_seconds(), 3);
        assert!(op.time_limit_reached());
    }

    #[tokio::test]
    async fn stop_wakes_paused_waiter() {
        let op = Arc::new(OperatorState::new(&bounds(0, 0)));
        op.pause();

        let waiter = {
            let op = Arc::clone(&op);
            tokio::spawn(async move { op.wait_if_paused().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        op.request_stop();

        let joined = tokio::time::timeout(Duration::from_secs(1), waiter).await;
        assert!(joined.is_ok(), "waiter did not wake on stop");
    }

    #[tokio::test]
    async fn resume_wakes_paused_waiter() {
        let op = Arc::new(OperatorState::new(&bounds(0, 0)));
        op.pause();
        assert!(op.is_paused());

        let waiter = {
            let op = Arc::clone(&op);
            tokio::spawn(async move { op.wait_if_paused().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        op.resume();

        let joined = tokio::time::timeout(Duration::from_secs(1), waiter).await;
        assert!(joined.is_ok(), "waiter did not wake on resume");
        assert!(!op.is_paused());
    }

    #[tokio::test]
    async fn end_reason_round_trip() {
        let op = OperatorState::new(&bounds(0, 0));
        assert_eq!(op.end_reason().await, None);
        op.set_end_reason(SimulationEndReason::OperatorStop).await;
        assert_eq!(op.end_reason().await, Some(SimulationEndReason::OperatorStop));
    }
}
