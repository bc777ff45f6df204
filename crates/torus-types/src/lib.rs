//! Shared type definitions for the Quartz Torus simulation.
//!
//! # Modules
//!
//! - [`unit`] -- [`Unit`], the validated `[0, 1]` scalar behind every
//!   bounded state variable
//! - [`enums`] -- Adjustment signals, sentience dimensions, thermodynamic keys
//! - [`structs`] -- [`SentienceProfile`]
//! - [`ids`] -- Type-safe UUID wrappers

pub mod enums;
pub mod ids;
pub mod structs;
pub mod unit;

// Re-export all public types at crate root for convenience.
pub use enums::{AdjustmentSignal, SentienceDimension, ThermodynamicProperty};
pub use ids::{FeedbackId, RunId};
pub use structs::SentienceProfile;
pub use unit::{OutOfRangeError, Unit};
