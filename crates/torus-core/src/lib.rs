//! Simulation state, adjustment policy, and run loop for the Quartz Torus
//! simulation.
//!
//! The torus is a small bounded state (energy level, sentience sub-scores,
//! quartz state) advanced by a tick cycle that observes derived quantities
//! and nudges the energy level back into a target band.
//!
//! # Modules
//!
//! - [`state`] -- [`SimulationState`] with its pure derived quantities.
//! - [`policy`] -- Threshold classification and step adjustment.
//! - [`predict`] -- [`BehaviorPredictor`] trait and the uniform predictor.
//! - [`feedback`] -- Free-text feedback log and feedback sources.
//! - [`render`] -- Energy-state rendering capability.
//! - [`clock`] -- Tick counter.
//! - [`config`] -- Configuration loading from `torus-config.yaml`.
//! - [`operator`] -- Shared pause/resume/stop controls.
//! - [`tick`] -- The single-tick cycle.
//! - [`runner`] -- The bounded async run loop.
//!
//! [`SimulationState`]: state::SimulationState
//! [`BehaviorPredictor`]: predict::BehaviorPredictor

pub mod clock;
pub mod config;
pub mod feedback;
pub mod operator;
pub mod policy;
pub mod predict;
pub mod render;
pub mod runner;
pub mod state;
pub mod tick;
