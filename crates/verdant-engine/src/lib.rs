//! Verdant Engine - headless runner for the Verdant garden simulation.
//!
//! This crate loads a simulation config, grows a garden for the configured
//! number of days, and writes the resulting save file.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod config;
pub mod simulation;

pub use config::{PlotConfig, SimConfig, CONFIG_FILE};
pub use simulation::{RunSummary, Simulation, SimulationError, SimulationResult};
