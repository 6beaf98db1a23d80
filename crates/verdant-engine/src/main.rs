//! # Verdant
//!
//! Command-line entry point: `verdant [config.toml]`.
//!
//! Grows the configured garden, logs a daily report, and saves the result.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use verdant_engine::{SimConfig, Simulation, CONFIG_FILE};

/// Main entry point.
fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .map_or_else(|| PathBuf::from(CONFIG_FILE), PathBuf::from);
    let loaded = SimConfig::read_from(&config_path);
    let config = match &loaded {
        Ok(Some(config)) => config.clone(),
        Ok(None) | Err(_) => SimConfig::default(),
    };

    // Validation warnings are reported again once the garden is built
    let mut validated = config.clone();
    validated.validate();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive(validated.log_directive()?))
        .init();

    info!("Verdant starting...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));
    match loaded {
        Ok(Some(_)) => info!("Loaded config from {}", config_path.display()),
        Ok(None) => info!(
            "Config file {} not found, using defaults",
            config_path.display()
        ),
        Err(e) => warn!(
            "Failed to load config file {}: {e}; using defaults",
            config_path.display()
        ),
    }

    let mut simulation = Simulation::new(config).context("failed to build garden")?;
    let summary = simulation.run().context("simulation failed")?;

    for plant in &summary.plants {
        info!(
            "{} at {}: {} ({} hp)",
            plant.name, plant.position, plant.stage, plant.health
        );
    }

    let save = simulation.save().context("failed to save garden")?;
    info!(
        "Saved {} plants to {}",
        save.plants.len(),
        simulation.config().save_path.display()
    );

    info!("Verdant shutdown complete");
    Ok(())
}
