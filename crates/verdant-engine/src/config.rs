//! Simulation configuration.
//!
//! Controls how long the garden runs, what grows where, and how it is tended.
//! Configuration can be loaded from and saved to a TOML file.

use std::collections::BTreeSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use tracing_subscriber::filter::Directive;
use verdant_common::{VerdantError, VerdantResult, WorldCoord};

/// Configuration file name.
pub const CONFIG_FILE: &str = "verdant.toml";

/// Log directive used when none is configured.
pub const DEFAULT_LOG_FILTER: &str = "verdant=info";

/// One planted tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotConfig {
    /// Tile X coordinate
    pub x: i64,
    /// Tile Y coordinate
    pub y: i64,
    /// Variety name from the catalog
    pub variety: String,
}

impl PlotConfig {
    /// Create a plot entry.
    pub fn new(x: i64, y: i64, variety: impl Into<String>) -> Self {
        Self {
            x,
            y,
            variety: variety.into(),
        }
    }

    /// Tile position.
    #[must_use]
    pub const fn position(&self) -> WorldCoord {
        WorldCoord::new(self.x, self.y)
    }
}

/// Simulation parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    // === Run ===
    /// Game days to simulate
    pub days: u32,
    /// Game minutes per clock advance
    pub minutes_per_step: u32,

    // === Garden ===
    /// Planted tiles
    pub plots: Vec<PlotConfig>,
    /// Water level every tile is topped up to at the start of each day
    pub water_level: f32,
    /// Water lost by every tile each game hour
    pub water_loss_per_hour: f32,
    /// Fertilise tiles before planting
    pub fertilise: bool,
    /// Harvest adults at the end of each day
    pub harvest_adults: bool,
    /// Clear dead plants at the end of each day
    pub clear_dead: bool,

    // === Files ===
    /// Extra varieties in RON, added to the built-in ones
    pub catalog_path: Option<PathBuf>,
    /// Where the garden is saved when the run ends
    pub save_path: PathBuf,

    // === Diagnostics ===
    /// Single `tracing` filter directive, e.g. `verdant=debug`
    pub log_filter: String,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            // Run
            days: 3,
            minutes_per_step: 60,

            // Garden
            plots: vec![
                PlotConfig::new(0, 0, "Cosmic Cob"),
                PlotConfig::new(1, 0, "Aloe Vera"),
                PlotConfig::new(2, 0, "Hammer Plant"),
                PlotConfig::new(0, 1, "Space Snapper"),
                PlotConfig::new(1, 1, "Atomic Algae"),
            ],
            water_level: 0.6,
            water_loss_per_hour: 0.01,
            fertilise: true,
            harvest_adults: true,
            clear_dead: true,

            // Files
            catalog_path: None,
            save_path: PathBuf::from("garden.sav"),

            // Diagnostics
            log_filter: DEFAULT_LOG_FILTER.to_string(),
        }
    }
}

impl SimConfig {
    /// Parse configuration from TOML source.
    pub fn parse(source: &str) -> VerdantResult<Self> {
        toml::from_str(source).map_err(|e| VerdantError::Config(e.to_string()))
    }

    /// Read configuration from a specific path without logging.
    /// Returns `None` if the file doesn't exist.
    pub fn read_from<P: AsRef<Path>>(path: P) -> VerdantResult<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(path)?;
        Self::parse(&contents).map(Some)
    }

    /// Load configuration from a specific path.
    /// Returns default config if the file doesn't exist or is invalid.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match Self::read_from(path) {
            Ok(Some(config)) => {
                info!("Loaded config from {}", path.display());
                config
            },
            Ok(None) => {
                info!("Config file {} not found, using defaults", path.display());
                Self::default()
            },
            Err(e) => {
                warn!("Failed to load config file {}: {e}", path.display());
                Self::default()
            },
        }
    }

    /// Save configuration to a specific path.
    pub fn save_to<P: AsRef<Path>>(&self, path: P) -> VerdantResult<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let contents =
            toml::to_string_pretty(self).map_err(|e| VerdantError::Serialization(e.to_string()))?;

        let mut file = fs::File::create(path)?;
        file.write_all(contents.as_bytes())?;

        info!("Saved config to {}", path.display());
        Ok(())
    }

    /// Validate and clamp configuration values to sensible ranges.
    ///
    /// Later plots on an already planted tile are dropped.
    pub fn validate(&mut self) {
        self.days = self.days.clamp(1, 365);
        self.minutes_per_step = self.minutes_per_step.clamp(1, 24 * 60);

        self.water_level = self.water_level.clamp(0.0, 1.0);
        self.water_loss_per_hour = self.water_loss_per_hour.clamp(0.0, 1.0);

        let mut seen = BTreeSet::new();
        self.plots.retain(|plot| {
            let fresh = seen.insert(plot.position());
            if !fresh {
                warn!(
                    "Dropping {} at {}: tile already planted",
                    plot.variety,
                    plot.position()
                );
            }
            fresh
        });

        if self.log_filter.trim().is_empty() || self.log_filter.parse::<Directive>().is_err() {
            warn!(
                "Invalid log filter {:?}, using {DEFAULT_LOG_FILTER}",
                self.log_filter
            );
            self.log_filter = DEFAULT_LOG_FILTER.to_string();
        }
    }

    /// The configured log filter as a `tracing` directive.
    pub fn log_directive(&self) -> VerdantResult<Directive> {
        self.log_filter
            .parse()
            .map_err(|e| VerdantError::Config(format!("log filter {:?}: {e}", self.log_filter)))
    }
}
