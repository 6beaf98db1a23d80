//! Headless garden run.
//!
//! Builds a [`Garden`] from a [`SimConfig`], tends it day by day, and saves
//! it when the run ends.

use std::path::Path;

use thiserror::Error;
use tracing::{debug, info, warn};
use verdant_common::WorldCoord;
use verdant_gameplay::catalog::{CatalogError, PlantCatalog};
use verdant_gameplay::environment::GrowingMedium;
use verdant_gameplay::garden::{Garden, GardenError};
use verdant_gameplay::save::{GardenSave, SaveError};
use verdant_gameplay::stage::GrowthStage;
use verdant_gameplay::time::MINUTES_PER_DAY;

use crate::config::SimConfig;

/// Errors from a simulation run.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Catalog could not be loaded
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Garden operation failed
    #[error("garden error: {0}")]
    Garden(#[from] GardenError),

    /// Save could not be written or read back
    #[error("save error: {0}")]
    Save(#[from] SaveError),

    /// Reloaded save differs from the garden
    #[error("save round trip mismatch: {0}")]
    RoundTrip(String),
}

/// Result type for simulation operations.
pub type SimulationResult<T> = Result<T, SimulationError>;

/// End-of-day state of one plant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlantStatus {
    /// Tile of the plant.
    pub position: WorldCoord,
    /// Variety name.
    pub name: String,
    /// Current stage.
    pub stage: GrowthStage,
    /// Current health.
    pub health: u32,
}

/// Totals for a finished run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Days simulated.
    pub days: u32,
    /// Stage transitions seen.
    pub stage_changes: usize,
    /// Plants harvested by the runner.
    pub harvested: u32,
    /// Dead plants cleared by the runner.
    pub cleared: u32,
    /// Items dropped by harvests and clears.
    pub items_dropped: usize,
    /// Plants still on the garden.
    pub plants: Vec<PlantStatus>,
    /// Live plant counter.
    pub alive: u32,
    /// Decaying plant counter.
    pub decaying: u32,
    /// Planet oxygen at the end.
    pub oxygen: u64,
}

/// A configured garden and the schedule that tends it.
#[derive(Debug)]
pub struct Simulation {
    config: SimConfig,
    garden: Garden,
}

impl Simulation {
    /// Build the garden: load the catalog, till and plant every plot.
    pub fn new(mut config: SimConfig) -> SimulationResult<Self> {
        config.validate();

        let catalog = load_catalog(&config)?;
        let mut garden = Garden::new(catalog).with_water_loss(config.water_loss_per_hour);

        for plot in &config.plots {
            let position = plot.position();
            garden.till(position);
            if config.fertilise {
                garden.fertilise(position)?;
            }
            garden.plant(position, &plot.variety)?;
            debug!("Planted {} at {position}", plot.variety);
        }

        info!(
            "Garden ready: {} plots, {} varieties",
            config.plots.len(),
            garden.catalog().len()
        );
        Ok(Self { config, garden })
    }

    /// The garden being simulated.
    #[must_use]
    pub const fn garden(&self) -> &Garden {
        &self.garden
    }

    /// The validated configuration.
    #[must_use]
    pub const fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Run every configured day.
    pub fn run(&mut self) -> SimulationResult<RunSummary> {
        let mut summary = RunSummary::default();
        for _ in 0..self.config.days {
            self.run_day(&mut summary)?;
        }
        self.fill_totals(&mut summary);

        info!(
            "Run finished after {} days: {} alive, {} decaying, {} harvested, oxygen {}",
            summary.days, summary.alive, summary.decaying, summary.harvested, summary.oxygen
        );
        Ok(summary)
    }

    /// Simulate one day: water in the morning, tend in the evening.
    pub fn run_day(&mut self, summary: &mut RunSummary) -> SimulationResult<()> {
        self.top_up_water()?;

        let mut remaining = MINUTES_PER_DAY as u32;
        while remaining > 0 {
            let step = self.config.minutes_per_step.min(remaining);
            let report = self.garden.advance_minutes(step)?;
            for change in &report.stage_changes {
                debug!(
                    "{} at {}: {} -> {}",
                    self.plant_name(change.position),
                    change.position,
                    change.from,
                    change.to
                );
            }
            summary.stage_changes += report.stage_changes.len();
            remaining -= step;
        }
        summary.days += 1;

        self.tend(summary)?;
        for event in self.garden.drain_events() {
            debug!("Mission event: {event:?}");
        }
        info!(
            "{}: {} plants, {} alive, oxygen {}",
            self.garden.clock().format_time(),
            self.garden.plant_count(),
            self.garden.info().alive(),
            self.garden.oxygen_level()
        );
        Ok(())
    }

    /// Write the garden to the configured save path and check it reads back.
    pub fn save(&self) -> SimulationResult<GardenSave> {
        let save = self.garden.snapshot();
        save.write_to(&self.config.save_path)?;
        verify_save(&self.config.save_path, &save)?;
        Ok(save)
    }

    fn top_up_water(&mut self) -> SimulationResult<()> {
        for plot in &self.config.plots {
            let position = plot.position();
            let Some(tile) = self.garden.tile(position) else {
                continue;
            };
            let missing = self.config.water_level - tile.water_content();
            if missing > 0.0 {
                self.garden.water(position, missing)?;
            }
        }
        Ok(())
    }

    fn tend(&mut self, summary: &mut RunSummary) -> SimulationResult<()> {
        let ripe: Vec<(WorldCoord, GrowthStage)> = self
            .garden
            .plants()
            .map(|(position, plant)| (*position, plant.stage()))
            .collect();

        for (position, stage) in ripe {
            match stage {
                GrowthStage::Adult if self.config.harvest_adults => {
                    if self.garden.harvest(position)? {
                        summary.harvested += 1;
                    }
                },
                GrowthStage::Dead if self.config.clear_dead => {
                    self.garden.clear(position)?;
                    summary.cleared += 1;
                },
                _ => {},
            }
        }

        let dropped = self.garden.take_spawned_items();
        if !dropped.is_empty() {
            debug!("Collected {} items", dropped.len());
        }
        summary.items_dropped += dropped.len();
        Ok(())
    }

    fn fill_totals(&self, summary: &mut RunSummary) {
        summary.plants = self
            .garden
            .plants()
            .map(|(position, plant)| PlantStatus {
                position: *position,
                name: plant.name().to_string(),
                stage: plant.stage(),
                health: plant.health(),
            })
            .collect();
        summary.alive = self.garden.info().alive();
        summary.decaying = self.garden.info().decaying();
        summary.oxygen = self.garden.oxygen_level();
    }

    fn plant_name(&self, position: WorldCoord) -> &str {
        self.garden
            .plant_at(position)
            .map_or("<removed>", |plant| plant.name())
    }
}

/// Built-in varieties plus any from the configured RON file.
pub fn load_catalog(config: &SimConfig) -> SimulationResult<PlantCatalog> {
    let mut catalog = PlantCatalog::with_defaults();
    if let Some(path) = &config.catalog_path {
        catalog.load_file(path)?;
    }
    Ok(catalog)
}

/// Read a save back and make sure it matches what was written.
pub fn verify_save(path: &Path, expected: &GardenSave) -> SimulationResult<()> {
    let loaded = GardenSave::read_from(path)?;
    if &loaded != expected {
        warn!("Save at {} does not match the garden", path.display());
        return Err(SimulationError::RoundTrip(path.display().to_string()));
    }
    debug!("Verified save at {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlotConfig;
    use std::fs;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> SimConfig {
        SimConfig {
            save_path: dir.path().join("garden.sav"),
            ..SimConfig::default()
        }
    }

    #[test]
    fn test_new_plants_every_plot() {
        let temp_dir = TempDir::new().expect("temp dir");
        let sim = Simulation::new(config_in(&temp_dir)).expect("build");

        assert_eq!(sim.garden().plant_count(), 5);
        assert_eq!(sim.garden().info().alive(), 5);
        let tile = sim.garden().tile(WorldCoord::new(0, 0)).expect("tile");
        assert!(tile.is_fertilised());
    }

    #[test]
    fn test_new_repairs_log_filter() {
        let temp_dir = TempDir::new().expect("temp dir");
        let config = SimConfig {
            log_filter: String::new(),
            ..config_in(&temp_dir)
        };
        assert!(config.log_directive().is_err());

        let sim = Simulation::new(config).expect("build");
        assert_eq!(sim.config().log_filter, crate::config::DEFAULT_LOG_FILTER);
        assert!(sim.config().log_directive().is_ok());
    }

    #[test]
    fn test_unknown_variety_fails() {
        let temp_dir = TempDir::new().expect("temp dir");
        let config = SimConfig {
            plots: vec![PlotConfig::new(0, 0, "Moon Melon")],
            ..config_in(&temp_dir)
        };
        let result = Simulation::new(config);
        assert!(matches!(
            result,
            Err(SimulationError::Garden(GardenError::UnknownVariety(_)))
        ));
    }

    #[test]
    fn test_run_harvests_cosmic_cob() {
        let temp_dir = TempDir::new().expect("temp dir");
        let config = SimConfig {
            days: 1,
            plots: vec![PlotConfig::new(0, 0, "Cosmic Cob")],
            water_level: 0.7,
            water_loss_per_hour: 0.0,
            ..config_in(&temp_dir)
        };
        let mut sim = Simulation::new(config).expect("build");
        let summary = sim.run().expect("run");

        assert_eq!(summary.days, 1);
        assert_eq!(summary.harvested, 1);
        assert!(summary.stage_changes > 0);
        assert!(summary.items_dropped >= 2);
        assert!(summary.plants.is_empty());
        assert_eq!(summary.alive, 0);
        assert_eq!(sim.garden().info().harvested("Cosmic Cob"), 1);
    }

    #[test]
    fn test_dry_garden_is_cleared() {
        let temp_dir = TempDir::new().expect("temp dir");
        let config = SimConfig {
            days: 1,
            plots: vec![PlotConfig::new(0, 0, "Aloe Vera")],
            water_level: 0.0,
            ..config_in(&temp_dir)
        };
        let mut sim = Simulation::new(config).expect("build");
        let summary = sim.run().expect("run");

        assert_eq!(summary.cleared, 1);
        assert_eq!(summary.harvested, 0);
        assert_eq!(summary.items_dropped, 1);
        assert_eq!(summary.alive, 0);
    }

    #[test]
    fn test_run_without_tending_keeps_plants() {
        let temp_dir = TempDir::new().expect("temp dir");
        let config = SimConfig {
            days: 1,
            harvest_adults: false,
            clear_dead: false,
            ..config_in(&temp_dir)
        };
        let mut sim = Simulation::new(config).expect("build");
        let summary = sim.run().expect("run");

        assert_eq!(summary.plants.len(), 5);
        assert_eq!(summary.harvested + summary.cleared, 0);
        assert_eq!(sim.garden().clock().day(), 1);
    }

    #[test]
    fn test_save_round_trip() {
        let temp_dir = TempDir::new().expect("temp dir");
        let config = SimConfig {
            days: 1,
            harvest_adults: false,
            ..config_in(&temp_dir)
        };
        let mut sim = Simulation::new(config).expect("build");
        sim.run().expect("run");

        let save = sim.save().expect("save");
        assert!(sim.config().save_path.exists());

        let restored =
            Garden::restore(load_catalog(sim.config()).expect("catalog"), &save).expect("restore");
        assert_eq!(restored.plant_count(), sim.garden().plant_count());
        assert_eq!(restored.clock(), sim.garden().clock());
    }

    #[test]
    fn test_verify_save_detects_mismatch() {
        let temp_dir = TempDir::new().expect("temp dir");
        let sim = Simulation::new(config_in(&temp_dir)).expect("build");
        let save = sim.save().expect("save");

        let mut other = save.clone();
        other.total_minutes += 1;
        let result = verify_save(&sim.config().save_path, &other);
        assert!(matches!(result, Err(SimulationError::RoundTrip(_))));
    }

    #[test]
    fn test_custom_catalog() {
        let temp_dir = TempDir::new().expect("temp dir");
        let catalog_path = temp_dir.path().join("plants.ron");
        fs::write(
            &catalog_path,
            r#"(
                version: (major: 1, minor: 0, patch: 0),
                plants: [
                    (
                        name: "Moon Melon",
                        category: "food",
                        description: "Grows in low gravity.",
                        ideal_water_level: 0.5,
                        adult_lifespan: 2,
                        max_health: 60,
                        initial_health: 5,
                        growth_thresholds: (11, 21, 41),
                        stage_health_fractions: (0.05, 0.1, 0.3),
                        adult_effect: None,
                        effect_radius: 2.0,
                    ),
                ],
            )"#,
        )
        .expect("write catalog");

        let config = SimConfig {
            catalog_path: Some(catalog_path),
            plots: vec![PlotConfig::new(0, 0, "Moon Melon")],
            ..config_in(&temp_dir)
        };
        let sim = Simulation::new(config).expect("build");
        assert!(sim.garden().catalog().contains("Moon Melon"));
        assert!(sim.garden().catalog().contains("Cosmic Cob"));
    }

    #[test]
    fn test_missing_catalog_file() {
        let temp_dir = TempDir::new().expect("temp dir");
        let config = SimConfig {
            catalog_path: Some(temp_dir.path().join("missing.ron")),
            ..config_in(&temp_dir)
        };
        let result = Simulation::new(config);
        assert!(matches!(
            result,
            Err(SimulationError::Catalog(CatalogError::NotFound(_)))
        ));
    }
}
