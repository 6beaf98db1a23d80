//! Garden: tilled tiles, the plants growing on them, and the services they
//! share.
//!
//! The garden owns one in-memory implementation of every plant service and
//! hands each plant a [`PlantContext`] built from them plus the plant's own
//! tile. Clock ticks are dispatched to plants in tile coordinate order.

use std::collections::BTreeMap;

use thiserror::Error;
use tracing::{debug, info, warn};
use verdant_common::{EntityId, SchemaVersion, WorldCoord};

use crate::catalog::PlantCatalog;
use crate::environment::{CropTile, GrowingMedium};
use crate::events::{EventBus, MissionEvent};
use crate::plant::{Plant, PlantError};
use crate::save::{GardenSave, PlantSaveData, SaveError};
use crate::services::{ItemFactory, OxygenLevel, PlantContext, PlantInfo, SpawnedItem};
use crate::stage::GrowthStage;
use crate::time::{ClockTick, GameClock};

/// Water lost by every tile each game hour.
pub const DEFAULT_WATER_LOSS_PER_HOUR: f32 = 0.01;
/// Starting planet oxygen.
pub const DEFAULT_OXYGEN_LEVEL: u64 = 1000;

/// Errors from garden operations.
#[derive(Debug, Error)]
pub enum GardenError {
    /// Tile has not been tilled
    #[error("tile {0} is not tilled")]
    NotTilled(WorldCoord),

    /// Tile already holds a plant
    #[error("tile {0} is already occupied")]
    Occupied(WorldCoord),

    /// No plant on the tile
    #[error("no plant at {0}")]
    NoPlant(WorldCoord),

    /// Variety not in the catalog
    #[error("unknown plant variety: {0}")]
    UnknownVariety(String),

    /// Plant operation failed
    #[error(transparent)]
    Plant(#[from] PlantError),

    /// Save could not be read or written
    #[error(transparent)]
    Save(#[from] SaveError),
}

/// Result type for garden operations.
pub type GardenResult<T> = Result<T, GardenError>;

/// A plant changed stage during a clock advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageChange {
    /// Tile of the plant.
    pub position: WorldCoord,
    /// Stage before the tick.
    pub from: GrowthStage,
    /// Stage after the tick.
    pub to: GrowthStage,
}

/// What happened during [`Garden::advance_minutes`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Clock ticks dispatched.
    pub ticks: usize,
    /// Days that ended.
    pub days: u32,
    /// Stage changes, in order.
    pub stage_changes: Vec<StageChange>,
}

/// The services plants share.
#[derive(Debug)]
struct Services {
    info: PlantInfo,
    items: ItemFactory,
    missions: EventBus,
    oxygen: OxygenLevel,
}

impl Services {
    fn context<'a>(&'a mut self, tile: &'a mut CropTile) -> PlantContext<'a> {
        PlantContext {
            medium: tile,
            counters: &mut self.info,
            entities: &mut self.items,
            missions: &mut self.missions,
            oxygen: &mut self.oxygen,
        }
    }
}

/// Registry of tiles and live plants.
#[derive(Debug)]
pub struct Garden {
    catalog: PlantCatalog,
    clock: GameClock,
    tiles: BTreeMap<WorldCoord, CropTile>,
    plants: BTreeMap<WorldCoord, Plant>,
    services: Services,
    water_loss_per_hour: f32,
}

impl Garden {
    /// Create an empty garden growing varieties from `catalog`.
    #[must_use]
    pub fn new(catalog: PlantCatalog) -> Self {
        let items = ItemFactory::with_kinds(catalog.item_kinds());
        Self {
            catalog,
            clock: GameClock::new(),
            tiles: BTreeMap::new(),
            plants: BTreeMap::new(),
            services: Services {
                info: PlantInfo::new(),
                items,
                missions: EventBus::default(),
                oxygen: OxygenLevel::new(DEFAULT_OXYGEN_LEVEL),
            },
            water_loss_per_hour: DEFAULT_WATER_LOSS_PER_HOUR,
        }
    }

    /// Create an empty garden with the built-in varieties.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(PlantCatalog::with_defaults())
    }

    /// Set hourly evaporation.
    #[must_use]
    pub fn with_water_loss(mut self, per_hour: f32) -> Self {
        self.water_loss_per_hour = per_hour.max(0.0);
        self
    }

    /// Variety catalog.
    #[must_use]
    pub fn catalog(&self) -> &PlantCatalog {
        &self.catalog
    }

    /// Game clock.
    #[must_use]
    pub const fn clock(&self) -> &GameClock {
        &self.clock
    }

    /// Population counters.
    #[must_use]
    pub const fn info(&self) -> &PlantInfo {
        &self.services.info
    }

    /// Planet oxygen.
    #[must_use]
    pub const fn oxygen_level(&self) -> u64 {
        self.services.oxygen.level()
    }

    /// Items dropped so far.
    #[must_use]
    pub fn spawned_items(&self) -> &[SpawnedItem] {
        self.services.items.spawned()
    }

    /// Take every dropped item, e.g. into an inventory.
    pub fn take_spawned_items(&mut self) -> Vec<SpawnedItem> {
        self.services.items.take_spawned()
    }

    /// Drain pending mission events.
    pub fn drain_events(&self) -> Vec<MissionEvent> {
        self.services.missions.drain()
    }

    /// Tile at `position`, if tilled.
    #[must_use]
    pub fn tile(&self, position: WorldCoord) -> Option<&CropTile> {
        self.tiles.get(&position)
    }

    /// Plant at `position`.
    #[must_use]
    pub fn plant_at(&self, position: WorldCoord) -> Option<&Plant> {
        self.plants.get(&position)
    }

    /// Number of live plants.
    #[must_use]
    pub fn plant_count(&self) -> usize {
        self.plants.len()
    }

    /// Iterate over plants in coordinate order.
    pub fn plants(&self) -> impl Iterator<Item = (&WorldCoord, &Plant)> {
        self.plants.iter()
    }

    /// Till a tile. Returns false if it already was.
    pub fn till(&mut self, position: WorldCoord) -> bool {
        if self.tiles.contains_key(&position) {
            return false;
        }
        self.tiles.insert(position, CropTile::new());
        true
    }

    /// Pour water on a tile.
    pub fn water(&mut self, position: WorldCoord, amount: f32) -> GardenResult<()> {
        self.tiles
            .get_mut(&position)
            .ok_or(GardenError::NotTilled(position))?
            .water(amount);
        Ok(())
    }

    /// Fertilise a tile. Returns false if it already was.
    pub fn fertilise(&mut self, position: WorldCoord) -> GardenResult<bool> {
        Ok(self
            .tiles
            .get_mut(&position)
            .ok_or(GardenError::NotTilled(position))?
            .fertilise())
    }

    /// Plant a seed of `variety` on a tilled, empty tile.
    pub fn plant(&mut self, position: WorldCoord, variety: &str) -> GardenResult<EntityId> {
        let profile = self
            .catalog
            .get(variety)
            .ok_or_else(|| GardenError::UnknownVariety(variety.to_string()))?;
        let tile = self
            .tiles
            .get_mut(&position)
            .ok_or(GardenError::NotTilled(position))?;
        if tile.is_occupied() || self.plants.contains_key(&position) {
            return Err(GardenError::Occupied(position));
        }

        let mut plant = Plant::new(profile, position);
        let id = plant.id();
        tile.occupy(id);
        let planted = plant.on_planted(&mut self.services.context(tile));
        self.plants.insert(position, plant);
        planted?;
        Ok(id)
    }

    /// Advance the clock by `minutes` and let every plant react.
    ///
    /// Every tick reaches every plant even if one of them reports a service
    /// failure; the first failure is returned at the end.
    pub fn advance_minutes(&mut self, minutes: u32) -> GardenResult<TickReport> {
        let ticks = self.clock.advance(minutes);
        let mut report = TickReport {
            ticks: ticks.len(),
            ..TickReport::default()
        };
        let mut first_error = None;

        for tick in ticks {
            match tick {
                ClockTick::Hour { .. } => self.evaporate(),
                ClockTick::Day { day } => {
                    report.days += 1;
                    debug!("Day {day} begins");
                },
                ClockTick::Minute { .. } => {},
            }

            for (position, plant) in &mut self.plants {
                let Some(tile) = self.tiles.get_mut(position) else {
                    warn!("Plant at {position} has no tile");
                    continue;
                };
                let before = plant.stage();
                if let Err(e) = plant.on_tick(tick, &mut self.services.context(tile)) {
                    first_error.get_or_insert(e);
                }
                if plant.stage() != before {
                    report.stage_changes.push(StageChange {
                        position: *position,
                        from: before,
                        to: plant.stage(),
                    });
                }
            }
        }

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(report),
        }
    }

    /// Harvest the plant at `position`. Returns false if it is not an adult.
    pub fn harvest(&mut self, position: WorldCoord) -> GardenResult<bool> {
        let harvested = self.with_plant(position, Plant::harvest)?;
        self.sweep();
        Ok(harvested)
    }

    /// Damage the plant at `position`.
    pub fn attack(&mut self, position: WorldCoord, damage: u32) -> GardenResult<()> {
        self.with_plant(position, |plant, ctx| plant.attack(damage, ctx))?;
        self.sweep();
        Ok(())
    }

    /// Remove the plant at `position`, dropping its seed.
    pub fn clear(&mut self, position: WorldCoord) -> GardenResult<()> {
        self.with_plant(position, Plant::destroy)?;
        self.sweep();
        Ok(())
    }

    /// Let the predator at `position` eat. Returns false for non-predators.
    pub fn feed(&mut self, position: WorldCoord) -> GardenResult<bool> {
        self.with_plant(position, |plant, ctx| plant.start_eating(ctx.missions))
    }

    /// Debug command for the plant at `position`.
    pub fn force_growth_stage(&mut self, position: WorldCoord, label: &str) -> GardenResult<()> {
        self.with_plant(position, |plant, ctx| {
            plant.force_growth_stage(label, ctx.counters)
        })
    }

    /// Debug command for every plant.
    pub fn force_all(&mut self, label: &str) -> GardenResult<()> {
        let mut first_error = None;
        for plant in self.plants.values_mut() {
            if let Err(e) = plant.force_growth_stage(label, &mut self.services.info) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), |e| Err(e.into()))
    }

    /// Storm damage to every plant.
    pub fn damage_all(&mut self, amount: u32) {
        for plant in self.plants.values_mut() {
            plant.weather_damage(amount);
        }
        debug!("Storm damaged {} plants by {amount}", self.plants.len());
    }

    /// Hover text for the plant at `position`.
    #[must_use]
    pub fn summary(&self, position: WorldCoord) -> Option<String> {
        let plant = self.plants.get(&position)?;
        let tile = self.tiles.get(&position)?;
        Some(plant.summary_text(tile))
    }

    /// Capture the whole garden.
    #[must_use]
    pub fn snapshot(&self) -> GardenSave {
        GardenSave {
            version: SchemaVersion::GARDEN_SAVE,
            total_minutes: self.clock.total_minutes(),
            tiles: self
                .tiles
                .iter()
                .map(|(position, tile)| (*position, tile.clone()))
                .collect(),
            plants: self
                .plants
                .iter()
                .map(|(position, plant)| PlantSaveData {
                    position: *position,
                    record: plant.to_record(),
                })
                .collect(),
            counters: self.services.info.clone(),
            oxygen: self.services.oxygen,
        }
    }

    /// Rebuild a garden from a save, looking varieties up in `catalog`.
    pub fn restore(catalog: PlantCatalog, save: &GardenSave) -> GardenResult<Self> {
        let mut garden = Self::new(catalog);
        garden.clock = GameClock::from_total_minutes(save.total_minutes);
        garden.tiles = save.tiles.iter().cloned().collect();
        garden.services.info = save.counters.clone();
        garden.services.oxygen = save.oxygen;

        for entry in &save.plants {
            let profile = garden
                .catalog
                .get(&entry.record.name)
                .ok_or_else(|| GardenError::UnknownVariety(entry.record.name.clone()))?;
            let plant = Plant::from_record(profile, entry.position, &entry.record)?;
            let tile = garden
                .tiles
                .get_mut(&entry.position)
                .ok_or(GardenError::NotTilled(entry.position))?;
            tile.vacate();
            tile.occupy(plant.id());
            garden.plants.insert(entry.position, plant);
        }

        info!(
            "Restored garden at {} with {} plants",
            garden.clock.format_time(),
            garden.plants.len()
        );
        Ok(garden)
    }

    fn with_plant<T>(
        &mut self,
        position: WorldCoord,
        action: impl FnOnce(&mut Plant, &mut PlantContext<'_>) -> Result<T, PlantError>,
    ) -> GardenResult<T> {
        let plant = self
            .plants
            .get_mut(&position)
            .ok_or(GardenError::NoPlant(position))?;
        let tile = self
            .tiles
            .get_mut(&position)
            .ok_or(GardenError::NotTilled(position))?;
        Ok(action(plant, &mut self.services.context(tile))?)
    }

    fn evaporate(&mut self) {
        if self.water_loss_per_hour <= 0.0 {
            return;
        }
        for tile in self.tiles.values_mut() {
            tile.evaporate(self.water_loss_per_hour);
        }
    }

    /// Drop destroyed plants from the registry.
    fn sweep(&mut self) {
        self.plants.retain(|position, plant| {
            if plant.is_destroyed() {
                debug!("Removing destroyed {} at {position}", plant.name());
            }
            !plant.is_destroyed()
        });
    }
}
