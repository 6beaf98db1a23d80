//! Collaborator services a plant calls into.
//!
//! Every side effect outside the plant itself goes through one of these
//! traits. They are handed to each lifecycle operation bundled in a
//! [`PlantContext`], so a plant never reaches for global state. In-memory
//! implementations used by the garden live here too.

use std::collections::BTreeMap;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;
use verdant_common::{EntityId, ItemKind, WorldCoord};

use crate::environment::GrowingMedium;
use crate::events::MissionEvent;

/// Failures reported by collaborator services.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    /// Service could not take the request
    #[error("{service} unavailable: {reason}")]
    Unavailable {
        /// Service name
        service: &'static str,
        /// Why the request was refused
        reason: String,
    },
    /// Factory has no definition for the item kind
    #[error("no item factory registered for {0}")]
    UnknownItem(ItemKind),
}

impl ServiceError {
    /// Shorthand for [`ServiceError::Unavailable`].
    #[must_use]
    pub fn unavailable(service: &'static str, reason: impl Into<String>) -> Self {
        Self::Unavailable {
            service,
            reason: reason.into(),
        }
    }
}

/// Result type for service calls.
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Global plant population bookkeeping.
pub trait PopulationCounters {
    /// Add `delta` to the number of living plants.
    fn adjust_alive(&mut self, delta: i32) -> ServiceResult<()>;
    /// Add `delta` to the number of decaying plants.
    fn adjust_decaying(&mut self, delta: i32) -> ServiceResult<()>;
    /// Overwrite the number of decaying plants.
    fn set_decaying(&mut self, value: u32) -> ServiceResult<()>;
    /// Count one seed of `plant_name` planted.
    fn record_planted(&mut self, plant_name: &str) -> ServiceResult<()>;
    /// Count one harvest of `plant_name`.
    fn record_harvested(&mut self, plant_name: &str) -> ServiceResult<()>;
}

/// Spawns and removes world entities (produce, seeds, visuals).
pub trait EntityFactory {
    /// Whether `kind` can be spawned.
    fn has_definition(&self, kind: &ItemKind) -> bool;
    /// Spawn one `kind` at `position`.
    fn spawn(&mut self, kind: &ItemKind, position: WorldCoord) -> ServiceResult<EntityId>;
    /// Remove an entity the caller owns.
    fn despawn(&mut self, entity: EntityId) -> ServiceResult<()>;
}

/// Receives mission events.
pub trait MissionSink {
    /// Report one event.
    fn report(&mut self, event: MissionEvent) -> ServiceResult<()>;
}

/// Planet atmosphere the plants feed.
pub trait OxygenSink {
    /// Produce oxygen.
    fn add_oxygen(&mut self, amount: u32) -> ServiceResult<()>;
    /// Consume oxygen.
    fn remove_oxygen(&mut self, amount: u32) -> ServiceResult<()>;
}

/// Everything a plant operation may touch besides the plant itself.
pub struct PlantContext<'a> {
    /// Slot the plant grows in.
    pub medium: &'a mut dyn GrowingMedium,
    /// Population counters.
    pub counters: &'a mut dyn PopulationCounters,
    /// Entity factory for yields and seeds.
    pub entities: &'a mut dyn EntityFactory,
    /// Mission event sink.
    pub missions: &'a mut dyn MissionSink,
    /// Oxygen sink.
    pub oxygen: &'a mut dyn OxygenSink,
}

/// Keeps the first service failure of an operation while letting the
/// operation run to completion.
#[derive(Debug, Default)]
pub(crate) struct Faults(Option<ServiceError>);

impl Faults {
    /// Record a failed call; returns the value of a successful one.
    pub(crate) fn note<T>(&mut self, result: ServiceResult<T>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("plant service call failed: {e}");
                self.0.get_or_insert(e);
                None
            },
        }
    }

    /// The first recorded failure, if any.
    pub(crate) fn finish(self) -> ServiceResult<()> {
        self.0.map_or(Ok(()), Err)
    }
}

/// In-memory population counters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantInfo {
    alive: u32,
    decaying: u32,
    seeds_planted: BTreeMap<String, u32>,
    harvested: BTreeMap<String, u32>,
}

impl PlantInfo {
    /// Creates empty counters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Living plants.
    #[must_use]
    pub const fn alive(&self) -> u32 {
        self.alive
    }

    /// Decaying plants.
    #[must_use]
    pub const fn decaying(&self) -> u32 {
        self.decaying
    }

    /// Seeds of `plant_name` planted so far.
    #[must_use]
    pub fn seeds_planted(&self, plant_name: &str) -> u32 {
        self.seeds_planted.get(plant_name).copied().unwrap_or(0)
    }

    /// Harvests of `plant_name` so far.
    #[must_use]
    pub fn harvested(&self, plant_name: &str) -> u32 {
        self.harvested.get(plant_name).copied().unwrap_or(0)
    }

    /// Total harvests across varieties.
    #[must_use]
    pub fn total_harvested(&self) -> u32 {
        self.harvested.values().sum()
    }
}

fn shift(counter: &mut u32, delta: i32, name: &str) {
    let shifted = i64::from(*counter) + i64::from(delta);
    if shifted < 0 {
        warn!("{name} plant count would drop below zero ({shifted}); clamping");
    }
    *counter = shifted.clamp(0, i64::from(u32::MAX)) as u32;
}

impl PopulationCounters for PlantInfo {
    fn adjust_alive(&mut self, delta: i32) -> ServiceResult<()> {
        shift(&mut self.alive, delta, "alive");
        Ok(())
    }

    fn adjust_decaying(&mut self, delta: i32) -> ServiceResult<()> {
        shift(&mut self.decaying, delta, "decaying");
        Ok(())
    }

    fn set_decaying(&mut self, value: u32) -> ServiceResult<()> {
        self.decaying = value;
        Ok(())
    }

    fn record_planted(&mut self, plant_name: &str) -> ServiceResult<()> {
        *self.seeds_planted.entry(plant_name.to_string()).or_insert(0) += 1;
        Ok(())
    }

    fn record_harvested(&mut self, plant_name: &str) -> ServiceResult<()> {
        *self.harvested.entry(plant_name.to_string()).or_insert(0) += 1;
        Ok(())
    }
}

/// An item the factory placed in the world.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnedItem {
    /// Entity handle.
    pub id: EntityId,
    /// Item kind.
    pub kind: ItemKind,
    /// Where it was dropped.
    pub position: WorldCoord,
}

/// In-memory entity factory with a fixed set of known item kinds.
#[derive(Debug, Default)]
pub struct ItemFactory {
    kinds: AHashSet<ItemKind>,
    spawned: Vec<SpawnedItem>,
    released: Vec<EntityId>,
}

impl ItemFactory {
    /// Creates a factory that knows no item kinds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a factory knowing `kinds`.
    #[must_use]
    pub fn with_kinds<I>(kinds: I) -> Self
    where
        I: IntoIterator<Item = ItemKind>,
    {
        Self {
            kinds: kinds.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Teach the factory a new item kind.
    pub fn register(&mut self, kind: ItemKind) {
        self.kinds.insert(kind);
    }

    /// Items spawned so far, in spawn order.
    #[must_use]
    pub fn spawned(&self) -> &[SpawnedItem] {
        &self.spawned
    }

    /// Number of spawned items of `kind`.
    #[must_use]
    pub fn count_of(&self, kind: &ItemKind) -> usize {
        self.spawned.iter().filter(|item| &item.kind == kind).count()
    }

    /// Take ownership of everything spawned so far.
    pub fn take_spawned(&mut self) -> Vec<SpawnedItem> {
        std::mem::take(&mut self.spawned)
    }

    /// Entities released through [`EntityFactory::despawn`].
    #[must_use]
    pub fn released(&self) -> &[EntityId] {
        &self.released
    }
}

impl EntityFactory for ItemFactory {
    fn has_definition(&self, kind: &ItemKind) -> bool {
        self.kinds.contains(kind)
    }

    fn spawn(&mut self, kind: &ItemKind, position: WorldCoord) -> ServiceResult<EntityId> {
        if !self.kinds.contains(kind) {
            return Err(ServiceError::UnknownItem(kind.clone()));
        }
        let id = EntityId::new();
        self.spawned.push(SpawnedItem {
            id,
            kind: kind.clone(),
            position,
        });
        Ok(id)
    }

    fn despawn(&mut self, entity: EntityId) -> ServiceResult<()> {
        self.spawned.retain(|item| item.id != entity);
        self.released.push(entity);
        Ok(())
    }
}

/// In-memory planet oxygen level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OxygenLevel {
    level: u64,
}

impl OxygenLevel {
    /// Creates an atmosphere holding `level` units.
    #[must_use]
    pub const fn new(level: u64) -> Self {
        Self { level }
    }

    /// Units of oxygen present.
    #[must_use]
    pub const fn level(&self) -> u64 {
        self.level
    }
}

impl OxygenSink for OxygenLevel {
    fn add_oxygen(&mut self, amount: u32) -> ServiceResult<()> {
        self.level = self.level.saturating_add(u64::from(amount));
        Ok(())
    }

    fn remove_oxygen(&mut self, amount: u32) -> ServiceResult<()> {
        self.level = self.level.saturating_sub(u64::from(amount));
        Ok(())
    }
}
