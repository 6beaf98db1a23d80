//! A single plant and its lifecycle.
//!
//! A [`Plant`] owns all of its mutable state. Everything else it touches
//! (the tile it grows in, population counters, the item factory, missions,
//! the atmosphere) is handed to each operation through a [`PlantContext`].
//!
//! Population bookkeeping follows the stage transitions:
//! - planting counts one living plant
//! - entering `Decaying` counts one decaying plant
//! - entering `Dead` releases the living count, and the decaying count only
//!   for a natural death
//! - destroying a plant that is not yet dead releases what it still holds
//!
//! Service failures never interrupt an operation. The local state change
//! always completes and the first failure is returned afterwards.

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, trace};
use verdant_common::{EntityId, ItemKind, WorldCoord};

use crate::digestion::Digestion;
use crate::effect::AreaOfEffect;
use crate::environment::{GrowingMedium, WaterStatus};
use crate::events::MissionEvent;
use crate::growth::{self, Reading};
use crate::health::HealthModel;
use crate::profile::PlantProfile;
use crate::record::PlantRecord;
use crate::services::{
    Faults, MissionSink, OxygenSink, PlantContext, PopulationCounters, ServiceError,
};
use crate::stage::{DeathCause, GrowthStage, InvalidStage};
use crate::time::ClockTick;

/// Minutes between oxygen exchanges with the atmosphere.
pub const OXYGEN_INTERVAL_MINUTES: u32 = 20;
/// Oxygen consumed per interval by decaying and dead plants.
pub const DECAY_OXYGEN_COST: u32 = 10;
/// Oxygen produced per interval by an adult.
pub const ADULT_OXYGEN: u32 = 10;
/// Oxygen produced per interval by a high-oxygen adult.
pub const HIGH_OXYGEN_ADULT_OXYGEN: u32 = 20;
/// Oxygen produced per interval by a juvenile.
pub const JUVENILE_OXYGEN: u32 = 5;
/// Oxygen produced per interval by seedlings and sprouts.
pub const SEEDLING_OXYGEN: u32 = 2;
/// Animation shown while a predator digests.
pub const DIGESTING_ANIMATION: &str = "digesting";

/// Errors from plant operations.
#[derive(Debug, Error)]
pub enum PlantError {
    /// Stage ordinal or name out of range
    #[error(transparent)]
    InvalidStage(#[from] InvalidStage),

    /// The item factory cannot produce something the plant drops
    #[error("no item definition for {0}")]
    MissingYieldDefinition(ItemKind),

    /// A collaborator service failed after the plant state was updated
    #[error(transparent)]
    Service(#[from] ServiceError),

    /// A record was restored onto the wrong variety
    #[error("record is for {found}, expected {expected}")]
    RecordMismatch {
        /// Variety being restored
        expected: String,
        /// Variety named in the record
        found: String,
    },
}

/// Result type for plant operations.
pub type PlantResult<T> = Result<T, PlantError>;

/// Health and growth level a debug command puts a plant at.
const fn force_preset(stage: GrowthStage) -> (u32, Option<u32>) {
    match stage {
        GrowthStage::Seedling => (2, Some(20)),
        GrowthStage::Sprout => (10, Some(50)),
        GrowthStage::Juvenile => (20, Some(70)),
        GrowthStage::Adult | GrowthStage::Decaying => (30, None),
        GrowthStage::Dead => (0, None),
    }
}

/// One plant growing in one tile.
#[derive(Debug, Clone)]
pub struct Plant {
    id: EntityId,
    profile: Arc<PlantProfile>,
    position: WorldCoord,
    stage: GrowthStage,
    health: HealthModel,
    growth_level: u32,
    days_as_adult: u32,
    digestion: Digestion,
    death_cause: Option<DeathCause>,
    forced: bool,
    destroyed: bool,
    aoe: AreaOfEffect,
    aoe_visual: Option<EntityId>,
    attachments: Vec<EntityId>,
}

impl Plant {
    /// Create a seedling of `profile` at `position`.
    ///
    /// The plant is not counted anywhere until [`Plant::on_planted`] runs.
    #[must_use]
    pub fn new(profile: Arc<PlantProfile>, position: WorldCoord) -> Self {
        let health = HealthModel::new(
            profile.initial_health,
            profile.max_health,
            profile.stage_health_fractions,
        );
        Self {
            id: EntityId::new(),
            profile,
            position,
            stage: GrowthStage::Seedling,
            health,
            growth_level: 0,
            days_as_adult: 0,
            digestion: Digestion::default(),
            death_cause: None,
            forced: false,
            destroyed: false,
            aoe: AreaOfEffect::NONE,
            aoe_visual: None,
            attachments: Vec::new(),
        }
    }

    /// Entity handle of this plant.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Variety name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.profile.name
    }

    /// Variety profile.
    #[must_use]
    pub fn profile(&self) -> &Arc<PlantProfile> {
        &self.profile
    }

    /// Tile the plant grows on.
    #[must_use]
    pub const fn position(&self) -> WorldCoord {
        self.position
    }

    /// Current stage.
    #[must_use]
    pub const fn stage(&self) -> GrowthStage {
        self.stage
    }

    /// Current health.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health.health()
    }

    /// Health ceiling of an adult.
    #[must_use]
    pub const fn max_health(&self) -> u32 {
        self.health.max_health()
    }

    /// Health ceiling of the current stage.
    #[must_use]
    pub const fn current_max_health(&self) -> u32 {
        self.health.current_max()
    }

    /// Accumulated growth level.
    #[must_use]
    pub const fn growth_level(&self) -> u32 {
        self.growth_level
    }

    /// Days lived as an adult.
    #[must_use]
    pub const fn days_as_adult(&self) -> u32 {
        self.days_as_adult
    }

    /// Whether a predator is digesting.
    #[must_use]
    pub const fn is_eating(&self) -> bool {
        self.digestion.is_eating()
    }

    /// Why the plant died, if it did.
    #[must_use]
    pub const fn death_cause(&self) -> Option<DeathCause> {
        self.death_cause
    }

    /// Whether a debug command moved the plant.
    #[must_use]
    pub const fn is_forced(&self) -> bool {
        self.forced
    }

    /// Whether the plant has been destroyed.
    #[must_use]
    pub const fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    /// Effect the plant currently exerts.
    #[must_use]
    pub const fn area_of_effect(&self) -> AreaOfEffect {
        self.aoe
    }

    /// Visual entity drawing the effect, if any.
    #[must_use]
    pub const fn aoe_visual(&self) -> Option<EntityId> {
        self.aoe_visual
    }

    /// Entities owned by the plant besides the effect visual.
    #[must_use]
    pub fn attachments(&self) -> &[EntityId] {
        &self.attachments
    }

    /// Animation the plant should be showing.
    #[must_use]
    pub fn animation_name(&self) -> &'static str {
        if self.digestion.is_eating() {
            return DIGESTING_ANIMATION;
        }
        self.death_cause
            .and_then(DeathCause::animation)
            .unwrap_or_else(|| self.stage.animation())
    }

    /// Multi-line description for the hover panel.
    #[must_use]
    pub fn summary_text(&self, medium: &dyn GrowingMedium) -> String {
        let water = medium.water_content();
        let ideal = self.profile.ideal_water_level;
        let mut text = format!(
            "Growth Stage: {}\nWater level: {}/{}\nWater Status: {}\nHealth: {}/{}",
            self.stage.name(),
            format_decimal(water),
            format_decimal(ideal),
            WaterStatus::classify(water, ideal).label(),
            self.health.health(),
            self.health.current_max(),
        );
        if let Some(threshold) = self.profile.threshold_for(self.stage) {
            text.push_str(&format!(
                "\nGrowth Level: {}/{}",
                self.growth_level, threshold
            ));
        }
        text
    }

    /// Hand the plant the entity that draws its area effect.
    pub fn attach_aoe_visual(&mut self, visual: EntityId) {
        self.aoe_visual = Some(visual);
    }

    /// Hand the plant an entity it owns and releases on destruction.
    pub fn attach(&mut self, entity: EntityId) {
        self.attachments.push(entity);
    }

    /// Count the plant as planted.
    pub fn on_planted(&mut self, ctx: &mut PlantContext<'_>) -> PlantResult<()> {
        let mut faults = Faults::default();
        faults.note(ctx.counters.adjust_alive(1));
        faults.note(ctx.counters.record_planted(&self.profile.name));
        faults.note(ctx.missions.report(MissionEvent::PlantCrop {
            plant_name: self.profile.name.clone(),
        }));
        debug!("Planted {} at {}", self.profile.name, self.position);
        Ok(faults.finish()?)
    }

    /// React to one clock tick.
    pub fn on_tick(&mut self, tick: ClockTick, ctx: &mut PlantContext<'_>) -> PlantResult<()> {
        match tick {
            ClockTick::Minute { minute } => self.on_minute(minute, ctx),
            ClockTick::Hour { .. } => {
                self.on_hour();
                Ok(())
            },
            ClockTick::Day { .. } => self.on_day(ctx.counters),
        }
    }

    /// Per-minute update: oxygen, growth, digestion, then the decay check.
    pub fn on_minute(&mut self, minute: u32, ctx: &mut PlantContext<'_>) -> PlantResult<()> {
        if self.destroyed {
            return Ok(());
        }
        let mut faults = Faults::default();

        if minute % OXYGEN_INTERVAL_MINUTES == 0 {
            self.exchange_oxygen(ctx.oxygen, &mut faults);
        }
        if growth::is_growth_minute(minute) {
            self.grow(minute, &*ctx.medium);
            self.advance();
        }
        if self.digestion.tick() {
            trace!("{} finished digesting", self.profile.name);
        }
        self.check_decay(ctx.counters, &mut faults);

        Ok(faults.finish()?)
    }

    /// Per-hour update. Plants have no hourly behaviour.
    pub fn on_hour(&mut self) {}

    /// Per-day update.
    pub fn on_day(&mut self, counters: &mut dyn PopulationCounters) -> PlantResult<()> {
        self.age_as_adult(counters)
    }

    /// Count one more day as an adult and start decaying past the lifespan.
    pub fn age_as_adult(&mut self, counters: &mut dyn PopulationCounters) -> PlantResult<()> {
        if self.destroyed || self.stage != GrowthStage::Adult {
            return Ok(());
        }
        let mut faults = Faults::default();
        self.days_as_adult += 1;
        if self.days_as_adult > self.profile.adult_lifespan {
            self.enter(GrowthStage::Decaying, counters, &mut faults);
        }
        Ok(faults.finish()?)
    }

    /// Move one stage forward if the growth level has reached the threshold.
    ///
    /// Only seedlings, sprouts and juveniles grow this way. Returns whether
    /// the stage changed.
    pub fn advance(&mut self) -> bool {
        let Some(threshold) = self.profile.threshold_for(self.stage) else {
            return false;
        };
        if self.destroyed || self.growth_level < threshold {
            return false;
        }
        self.set_stage(self.stage.next());
        true
    }

    /// Move a plant whose health ran out towards death.
    pub fn decay_check(&mut self, counters: &mut dyn PopulationCounters) -> PlantResult<()> {
        let mut faults = Faults::default();
        self.check_decay(counters, &mut faults);
        Ok(faults.finish()?)
    }

    /// Apply a health delta through the stage ceiling. Returns the new health.
    pub fn apply_health_delta(&mut self, delta: i32) -> u32 {
        if self.destroyed {
            return self.health.health();
        }
        self.health.apply_delta(self.stage, delta)
    }

    /// Storm damage from the climate.
    pub fn weather_damage(&mut self, amount: u32) -> u32 {
        self.apply_health_delta(negate(amount))
    }

    /// Mark a predator as digesting a fresh meal.
    ///
    /// Returns false for plants that do not eat.
    pub fn start_eating(&mut self, missions: &mut dyn MissionSink) -> PlantResult<bool> {
        if self.destroyed || self.stage == GrowthStage::Dead || !self.profile.predator {
            return Ok(false);
        }
        self.digestion.start();
        debug!("{} at {} started digesting", self.profile.name, self.position);
        missions.report(MissionEvent::AnimalEaten {
            plant_name: self.profile.name.clone(),
        })?;
        Ok(true)
    }

    /// Jump straight to `target`, ignoring growth and health.
    pub fn force_to(
        &mut self,
        target: GrowthStage,
        counters: &mut dyn PopulationCounters,
    ) -> PlantResult<()> {
        if self.destroyed {
            return Ok(());
        }
        self.death_cause = None;
        if self.stage == target {
            return Ok(());
        }

        let mut faults = Faults::default();
        match self.stage {
            GrowthStage::Dead => {
                faults.note(counters.adjust_alive(1));
            },
            GrowthStage::Decaying => {
                faults.note(counters.adjust_decaying(-1));
            },
            _ => {},
        }
        if target == GrowthStage::Dead {
            self.death_cause = Some(DeathCause::Forced);
        }
        self.enter(target, counters, &mut faults);

        let (health, growth_level) = force_preset(target);
        self.health.set(health);
        if let Some(level) = growth_level {
            self.growth_level = level;
        }
        self.forced = true;
        debug!("{} forced to {}", self.profile.name, target);
        Ok(faults.finish()?)
    }

    /// Force by ordinal (1 = Seedling .. 6 = Dead).
    pub fn force_to_ordinal(
        &mut self,
        ordinal: u8,
        counters: &mut dyn PopulationCounters,
    ) -> PlantResult<()> {
        let target = GrowthStage::from_ordinal(ordinal)?;
        self.force_to(target, counters)
    }

    /// Debug command: force by label (`seedling`, `sprout`, `juvenile`,
    /// `adult`, `decay`, `dead`). Unknown labels are ignored.
    pub fn force_growth_stage(
        &mut self,
        label: &str,
        counters: &mut dyn PopulationCounters,
    ) -> PlantResult<()> {
        match GrowthStage::from_debug_label(label) {
            Some(target) => self.force_to(target, counters),
            None => {
                trace!("Ignoring unknown growth stage label {label:?}");
                Ok(())
            },
        }
    }

    /// Harvest an adult: drop its yields, report it, then destroy it.
    ///
    /// Returns false without doing anything unless the plant is an adult.
    pub fn harvest(&mut self, ctx: &mut PlantContext<'_>) -> PlantResult<bool> {
        if self.destroyed || self.stage != GrowthStage::Adult {
            return Ok(false);
        }
        if let Some(missing) = self
            .profile
            .item_kinds()
            .find(|kind| !ctx.entities.has_definition(kind))
        {
            return Err(PlantError::MissingYieldDefinition(missing));
        }

        let mut faults = Faults::default();
        for (kind, &quantity) in &self.profile.harvest_yields {
            for _ in 0..quantity {
                faults.note(ctx.entities.spawn(kind, self.position));
            }
        }
        faults.note(ctx.missions.report(MissionEvent::HarvestCrop {
            plant_name: self.profile.name.clone(),
        }));
        faults.note(ctx.counters.record_harvested(&self.profile.name));
        info!("Harvested {} at {}", self.profile.name, self.position);

        let destroyed = self.destroy(ctx);
        faults.finish()?;
        destroyed?;
        Ok(true)
    }

    /// Damage the plant and destroy it once its health runs out.
    ///
    /// Fails without touching health when the seed it would drop is unknown.
    pub fn attack(&mut self, damage: u32, ctx: &mut PlantContext<'_>) -> PlantResult<()> {
        if self.destroyed {
            return Ok(());
        }
        let seed = self.profile.seed_kind();
        if !ctx.entities.has_definition(&seed) {
            return Err(PlantError::MissingYieldDefinition(seed));
        }
        if self.apply_health_delta(negate(damage)) == 0 {
            self.destroy(ctx)?;
        }
        Ok(())
    }

    /// Remove the plant: drop a seed, release what it owns, free the tile.
    ///
    /// Does nothing on a plant that is already destroyed.
    pub fn destroy(&mut self, ctx: &mut PlantContext<'_>) -> PlantResult<()> {
        if self.destroyed {
            return Ok(());
        }
        let seed = self.profile.seed_kind();
        if !ctx.entities.has_definition(&seed) {
            return Err(PlantError::MissingYieldDefinition(seed));
        }

        let mut faults = Faults::default();
        if self.stage < GrowthStage::Dead {
            faults.note(ctx.counters.adjust_alive(-1));
        }
        if self.stage == GrowthStage::Decaying {
            faults.note(ctx.counters.adjust_decaying(-1));
        }
        faults.note(ctx.entities.spawn(&seed, self.position));
        if let Some(visual) = self.aoe_visual.take() {
            faults.note(ctx.entities.despawn(visual));
        }
        for entity in std::mem::take(&mut self.attachments) {
            faults.note(ctx.entities.despawn(entity));
        }
        ctx.medium.vacate();
        self.destroyed = true;
        info!(
            "Destroyed {} at {} ({})",
            self.profile.name, self.position, self.stage
        );
        Ok(faults.finish()?)
    }

    /// Snapshot the mutable state.
    #[must_use]
    pub fn to_record(&self) -> PlantRecord {
        PlantRecord {
            name: self.profile.name.clone(),
            health: self.health.health(),
            current_growth_level: self.growth_level,
            current_max_health: self.health.current_max(),
            num_of_days_as_adult: self.days_as_adult,
            is_eating: self.digestion.is_eating(),
            digestion_minutes: self.digestion.minutes(),
            death_cause: self.death_cause,
            destroyed: self.destroyed,
            forced: self.forced,
            stage_name: self.stage.name().to_string(),
            animation_name: self.animation_name().to_string(),
        }
    }

    /// Rebuild a plant of `profile` at `position` from a record.
    ///
    /// Counters are not touched; they are restored alongside the plants.
    pub fn from_record(
        profile: Arc<PlantProfile>,
        position: WorldCoord,
        record: &PlantRecord,
    ) -> PlantResult<Self> {
        if record.name != profile.name {
            return Err(PlantError::RecordMismatch {
                expected: profile.name.clone(),
                found: record.name.clone(),
            });
        }
        let stage = GrowthStage::from_name(&record.stage_name)?;

        let mut plant = Self::new(profile, position);
        plant.stage = stage;
        plant
            .health
            .restore(record.health, record.current_max_health);
        plant.growth_level = record.current_growth_level;
        plant.days_as_adult = record.num_of_days_as_adult;
        plant.digestion = Digestion::restore(record.is_eating, record.digestion_minutes);
        plant.death_cause = record.death_cause;
        plant.destroyed = record.destroyed;
        plant.forced = record.forced;
        plant.aoe = AreaOfEffect::for_stage(stage, plant.profile.adult_area_of_effect());
        Ok(plant)
    }

    fn exchange_oxygen(&self, oxygen: &mut dyn OxygenSink, faults: &mut Faults) {
        let result = match self.stage {
            GrowthStage::Decaying | GrowthStage::Dead => oxygen.remove_oxygen(DECAY_OXYGEN_COST),
            GrowthStage::Adult if self.profile.high_oxygen => {
                oxygen.add_oxygen(HIGH_OXYGEN_ADULT_OXYGEN)
            },
            GrowthStage::Adult => oxygen.add_oxygen(ADULT_OXYGEN),
            GrowthStage::Juvenile => oxygen.add_oxygen(JUVENILE_OXYGEN),
            GrowthStage::Seedling | GrowthStage::Sprout => oxygen.add_oxygen(SEEDLING_OXYGEN),
        };
        faults.note(result);
    }

    fn grow(&mut self, minute: u32, medium: &dyn GrowingMedium) {
        let reading = Reading::sample(medium, self.profile.ideal_water_level);
        let outcome = growth::accumulate(self.stage, minute, reading);
        self.growth_level = self.growth_level.saturating_add(outcome.growth);
        if outcome.health != 0 {
            self.health.apply_delta(self.stage, outcome.health);
        }
    }

    fn check_decay(&mut self, counters: &mut dyn PopulationCounters, faults: &mut Faults) {
        if self.destroyed || !self.health.is_depleted() {
            return;
        }
        if self.stage == GrowthStage::Adult {
            self.enter(GrowthStage::Decaying, counters, faults);
        }
        if self.stage == GrowthStage::Decaying {
            self.death_cause = Some(DeathCause::Natural);
            self.enter(GrowthStage::Dead, counters, faults);
        } else if self.stage.is_pre_adult() {
            self.death_cause = Some(DeathCause::before_maturity(self.stage));
            self.enter(GrowthStage::Dead, counters, faults);
        }
    }

    /// Transition with population bookkeeping.
    fn enter(
        &mut self,
        target: GrowthStage,
        counters: &mut dyn PopulationCounters,
        faults: &mut Faults,
    ) {
        match target {
            GrowthStage::Decaying => {
                faults.note(counters.adjust_decaying(1));
            },
            GrowthStage::Dead => {
                faults.note(counters.adjust_alive(-1));
                if self.death_cause.is_some_and(DeathCause::leaves_decaying) {
                    faults.note(counters.adjust_decaying(-1));
                }
            },
            _ => {},
        }
        self.set_stage(target);
    }

    fn set_stage(&mut self, target: GrowthStage) {
        debug!(
            "{} at {}: {} -> {}",
            self.profile.name, self.position, self.stage, target
        );
        self.stage = target;
        self.health.refresh_max(target);
        self.aoe = AreaOfEffect::for_stage(target, self.profile.adult_area_of_effect());
    }
}

fn negate(amount: u32) -> i32 {
    i32::try_from(amount).map_or(i32::MIN, |value| -value)
}

/// Format with at most two decimals and no trailing zeros.
fn format_decimal(value: f32) -> String {
    let text = format!("{value:.2}");
    let text = text.trim_end_matches('0').trim_end_matches('.');
    if text == "-0" {
        "0".to_string()
    } else {
        text.to_string()
    }
}
