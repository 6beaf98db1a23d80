//! Plant varieties: the immutable identity every plant of a kind shares.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use verdant_common::ItemKind;

use crate::effect::{AreaOfEffect, EffectKind};
use crate::stage::GrowthStage;

/// Default growth-level thresholds for Sprout, Juvenile, Adult.
pub const DEFAULT_GROWTH_THRESHOLDS: [u32; 3] = [11, 21, 41];
/// Default Seedling/Sprout/Juvenile health ceilings as fractions of max health.
pub const DEFAULT_STAGE_HEALTH_FRACTIONS: [f32; 3] = [0.05, 0.1, 0.3];

/// Definition of a plant variety.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantProfile {
    /// Display name, also the key in the catalog.
    pub name: String,
    /// Category (food, health, repair, defence, production, deadly).
    pub category: String,
    /// Player-facing description.
    pub description: String,
    /// Water content this plant grows best in.
    pub ideal_water_level: f32,
    /// Days the plant lives as an adult before it starts decaying.
    pub adult_lifespan: u32,
    /// Health ceiling of an adult.
    pub max_health: u32,
    /// Health of a freshly planted seed.
    pub initial_health: u32,
    /// Growth levels needed to leave Seedling, Sprout, Juvenile.
    pub growth_thresholds: [u32; 3],
    /// Seedling/Sprout/Juvenile health ceilings as fractions of `max_health`.
    pub stage_health_fractions: [f32; 3],
    /// Effect exerted as an adult.
    pub adult_effect: EffectKind,
    /// Reach of the adult effect in tiles.
    pub effect_radius: f32,
    /// Doubles the oxygen an adult produces.
    #[serde(default)]
    pub high_oxygen: bool,
    /// Eats animals and digests afterwards.
    #[serde(default)]
    pub predator: bool,
    /// Items dropped on harvest, by kind.
    #[serde(default)]
    pub harvest_yields: BTreeMap<ItemKind, u32>,
}

impl PlantProfile {
    /// Create a new profile builder.
    #[must_use]
    pub fn builder(name: &str) -> PlantProfileBuilder {
        PlantProfileBuilder::new(name)
    }

    /// Growth level needed to leave `stage`, if it grows naturally.
    #[must_use]
    pub fn threshold_for(&self, stage: GrowthStage) -> Option<u32> {
        stage
            .pre_adult_index()
            .map(|index| self.growth_thresholds[index])
    }

    /// Effect of a mature plant.
    #[must_use]
    pub const fn adult_area_of_effect(&self) -> AreaOfEffect {
        AreaOfEffect::new(self.adult_effect, self.effect_radius)
    }

    /// Item dropped whenever a plant of this variety is destroyed.
    #[must_use]
    pub fn seed_kind(&self) -> ItemKind {
        ItemKind::seeds_of(&self.name)
    }

    /// Every item kind this variety can drop.
    pub fn item_kinds(&self) -> impl Iterator<Item = ItemKind> + '_ {
        self.harvest_yields
            .keys()
            .cloned()
            .chain(std::iter::once(self.seed_kind()))
    }
}

/// Builder for plant profiles.
#[derive(Debug)]
pub struct PlantProfileBuilder {
    profile: PlantProfile,
}

impl PlantProfileBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            profile: PlantProfile {
                name: name.to_string(),
                category: "food".to_string(),
                description: String::new(),
                ideal_water_level: 0.5,
                adult_lifespan: 3,
                max_health: 100,
                initial_health: 5,
                growth_thresholds: DEFAULT_GROWTH_THRESHOLDS,
                stage_health_fractions: DEFAULT_STAGE_HEALTH_FRACTIONS,
                adult_effect: EffectKind::None,
                effect_radius: 2.0,
                high_oxygen: false,
                predator: false,
                harvest_yields: BTreeMap::new(),
            },
        }
    }

    /// Set category and description.
    #[must_use]
    pub fn describe(mut self, category: &str, description: &str) -> Self {
        self.profile.category = category.to_string();
        self.profile.description = description.to_string();
        self
    }

    /// Set the ideal water level.
    #[must_use]
    pub fn ideal_water(mut self, level: f32) -> Self {
        self.profile.ideal_water_level = level;
        self
    }

    /// Set adult lifespan in days.
    #[must_use]
    pub fn lifespan(mut self, days: u32) -> Self {
        self.profile.adult_lifespan = days;
        self
    }

    /// Set initial and adult max health.
    #[must_use]
    pub fn health(mut self, initial: u32, max: u32) -> Self {
        self.profile.initial_health = initial;
        self.profile.max_health = max;
        self
    }

    /// Set growth thresholds (sprout, juvenile, adult).
    #[must_use]
    pub fn thresholds(mut self, sprout: u32, juvenile: u32, adult: u32) -> Self {
        self.profile.growth_thresholds = [sprout, juvenile, adult];
        self
    }

    /// Set pre-adult health ceilings as fractions of max health.
    #[must_use]
    pub fn stage_health(mut self, seedling: f32, sprout: f32, juvenile: f32) -> Self {
        self.profile.stage_health_fractions = [seedling, sprout, juvenile];
        self
    }

    /// Set the adult effect.
    #[must_use]
    pub fn effect(mut self, kind: EffectKind, radius: f32) -> Self {
        self.profile.adult_effect = kind;
        self.profile.effect_radius = radius;
        self
    }

    /// Mark as a high-oxygen producer.
    #[must_use]
    pub fn high_oxygen(mut self) -> Self {
        self.profile.high_oxygen = true;
        self
    }

    /// Mark as a predator.
    #[must_use]
    pub fn predator(mut self) -> Self {
        self.profile.predator = true;
        self
    }

    /// Add a harvest yield.
    #[must_use]
    pub fn yields(mut self, item: &str, quantity: u32) -> Self {
        self.profile.harvest_yields.insert(ItemKind::new(item), quantity);
        self
    }

    /// Build the profile.
    #[must_use]
    pub fn build(self) -> PlantProfile {
        self.profile
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let profile = PlantProfile::builder("Test Plant").build();

        assert_eq!(profile.growth_thresholds, [11, 21, 41]);
        assert_eq!(profile.adult_effect, EffectKind::None);
        assert!(profile.harvest_yields.is_empty());
        assert_eq!(profile.seed_kind().as_str(), "Test Plant Seeds");
    }

    #[test]
    fn test_builder_overrides() {
        let profile = PlantProfile::builder("Hammer Plant")
            .describe("repair", "Heals what stands near it.")
            .thresholds(20, 40, 80)
            .effect(EffectKind::Health, 3.0)
            .yields("Hammer Flower", 2)
            .build();

        assert_eq!(profile.category, "repair");
        assert_eq!(profile.threshold_for(GrowthStage::Sprout), Some(40));
        assert_eq!(profile.threshold_for(GrowthStage::Adult), None);
        assert_eq!(profile.adult_area_of_effect().kind, EffectKind::Health);
        assert_eq!(profile.harvest_yields[&ItemKind::new("Hammer Flower")], 2);
    }

    #[test]
    fn test_item_kinds_include_seeds() {
        let profile = PlantProfile::builder("Aloe Vera")
            .yields("Aloe Vera Leaf", 2)
            .build();
        let kinds: Vec<_> = profile.item_kinds().collect();

        assert_eq!(
            kinds,
            vec![ItemKind::new("Aloe Vera Leaf"), ItemKind::new("Aloe Vera Seeds")]
        );
    }
}
