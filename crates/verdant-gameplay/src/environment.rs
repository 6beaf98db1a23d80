//! Growing media: the soil a plant reads water and fertiliser from.

use serde::{Deserialize, Serialize};
use verdant_common::EntityId;

/// Read-side view of the slot a plant grows in.
///
/// The tile store owns the slot; a plant only reads it on growth ticks and
/// vacates it when destroyed.
pub trait GrowingMedium {
    /// Current water content (≥ 0).
    fn water_content(&self) -> f32;

    /// Growth rate for a plant preferring `ideal_water_level`.
    ///
    /// Negative values mean the conditions are inhospitable.
    fn growth_rate(&self, ideal_water_level: f32) -> f32;

    /// Whether the slot has been fertilised.
    fn is_fertilised(&self) -> bool;

    /// Release the slot after its occupant is gone.
    fn vacate(&mut self);
}

/// A tilled crop tile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CropTile {
    water_content: f32,
    fertilised: bool,
    occupant: Option<EntityId>,
}

impl CropTile {
    /// Creates a dry, unfertilised, empty tile.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a tile with the given water content.
    #[must_use]
    pub fn with_water(water_content: f32) -> Self {
        Self {
            water_content: water_content.max(0.0),
            ..Self::default()
        }
    }

    /// Add water.
    pub fn water(&mut self, amount: f32) {
        self.water_content = (self.water_content + amount).max(0.0);
    }

    /// Lose water to evaporation.
    pub fn evaporate(&mut self, amount: f32) {
        self.water_content = (self.water_content - amount).max(0.0);
    }

    /// Fertilise the tile. Returns false if it was already fertilised.
    pub fn fertilise(&mut self) -> bool {
        !std::mem::replace(&mut self.fertilised, true)
    }

    /// Plant occupying this tile.
    #[must_use]
    pub const fn occupant(&self) -> Option<EntityId> {
        self.occupant
    }

    /// Whether a plant occupies the tile.
    #[must_use]
    pub const fn is_occupied(&self) -> bool {
        self.occupant.is_some()
    }

    /// Claim the tile for a plant. Returns false if already occupied.
    pub fn occupy(&mut self, plant: EntityId) -> bool {
        if self.occupant.is_some() {
            return false;
        }
        self.occupant = Some(plant);
        true
    }
}

impl GrowingMedium for CropTile {
    fn water_content(&self) -> f32 {
        self.water_content
    }

    /// Peaks at 1.0 on the ideal level and falls off quadratically with the
    /// relative deviation, turning negative once the tile holds more than
    /// twice the ideal. Fertiliser doubles positive growth.
    fn growth_rate(&self, ideal_water_level: f32) -> f32 {
        if ideal_water_level <= 0.0 {
            return if self.water_content > 0.0 { -1.0 } else { 0.0 };
        }
        let ratio = self.water_content / ideal_water_level;
        let deviation = ratio - 1.0;
        let rate = (1.0 - deviation * deviation).clamp(-1.0, 1.0);
        if self.fertilised && rate > 0.0 {
            rate * 2.0
        } else {
            rate
        }
    }

    fn is_fertilised(&self) -> bool {
        self.fertilised
    }

    fn vacate(&mut self) {
        self.occupant = None;
    }
}

/// Watering status shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WaterStatus {
    /// More than 0.2 below ideal.
    Under,
    /// More than 0.2 above ideal.
    Over,
    /// Within ±0.2 of ideal.
    Ideal,
}

impl WaterStatus {
    /// Tolerance around the ideal level.
    pub const TOLERANCE: f32 = 0.2;

    /// Classify `water` against `ideal`.
    #[must_use]
    pub fn classify(water: f32, ideal: f32) -> Self {
        let diff = water - ideal;
        if diff < -Self::TOLERANCE {
            Self::Under
        } else if diff > Self::TOLERANCE {
            Self::Over
        } else {
            Self::Ideal
        }
    }

    /// Player-facing label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Under => "Under watered",
            Self::Over => "Over watered",
            Self::Ideal => "Ideal water level",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_growth_rate_peaks_at_ideal() {
        let tile = CropTile::with_water(0.5);
        assert!((tile.growth_rate(0.5) - 1.0).abs() < 1e-6);

        let dry = CropTile::with_water(0.0);
        assert!(dry.growth_rate(0.5).abs() < 1e-6);
    }

    #[test]
    fn test_growth_rate_negative_when_waterlogged() {
        let tile = CropTile::with_water(1.6);
        assert!(tile.growth_rate(0.5) < 0.0);
    }

    #[test]
    fn test_fertiliser_doubles_growth() {
        let mut tile = CropTile::with_water(0.5);
        assert!(tile.fertilise());
        assert!(!tile.fertilise());
        assert!((tile.growth_rate(0.5) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_water_and_evaporate() {
        let mut tile = CropTile::new();
        tile.water(0.75);
        tile.evaporate(0.25);
        assert!((tile.water_content() - 0.5).abs() < 1e-6);
        tile.evaporate(3.0);
        assert!(tile.water_content().abs() < f32::EPSILON);
    }

    #[test]
    fn test_occupancy() {
        let mut tile = CropTile::new();
        let plant = EntityId::new();

        assert!(tile.occupy(plant));
        assert!(!tile.occupy(EntityId::new()));
        assert_eq!(tile.occupant(), Some(plant));

        tile.vacate();
        assert!(!tile.is_occupied());
    }

    #[test]
    fn test_water_status() {
        assert_eq!(WaterStatus::classify(0.1, 0.5), WaterStatus::Under);
        assert_eq!(WaterStatus::classify(0.9, 0.5), WaterStatus::Over);
        assert_eq!(WaterStatus::classify(0.6, 0.5), WaterStatus::Ideal);
        assert_eq!(WaterStatus::Under.label(), "Under watered");
    }
}
