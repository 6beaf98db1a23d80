//! Growth accumulation from environment readings.
//!
//! Every [`GROWTH_INTERVAL_MINUTES`] the plant samples its growing medium and
//! turns the reading into a growth-level increment and a health delta. Health
//! only moves on [`HEALTH_INTERVAL_MINUTES`] boundaries.

use crate::environment::GrowingMedium;
use crate::stage::GrowthStage;

/// Minutes between growth samples.
pub const GROWTH_INTERVAL_MINUTES: u32 = 5;
/// Minutes between health adjustments.
pub const HEALTH_INTERVAL_MINUTES: u32 = 20;
/// Health lost per interval in hostile or dry conditions.
pub const HOSTILE_HEALTH_PENALTY: i32 = -2;
/// Health gained per interval on fertilised soil.
pub const FERTILISED_HEALTH_BONUS: i32 = 5;
/// Health gained per interval on plain watered soil.
pub const WATERED_HEALTH_BONUS: i32 = 2;
/// Scale from the medium's growth rate to growth-level points per sample.
const GROWTH_SCALE: f32 = 5.0;

/// One sample of a growing medium, taken for a specific plant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reading {
    /// Growth points this sample is worth; negative when inhospitable.
    pub growth_rate: i32,
    /// Water content of the medium.
    pub water_content: f32,
    /// Whether the medium is fertilised.
    pub fertilised: bool,
}

impl Reading {
    /// Sample `medium` for a plant preferring `ideal_water_level`.
    #[must_use]
    pub fn sample(medium: &dyn GrowingMedium, ideal_water_level: f32) -> Self {
        Self {
            growth_rate: (medium.growth_rate(ideal_water_level) * GROWTH_SCALE).floor() as i32,
            water_content: medium.water_content(),
            fertilised: medium.is_fertilised(),
        }
    }
}

/// Result of one growth sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GrowthOutcome {
    /// Growth-level points to add.
    pub growth: u32,
    /// Health delta to apply through the health model.
    pub health: i32,
}

/// Whether `minute` is a growth sample boundary.
#[must_use]
pub const fn is_growth_minute(minute: u32) -> bool {
    minute % GROWTH_INTERVAL_MINUTES == 0
}

/// Whether `minute` is a health adjustment boundary.
#[must_use]
pub const fn is_health_minute(minute: u32) -> bool {
    minute % HEALTH_INTERVAL_MINUTES == 0
}

/// Turn a reading into growth and health for a plant in `stage`.
///
/// Growth only accumulates before adulthood. Adults still suffer in hostile
/// or dry soil; decaying and dead plants are unaffected.
#[must_use]
pub fn accumulate(stage: GrowthStage, minute: u32, reading: Reading) -> GrowthOutcome {
    if stage > GrowthStage::Adult {
        return GrowthOutcome::default();
    }
    let health_due = is_health_minute(minute);

    if reading.growth_rate < 0 {
        return GrowthOutcome {
            growth: 0,
            health: if health_due { HOSTILE_HEALTH_PENALTY } else { 0 },
        };
    }

    if stage.is_pre_adult() && reading.water_content > 0.0 {
        let bonus = if reading.fertilised {
            FERTILISED_HEALTH_BONUS
        } else {
            WATERED_HEALTH_BONUS
        };
        return GrowthOutcome {
            growth: reading.growth_rate as u32,
            health: if health_due { bonus } else { 0 },
        };
    }

    if health_due && reading.water_content <= 0.0 {
        return GrowthOutcome {
            growth: 0,
            health: HOSTILE_HEALTH_PENALTY,
        };
    }

    GrowthOutcome::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::CropTile;

    fn reading(growth_rate: i32, water_content: f32, fertilised: bool) -> Reading {
        Reading {
            growth_rate,
            water_content,
            fertilised,
        }
    }

    #[test]
    fn test_sample_floors_scaled_rate() {
        let tile = CropTile::with_water(0.5);
        let sample = Reading::sample(&tile, 0.5);
        assert_eq!(sample.growth_rate, 5);

        let soaked = CropTile::with_water(1.2);
        assert!(Reading::sample(&soaked, 0.5).growth_rate < 0);
    }

    #[test]
    fn test_growth_between_health_boundaries() {
        let outcome = accumulate(GrowthStage::Seedling, 5, reading(2, 0.5, true));
        assert_eq!(outcome, GrowthOutcome { growth: 2, health: 0 });
    }

    #[test]
    fn test_fertilised_bonus_on_boundary() {
        let fertilised = accumulate(GrowthStage::Sprout, 20, reading(2, 0.5, true));
        assert_eq!(fertilised, GrowthOutcome { growth: 2, health: 5 });

        let plain = accumulate(GrowthStage::Sprout, 40, reading(2, 0.5, false));
        assert_eq!(plain, GrowthOutcome { growth: 2, health: 2 });
    }

    #[test]
    fn test_hostile_conditions() {
        let off_boundary = accumulate(GrowthStage::Juvenile, 15, reading(-3, 2.0, false));
        assert_eq!(off_boundary, GrowthOutcome::default());

        let on_boundary = accumulate(GrowthStage::Juvenile, 0, reading(-3, 2.0, false));
        assert_eq!(on_boundary, GrowthOutcome { growth: 0, health: -2 });
    }

    #[test]
    fn test_dry_soil_penalty() {
        let outcome = accumulate(GrowthStage::Seedling, 20, reading(0, 0.0, true));
        assert_eq!(outcome, GrowthOutcome { growth: 0, health: -2 });
    }

    #[test]
    fn test_adults_do_not_grow() {
        let watered = accumulate(GrowthStage::Adult, 20, reading(4, 0.5, true));
        assert_eq!(watered, GrowthOutcome::default());

        let dry = accumulate(GrowthStage::Adult, 20, reading(0, 0.0, false));
        assert_eq!(dry.health, -2);
    }

    #[test]
    fn test_decaying_unaffected() {
        let outcome = accumulate(GrowthStage::Decaying, 20, reading(-5, 0.0, false));
        assert_eq!(outcome, GrowthOutcome::default());
    }

    #[test]
    fn test_interval_boundaries() {
        assert!(is_growth_minute(0));
        assert!(is_growth_minute(35));
        assert!(!is_growth_minute(36));
        assert!(is_health_minute(40));
        assert!(!is_health_minute(45));
    }
}
