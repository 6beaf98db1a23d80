//! Stage-scoped health.
//!
//! A plant cannot hold more health than its stage allows: pre-adult stages are
//! capped at a fraction of the variety's max health, adults and beyond at the
//! full value. Health never drops below zero.

use crate::stage::GrowthStage;

/// Health of one plant together with its stage ceilings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthModel {
    health: u32,
    current_max: u32,
    max_health: u32,
    /// Ceilings for Seedling, Sprout, Juvenile.
    stage_caps: [u32; 3],
}

impl HealthModel {
    /// Creates the model for a freshly planted seedling.
    ///
    /// `fractions` are the Seedling/Sprout/Juvenile ceilings as fractions of
    /// `max_health`; they are floored to whole health points.
    #[must_use]
    pub fn new(initial: u32, max_health: u32, fractions: [f32; 3]) -> Self {
        let stage_caps =
            fractions.map(|fraction| (f64::from(fraction) * f64::from(max_health)).floor() as u32);
        let mut model = Self {
            health: initial,
            current_max: max_health,
            max_health,
            stage_caps,
        };
        model.refresh_max(GrowthStage::Seedling);
        model
    }

    /// Current health.
    #[must_use]
    pub const fn health(&self) -> u32 {
        self.health
    }

    /// Ceiling of the current stage.
    #[must_use]
    pub const fn current_max(&self) -> u32 {
        self.current_max
    }

    /// Ceiling of an adult.
    #[must_use]
    pub const fn max_health(&self) -> u32 {
        self.max_health
    }

    /// Ceiling for `stage`.
    #[must_use]
    pub fn ceiling(&self, stage: GrowthStage) -> u32 {
        stage
            .pre_adult_index()
            .map_or(self.max_health, |index| self.stage_caps[index])
    }

    /// Add `delta` to health and clamp into `[0, ceiling(stage)]`.
    ///
    /// Past adulthood health is frozen and the call does nothing.
    /// Returns the resulting health.
    pub fn apply_delta(&mut self, stage: GrowthStage, delta: i32) -> u32 {
        if stage > GrowthStage::Adult {
            return self.health;
        }
        let raw = i64::from(self.health) + i64::from(delta);
        let ceiling = i64::from(self.ceiling(stage));
        self.health = raw.clamp(0, ceiling) as u32;
        self.health
    }

    /// Recompute the stage ceiling after a transition and pull health under it.
    pub fn refresh_max(&mut self, stage: GrowthStage) {
        self.current_max = self.ceiling(stage);
        self.health = self.health.min(self.current_max);
    }

    /// Overwrite health, clamped to the current ceiling.
    pub fn set(&mut self, health: u32) {
        self.health = health.min(self.current_max);
    }

    /// Reinstate saved values.
    pub fn restore(&mut self, health: u32, current_max: u32) {
        self.current_max = current_max;
        self.health = health.min(current_max);
    }

    /// Whether health has run out.
    #[must_use]
    pub const fn is_depleted(&self) -> bool {
        self.health == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const FRACTIONS: [f32; 3] = [0.05, 0.1, 0.3];

    #[test]
    fn test_stage_ceilings() {
        let model = HealthModel::new(5, 300, FRACTIONS);

        assert_eq!(model.ceiling(GrowthStage::Seedling), 15);
        assert_eq!(model.ceiling(GrowthStage::Sprout), 30);
        assert_eq!(model.ceiling(GrowthStage::Juvenile), 90);
        assert_eq!(model.ceiling(GrowthStage::Adult), 300);
        assert_eq!(model.ceiling(GrowthStage::Dead), 300);
        assert_eq!(model.current_max(), 15);
    }

    #[test]
    fn test_initial_health_clamped_to_seedling() {
        let model = HealthModel::new(100, 100, FRACTIONS);
        assert_eq!(model.health(), 5);
    }

    #[test]
    fn test_apply_delta_clamps() {
        let mut model = HealthModel::new(2, 100, FRACTIONS);

        assert_eq!(model.apply_delta(GrowthStage::Seedling, 50), 5);
        assert_eq!(model.apply_delta(GrowthStage::Seedling, -20), 0);

        model.refresh_max(GrowthStage::Adult);
        assert_eq!(model.apply_delta(GrowthStage::Adult, 500), 100);
    }

    #[test]
    fn test_delta_ignored_past_adult() {
        let mut model = HealthModel::new(5, 100, FRACTIONS);
        model.refresh_max(GrowthStage::Decaying);

        assert_eq!(model.apply_delta(GrowthStage::Decaying, -5), 5);
        assert_eq!(model.apply_delta(GrowthStage::Dead, 5), 5);
    }

    #[test]
    fn test_refresh_pulls_health_down() {
        let mut model = HealthModel::new(5, 100, FRACTIONS);
        model.refresh_max(GrowthStage::Adult);
        model.set(80);

        model.refresh_max(GrowthStage::Sprout);
        assert_eq!(model.current_max(), 10);
        assert_eq!(model.health(), 10);
    }

    proptest! {
        #[test]
        fn prop_health_stays_in_bounds(
            max in 1u32..1000,
            deltas in proptest::collection::vec(-200i32..200, 0..50),
            stage_ordinal in 1u8..=4,
        ) {
            let stage = GrowthStage::from_ordinal(stage_ordinal).expect("valid ordinal");
            let mut model = HealthModel::new(1, max, FRACTIONS);
            model.refresh_max(stage);

            for delta in deltas {
                let health = model.apply_delta(stage, delta);
                prop_assert!(health <= model.current_max());
                prop_assert!(health <= model.ceiling(stage));
            }
        }
    }
}
