//! # Verdant Gameplay
//!
//! Plant growth and lifecycle simulation.
//!
//! This crate provides the per-plant state machine and everything it needs:
//! - Growth stages, stage-scoped health and death classification
//! - Growth accumulation from the growing medium
//! - Game clock and tick dispatch
//! - Predator digestion
//! - Harvest, attack, destroy and debug stage forcing
//! - Collaborator service traits with in-memory implementations
//! - Variety catalog, plant records and garden saves
//! - The garden registry tying tiles, plants and services together

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod catalog;
pub mod digestion;
pub mod effect;
pub mod environment;
pub mod events;
pub mod garden;
pub mod growth;
pub mod health;
pub mod plant;
pub mod profile;
pub mod record;
pub mod save;
pub mod services;
pub mod stage;
pub mod time;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::catalog::*;
    pub use crate::digestion::*;
    pub use crate::effect::*;
    pub use crate::environment::*;
    pub use crate::events::*;
    pub use crate::garden::*;
    pub use crate::growth::{accumulate, GrowthOutcome, Reading};
    pub use crate::health::*;
    pub use crate::plant::*;
    pub use crate::profile::*;
    pub use crate::record::*;
    pub use crate::save::*;
    pub use crate::services::*;
    pub use crate::stage::*;
    pub use crate::time::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;
    use verdant_common::WorldCoord;

    #[test]
    fn test_cosmic_cob_full_life() {
        let mut garden = Garden::with_defaults().with_water_loss(0.0);
        let pos = WorldCoord::new(0, 0);
        garden.till(pos);
        garden.fertilise(pos).expect("fertilise");
        garden.water(pos, 0.7).expect("water");
        garden.plant(pos, "Cosmic Cob").expect("plant");

        garden.advance_minutes(60).expect("advance");
        assert_eq!(
            garden.plant_at(pos).expect("plant").stage(),
            GrowthStage::Adult
        );

        assert!(garden.harvest(pos).expect("harvest"));
        assert_eq!(garden.info().alive(), 0);
        assert_eq!(garden.info().harvested("Cosmic Cob"), 1);
        assert!(!garden.tile(pos).expect("tile").is_occupied());
    }

    #[test]
    fn test_adult_decays_after_lifespan() {
        let mut garden = Garden::with_defaults().with_water_loss(0.0);
        let pos = WorldCoord::new(1, 0);
        garden.till(pos);
        garden.water(pos, 0.7).expect("water");
        garden.plant(pos, "Cosmic Cob").expect("plant");
        garden.force_growth_stage(pos, "adult").expect("force");

        let lifespan = garden.catalog().get("Cosmic Cob").expect("cob").adult_lifespan;
        let report = garden
            .advance_minutes((lifespan + 1) * 24 * 60)
            .expect("advance");

        assert_eq!(report.days, lifespan + 1);
        let plant = garden.plant_at(pos).expect("plant");
        assert_eq!(plant.stage(), GrowthStage::Decaying);
        assert_eq!(plant.area_of_effect(), AreaOfEffect::decay());
        assert_eq!(garden.info().decaying(), 1);
    }
}
