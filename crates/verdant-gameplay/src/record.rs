//! Persisted form of a single plant.
//!
//! The record holds every piece of mutable plant state; the variety profile
//! and the position are supplied by whoever restores it.

use serde::{Deserialize, Serialize};

use crate::stage::DeathCause;

/// Snapshot of one plant's mutable state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantRecord {
    /// Variety name.
    pub name: String,
    /// Current health.
    pub health: u32,
    /// Accumulated growth level.
    pub current_growth_level: u32,
    /// Health ceiling of the current stage.
    pub current_max_health: u32,
    /// Days lived as an adult.
    pub num_of_days_as_adult: u32,
    /// Whether a predator is digesting.
    pub is_eating: bool,
    /// Minutes digested so far.
    pub digestion_minutes: u32,
    /// Why the plant died, if it did.
    pub death_cause: Option<DeathCause>,
    /// Whether the plant was destroyed.
    pub destroyed: bool,
    /// Whether a debug command moved the plant.
    pub forced: bool,
    /// Stage name, e.g. `"JUVENILE"`.
    pub stage_name: String,
    /// Animation the plant was showing.
    pub animation_name: String,
}

impl PlantRecord {
    /// Encode as JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Decode from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> PlantRecord {
        PlantRecord {
            name: "Space Snapper".to_string(),
            health: 42,
            current_growth_level: 57,
            current_max_health: 200,
            num_of_days_as_adult: 1,
            is_eating: true,
            digestion_minutes: 12,
            death_cause: None,
            destroyed: false,
            forced: false,
            stage_name: "ADULT".to_string(),
            animation_name: "digesting".to_string(),
        }
    }

    #[test]
    fn test_json_field_names() {
        let json = sample().to_json().expect("encode");
        assert!(json.contains("\"currentGrowthLevel\":57"));
        assert!(json.contains("\"numOfDaysAsAdult\":1"));
        assert!(json.contains("\"stageName\":\"ADULT\""));
        assert!(json.contains("\"deathCause\":null"));
    }

    #[test]
    fn test_death_cause_encoding() {
        let mut record = sample();
        record.death_cause = Some(DeathCause::SeedlingDeath);
        let json = record.to_json().expect("encode");
        assert!(json.contains("\"deathCause\":\"SeedlingDeath\""));
        assert_eq!(PlantRecord::from_json(&json).expect("decode"), record);
    }

    #[test]
    fn test_rejects_missing_fields() {
        assert!(PlantRecord::from_json(r#"{"name":"Aloe Vera"}"#).is_err());
    }
}
