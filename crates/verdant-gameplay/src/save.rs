//! Garden save files.
//!
//! A save holds the clock, every tilled tile, the plants on them as
//! [`PlantRecord`]s, the population counters and the oxygen level. On disk it
//! is the `VRDN` magic followed by a bincode body.

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use verdant_common::{MagicBytes, SchemaVersion, WorldCoord};

use crate::environment::CropTile;
use crate::record::PlantRecord;
use crate::services::{OxygenLevel, PlantInfo};

/// Errors that can occur during save/load operations.
#[derive(Debug, Error)]
pub enum SaveError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Invalid magic bytes
    #[error("Invalid save file format")]
    InvalidFormat,

    /// Version mismatch
    #[error("Incompatible save version: expected {expected}, found {found}")]
    VersionMismatch {
        /// Expected version
        expected: SchemaVersion,
        /// Found version
        found: SchemaVersion,
    },

    /// Save file not found
    #[error("Save not found: {0}")]
    NotFound(String),

    /// Save file corrupted
    #[error("Save file corrupted: {0}")]
    Corrupted(String),
}

/// Result type for save operations.
pub type SaveResult<T> = Result<T, SaveError>;

/// A plant together with the tile it grows on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlantSaveData {
    /// Tile position.
    pub position: WorldCoord,
    /// Plant state.
    pub record: PlantRecord,
}

/// Full garden state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GardenSave {
    /// Save format version.
    pub version: SchemaVersion,
    /// Game minutes elapsed.
    pub total_minutes: u64,
    /// Tilled tiles.
    pub tiles: Vec<(WorldCoord, CropTile)>,
    /// Live plants.
    pub plants: Vec<PlantSaveData>,
    /// Population counters.
    pub counters: PlantInfo,
    /// Planet oxygen.
    pub oxygen: OxygenLevel,
}

impl GardenSave {
    /// Serializes to binary format.
    pub fn to_bytes(&self) -> SaveResult<Vec<u8>> {
        let mut buffer = Vec::new();
        buffer.extend_from_slice(&MagicBytes::GARDEN.0);

        let data = bincode::serialize(self).map_err(|e| SaveError::Serialization(e.to_string()))?;
        buffer.extend(data);

        Ok(buffer)
    }

    /// Deserializes from binary format.
    pub fn from_bytes(bytes: &[u8]) -> SaveResult<Self> {
        if !MagicBytes::GARDEN.matches(bytes) {
            return Err(SaveError::InvalidFormat);
        }

        let save: Self =
            bincode::deserialize(&bytes[4..]).map_err(|e| SaveError::Corrupted(e.to_string()))?;

        if !SchemaVersion::GARDEN_SAVE.can_read(&save.version) {
            return Err(SaveError::VersionMismatch {
                expected: SchemaVersion::GARDEN_SAVE,
                found: save.version,
            });
        }

        Ok(save)
    }

    /// Write to `path`.
    ///
    /// Writes a temporary file next to the target and renames it into place.
    pub fn write_to(&self, path: &Path) -> SaveResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let bytes = self.to_bytes()?;
        let temp_path = path.with_extension("tmp");

        let mut file = fs::File::create(&temp_path)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&temp_path, path)?;
        info!(
            "Saved garden ({} plants, {} bytes) to {}",
            self.plants.len(),
            bytes.len(),
            path.display()
        );
        Ok(())
    }

    /// Read from `path`.
    pub fn read_from(path: &Path) -> SaveResult<Self> {
        if !path.exists() {
            return Err(SaveError::NotFound(path.display().to_string()));
        }
        let bytes = fs::read(path)?;
        let save = Self::from_bytes(&bytes)?;
        debug!("Loaded garden save {} from {}", save.version, path.display());
        Ok(save)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{OxygenSink, PopulationCounters};
    use crate::stage::DeathCause;

    fn sample() -> GardenSave {
        let mut counters = PlantInfo::new();
        counters.adjust_alive(1).expect("adjust");
        counters.record_planted("Aloe Vera").expect("record");
        let mut oxygen = OxygenLevel::new(100);
        oxygen.add_oxygen(20).expect("add");

        let mut tile = CropTile::with_water(0.6);
        tile.fertilise();

        GardenSave {
            version: SchemaVersion::GARDEN_SAVE,
            total_minutes: 1500,
            tiles: vec![(WorldCoord::new(1, 1), tile)],
            plants: vec![PlantSaveData {
                position: WorldCoord::new(1, 1),
                record: PlantRecord {
                    name: "Aloe Vera".to_string(),
                    health: 3,
                    current_growth_level: 15,
                    current_max_health: 5,
                    num_of_days_as_adult: 0,
                    is_eating: false,
                    digestion_minutes: 0,
                    death_cause: Some(DeathCause::PrematureMaturity),
                    destroyed: false,
                    forced: false,
                    stage_name: "DEAD".to_string(),
                    animation_name: "2_sprout_dead".to_string(),
                },
            }],
            counters,
            oxygen,
        }
    }

    #[test]
    fn test_save_serialization() {
        let save = sample();
        let bytes = save.to_bytes().expect("serialize");
        assert_eq!(&bytes[..4], b"VRDN");

        let loaded = GardenSave::from_bytes(&bytes).expect("deserialize");
        assert_eq!(loaded, save);
    }

    #[test]
    fn test_save_invalid_format() {
        let result = GardenSave::from_bytes(b"GNSVxxxx");
        assert!(matches!(result, Err(SaveError::InvalidFormat)));

        let result = GardenSave::from_bytes(b"VR");
        assert!(matches!(result, Err(SaveError::InvalidFormat)));
    }

    #[test]
    fn test_save_corrupted() {
        let mut bytes = sample().to_bytes().expect("serialize");
        bytes.truncate(10);
        let result = GardenSave::from_bytes(&bytes);
        assert!(matches!(result, Err(SaveError::Corrupted(_))));
    }

    #[test]
    fn test_save_future_version() {
        let mut save = sample();
        save.version = SchemaVersion::new(9, 0, 0);
        let bytes = save.to_bytes().expect("serialize");
        let result = GardenSave::from_bytes(&bytes);
        assert!(matches!(result, Err(SaveError::VersionMismatch { .. })));
    }

    #[test]
    fn test_read_missing_file() {
        let result = GardenSave::read_from(Path::new("/nonexistent/garden.sav"));
        assert!(matches!(result, Err(SaveError::NotFound(_))));
    }

    #[test]
    fn test_write_and_read_file() {
        let dir = std::env::temp_dir().join(format!("verdant_save_test_{}", std::process::id()));
        let path = dir.join("garden.sav");

        let save = sample();
        save.write_to(&path).expect("write");
        let loaded = GardenSave::read_from(&path).expect("read");
        assert_eq!(loaded, save);
        assert!(!path.with_extension("tmp").exists());

        let _ = fs::remove_dir_all(&dir);
    }
}
