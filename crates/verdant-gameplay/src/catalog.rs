//! Variety catalog.
//!
//! Holds every plant profile the game knows, keyed by name. The built-in
//! varieties are always available; extra ones can be loaded from RON files
//! of the form:
//!
//! ```ron
//! (
//!     version: (major: 1, minor: 0, patch: 0),
//!     plants: [
//!         (name: "Moon Melon", category: "food", ...),
//!     ],
//! )
//! ```

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use verdant_common::{ItemKind, SchemaVersion};

use crate::effect::EffectKind;
use crate::profile::PlantProfile;

/// Errors that can occur while building or loading a catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// File not found.
    #[error("Catalog file not found: {0}")]
    NotFound(PathBuf),

    /// Failed to read file.
    #[error("Failed to read catalog file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse RON.
    #[error("Failed to parse catalog RON: {0}")]
    ParseError(#[from] ron::error::SpannedError),

    /// Failed to write RON.
    #[error("Failed to write catalog RON: {0}")]
    WriteError(#[from] ron::Error),

    /// Catalog written by an incompatible version.
    #[error("Catalog version {found} is not readable by {expected}")]
    VersionMismatch {
        /// Version this build reads
        expected: SchemaVersion,
        /// Version in the file
        found: SchemaVersion,
    },

    /// Profile failed validation.
    #[error("Invalid plant profile {name}: {reason}")]
    ValidationError {
        /// Variety name
        name: String,
        /// What is wrong
        reason: String,
    },

    /// Two profiles share a name.
    #[error("Duplicate plant variety: {0}")]
    DuplicateName(String),
}

/// Result type for catalog operations.
pub type CatalogResult<T> = Result<T, CatalogError>;

/// On-disk catalog layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogFile {
    /// Catalog format version.
    pub version: SchemaVersion,
    /// Plant profiles in this file.
    pub plants: Vec<PlantProfile>,
}

/// Check a profile for values the lifecycle cannot work with.
pub fn validate_profile(profile: &PlantProfile) -> CatalogResult<()> {
    let invalid = |reason: &str| CatalogError::ValidationError {
        name: profile.name.clone(),
        reason: reason.to_string(),
    };

    if profile.name.trim().is_empty() {
        return Err(invalid("empty name"));
    }
    if profile.max_health == 0 {
        return Err(invalid("max health is zero"));
    }
    let [sprout, juvenile, adult] = profile.growth_thresholds;
    if !(sprout < juvenile && juvenile < adult) {
        return Err(invalid("growth thresholds must be strictly ascending"));
    }
    if profile
        .stage_health_fractions
        .iter()
        .any(|f| !(0.0..=1.0).contains(f))
    {
        return Err(invalid("stage health fractions must lie in [0, 1]"));
    }
    if profile.ideal_water_level < 0.0 {
        return Err(invalid("negative ideal water level"));
    }
    if profile.effect_radius < 0.0 {
        return Err(invalid("negative effect radius"));
    }
    if profile.harvest_yields.values().any(|&q| q == 0) {
        return Err(invalid("harvest yield with zero quantity"));
    }
    Ok(())
}

/// Registry of plant varieties.
#[derive(Debug, Clone, Default)]
pub struct PlantCatalog {
    profiles: AHashMap<String, Arc<PlantProfile>>,
}

impl PlantCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog holding the built-in varieties.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut catalog = Self::new();
        for profile in default_profiles() {
            catalog
                .profiles
                .insert(profile.name.clone(), Arc::new(profile));
        }
        catalog
    }

    /// Register a variety.
    pub fn register(&mut self, profile: PlantProfile) -> CatalogResult<()> {
        validate_profile(&profile)?;
        if self.profiles.contains_key(&profile.name) {
            return Err(CatalogError::DuplicateName(profile.name));
        }
        debug!("Registered plant variety {}", profile.name);
        self.profiles
            .insert(profile.name.clone(), Arc::new(profile));
        Ok(())
    }

    /// Look a variety up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<PlantProfile>> {
        self.profiles.get(name).cloned()
    }

    /// Whether a variety is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }

    /// Number of varieties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Variety names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.profiles.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Every item kind any variety can drop.
    #[must_use]
    pub fn item_kinds(&self) -> Vec<ItemKind> {
        let mut kinds: Vec<ItemKind> = self
            .profiles
            .values()
            .flat_map(|profile| profile.item_kinds())
            .collect();
        kinds.sort();
        kinds.dedup();
        kinds
    }

    /// Parse a RON catalog and register its varieties.
    pub fn load_ron(&mut self, source: &str) -> CatalogResult<usize> {
        let file: CatalogFile = ron::from_str(source)?;
        if !SchemaVersion::CATALOG.can_read(&file.version) {
            return Err(CatalogError::VersionMismatch {
                expected: SchemaVersion::CATALOG,
                found: file.version,
            });
        }
        let count = file.plants.len();
        for profile in file.plants {
            self.register(profile)?;
        }
        Ok(count)
    }

    /// Load a RON catalog file and register its varieties.
    pub fn load_file(&mut self, path: &Path) -> CatalogResult<usize> {
        if !path.exists() {
            return Err(CatalogError::NotFound(path.to_path_buf()));
        }
        let source = fs::read_to_string(path)?;
        let count = self.load_ron(&source)?;
        info!("Loaded {count} plant varieties from {}", path.display());
        Ok(count)
    }

    /// Render the whole catalog as RON, sorted by name.
    pub fn to_ron(&self) -> CatalogResult<String> {
        let mut plants: Vec<PlantProfile> = self
            .profiles
            .values()
            .map(|profile| profile.as_ref().clone())
            .collect();
        plants.sort_by(|a, b| a.name.cmp(&b.name));
        let file = CatalogFile {
            version: SchemaVersion::CATALOG,
            plants,
        };
        Ok(ron::ser::to_string_pretty(
            &file,
            ron::ser::PrettyConfig::default(),
        )?)
    }
}

/// The varieties every garden starts with.
#[must_use]
pub fn default_profiles() -> Vec<PlantProfile> {
    vec![
        PlantProfile::builder("Cosmic Cob")
            .describe("food", "Hardy corn-like crop, a staple of the colony.")
            .ideal_water(0.7)
            .lifespan(2)
            .health(5, 100)
            .effect(EffectKind::Sound, 2.0)
            .yields("Ear of Cosmic Cob", 1)
            .build(),
        PlantProfile::builder("Aloe Vera")
            .describe("health", "Soothing succulent whose leaves heal wounds.")
            .ideal_water(0.4)
            .lifespan(3)
            .health(5, 50)
            .effect(EffectKind::Sound, 2.0)
            .yields("Aloe Vera Leaf", 1)
            .build(),
        PlantProfile::builder("Hammer Plant")
            .describe("repair", "Heals every creature and plant around it.")
            .ideal_water(0.5)
            .lifespan(4)
            .health(5, 150)
            .thresholds(11, 21, 61)
            .effect(EffectKind::Health, 3.0)
            .yields("Hammer Flower", 1)
            .build(),
        PlantProfile::builder("Space Snapper")
            .describe("defence", "Carnivorous plant that eats animals wandering too close.")
            .ideal_water(0.6)
            .lifespan(4)
            .health(5, 200)
            .effect(EffectKind::Eat, 1.5)
            .predator()
            .build(),
        PlantProfile::builder("Deadly Nightshade")
            .describe("deadly", "Poisons anything that lingers beside it.")
            .ideal_water(0.3)
            .lifespan(3)
            .health(5, 100)
            .effect(EffectKind::Poison, 2.5)
            .yields("Nightshade Berry", 1)
            .build(),
        PlantProfile::builder("Atomic Algae")
            .describe("production", "Water plant that floods the air with oxygen.")
            .ideal_water(0.9)
            .lifespan(5)
            .health(5, 80)
            .effect(EffectKind::Sound, 2.0)
            .high_oxygen()
            .build(),
    ]
}
