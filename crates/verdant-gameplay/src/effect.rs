//! Area-of-effect descriptors exerted by mature plants.

use serde::{Deserialize, Serialize};

use crate::stage::GrowthStage;

/// Radius of the effect every decaying plant gives off.
pub const DECAY_RADIUS: f32 = 2.0;

/// Kind of ambient effect a plant exerts on its surroundings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EffectKind {
    /// No effect.
    #[default]
    None,
    /// Heals nearby entities.
    Health,
    /// Eats small animals that wander close.
    Eat,
    /// Poisons nearby entities.
    Poison,
    /// Ambient sound only.
    Sound,
    /// Rot from a decaying plant.
    Decay,
}

impl EffectKind {
    /// Display name of the effect.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::Health => "Health",
            Self::Eat => "Eat",
            Self::Poison => "Poison",
            Self::Sound => "Sound",
            Self::Decay => "Decay",
        }
    }
}

/// Effect kind plus the radius (in tiles) it reaches.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AreaOfEffect {
    /// Effect kind.
    pub kind: EffectKind,
    /// Reach in tiles.
    pub radius: f32,
}

impl AreaOfEffect {
    /// No effect at all.
    pub const NONE: Self = Self {
        kind: EffectKind::None,
        radius: 0.0,
    };

    /// Creates a descriptor.
    #[must_use]
    pub const fn new(kind: EffectKind, radius: f32) -> Self {
        Self { kind, radius }
    }

    /// Descriptor of a decaying or dead plant.
    #[must_use]
    pub const fn decay() -> Self {
        Self::new(EffectKind::Decay, DECAY_RADIUS)
    }

    /// Descriptor a plant shows in `stage`, given its adult effect.
    #[must_use]
    pub const fn for_stage(stage: GrowthStage, adult: Self) -> Self {
        match stage {
            GrowthStage::Seedling | GrowthStage::Sprout | GrowthStage::Juvenile => Self::NONE,
            GrowthStage::Adult => adult,
            GrowthStage::Decaying | GrowthStage::Dead => Self::decay(),
        }
    }

    /// Whether `distance` tiles away is inside the effect.
    #[must_use]
    pub fn reaches(&self, distance: f32) -> bool {
        self.kind != EffectKind::None && distance <= self.radius
    }
}
