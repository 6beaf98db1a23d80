//! Growth stages and death classification.
//!
//! Stages form a fixed ordered table indexed by ordinal. Transitions are pure
//! functions on [`GrowthStage`]; the plant owns the only mutable copy.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Raised when a stage ordinal or name does not name one of the six stages.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid growth stage: {0}")]
pub struct InvalidStage(pub String);

/// Life stage of a plant, ordered from planting to death.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[repr(u8)]
pub enum GrowthStage {
    /// Just planted.
    #[default]
    Seedling = 1,
    /// First leaves visible.
    Sprout = 2,
    /// Growing, not yet mature.
    Juvenile = 3,
    /// Mature; exerts its area effect and can be harvested.
    Adult = 4,
    /// Past its lifespan or out of health as an adult.
    Decaying = 5,
    /// Terminal.
    Dead = 6,
}

impl GrowthStage {
    /// Every stage in ordinal order.
    pub const ALL: [Self; 6] = [
        Self::Seedling,
        Self::Sprout,
        Self::Juvenile,
        Self::Adult,
        Self::Decaying,
        Self::Dead,
    ];

    /// 1-based ordinal of this stage.
    #[must_use]
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Look a stage up by its 1-based ordinal.
    pub fn from_ordinal(ordinal: u8) -> Result<Self, InvalidStage> {
        match ordinal {
            1..=6 => Ok(Self::ALL[usize::from(ordinal) - 1]),
            _ => Err(InvalidStage(ordinal.to_string())),
        }
    }

    /// Canonical upper-case name, used in saves and status text.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Seedling => "SEEDLING",
            Self::Sprout => "SPROUT",
            Self::Juvenile => "JUVENILE",
            Self::Adult => "ADULT",
            Self::Decaying => "DECAYING",
            Self::Dead => "DEAD",
        }
    }

    /// Parse a canonical stage name (case-insensitive).
    pub fn from_name(name: &str) -> Result<Self, InvalidStage> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| InvalidStage(name.to_string()))
    }

    /// Map a debug command label (`seedling|sprout|juvenile|adult|decay|dead`)
    /// to its stage.
    #[must_use]
    pub fn from_debug_label(label: &str) -> Option<Self> {
        match label {
            "seedling" => Some(Self::Seedling),
            "sprout" => Some(Self::Sprout),
            "juvenile" => Some(Self::Juvenile),
            "adult" => Some(Self::Adult),
            "decay" => Some(Self::Decaying),
            "dead" => Some(Self::Dead),
            _ => None,
        }
    }

    /// The stage natural growth leads to. `Dead` maps to itself.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Seedling => Self::Sprout,
            Self::Sprout => Self::Juvenile,
            Self::Juvenile => Self::Adult,
            Self::Adult => Self::Decaying,
            Self::Decaying | Self::Dead => Self::Dead,
        }
    }

    /// Seedling, Sprout or Juvenile.
    #[must_use]
    pub const fn is_pre_adult(self) -> bool {
        matches!(self, Self::Seedling | Self::Sprout | Self::Juvenile)
    }

    /// Index into the three-entry pre-adult tables (thresholds, health caps).
    #[must_use]
    pub const fn pre_adult_index(self) -> Option<usize> {
        match self {
            Self::Seedling => Some(0),
            Self::Sprout => Some(1),
            Self::Juvenile => Some(2),
            _ => None,
        }
    }

    /// Animation shown for this stage.
    #[must_use]
    pub const fn animation(self) -> &'static str {
        match self {
            Self::Seedling => "1_seedling",
            Self::Sprout => "2_sprout",
            Self::Juvenile => "3_juvenile",
            Self::Adult => "4_adult",
            Self::Decaying => "5_decaying",
            Self::Dead => "6_dead",
        }
    }
}

impl std::fmt::Display for GrowthStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<u8> for GrowthStage {
    type Error = InvalidStage;

    fn try_from(ordinal: u8) -> Result<Self, Self::Error> {
        Self::from_ordinal(ordinal)
    }
}

/// Which rule moved a plant into [`GrowthStage::Dead`].
///
/// The cause decides the population bookkeeping of the death: only a
/// natural death leaves the decaying population, since forced, premature and
/// seedling deaths were never counted there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeathCause {
    /// Health ran out while decaying.
    Natural,
    /// Debug command.
    Forced,
    /// Health ran out as a sprout or juvenile.
    PrematureMaturity,
    /// Health ran out as a seedling.
    SeedlingDeath,
}

impl DeathCause {
    /// Cause for a health-exhausted plant that never reached adulthood.
    #[must_use]
    pub const fn before_maturity(stage: GrowthStage) -> Self {
        match stage {
            GrowthStage::Seedling => Self::SeedlingDeath,
            _ => Self::PrematureMaturity,
        }
    }

    /// Whether this death removes the plant from the decaying population.
    #[must_use]
    pub const fn leaves_decaying(self) -> bool {
        matches!(self, Self::Natural)
    }

    /// Corpse animation for this cause, if it differs from the stage default.
    #[must_use]
    pub const fn animation(self) -> Option<&'static str> {
        match self {
            Self::SeedlingDeath => Some("1_seedling_dead"),
            Self::PrematureMaturity => Some("2_sprout_dead"),
            Self::Natural | Self::Forced => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_ordinals() {
        for (i, stage) in GrowthStage::ALL.iter().enumerate() {
            assert_eq!(usize::from(stage.ordinal()), i + 1);
            assert_eq!(GrowthStage::from_ordinal(stage.ordinal()), Ok(*stage));
        }
        assert!(GrowthStage::from_ordinal(0).is_err());
        assert!(GrowthStage::from_ordinal(7).is_err());
        assert!(GrowthStage::try_from(9).is_err());
    }

    #[test]
    fn test_stage_progression() {
        assert_eq!(GrowthStage::Seedling.next(), GrowthStage::Sprout);
        assert_eq!(GrowthStage::Sprout.next(), GrowthStage::Juvenile);
        assert_eq!(GrowthStage::Juvenile.next(), GrowthStage::Adult);
        assert_eq!(GrowthStage::Adult.next(), GrowthStage::Decaying);
        assert_eq!(GrowthStage::Decaying.next(), GrowthStage::Dead);
        assert_eq!(GrowthStage::Dead.next(), GrowthStage::Dead);
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(GrowthStage::from_name("juvenile"), Ok(GrowthStage::Juvenile));
        assert_eq!(GrowthStage::from_name("DEAD"), Ok(GrowthStage::Dead));
        assert_eq!(
            GrowthStage::from_name("flowering"),
            Err(InvalidStage("flowering".to_string()))
        );
        assert_eq!(GrowthStage::Adult.to_string(), "ADULT");
    }

    #[test]
    fn test_debug_labels() {
        assert_eq!(GrowthStage::from_debug_label("decay"), Some(GrowthStage::Decaying));
        assert_eq!(GrowthStage::from_debug_label("dead"), Some(GrowthStage::Dead));
        assert_eq!(GrowthStage::from_debug_label("decaying"), None);
    }

    #[test]
    fn test_pre_adult_index() {
        assert_eq!(GrowthStage::Seedling.pre_adult_index(), Some(0));
        assert_eq!(GrowthStage::Juvenile.pre_adult_index(), Some(2));
        assert_eq!(GrowthStage::Adult.pre_adult_index(), None);
        assert!(GrowthStage::Sprout.is_pre_adult());
        assert!(!GrowthStage::Decaying.is_pre_adult());
    }

    #[test]
    fn test_death_cause() {
        assert_eq!(
            DeathCause::before_maturity(GrowthStage::Seedling),
            DeathCause::SeedlingDeath
        );
        assert_eq!(
            DeathCause::before_maturity(GrowthStage::Juvenile),
            DeathCause::PrematureMaturity
        );
        assert!(DeathCause::Natural.leaves_decaying());
        assert!(!DeathCause::Forced.leaves_decaying());
        assert!(!DeathCause::SeedlingDeath.leaves_decaying());
    }
}
