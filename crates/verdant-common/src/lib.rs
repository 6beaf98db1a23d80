//! # Verdant Common
//!
//! Common types, utilities, and shared abstractions for Verdant.
//!
//! This crate provides foundational types used across all Verdant crates:
//! - Tile coordinates
//! - ID types (EntityId, ItemKind)
//! - Version information for schemas
//! - Common error types
//! - Prelude for convenient imports

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(clippy::unwrap_used)]

pub mod coords;
pub mod error;
pub mod ids;
pub mod version;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::coords::*;
    pub use crate::error::*;
    pub use crate::ids::*;
    pub use crate::version::*;
}

pub use prelude::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coord_distance() {
        let a = WorldCoord::new(0, 0);
        let b = a.offset(3, 4);

        assert_eq!(b, WorldCoord::new(3, 4));
        assert!((a.distance(b) - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_entity_id_generation() {
        let id1 = EntityId::new();
        let id2 = EntityId::new();
        assert_ne!(id1, id2);
        assert!(id1.is_valid());
        assert!(!EntityId::NULL.is_valid());
    }

    #[test]
    fn test_seed_item_kind() {
        let kind = ItemKind::seeds_of("Hammer Plant");
        assert_eq!(kind.as_str(), "Hammer Plant Seeds");
    }

    #[test]
    fn test_version_compatibility() {
        let v1 = SchemaVersion::new(1, 0, 0);
        let v2 = SchemaVersion::new(1, 1, 0);
        let v3 = SchemaVersion::new(2, 0, 0);

        // Same major reads older and newer minors
        assert!(v2.can_read(&v1));
        assert!(v1.can_read(&v2));
        // Different major versions are incompatible
        assert!(!v1.can_read(&v3));
        assert_eq!(SchemaVersion::GARDEN_SAVE.to_string(), "1.0.0");
    }

    #[test]
    fn test_magic_bytes() {
        assert!(MagicBytes::GARDEN.matches(b"VRDN1234"));
        assert!(!MagicBytes::GARDEN.matches(b"VR"));
    }
}
