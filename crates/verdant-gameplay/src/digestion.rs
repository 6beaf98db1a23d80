//! Digestion cooldown of predatory plants.

use serde::{Deserialize, Serialize};

/// Simulated minutes a predator needs before it can eat again.
pub const DIGESTION_COOLDOWN_MINUTES: u32 = 60;

/// Whether a predator is digesting, and for how long it has been.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Digestion {
    eating: bool,
    minutes: u32,
}

impl Digestion {
    /// Reinstate a saved digestion state.
    #[must_use]
    pub const fn restore(eating: bool, minutes: u32) -> Self {
        Self { eating, minutes }
    }

    /// Whether the plant is digesting.
    #[must_use]
    pub const fn is_eating(&self) -> bool {
        self.eating
    }

    /// Minutes spent digesting so far.
    #[must_use]
    pub const fn minutes(&self) -> u32 {
        self.minutes
    }

    /// Start digesting a fresh meal.
    pub fn start(&mut self) {
        self.eating = true;
        self.minutes = 0;
    }

    /// Advance one minute. Returns true when digestion finished on this tick.
    pub fn tick(&mut self) -> bool {
        if !self.eating {
            return false;
        }
        self.minutes += 1;
        if self.minutes >= DIGESTION_COOLDOWN_MINUTES {
            *self = Self::default();
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_idle_tick_does_nothing() {
        let mut digestion = Digestion::default();
        assert!(!digestion.tick());
        assert_eq!(digestion.minutes(), 0);
    }

    #[test]
    fn test_cooldown() {
        let mut digestion = Digestion::default();
        digestion.start();

        for _ in 0..59 {
            assert!(!digestion.tick());
        }
        assert!(digestion.is_eating());
        assert_eq!(digestion.minutes(), 59);

        assert!(digestion.tick());
        assert!(!digestion.is_eating());
        assert_eq!(digestion.minutes(), 0);
    }

    #[test]
    fn test_restart_resets_counter() {
        let mut digestion = Digestion::restore(true, 40);
        digestion.start();
        assert_eq!(digestion.minutes(), 0);
    }
}
