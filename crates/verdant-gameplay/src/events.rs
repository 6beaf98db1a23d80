//! Mission event bus.
//!
//! Plants report farming milestones here; the mission framework drains the
//! bus on its own schedule.

use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use serde::{Deserialize, Serialize};

use crate::services::{MissionSink, ServiceError, ServiceResult};

/// Farming milestones reported to missions and achievements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MissionEvent {
    /// A seed was planted.
    PlantCrop {
        /// Variety name
        plant_name: String,
    },
    /// A mature plant was harvested.
    HarvestCrop {
        /// Variety name
        plant_name: String,
    },
    /// A predatory plant ate an animal.
    AnimalEaten {
        /// Variety name
        plant_name: String,
    },
}

impl MissionEvent {
    /// Stable event name, as used by mission listeners.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::PlantCrop { .. } => "PLANT_CROP",
            Self::HarvestCrop { .. } => "HARVEST_CROP",
            Self::AnimalEaten { .. } => "ANIMAL_EATEN",
        }
    }

    /// Variety the event is about.
    #[must_use]
    pub fn plant_name(&self) -> &str {
        match self {
            Self::PlantCrop { plant_name }
            | Self::HarvestCrop { plant_name }
            | Self::AnimalEaten { plant_name } => plant_name,
        }
    }
}

/// Bounded event bus for mission events.
#[derive(Debug)]
pub struct EventBus {
    /// Sender for broadcasting events
    sender: Sender<MissionEvent>,
    /// Receiver for collecting events
    receiver: Receiver<MissionEvent>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(1024)
    }
}

impl EventBus {
    /// Creates a new event bus with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);
        Self { sender, receiver }
    }

    /// Publishes an event; fails without blocking when the bus is full.
    pub fn publish(&self, event: MissionEvent) -> ServiceResult<()> {
        self.sender.try_send(event).map_err(|e| {
            let reason = match e {
                TrySendError::Full(_) => "bus full",
                TrySendError::Disconnected(_) => "bus disconnected",
            };
            ServiceError::unavailable("mission bus", reason)
        })
    }

    /// Drains all pending events.
    pub fn drain(&self) -> Vec<MissionEvent> {
        self.receiver.try_iter().collect()
    }

    /// Returns the number of pending events.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.receiver.len()
    }
}

impl MissionSink for EventBus {
    fn report(&mut self, event: MissionEvent) -> ServiceResult<()> {
        self.publish(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn harvest(name: &str) -> MissionEvent {
        MissionEvent::HarvestCrop {
            plant_name: name.to_string(),
        }
    }

    #[test]
    fn test_publish_and_drain() {
        let bus = EventBus::new(8);
        bus.publish(harvest("Aloe Vera")).expect("publish");
        bus.publish(harvest("Cosmic Cob")).expect("publish");

        assert_eq!(bus.pending_count(), 2);
        let events = bus.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind(), "HARVEST_CROP");
        assert_eq!(events[1].plant_name(), "Cosmic Cob");
        assert_eq!(bus.pending_count(), 0);
    }

    #[test]
    fn test_full_bus_reports_unavailable() {
        let mut bus = EventBus::new(1);
        bus.report(harvest("Aloe Vera")).expect("first fits");

        let err = bus.report(harvest("Aloe Vera")).expect_err("second overflows");
        assert!(matches!(err, ServiceError::Unavailable { .. }));
    }
}
