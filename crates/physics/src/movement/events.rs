//! Per-tick movement events.
//!
//! Animation, audio and effect code query these after a tick to react to
//! what the controller did.

use serde::{Deserialize, Serialize};

/// Something notable that happened during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementEvent {
    /// Landed after being airborne.
    Grounded,
    /// Jumped off the ground.
    Jump,
    /// Dashed forward.
    Dash,
    /// Vaulted onto a ledge.
    Vault,
}

impl MovementEvent {
    /// Every event, in bit order.
    pub const ALL: [Self; 4] = [Self::Grounded, Self::Jump, Self::Dash, Self::Vault];

    #[inline]
    const fn bit(self) -> u8 {
        match self {
            Self::Grounded => 1 << 0,
            Self::Jump => 1 << 1,
            Self::Dash => 1 << 2,
            Self::Vault => 1 << 3,
        }
    }
}

/// The set of events raised during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementEvents(u8);

impl MovementEvents {
    /// Add an event. Adding one that is already present does nothing.
    ///
    /// Returns `true` if the event was newly added.
    #[inline]
    pub fn insert(&mut self, event: MovementEvent) -> bool {
        let added = !self.contains(event);
        self.0 |= event.bit();
        added
    }

    /// Check if an event was raised.
    #[inline]
    pub fn contains(self, event: MovementEvent) -> bool {
        (self.0 & event.bit()) != 0
    }

    /// Remove every event.
    #[inline]
    pub fn clear(&mut self) {
        self.0 = 0;
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of distinct events raised.
    #[inline]
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Iterate over the raised events.
    pub fn iter(self) -> impl Iterator<Item = MovementEvent> {
        MovementEvent::ALL
            .into_iter()
            .filter(move |event| self.contains(*event))
    }
}
