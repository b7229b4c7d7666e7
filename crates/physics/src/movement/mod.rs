//! Pawn movement.
//!
//! Quake-style kinematic movement:
//!
//! - Ground and air movement with separate acceleration models
//! - Friction with a stop-speed floor
//! - Jumping with auto-hop while the button is held
//! - A run modifier that doubles as a timed dash
//! - Stair stepping, ground snapping and ledge vaulting
//!
//! # Design
//!
//! [`PawnController`] reads an [`InputSnapshot`] and mutates an
//! [`ActorState`] through any [`CollisionBackend`](crate::CollisionBackend).
//! The building blocks (acceleration, ground probes, vaulting) are plain
//! functions so they can be tested on their own.
//!
//! Given the same inputs, backend answers and clock, a tick always produces
//! the same result.

mod accel;
mod config;
mod controller;
mod events;
mod ground;
mod state;
mod vault;

#[cfg(test)]
pub(crate) mod test_support;

pub use accel::{accelerate, apply_friction, wish_velocity, Wish, FRICTION_MIN_SPEED};
pub use config::{ConfigError, MovementConfig};
pub use controller::PawnController;
pub use events::{MovementEvent, MovementEvents};
pub use ground::{check_ground, is_walkable, stay_on_ground, surface_angle};
pub use state::{ActorState, GroundContact, InputSnapshot, SimClock};
pub use vault::{try_vault, VaultOutcome};
