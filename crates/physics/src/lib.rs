//! Pawn Movement Physics
//!
//! A per-tick kinematic character controller with classic FPS movement:
//! ground acceleration, air strafing, friction, jumping, auto-hop, a timed
//! dash, and step/vault traversal over low obstacles.
//!
//! # Architecture
//!
//! The crate is split into three systems:
//!
//! - **Collision**: The [`CollisionBackend`] seam the controller queries, plus a
//!   parry3d-backed [`CollisionWorld`] that implements it
//! - **Movement**: [`PawnController`] turns an [`InputSnapshot`] into a new
//!   position and velocity for an [`ActorState`]
//! - **Effects**: Cosmetic effects spawned by the controller and destroyed
//!   later through a [`DelayedDestroyQueue`]
//!
//! ```text
//! InputSnapshot ─► wish ─► ground check ─► integrate ─► stepped sweep
//!                                                           │
//!               events ◄─ dash ◄─ vault ◄─ ground snap ◄────┘
//! ```

pub mod collision;
pub mod effects;
pub mod movement;

// Re-export commonly used types
pub use collision::{
    CollisionBackend, CollisionWorld, ContentFlags, EntityHandle, SweepRequest, SweepResult,
    TraceResult, TraceShape,
};
pub use effects::{DelayedDestroyQueue, EffectHandle, EffectSystem, NoEffects};
pub use movement::{
    ActorState, ConfigError, GroundContact, InputSnapshot, MovementConfig, MovementEvent,
    MovementEvents, PawnController, SimClock,
};
