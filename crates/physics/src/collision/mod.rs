//! Collision queries used by the movement controller.
//!
//! The controller never talks to geometry directly. It goes through the
//! [`CollisionBackend`] trait, which exposes exactly two operations:
//!
//! - [`CollisionBackend::trace_box`]: sweep the actor hull along a segment
//! - [`CollisionBackend::stepped_sweep`]: move the hull along a velocity for
//!   one tick, sliding along walls and climbing steps
//!
//! [`CollisionWorld`] is the reference implementation on top of parry3d.
//! Tests plug in a deterministic fake instead.
//!
//! # Trace results
//!
//! Traces report:
//! - How far the shape traveled (fraction 0.0-1.0)
//! - The final position
//! - Surface normal at impact (if any)
//! - Whether the trace started inside solid geometry
//! - The geometry handle that was hit

mod backend;
mod flags;
mod sweep;
mod trace;
mod world;

pub use backend::{CollisionBackend, SweepRequest, SweepResult};
pub use flags::ContentFlags;
pub use sweep::{clip_velocity, step_slide_move};
pub use trace::{EntityHandle, TraceResult, TraceShape};
pub use world::CollisionWorld;
