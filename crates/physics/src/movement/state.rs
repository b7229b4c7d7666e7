//! Actor state and per-tick inputs.

use glam::{Vec2, Vec3};
use serde::{Deserialize, Serialize};

use crate::collision::{EntityHandle, TraceShape};

/// The surface an actor is standing on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundContact {
    /// Supporting geometry, when the backend names it.
    pub entity: Option<EntityHandle>,
    /// Surface normal of the support.
    pub normal: Vec3,
}

/// Movement state of a controllable actor.
///
/// Owned by the surrounding game object and mutated in place by
/// [`PawnController::simulate`](super::PawnController::simulate).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorState {
    /// Position in world space (bottom-center of the hull).
    pub position: Vec3,

    /// Velocity in world space (units/second).
    pub velocity: Vec3,

    /// Supporting surface, `None` while airborne.
    pub ground: Option<GroundContact>,

    /// Collision hull. Read-only to the controller.
    pub hull: TraceShape,

    /// The actor's own handle, skipped by every trace.
    pub entity: Option<EntityHandle>,
}

impl Default for ActorState {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            ground: None,
            hull: TraceShape::PLAYER,
            entity: None,
        }
    }
}

impl ActorState {
    /// Create an airborne actor at the given position.
    pub fn new(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Check if the actor is standing on something.
    #[inline]
    pub fn grounded(&self) -> bool {
        self.ground.is_some()
    }

    /// Get current horizontal speed.
    pub fn horizontal_speed(&self) -> f32 {
        Vec2::new(self.velocity.x, self.velocity.z).length()
    }
}

/// Player input for a single tick.
///
/// Action bindings are already resolved: `jump` and `run` are plain
/// "is held" booleans.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InputSnapshot {
    /// Forward/backward intent (-1.0 to 1.0). Positive = forward.
    pub forward_move: f32,

    /// Strafe intent (-1.0 to 1.0). Positive = right.
    pub right_move: f32,

    /// View yaw in radians.
    pub yaw: f32,

    /// View pitch in radians. Not used for movement direction.
    pub pitch: f32,

    /// Jump is held.
    pub jump: bool,

    /// Run is held.
    pub run: bool,
}

impl InputSnapshot {
    /// Horizontal forward vector for the view yaw.
    pub fn forward_direction(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        Vec3::new(cos_yaw, 0.0, sin_yaw)
    }

    /// Horizontal right vector for the view yaw.
    pub fn right_direction(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        Vec3::new(-sin_yaw, 0.0, cos_yaw)
    }

    /// Move intent with its length clamped to one.
    pub fn move_intent(&self) -> Vec2 {
        Vec2::new(self.forward_move, self.right_move).clamp_length_max(1.0)
    }
}

/// Simulation time for one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimClock {
    /// Monotonic simulation time in seconds.
    pub now: f64,
    /// Length of this tick in seconds.
    pub delta: f32,
}

impl SimClock {
    pub fn new(now: f64, delta: f32) -> Self {
        Self { now, delta }
    }

    /// The clock for the tick after this one.
    pub fn advance(self) -> Self {
        Self {
            now: self.now + f64::from(self.delta),
            delta: self.delta,
        }
    }
}
