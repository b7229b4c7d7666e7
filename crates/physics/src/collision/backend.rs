//! The collision capability the movement controller depends on.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::trace::{EntityHandle, TraceResult, TraceShape};

/// A request to move a hull along a velocity for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepRequest {
    /// Starting position (bottom-center of the hull).
    pub origin: Vec3,
    /// Velocity to move along (units/second).
    pub velocity: Vec3,
    /// Hull to sweep.
    pub hull: TraceShape,
    /// Geometry the sweep must pass through (usually the actor itself).
    pub ignore: Option<EntityHandle>,
    /// Time step in seconds.
    pub delta_time: f32,
    /// Tallest ledge the sweep may climb without help.
    pub step_height: f32,
}

/// Where a stepped sweep left the hull.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SweepResult {
    /// Final position.
    pub position: Vec3,
    /// Velocity after clipping against everything that was touched.
    pub velocity: Vec3,
}

/// Collision queries consumed by the movement controller.
///
/// Both operations are infallible: misses and blocked moves are reported
/// through the return values.
pub trait CollisionBackend {
    /// Sweep `hull` from `start` to `end`, skipping `ignore`.
    fn trace_box(
        &self,
        start: Vec3,
        end: Vec3,
        hull: TraceShape,
        ignore: Option<EntityHandle>,
    ) -> TraceResult;

    /// Move a hull along its velocity for one tick, sliding along surfaces
    /// and stepping over ledges up to `request.step_height`.
    ///
    /// Returns `None` when no motion occurred.
    fn stepped_sweep(&self, request: &SweepRequest) -> Option<SweepResult>;
}

impl<T: CollisionBackend + ?Sized> CollisionBackend for &T {
    fn trace_box(
        &self,
        start: Vec3,
        end: Vec3,
        hull: TraceShape,
        ignore: Option<EntityHandle>,
    ) -> TraceResult {
        (**self).trace_box(start, end, hull, ignore)
    }

    fn stepped_sweep(&self, request: &SweepRequest) -> Option<SweepResult> {
        (**self).stepped_sweep(request)
    }
}
