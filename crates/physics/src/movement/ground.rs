//! Ground detection and ground adherence.

use glam::Vec3;

use crate::collision::CollisionBackend;

use super::config::MovementConfig;
use super::state::{ActorState, GroundContact};

/// Angle between a surface normal and straight up, in degrees.
#[inline]
pub fn surface_angle(normal: Vec3) -> f32 {
    normal.angle_between(Vec3::Y).to_degrees()
}

/// Whether a surface is flat enough to stand on. The limit is inclusive.
#[inline]
pub fn is_walkable(normal: Vec3, max_angle: f32) -> bool {
    surface_angle(normal) <= max_angle
}

/// Probe just below the actor's feet for walkable ground.
///
/// An actor moving upward faster than `ground_lift_speed` is never grounded,
/// so the tick that starts a jump doesn't immediately land again.
pub fn check_ground<B>(world: &B, actor: &ActorState, config: &MovementConfig) -> Option<GroundContact>
where
    B: CollisionBackend + ?Sized,
{
    if actor.velocity.y > config.ground_lift_speed {
        return None;
    }

    let start = actor.position + Vec3::Y * config.ground_probe_lift;
    let end = actor.position - Vec3::Y * config.ground_probe_depth;
    let trace = world.trace_box(start, end, actor.hull, actor.entity);

    if !trace.hit_something() {
        return None;
    }

    let normal = trace.normal_or_up();
    if !is_walkable(normal, config.ground_angle) {
        log::trace!("ground too steep: {:.1} degrees", surface_angle(normal));
        return None;
    }

    Some(GroundContact {
        entity: trace.hit_entity,
        normal,
    })
}

/// Snap a post-move position down onto the ground.
///
/// Keeps the actor glued to stairs and slopes while walking down them
/// instead of falling a little every tick. Returns `position` unchanged if
/// no usable surface is found within `step_height` below it.
pub fn stay_on_ground<B>(world: &B, actor: &ActorState, position: Vec3, config: &MovementConfig) -> Vec3
where
    B: CollisionBackend + ?Sized,
{
    let lift = position + Vec3::Y * config.snap_lift;
    let end = position - Vec3::Y * config.step_height;

    // See how far up we can go without getting stuck
    let up = world.trace_box(position, lift, actor.hull, actor.entity);
    let start = up.end_position;

    // Now trace down from a known safe position
    let down = world.trace_box(start, end, actor.hull, actor.entity);

    if down.fraction <= 0.0 || down.fraction >= 1.0 {
        return position;
    }
    if down.started_in_solid {
        log::trace!("ground snap rejected: started in solid at {start:?}");
        return position;
    }
    if !is_walkable(down.normal_or_up(), config.ground_angle) {
        return position;
    }

    down.end_position
}
