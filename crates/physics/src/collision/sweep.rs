//! Stepped slide move for [`CollisionWorld`].
//!
//! This is the classic Quake slide move: trace along the velocity, clip the
//! velocity against every plane that was touched, and retry with the time
//! that is left. A second pass lifts the hull by the step height, slides,
//! and drops back down, so low ledges and stairs are climbed without a jump.

use glam::Vec3;

use super::backend::{SweepRequest, SweepResult};
use super::trace::{EntityHandle, TraceShape};
use super::world::CollisionWorld;

/// Maximum number of collision planes to track during slide move.
const MAX_CLIP_PLANES: usize = 5;

/// Overbounce factor for velocity reflection (prevents sticking).
const OVERCLIP: f32 = 1.001;

/// Extra distance for the step-down trace so the hull settles onto the ledge.
const STEP_DOWN_EPSILON: f32 = 0.25;

/// Clip velocity against a surface normal.
///
/// This removes the component of velocity going into the surface and
/// optionally adds a small "overbounce" to prevent sticking.
pub fn clip_velocity(velocity: Vec3, normal: Vec3, overbounce: f32) -> Vec3 {
    let backoff = velocity.dot(normal);

    let adjusted_backoff = if backoff < 0.0 {
        backoff * overbounce
    } else {
        backoff / overbounce
    };

    velocity - normal * adjusted_backoff
}

/// Slide the hull along its velocity for `delta_time`.
///
/// Returns whether the full movement succeeded without touching anything.
fn slide_move(
    world: &CollisionWorld,
    position: &mut Vec3,
    velocity: &mut Vec3,
    hull: TraceShape,
    ignore: Option<EntityHandle>,
    delta_time: f32,
) -> bool {
    let mut time_remaining = delta_time;
    let original_velocity = *velocity;
    let mut planes = [Vec3::ZERO; MAX_CLIP_PLANES];
    let mut num_planes = 0;

    for _ in 0..MAX_CLIP_PLANES {
        if velocity.length_squared() < 0.0001 {
            return num_planes == 0;
        }

        let target = *position + *velocity * time_remaining;
        let trace = world.trace_filtered(*position, target, hull, ignore);

        if trace.fraction >= 1.0 {
            *position = trace.end_position;
            return num_planes == 0;
        }

        if trace.fraction > 0.0 {
            *position = trace.end_position;
        }

        time_remaining *= 1.0 - trace.fraction;

        let Some(normal) = trace.hit_normal else {
            continue;
        };

        if trace.all_solid {
            *velocity = Vec3::ZERO;
            return false;
        }

        if num_planes < MAX_CLIP_PLANES {
            planes[num_planes] = normal;
            num_planes += 1;
        }

        // Find a clipped velocity that doesn't push into any touched plane
        let mut clipped = *velocity;
        let mut found_valid = false;

        for i in 0..num_planes {
            clipped = clip_velocity(clipped, planes[i], OVERCLIP);

            let valid = (0..num_planes)
                .filter(|&j| j != i)
                .all(|j| clipped.dot(planes[j]) >= -0.01);

            if valid {
                *velocity = clipped;
                found_valid = true;
                break;
            }
        }

        if !found_valid {
            if num_planes >= 2 {
                // Slide along the crease between the first two planes
                let crease = planes[0].cross(planes[1]).normalize_or_zero();
                *velocity = crease * original_velocity.dot(crease);

                if velocity.dot(planes[0]) < -0.01 || velocity.dot(planes[1]) < -0.01 {
                    *velocity = Vec3::ZERO;
                    return false;
                }
            } else {
                *velocity = Vec3::ZERO;
                return false;
            }
        }
    }

    false
}

/// Slide move with stair stepping.
///
/// If the plain slide is blocked, retry from `step_height` higher and keep
/// whichever attempt covered more horizontal distance.
pub fn step_slide_move(world: &CollisionWorld, request: &SweepRequest) -> SweepResult {
    let start_position = request.origin;
    let start_velocity = request.velocity;

    let mut position = start_position;
    let mut velocity = start_velocity;

    if slide_move(
        world,
        &mut position,
        &mut velocity,
        request.hull,
        request.ignore,
        request.delta_time,
    ) || request.step_height <= 0.0
    {
        return SweepResult { position, velocity };
    }

    let horizontal_dist_sq = horizontal_distance_sq(position, start_position);

    let up = Vec3::Y * request.step_height;
    let up_trace = world.trace_filtered(start_position, start_position + up, request.hull, request.ignore);
    if up_trace.all_solid {
        return SweepResult { position, velocity };
    }

    let mut stepped_pos = up_trace.end_position;
    let mut stepped_vel = start_velocity;
    slide_move(
        world,
        &mut stepped_pos,
        &mut stepped_vel,
        request.hull,
        request.ignore,
        request.delta_time,
    );

    let down = Vec3::Y * (request.step_height + STEP_DOWN_EPSILON);
    let down_trace = world.trace_filtered(stepped_pos, stepped_pos - down, request.hull, request.ignore);
    if !down_trace.all_solid {
        stepped_pos = down_trace.end_position;
    }

    if horizontal_distance_sq(stepped_pos, start_position) > horizontal_dist_sq {
        log::trace!("step up taken: {:?} -> {:?}", start_position, stepped_pos);
        // Don't carry the climb into the next tick as upward speed
        if down_trace.hit_something() && stepped_vel.y > 0.0 {
            stepped_vel.y = 0.0;
        }
        return SweepResult {
            position: stepped_pos,
            velocity: stepped_vel,
        };
    }

    SweepResult { position, velocity }
}

fn horizontal_distance_sq(a: Vec3, b: Vec3) -> f32 {
    let delta = a - b;
    delta.x * delta.x + delta.z * delta.z
}
