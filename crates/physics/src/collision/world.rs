//! Reference collision backend built on parry3d.
//!
//! The collision world stores static brushes and answers hull traces
//! against them. It implements [`CollisionBackend`], so it can drive the
//! movement controller directly.

use glam::Vec3;
use parry3d::math::{Isometry, Point, Real, Vector};
use parry3d::query::{contact, Ray};
use parry3d::shape::SharedShape;

use super::backend::{CollisionBackend, SweepRequest, SweepResult};
use super::flags::ContentFlags;
use super::sweep::step_slide_move;
use super::trace::{EntityHandle, TraceResult, TraceShape};

/// Penetration depth tolerated before a position counts as inside solid.
///
/// Resting exactly on a surface reports a zero-distance contact; without a
/// skin every hull standing on a floor would be "in solid".
const SKIN: f32 = 0.01;

/// Binary search iterations for shape traces.
const TRACE_ITERATIONS: usize = 16;

/// Minimum displacement for a sweep to count as motion.
const MIN_MOVE_SQ: f32 = 1.0e-6;

/// A piece of static geometry.
#[derive(Debug, Clone)]
struct CollisionBrush {
    /// Reported in trace results when this brush is hit.
    handle: EntityHandle,
    shape: SharedShape,
    transform: Isometry<Real>,
    contents: ContentFlags,
}

/// The collision world containing all brushes.
///
/// # Thread Safety
///
/// The collision world is immutable while it is being traced and can be
/// shared across threads for parallel queries.
#[derive(Debug, Default)]
pub struct CollisionWorld {
    brushes: Vec<CollisionBrush>,
    next_id: u32,
}

impl CollisionWorld {
    /// Create an empty collision world.
    pub fn new() -> Self {
        Self {
            brushes: Vec::new(),
            next_id: 0,
        }
    }

    /// Add an axis-aligned box to the world.
    ///
    /// # Arguments
    ///
    /// * `center` - Center position of the box in world space
    /// * `half_extents` - Half-size in each axis (x, y, z)
    /// * `contents` - Content flags for collision filtering
    pub fn add_box(&mut self, center: Vec3, half_extents: Vec3, contents: ContentFlags) -> EntityHandle {
        let shape = SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z);
        let transform = Isometry::translation(center.x, center.y, center.z);
        self.push_brush(shape, transform, contents)
    }

    /// Add a box tilted around the Z axis, for ramps and slopes.
    ///
    /// A positive `angle_degrees` raises the +X end of the box.
    pub fn add_ramp(
        &mut self,
        center: Vec3,
        half_extents: Vec3,
        angle_degrees: f32,
        contents: ContentFlags,
    ) -> EntityHandle {
        let shape = SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z);
        let transform = Isometry::new(
            Vector::new(center.x, center.y, center.z),
            Vector::new(0.0, 0.0, angle_degrees.to_radians()),
        );
        self.push_brush(shape, transform, contents)
    }

    fn push_brush(
        &mut self,
        shape: SharedShape,
        transform: Isometry<Real>,
        contents: ContentFlags,
    ) -> EntityHandle {
        let handle = EntityHandle(self.next_id);
        self.next_id += 1;

        self.brushes.push(CollisionBrush {
            handle,
            shape,
            transform,
            contents,
        });

        handle
    }

    /// Get the number of collision brushes.
    pub fn brush_count(&self) -> usize {
        self.brushes.len()
    }

    /// Trace a hull through every pawn-solid brush.
    pub fn trace(&self, start: Vec3, end: Vec3, shape: TraceShape) -> TraceResult {
        self.trace_filtered(start, end, shape, None)
    }

    /// Trace a hull through the world, skipping the brush named by `ignore`.
    ///
    /// `start` and `end` are the bottom-center of the hull.
    pub fn trace_filtered(
        &self,
        start: Vec3,
        end: Vec3,
        shape: TraceShape,
        ignore: Option<EntityHandle>,
    ) -> TraceResult {
        let mask = ContentFlags::MASK_PLAYER_SOLID;
        let delta = end - start;

        // No movement - just check if position is valid
        if delta.length_squared() < 1.0e-8 {
            return match self.solid_brush_at(start, shape, mask, ignore) {
                Some(brush) => TraceResult {
                    fraction: 0.0,
                    end_position: start,
                    hit_normal: Some(Vec3::Y),
                    hit_contents: brush.contents,
                    started_in_solid: true,
                    all_solid: true,
                    hit_entity: Some(brush.handle),
                },
                None => TraceResult::no_hit(start),
            };
        }

        let started_in_solid = self.solid_brush_at(start, shape, mask, ignore).is_some();
        let end_is_solid = self.solid_brush_at(end, shape, mask, ignore).is_some();

        // A hull stuck in geometry may still leave it along a clear path
        if started_in_solid && !end_is_solid {
            let mut result = TraceResult::no_hit(end);
            result.started_in_solid = true;
            return result;
        }

        // Walk the segment in steps shorter than the hull so thin brushes
        // can't slip between two samples
        let samples = (delta.length() / sample_spacing(shape)).ceil().max(1.0) as usize;
        let mut lo = 0.0_f32;
        let mut hi = None;
        for i in 1..=samples {
            let t = i as f32 / samples as f32;
            if self.solid_brush_at(start + delta * t, shape, mask, ignore).is_some() {
                hi = Some(t);
                break;
            }
            lo = t;
        }

        let Some(mut hi) = hi else {
            return TraceResult::no_hit(end);
        };

        // Binary search for the last free position between the samples
        for _ in 0..TRACE_ITERATIONS {
            let mid = (lo + hi) * 0.5;
            if self.solid_brush_at(start + delta * mid, shape, mask, ignore).is_some() {
                hi = mid;
            } else {
                lo = mid;
            }
        }

        // Back off from the surface so the next trace doesn't start on the
        // edge of the skin
        let backoff = (2.0 * SKIN / delta.length()).min(lo);
        let fraction = lo - backoff;
        let end_position = start + delta * fraction;

        let blocked_at = start + delta * hi;
        let blocker = self.solid_brush_at(blocked_at, shape, mask, ignore);
        let push = self.resolve_penetration(blocked_at, shape, ignore) - blocked_at;
        let hit_normal = if push.length_squared() > 1.0e-8 {
            push.normalize()
        } else {
            // Fall back to facing the movement, projected to horizontal
            let horizontal = Vec3::new(-delta.x, 0.0, -delta.z);
            if horizontal.length_squared() > 1.0e-4 {
                horizontal.normalize()
            } else if delta.y < 0.0 {
                Vec3::Y
            } else {
                Vec3::NEG_Y
            }
        };

        TraceResult {
            fraction,
            end_position,
            hit_normal: Some(hit_normal),
            hit_contents: blocker.map_or(ContentFlags::SOLID, |b| b.contents),
            started_in_solid,
            all_solid: started_in_solid && fraction < 0.001,
            hit_entity: blocker.map(|b| b.handle),
        }
    }

    /// Cast a ray (zero-size trace) through the world.
    pub fn raycast(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> TraceResult {
        let dir = direction.normalize_or_zero();
        if dir == Vec3::ZERO || max_distance <= 0.0 {
            return TraceResult::no_hit(origin);
        }

        let ray = Ray::new(
            Point::new(origin.x, origin.y, origin.z),
            Vector::new(dir.x, dir.y, dir.z),
        );

        let closest = self
            .brushes
            .iter()
            .filter(|brush| ContentFlags::MASK_PLAYER_SOLID.intersects(brush.contents))
            .filter_map(|brush| {
                brush
                    .shape
                    .cast_ray_and_get_normal(&brush.transform, &ray, max_distance, true)
                    .map(|hit| (hit, brush))
            })
            .min_by(|(a, _), (b, _)| a.time_of_impact.total_cmp(&b.time_of_impact));

        match closest {
            Some((hit, brush)) => TraceResult {
                fraction: hit.time_of_impact / max_distance,
                end_position: origin + dir * hit.time_of_impact,
                hit_normal: Some(Vec3::new(hit.normal.x, hit.normal.y, hit.normal.z)),
                hit_contents: brush.contents,
                started_in_solid: hit.time_of_impact <= 0.0,
                all_solid: false,
                hit_entity: Some(brush.handle),
            },
            None => TraceResult::no_hit(origin + dir * max_distance),
        }
    }

    /// Check if a hull at `position` overlaps pawn-solid geometry.
    pub fn point_in_solid(&self, position: Vec3, shape: TraceShape) -> bool {
        self.solid_brush_at(position, shape, ContentFlags::MASK_PLAYER_SOLID, None)
            .is_some()
    }

    /// Push a hull out of any brush it penetrates deeper than half the skin.
    /// Returns the corrected position.
    pub fn resolve_penetration(
        &self,
        position: Vec3,
        shape: TraceShape,
        ignore: Option<EntityHandle>,
    ) -> Vec3 {
        let test_shape = parry_shape(shape);
        let test_transform = shape_transform(position, shape);

        let correction: Vec3 = self
            .candidates(ContentFlags::MASK_PLAYER_SOLID, ignore)
            .filter_map(|brush| {
                contact(
                    &test_transform,
                    test_shape.as_ref(),
                    &brush.transform,
                    brush.shape.as_ref(),
                    0.0,
                )
                .ok()
                .flatten()
            })
            .filter(|c| c.dist < -SKIN * 0.5)
            .map(|c| {
                // normal2 points out of the brush, toward free space
                let normal = Vec3::new(c.normal2.x, c.normal2.y, c.normal2.z);
                normal * -c.dist
            })
            .sum();

        position + correction
    }

    // ========================================================================
    // Private helpers
    // ========================================================================

    fn candidates(
        &self,
        mask: ContentFlags,
        ignore: Option<EntityHandle>,
    ) -> impl Iterator<Item = &CollisionBrush> {
        self.brushes
            .iter()
            .filter(move |brush| mask.intersects(brush.contents) && Some(brush.handle) != ignore)
    }

    fn solid_brush_at(
        &self,
        position: Vec3,
        shape: TraceShape,
        mask: ContentFlags,
        ignore: Option<EntityHandle>,
    ) -> Option<&CollisionBrush> {
        let test_shape = parry_shape(shape);
        let test_transform = shape_transform(position, shape);

        self.candidates(mask, ignore).find(|brush| {
            matches!(
                contact(
                    &test_transform,
                    test_shape.as_ref(),
                    &brush.transform,
                    brush.shape.as_ref(),
                    0.0,
                ),
                Ok(Some(c)) if c.dist < -SKIN
            )
        })
    }
}

impl CollisionBackend for CollisionWorld {
    fn trace_box(
        &self,
        start: Vec3,
        end: Vec3,
        hull: TraceShape,
        ignore: Option<EntityHandle>,
    ) -> TraceResult {
        self.trace_filtered(start, end, hull, ignore)
    }

    fn stepped_sweep(&self, request: &SweepRequest) -> Option<SweepResult> {
        let result = step_slide_move(self, request);
        if (result.position - request.origin).length_squared() < MIN_MOVE_SQ {
            return None;
        }
        Some(result)
    }
}

/// Build the parry3d shape for a hull.
fn parry_shape(shape: TraceShape) -> SharedShape {
    match shape {
        TraceShape::Capsule { radius, height } => {
            // Parry capsule is defined by half-height of the cylinder part
            let cylinder_half_height = (height - 2.0 * radius).max(0.0) / 2.0;
            SharedShape::capsule_y(cylinder_half_height, radius)
        }
        TraceShape::Box { half_extents } => {
            SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z)
        }
    }
}

/// Longest step a trace may take between overlap tests.
fn sample_spacing(shape: TraceShape) -> f32 {
    let smallest = match shape {
        TraceShape::Capsule { radius, .. } => radius,
        TraceShape::Box { half_extents } => half_extents.min_element(),
    };
    smallest.max(0.5)
}

/// Hull transform for a bottom-center position.
fn shape_transform(position: Vec3, shape: TraceShape) -> Isometry<Real> {
    let offset_y = shape.height() / 2.0;
    Isometry::translation(position.x, position.y + offset_y, position.z)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_world() -> CollisionWorld {
        let mut world = CollisionWorld::new();

        // Floor with its top at y=0
        world.add_box(
            Vec3::new(0.0, -8.0, 0.0),
            Vec3::new(1000.0, 8.0, 1000.0),
            ContentFlags::SOLID,
        );

        // Wall with its face at x=400
        world.add_box(
            Vec3::new(416.0, 100.0, 0.0),
            Vec3::new(16.0, 100.0, 400.0),
            ContentFlags::SOLID,
        );

        world
    }

    #[test]
    fn test_resting_on_floor_is_not_solid() {
        let world = create_test_world();
        assert!(!world.point_in_solid(Vec3::ZERO, TraceShape::PLAYER));
        assert!(world.point_in_solid(Vec3::new(0.0, -4.0, 0.0), TraceShape::PLAYER));
    }

    #[test]
    fn test_trace_down_finds_floor() {
        let world = create_test_world();

        let result = world.trace(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, -10.0, 0.0), TraceShape::PLAYER);

        assert!(result.hit_something());
        assert!(result.end_position.y.abs() < 0.1, "y={}", result.end_position.y);
        let normal = result.hit_normal.unwrap();
        assert!(normal.y > 0.99, "normal={normal:?}");
        assert_eq!(result.hit_entity, Some(EntityHandle(0)));
    }

    #[test]
    fn test_trace_toward_wall() {
        let world = create_test_world();

        let result = world.trace(Vec3::ZERO, Vec3::new(420.0, 0.0, 0.0), TraceShape::PLAYER);

        assert!(result.hit_something());
        assert!(result.end_position.x < 385.0, "x={}", result.end_position.x);
        let normal = result.hit_normal.unwrap();
        assert!(normal.x < -0.99, "normal={normal:?}");
        assert_eq!(result.hit_entity, Some(EntityHandle(1)));
    }

    #[test]
    fn test_long_trace_does_not_pass_through_floor() {
        let world = create_test_world();

        // Ends well below the 16-unit-thick floor
        let result = world.trace(Vec3::new(0.0, 10.0, 0.0), Vec3::new(0.0, -98.0, 0.0), TraceShape::PLAYER);

        assert!(result.hit_something());
        assert!(result.end_position.y.abs() < 0.1, "y={}", result.end_position.y);
        assert!(result.hit_normal.unwrap().y > 0.99);
        assert_eq!(result.hit_entity, Some(EntityHandle(0)));
    }

    #[test]
    fn test_long_trace_hits_thin_wall() {
        let mut world = CollisionWorld::new();
        // 2 units thick, face at x=200
        world.add_box(Vec3::new(201.0, 36.0, 0.0), Vec3::new(1.0, 36.0, 100.0), ContentFlags::SOLID);

        let result = world.trace(Vec3::new(0.0, 1.0, 0.0), Vec3::new(600.0, 1.0, 0.0), TraceShape::PLAYER);

        assert!(result.hit_something());
        assert!(result.end_position.x < 185.0, "x={}", result.end_position.x);
    }

    #[test]
    fn test_ignored_brush_is_passed_through() {
        let world = create_test_world();

        let result = world.trace_filtered(
            Vec3::ZERO,
            Vec3::new(420.0, 0.0, 0.0),
            TraceShape::PLAYER,
            Some(EntityHandle(1)),
        );

        assert!(!result.hit_something());
    }

    #[test]
    fn test_triggers_do_not_block() {
        let mut world = CollisionWorld::new();
        world.add_box(Vec3::new(100.0, 36.0, 0.0), Vec3::new(16.0, 36.0, 100.0), ContentFlags::TRIGGER);

        let result = world.trace(Vec3::ZERO, Vec3::new(200.0, 0.0, 0.0), TraceShape::PLAYER);

        assert!(!result.hit_something());
    }

    #[test]
    fn test_raycast_hit_and_miss() {
        let world = create_test_world();

        let hit = world.raycast(Vec3::new(0.0, 50.0, 0.0), Vec3::X, 1000.0);
        assert!(hit.hit_something());
        assert!((hit.end_position.x - 400.0).abs() < 0.1);

        let miss = world.raycast(Vec3::new(0.0, 50.0, 0.0), -Vec3::X, 100.0);
        assert!(!miss.hit_something());
    }

    #[test]
    fn test_ramp_normal_is_tilted() {
        let mut world = CollisionWorld::new();
        world.add_ramp(Vec3::new(0.0, -8.0, 0.0), Vec3::new(500.0, 8.0, 500.0), 30.0, ContentFlags::SOLID);

        let result = world.raycast(Vec3::new(0.0, 100.0, 0.0), -Vec3::Y, 500.0);
        let normal = result.hit_normal.unwrap();
        let angle = normal.angle_between(Vec3::Y).to_degrees();

        assert!((angle - 30.0).abs() < 0.5, "angle={angle}");
    }

    #[test]
    fn test_stepped_sweep_without_velocity_reports_no_motion() {
        let world = create_test_world();

        let request = SweepRequest {
            origin: Vec3::ZERO,
            velocity: Vec3::ZERO,
            hull: TraceShape::PLAYER,
            ignore: None,
            delta_time: 0.1,
            step_height: 35.0,
        };

        assert!(world.stepped_sweep(&request).is_none());
    }

    #[test]
    fn test_stepped_sweep_into_wall_makes_no_progress() {
        let world = create_test_world();

        let request = SweepRequest {
            origin: Vec3::new(384.0, 0.0, 0.0),
            velocity: Vec3::new(200.0, 0.0, 0.0),
            hull: TraceShape::PLAYER,
            ignore: None,
            delta_time: 0.1,
            step_height: 35.0,
        };

        let end_x = world
            .stepped_sweep(&request)
            .map_or(request.origin.x, |result| result.position.x);
        assert!(end_x < 384.05, "x={end_x}");
    }
}
