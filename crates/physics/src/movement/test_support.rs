//! Deterministic collision backend for controller tests.
//!
//! Geometry is a set of horizontal planes traced at the actor's feet; the
//! hull is ignored. Floors stop downward traces, ceilings stop upward ones,
//! and each plane reports whatever normal it was given, so tests can hand
//! the controller steep or oddly oriented surfaces at exact angles.

use std::cell::Cell;

use glam::Vec3;

use crate::collision::{
    CollisionBackend, EntityHandle, SweepRequest, SweepResult, TraceResult, TraceShape,
};

/// A horizontal plane with an arbitrary reported normal.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Plane {
    pub height: f32,
    pub normal: Vec3,
    pub entity: EntityHandle,
}

impl Plane {
    pub fn flat(height: f32) -> Self {
        Self::tilted(height, Vec3::Y)
    }

    pub fn tilted(height: f32, normal: Vec3) -> Self {
        Self {
            height,
            normal,
            entity: FakeWorld::LEDGE,
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct FakeWorld {
    pub floors: Vec<Plane>,
    pub ceilings: Vec<Plane>,
    /// Every trace reports that it started inside solid geometry.
    pub start_in_solid: bool,
    /// Stepped sweeps report no motion.
    pub pinned: bool,
    traces: Cell<usize>,
    sweeps: Cell<usize>,
}

impl FakeWorld {
    pub const FLOOR: EntityHandle = EntityHandle(1);
    pub const LEDGE: EntityHandle = EntityHandle(2);

    pub fn with_floor(height: f32) -> Self {
        Self {
            floors: vec![Plane {
                height,
                normal: Vec3::Y,
                entity: Self::FLOOR,
            }],
            ..Default::default()
        }
    }

    pub fn trace_count(&self) -> usize {
        self.traces.get()
    }

    pub fn sweep_count(&self) -> usize {
        self.sweeps.get()
    }
}

impl CollisionBackend for FakeWorld {
    fn trace_box(
        &self,
        start: Vec3,
        end: Vec3,
        _hull: TraceShape,
        ignore: Option<EntityHandle>,
    ) -> TraceResult {
        self.traces.set(self.traces.get() + 1);

        let delta = end - start;
        let candidates = if delta.y < 0.0 {
            self.floors
                .iter()
                .filter(|p| start.y >= p.height && end.y < p.height)
                .map(|p| ((start.y - p.height) / -delta.y, p))
                .collect::<Vec<_>>()
        } else if delta.y > 0.0 {
            self.ceilings
                .iter()
                .filter(|p| start.y <= p.height && end.y > p.height)
                .map(|p| ((p.height - start.y) / delta.y, p))
                .collect::<Vec<_>>()
        } else {
            Vec::new()
        };

        let closest = candidates
            .into_iter()
            .filter(|(_, p)| Some(p.entity) != ignore)
            .min_by(|(a, _), (b, _)| a.total_cmp(b));

        let mut result = match closest {
            Some((fraction, plane)) => {
                TraceResult::hit(fraction, start + delta * fraction, plane.normal).with_entity(plane.entity)
            }
            None => TraceResult::no_hit(end),
        };
        result.started_in_solid = self.start_in_solid;
        result
    }

    fn stepped_sweep(&self, request: &SweepRequest) -> Option<SweepResult> {
        self.sweeps.set(self.sweeps.get() + 1);

        if self.pinned {
            return None;
        }

        let displacement = request.velocity * request.delta_time;
        if displacement.length_squared() < 1.0e-8 {
            return None;
        }

        let mut position = request.origin + displacement;
        let mut velocity = request.velocity;
        for floor in &self.floors {
            if request.origin.y >= floor.height && position.y < floor.height {
                position.y = floor.height;
                velocity.y = 0.0;
            }
        }

        Some(SweepResult { position, velocity })
    }
}
