//! Trace results and hull shapes for collision queries.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::flags::ContentFlags;

/// Opaque handle to a piece of collidable geometry or an entity.
///
/// The controller only stores and compares handles; what they refer to is
/// up to the collision backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityHandle(pub u32);

/// What a hull sweep ran into.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceResult {
    /// Share of the requested path covered, in `[0, 1]`. Anything below one
    /// is a hit.
    pub fraction: f32,

    /// Where the hull ended up.
    pub end_position: Vec3,

    /// Normal of the blocking surface, facing the hull. `None` on a clear
    /// path.
    pub hit_normal: Option<Vec3>,

    pub hit_contents: ContentFlags,

    /// The start position already overlapped solid geometry.
    pub started_in_solid: bool,

    /// Stuck from the start: the hull could not move at all.
    pub all_solid: bool,

    /// Geometry that was hit, if the backend can name it.
    pub hit_entity: Option<EntityHandle>,
}

impl TraceResult {
    /// A clear path ending at `end_position`.
    pub fn no_hit(end_position: Vec3) -> Self {
        Self {
            fraction: 1.0,
            end_position,
            hit_normal: None,
            hit_contents: ContentFlags::EMPTY,
            started_in_solid: false,
            all_solid: false,
            hit_entity: None,
        }
    }

    /// A solid hit after covering `fraction` of the path.
    pub fn hit(fraction: f32, end_position: Vec3, normal: Vec3) -> Self {
        Self {
            hit_normal: Some(normal),
            hit_contents: ContentFlags::SOLID,
            fraction,
            ..Self::no_hit(end_position)
        }
    }

    pub fn with_entity(mut self, entity: EntityHandle) -> Self {
        self.hit_entity = Some(entity);
        self
    }

    #[inline]
    pub fn hit_something(&self) -> bool {
        self.fraction < 1.0
    }

    /// The hit normal, or straight up on a clear path.
    #[inline]
    pub fn normal_or_up(&self) -> Vec3 {
        self.hit_normal.unwrap_or(Vec3::Y)
    }
}

/// Collision hull of an actor, anchored at its feet (bottom-center).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum TraceShape {
    /// Upright capsule; `height` includes both caps.
    Capsule { radius: f32, height: f32 },

    /// Axis-aligned box.
    Box { half_extents: Vec3 },
}

impl TraceShape {
    /// 32 x 72 x 32 unit box.
    pub const PLAYER: Self = Self::Box {
        half_extents: Vec3::new(16.0, 36.0, 16.0),
    };

    /// Full standing height of the hull.
    pub fn height(&self) -> f32 {
        match *self {
            Self::Capsule { height, .. } => height,
            Self::Box { half_extents } => half_extents.y * 2.0,
        }
    }
}

impl Default for TraceShape {
    fn default() -> Self {
        Self::PLAYER
    }
}
