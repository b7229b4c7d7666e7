//! Cosmetic effects and their delayed cleanup.
//!
//! The controller spawns short-lived effects (a burst when dashing) through
//! an [`EffectSystem`] and never waits on them. Each spawned handle is put
//! in a [`DelayedDestroyQueue`] with an expiry time; the queue is polled at
//! the start of every tick and destroys whatever has expired.

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Handle to a spawned effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EffectHandle(pub u64);

/// The effect system the controller spawns into.
pub trait EffectSystem {
    /// Spawn a named effect at `position`. `None` if nothing was spawned.
    fn spawn_effect(&mut self, name: &str, position: Vec3) -> Option<EffectHandle>;

    /// Destroy an effect. Returns `false` if the handle was already gone.
    fn destroy(&mut self, handle: EffectHandle) -> bool;
}

/// An effect system that spawns nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEffects;

impl EffectSystem for NoEffects {
    fn spawn_effect(&mut self, _name: &str, _position: Vec3) -> Option<EffectHandle> {
        None
    }

    fn destroy(&mut self, _handle: EffectHandle) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PendingDestroy {
    handle: EffectHandle,
    expires_at: f64,
}

/// Effects waiting to be destroyed, each with an expiry timestamp.
#[derive(Debug, Clone, Default)]
pub struct DelayedDestroyQueue {
    pending: Vec<PendingDestroy>,
}

impl DelayedDestroyQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Destroy `handle` once simulation time reaches `expires_at`.
    pub fn schedule(&mut self, handle: EffectHandle, expires_at: f64) {
        self.pending.push(PendingDestroy { handle, expires_at });
    }

    /// Destroy every expired entry, in the order they were scheduled.
    ///
    /// Entries are dropped even when the effect system no longer knows the
    /// handle. Returns how many entries expired.
    pub fn poll(&mut self, now: f64, effects: &mut dyn EffectSystem) -> usize {
        let before = self.pending.len();

        self.pending.retain(|entry| {
            if entry.expires_at > now {
                return true;
            }
            if !effects.destroy(entry.handle) {
                log::trace!("effect {:?} already gone", entry.handle);
            }
            false
        });

        before - self.pending.len()
    }

    /// Number of effects still waiting.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
