//! Vaulting onto ledges just out of step reach.

use glam::Vec3;

use crate::collision::CollisionBackend;

use super::config::MovementConfig;
use super::ground::is_walkable;
use super::state::ActorState;

/// What a vault attempt did to the actor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VaultOutcome {
    /// No ledge above; the actor is untouched.
    NoLedge,
    /// A ledge was found but the way onto it is blocked. The vertical boost
    /// was still applied.
    Boosted,
    /// Boosted and moved onto the ledge.
    Vaulted,
}

/// Look for a ledge within `step_height` above the actor and vault onto it.
///
/// The boost tier follows the actor's current ground state: airborne vaults
/// get the larger boost.
pub fn try_vault<B>(world: &B, actor: &mut ActorState, config: &MovementConfig) -> VaultOutcome
where
    B: CollisionBackend + ?Sized,
{
    let reach = Vec3::Y * config.step_height;
    let probe = world.trace_box(actor.position, actor.position + reach, actor.hull, actor.entity);

    if !probe.hit_something() || !is_walkable(probe.normal_or_up(), config.ground_angle) {
        return VaultOutcome::NoLedge;
    }

    let target = probe.end_position;
    actor.velocity += Vec3::Y * config.vault_boost(actor.grounded());

    // Can the actor see over the obstacle?
    let sight = world.trace_box(actor.position + reach, target, actor.hull, actor.entity);
    if sight.hit_something() {
        log::debug!("vault blocked at {:?}, boost only", sight.end_position);
        return VaultOutcome::Boosted;
    }

    log::debug!("vault {:?} -> {target:?}", actor.position);
    actor.position = target;
    VaultOutcome::Vaulted
}
