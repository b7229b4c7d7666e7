//! Pawn movement controller.
//!
//! This is the main entry point for movement. It takes one tick of input and
//! updates the actor's state through a collision backend.

use glam::Vec3;

use crate::collision::{CollisionBackend, SweepRequest};
use crate::effects::{DelayedDestroyQueue, EffectSystem};

use super::accel::{accelerate, apply_friction, wish_velocity, Wish};
use super::config::{ConfigError, MovementConfig};
use super::events::{MovementEvent, MovementEvents};
use super::ground::{check_ground, stay_on_ground};
use super::state::{ActorState, InputSnapshot, SimClock};
use super::vault::{try_vault, VaultOutcome};

/// Pawn movement controller.
///
/// Owns the tunables, the dash cooldown, this tick's events and the queue of
/// effects waiting to be destroyed. One controller drives one actor.
///
/// # Example
///
/// ```ignore
/// let mut controller = PawnController::with_default_config();
/// let mut actor = ActorState::new(spawn_position);
///
/// // Each tick:
/// controller.simulate(&mut actor, &input, clock, &world, &mut effects);
/// if controller.has_event(MovementEvent::Jump) {
///     play_jump_sound();
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PawnController {
    config: MovementConfig,
    last_dash: Option<f64>,
    events: MovementEvents,
    destroy_queue: DelayedDestroyQueue,
}

impl PawnController {
    /// Create a controller, rejecting unusable tunables.
    pub fn new(config: MovementConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            last_dash: None,
            events: MovementEvents::default(),
            destroy_queue: DelayedDestroyQueue::new(),
        })
    }

    /// Create a controller with default configuration.
    pub fn with_default_config() -> Self {
        Self {
            config: MovementConfig::default(),
            last_dash: None,
            events: MovementEvents::default(),
            destroy_queue: DelayedDestroyQueue::new(),
        }
    }

    pub fn config(&self) -> &MovementConfig {
        &self.config
    }

    /// Events raised by the last [`simulate`](Self::simulate) call.
    pub fn events(&self) -> MovementEvents {
        self.events
    }

    pub fn has_event(&self, event: MovementEvent) -> bool {
        self.events.contains(event)
    }

    /// Simulation time of the last dash, if any.
    pub fn last_dash_time(&self) -> Option<f64> {
        self.last_dash
    }

    /// Effects spawned by this controller that are still waiting to expire.
    pub fn pending_effects(&self) -> usize {
        self.destroy_queue.len()
    }

    /// Advance the actor by one tick.
    ///
    /// # Arguments
    ///
    /// * `actor` - The actor's movement state (will be modified)
    /// * `input` - This tick's input
    /// * `clock` - Current simulation time and tick length
    /// * `world` - Collision queries
    /// * `effects` - Where dash effects are spawned and destroyed
    pub fn simulate<B>(
        &mut self,
        actor: &mut ActorState,
        input: &InputSnapshot,
        clock: SimClock,
        world: &B,
        effects: &mut dyn EffectSystem,
    ) where
        B: CollisionBackend + ?Sized,
    {
        self.events.clear();

        let expired = self.destroy_queue.poll(clock.now, effects);
        if expired > 0 {
            log::trace!("destroyed {expired} expired effects");
        }

        let delta_time = clock.delta;
        if !delta_time.is_finite() || delta_time <= 0.0 {
            log::warn!("skipping tick with unusable delta time {delta_time}");
            return;
        }

        let wish = wish_velocity(input, self.config.base_speed);
        let was_grounded = actor.grounded();
        let ground = check_ground(world, actor, &self.config);

        self.integrate(actor, input, wish, ground.is_some(), was_grounded, delta_time);
        self.sweep(actor, world, was_grounded, delta_time);

        actor.ground = ground;

        if try_vault(world, actor, &self.config) == VaultOutcome::Vaulted {
            self.events.insert(MovementEvent::Vault);
        }

        if input.run && self.dash_ready(clock.now) {
            self.dash(actor, input, clock.now, effects);
        }
    }

    // ========================================================================
    // Velocity
    // ========================================================================

    fn integrate(
        &mut self,
        actor: &mut ActorState,
        input: &InputSnapshot,
        wish: Wish,
        grounded: bool,
        was_grounded: bool,
        delta_time: f32,
    ) {
        let config = &self.config;
        let air_control = (!was_grounded).then_some(config.air_acceleration);

        if !grounded {
            actor.velocity = accelerate(
                actor.velocity,
                wish.direction,
                wish.speed,
                config.air_speed_limit,
                config.air_move_acceleration,
                delta_time,
                air_control,
            );

            if config.air_friction > 0.0 {
                let horizontal = Vec3::new(actor.velocity.x, 0.0, actor.velocity.z);
                let slowed = apply_friction(horizontal, config.air_friction, config.stop_speed, delta_time);
                actor.velocity.x = slowed.x;
                actor.velocity.z = slowed.z;
            }

            actor.velocity.y -= config.gravity * delta_time;
            return;
        }

        if !was_grounded {
            // Landing: drop the fall speed before it feeds into friction
            actor.velocity.y = 0.0;
            self.events.insert(MovementEvent::Grounded);
            log::debug!("landed at {:?}", actor.position);
        }

        actor.velocity = accelerate(
            actor.velocity,
            wish.direction,
            wish.speed,
            config.ground_speed_cap(input.run),
            config.ground_acceleration,
            delta_time,
            air_control,
        );
        actor.velocity = apply_friction(actor.velocity, config.ground_friction, config.stop_speed, delta_time);

        // Holding jump keeps hopping, once per tick at most
        if was_grounded && input.jump && !self.events.contains(MovementEvent::Jump) {
            actor.velocity.y += config.jump_speed;
            self.events.insert(MovementEvent::Jump);
            log::debug!("jump, velocity {:?}", actor.velocity);
        }
    }

    // ========================================================================
    // Motion
    // ========================================================================

    fn sweep<B>(&self, actor: &mut ActorState, world: &B, was_grounded: bool, delta_time: f32)
    where
        B: CollisionBackend + ?Sized,
    {
        let request = SweepRequest {
            origin: actor.position,
            velocity: actor.velocity,
            hull: actor.hull,
            ignore: actor.entity,
            delta_time,
            step_height: self.config.step_height,
        };

        let Some(result) = world.stepped_sweep(&request) else {
            log::trace!("no motion at {:?}", actor.position);
            return;
        };

        actor.position = if was_grounded {
            stay_on_ground(world, actor, result.position, &self.config)
        } else {
            result.position
        };
        actor.velocity = result.velocity;
    }

    // ========================================================================
    // Dash
    // ========================================================================

    fn dash_ready(&self, now: f64) -> bool {
        self.last_dash
            .map_or(true, |last| now - last >= f64::from(self.config.dash_cooldown))
    }

    fn dash(&mut self, actor: &mut ActorState, input: &InputSnapshot, now: f64, effects: &mut dyn EffectSystem) {
        self.last_dash = Some(now);
        actor.velocity += input.forward_direction() * self.config.dash_distance;
        self.events.insert(MovementEvent::Dash);
        log::debug!("dash at {now:.3}s, velocity {:?}", actor.velocity);

        let Some(name) = self.config.dash_effect.as_deref() else {
            return;
        };
        match effects.spawn_effect(name, actor.position) {
            Some(handle) => {
                let expires_at = now + f64::from(self.config.effect_lifetime);
                self.destroy_queue.schedule(handle, expires_at);
            }
            None => log::trace!("effect system declined {name}"),
        }
    }
}
