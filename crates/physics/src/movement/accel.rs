//! Wish velocity, acceleration and friction.
//!
//! These are pure functions of their inputs so the controller and the tests
//! can drive them with any time step.

use glam::Vec3;

use super::state::InputSnapshot;

/// Below this speed friction leaves the velocity alone.
pub const FRICTION_MIN_SPEED: f32 = 0.1;

/// The velocity the player is asking for, before acceleration limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wish {
    /// Unit direction in world space, or zero without input.
    pub direction: Vec3,
    /// Requested speed along `direction`.
    pub speed: f32,
}

impl Wish {
    pub const NONE: Self = Self {
        direction: Vec3::ZERO,
        speed: 0.0,
    };
}

/// Turn move intent and view yaw into a world-space wish.
///
/// Pitch is ignored so looking up or down never changes walking speed.
pub fn wish_velocity(input: &InputSnapshot, base_speed: f32) -> Wish {
    let intent = input.move_intent();
    let wish = input.forward_direction() * intent.x + input.right_direction() * intent.y;

    let length = wish.length();
    if length < 1.0e-4 {
        return Wish::NONE;
    }

    Wish {
        direction: wish / length,
        speed: length * base_speed,
    }
}

/// Accelerate `velocity` toward `wish_direction`.
///
/// Speed already at or above the (capped) wish speed along the wish
/// direction is left as is, so momentum above the cap carries over.
/// With `air_control` set, a further correction proportional to the
/// shortfall below the wish speed is added for strafe-style air turning.
pub fn accelerate(
    velocity: Vec3,
    wish_direction: Vec3,
    wish_speed: f32,
    speed_limit: f32,
    acceleration: f32,
    delta_time: f32,
    air_control: Option<f32>,
) -> Vec3 {
    let wish_speed = if speed_limit > 0.0 {
        wish_speed.min(speed_limit)
    } else {
        wish_speed
    };

    let current_speed = velocity.dot(wish_direction);
    let add_speed = wish_speed - current_speed;
    if add_speed <= 0.0 {
        return velocity;
    }

    let accel_speed = (acceleration * delta_time * wish_speed).min(add_speed);
    let mut result = velocity + wish_direction * accel_speed;

    if let Some(air_acceleration) = air_control {
        let speed = result.length();
        if speed < wish_speed {
            let air_accel = ((wish_speed - speed) * air_acceleration * delta_time).min(add_speed);
            result += wish_direction * air_accel;
        }
    }

    result
}

/// Bleed speed off `velocity`.
///
/// Below [`FRICTION_MIN_SPEED`] the input is returned untouched. Slow
/// movement loses at least `stop_speed * friction` per second so the actor
/// comes to rest instead of creeping.
pub fn apply_friction(velocity: Vec3, friction: f32, stop_speed: f32, delta_time: f32) -> Vec3 {
    let speed = velocity.length();
    if speed < FRICTION_MIN_SPEED {
        return velocity;
    }

    let control = speed.max(stop_speed);
    let drop = control * delta_time * friction;

    let new_speed = (speed - drop).max(0.0);
    if new_speed == speed {
        return velocity;
    }

    velocity * (new_speed / speed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wish_from_forward_input() {
        let input = InputSnapshot {
            forward_move: 1.0,
            ..Default::default()
        };

        let wish = wish_velocity(&input, 320.0);

        assert!((wish.direction - Vec3::X).length() < 1e-5);
        assert!((wish.speed - 320.0).abs() < 1e-3);
    }

    #[test]
    fn test_wish_ignores_pitch() {
        let level = InputSnapshot {
            forward_move: 1.0,
            yaw: 0.7,
            ..Default::default()
        };
        let looking_up = InputSnapshot { pitch: 1.2, ..level };

        assert_eq!(wish_velocity(&level, 320.0), wish_velocity(&looking_up, 320.0));
        assert_eq!(wish_velocity(&level, 320.0).direction.y, 0.0);
    }

    #[test]
    fn test_wish_without_input() {
        let wish = wish_velocity(&InputSnapshot::default(), 320.0);
        assert_eq!(wish, Wish::NONE);
    }

    #[test]
    fn test_accelerate_caps_wish_speed() {
        let velocity = accelerate(Vec3::ZERO, Vec3::X, 320.0, 200.0, 7.5, 0.1, None);

        // 7.5 * 0.1 * 200
        assert!((velocity.x - 150.0).abs() < 1e-3);
    }

    #[test]
    fn test_accelerate_never_overshoots() {
        let velocity = accelerate(Vec3::new(190.0, 0.0, 0.0), Vec3::X, 320.0, 200.0, 7.5, 0.1, None);
        assert!((velocity.x - 200.0).abs() < 1e-3);
    }

    #[test]
    fn test_accelerate_keeps_momentum_above_cap() {
        let input = Vec3::new(450.0, 0.0, 30.0);

        let velocity = accelerate(input, Vec3::X, 320.0, 200.0, 7.5, 0.1, Some(1500.0));

        assert_eq!(velocity, input);
    }

    #[test]
    fn test_accelerate_air_control_adds_shortfall() {
        let without = accelerate(Vec3::ZERO, Vec3::X, 320.0, 100.0, 20.0, 0.01, None);
        let with = accelerate(Vec3::ZERO, Vec3::X, 320.0, 100.0, 20.0, 0.01, Some(1500.0));

        // Base step: 20 * 0.01 * 100 = 20
        assert!((without.x - 20.0).abs() < 1e-3);
        // Correction: (100 - 20) * 1500 * 0.01 = 1200, clamped to add speed 100
        assert!((with.x - 120.0).abs() < 1e-3);
    }

    #[test]
    fn test_friction_noop_when_nearly_still() {
        let input = Vec3::new(0.05, 0.0, 0.05);
        assert_eq!(apply_friction(input, 4.0, 100.0, 0.1), input);
    }

    #[test]
    fn test_friction_uses_stop_speed_floor() {
        // control = max(50, 100) = 100, drop = 100 * 0.1 * 4 = 40
        let velocity = apply_friction(Vec3::new(50.0, 0.0, 0.0), 4.0, 100.0, 0.1);
        assert!((velocity.x - 10.0).abs() < 1e-3);
    }

    #[test]
    fn test_friction_floors_at_zero() {
        let velocity = apply_friction(Vec3::new(20.0, 0.0, 0.0), 4.0, 100.0, 0.1);
        assert_eq!(velocity, Vec3::ZERO);
    }

    #[test]
    fn test_friction_keeps_direction() {
        let velocity = apply_friction(Vec3::new(300.0, 0.0, 400.0), 4.0, 100.0, 0.05);

        // speed 500, drop 100
        assert!((velocity.length() - 400.0).abs() < 1e-2);
        assert!((velocity.normalize() - Vec3::new(0.6, 0.0, 0.8)).length() < 1e-5);
    }
}
