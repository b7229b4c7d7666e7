//! Movement configuration constants.
//!
//! All movement parameters are grouped here for easy tuning. Values use
//! classic Source-style units (about an inch per unit) and seconds.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rejected movement configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("{field} must be a finite number, got {value}")]
    NotFinite { field: &'static str, value: f32 },

    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("{field} must be greater than zero, got {value}")]
    NotPositive { field: &'static str, value: f32 },

    #[error("ground_angle must be between 0 and 90 degrees, got {0}")]
    GroundAngleOutOfRange(f32),
}

/// Tunable parameters for one actor.
///
/// Fixed at construction; the controller never writes to them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    // ========================================================================
    // Traversal
    // ========================================================================
    /// Tallest ledge the sweep climbs on its own. Also the vault probe
    /// height and the ground-snap reach.
    pub step_height: f32,

    /// Steepest walkable surface, in degrees from straight up (inclusive).
    pub ground_angle: f32,

    // ========================================================================
    // Impulses
    // ========================================================================
    /// Vertical speed added by a jump.
    pub jump_speed: f32,

    /// Forward speed added by a dash.
    pub dash_distance: f32,

    /// Seconds of simulation time between dashes.
    pub dash_cooldown: f32,

    /// Vertical speed added by a vault started on the ground.
    pub vault_boost_grounded: f32,

    /// Vertical speed added by a vault started in the air.
    pub vault_boost_airborne: f32,

    // ========================================================================
    // Ground movement
    // ========================================================================
    /// Wish speed for full stick/key deflection.
    pub base_speed: f32,

    /// Ground speed cap while walking.
    pub ground_speed_limit: f32,

    /// Ground speed cap multiplier while `run` is held.
    pub run_multiplier: f32,

    /// Ground acceleration constant.
    pub ground_acceleration: f32,

    /// Ground friction amount.
    pub ground_friction: f32,

    /// Friction never bleeds less than this speed's worth per second.
    pub stop_speed: f32,

    // ========================================================================
    // Air movement
    // ========================================================================
    /// Gravity (units/second²).
    pub gravity: f32,

    /// Airborne speed cap.
    pub air_speed_limit: f32,

    /// Airborne acceleration constant.
    pub air_move_acceleration: f32,

    /// Scale of the air-control correction applied while strafing in the air.
    pub air_acceleration: f32,

    /// Friction amount while airborne. Zero disables air friction.
    pub air_friction: f32,

    // ========================================================================
    // Probes
    // ========================================================================
    /// How far above the feet the ground probe starts.
    pub ground_probe_lift: f32,

    /// How far below the feet the ground probe reaches.
    pub ground_probe_depth: f32,

    /// Upward speed above which the actor is never considered grounded.
    pub ground_lift_speed: f32,

    /// How far the ground snap probes upward before tracing down.
    pub snap_lift: f32,

    // ========================================================================
    // Effects
    // ========================================================================
    /// Cosmetic effect spawned at the actor when dashing.
    pub dash_effect: Option<String>,

    /// Seconds before a spawned effect is destroyed.
    pub effect_lifetime: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            step_height: 35.0,
            ground_angle: 45.0,

            jump_speed: 400.0,
            dash_distance: 200.0,
            dash_cooldown: 10.0,
            vault_boost_grounded: 350.0,
            vault_boost_airborne: 600.0,

            base_speed: 320.0,
            ground_speed_limit: 200.0,
            run_multiplier: 2.5,
            ground_acceleration: 7.5,
            ground_friction: 4.0,
            stop_speed: 100.0,

            gravity: 800.0,
            air_speed_limit: 100.0,
            air_move_acceleration: 20.0,
            air_acceleration: 1500.0,
            air_friction: 0.0,

            ground_probe_lift: 2.0,
            ground_probe_depth: 1.0,
            ground_lift_speed: 100.0,
            snap_lift: 2.0,

            dash_effect: Some("effects/dash_burst".to_string()),
            effect_lifetime: 2.0,
        }
    }
}

impl MovementConfig {
    /// Ground speed cap for the current run state.
    pub fn ground_speed_cap(&self, running: bool) -> f32 {
        if running {
            self.ground_speed_limit * self.run_multiplier
        } else {
            self.ground_speed_limit
        }
    }

    /// Vertical vault boost for the current ground state.
    pub fn vault_boost(&self, grounded: bool) -> f32 {
        if grounded {
            self.vault_boost_grounded
        } else {
            self.vault_boost_airborne
        }
    }

    /// Check that every value is usable by the controller.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let non_negative = [
            ("step_height", self.step_height),
            ("jump_speed", self.jump_speed),
            ("dash_distance", self.dash_distance),
            ("dash_cooldown", self.dash_cooldown),
            ("vault_boost_grounded", self.vault_boost_grounded),
            ("vault_boost_airborne", self.vault_boost_airborne),
            ("base_speed", self.base_speed),
            ("ground_speed_limit", self.ground_speed_limit),
            ("ground_acceleration", self.ground_acceleration),
            ("ground_friction", self.ground_friction),
            ("stop_speed", self.stop_speed),
            ("gravity", self.gravity),
            ("air_speed_limit", self.air_speed_limit),
            ("air_move_acceleration", self.air_move_acceleration),
            ("air_acceleration", self.air_acceleration),
            ("air_friction", self.air_friction),
            ("ground_probe_lift", self.ground_probe_lift),
            ("ground_probe_depth", self.ground_probe_depth),
            ("ground_lift_speed", self.ground_lift_speed),
            ("snap_lift", self.snap_lift),
        ];

        for (field, value) in non_negative {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
            if value < 0.0 {
                return Err(ConfigError::Negative { field, value });
            }
        }

        for (field, value) in [
            ("run_multiplier", self.run_multiplier),
            ("effect_lifetime", self.effect_lifetime),
        ] {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
            if value <= 0.0 {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        if !(0.0..=90.0).contains(&self.ground_angle) {
            return Err(ConfigError::GroundAngleOutOfRange(self.ground_angle));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = MovementConfig::default();
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_ground_speed_cap() {
        let config = MovementConfig::default();

        assert_eq!(config.ground_speed_cap(false), 200.0);
        assert_eq!(config.ground_speed_cap(true), 500.0);
    }

    #[test]
    fn test_vault_boost_tiers() {
        let config = MovementConfig::default();

        assert_eq!(config.vault_boost(true), 350.0);
        assert_eq!(config.vault_boost(false), 600.0);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = MovementConfig {
            gravity: -1.0,
            ..Default::default()
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::Negative {
                field: "gravity",
                value: -1.0
            })
        );

        let config = MovementConfig {
            run_multiplier: 0.0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotPositive { field: "run_multiplier", .. })
        ));

        let config = MovementConfig {
            ground_angle: 120.0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ConfigError::GroundAngleOutOfRange(120.0)));

        let config = MovementConfig {
            step_height: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NotFinite { field: "step_height", .. })
        ));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: MovementConfig =
            serde_json::from_str(r#"{ "gravity": 600.0, "dash_effect": null }"#).unwrap();

        assert_eq!(config.gravity, 600.0);
        assert_eq!(config.dash_effect, None);
        assert_eq!(config.step_height, 35.0);
        assert_eq!(config.run_multiplier, 2.5);
    }
}
