//! Physics configuration
//!
//! Loaded through the [`Config`] trait, so the same settings can come from a
//! `.toml` or `.ron` file. Missing fields fall back to the defaults below.

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};
use crate::foundation::math::Vec2;

/// Settings for the collision system and its broad phase
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// Edge length of a broad-phase grid cell
    pub cell_size: f32,
    /// Width of the area covered by the grid
    pub world_width: f32,
    /// Height of the area covered by the grid
    pub world_height: f32,
    /// Emit enter/exit events from the collision pass
    pub generate_events: bool,
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self {
            cell_size: 64.0,
            world_width: 2048.0,
            world_height: 2048.0,
            generate_events: true,
        }
    }
}

/// Settings for integration and contact resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementConfig {
    /// World gravity, scaled per body by its gravity scale
    pub gravity: Vec2,
    /// Fraction of linear velocity kept after one second
    pub linear_damping: f32,
    /// Fraction of angular velocity kept after one second
    pub angular_damping: f32,
    /// Speed clamp (0 disables)
    pub max_speed: f32,
    /// Angular speed clamp in radians per second (0 disables)
    pub max_angular_speed: f32,
    /// Contact resolution passes per step
    pub solver_iterations: u32,
    /// Share of the penetration removed by positional correction
    pub correction_percent: f32,
    /// Penetration left uncorrected to avoid jitter
    pub penetration_slop: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            gravity: Vec2::zeros(),
            linear_damping: 0.98,
            angular_damping: 0.98,
            max_speed: 1000.0,
            max_angular_speed: 50.0,
            solver_iterations: 3,
            correction_percent: 0.8,
            penetration_slop: 0.01,
        }
    }
}

/// Top-level physics configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Collision settings
    pub collision: CollisionConfig,
    /// Movement settings
    pub movement: MovementConfig,
}

impl Config for PhysicsConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        let collision = &self.collision;
        if !(collision.cell_size > 0.0 && collision.cell_size.is_finite()) {
            return Err(ConfigError::Invalid(format!(
                "cell_size must be positive, got {}",
                collision.cell_size
            )));
        }
        if collision.world_width <= 0.0 || collision.world_height <= 0.0 {
            return Err(ConfigError::Invalid(format!(
                "world size must be positive, got {}x{}",
                collision.world_width, collision.world_height
            )));
        }

        let movement = &self.movement;
        for (name, value) in [
            ("linear_damping", movement.linear_damping),
            ("angular_damping", movement.angular_damping),
            ("correction_percent", movement.correction_percent),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid(format!(
                    "{name} must be within [0, 1], got {value}"
                )));
            }
        }
        if movement.max_speed < 0.0 || movement.max_angular_speed < 0.0 {
            return Err(ConfigError::Invalid("speed limits must not be negative".into()));
        }
        if movement.penetration_slop < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "penetration_slop must not be negative, got {}",
                movement.penetration_slop
            )));
        }
        if movement.solver_iterations == 0 {
            return Err(ConfigError::Invalid("solver_iterations must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_defaults_are_valid() {
        let config = PhysicsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.movement.solver_iterations, 3);
    }

    #[test]
    fn test_toml_round_trip() {
        let mut config = PhysicsConfig::default();
        config.collision.cell_size = 32.0;
        config.movement.gravity = Vec2::new(0.0, -9.81);

        let text = toml::to_string_pretty(&config).expect("serialize");
        let parsed =
            PhysicsConfig::from_str_for_path(&text, Path::new("physics.toml")).expect("parse");
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let text = "[collision]\ncell_size = 16.0\n";
        let parsed =
            PhysicsConfig::from_str_for_path(text, Path::new("physics.toml")).expect("parse");
        assert_eq!(parsed.collision.cell_size, 16.0);
        assert_eq!(parsed.movement, MovementConfig::default());
    }

    #[test]
    fn test_ron_parse() {
        let text = "(collision: (cell_size: 8.0, world_width: 64.0, world_height: 64.0, \
                    generate_events: false))";
        let parsed =
            PhysicsConfig::from_str_for_path(text, Path::new("physics.ron")).expect("parse");
        assert!(!parsed.collision.generate_events);
    }

    #[test]
    fn test_invalid_cell_size_rejected() {
        let text = "[collision]\ncell_size = 0.0\n";
        let result = PhysicsConfig::from_str_for_path(text, Path::new("physics.toml"));
        assert!(matches!(result, Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_unknown_extension_rejected() {
        let result = PhysicsConfig::from_str_for_path("", Path::new("physics.json"));
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }
}
