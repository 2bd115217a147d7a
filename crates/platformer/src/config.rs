//! Game configuration
//!
//! Everything the test level and its objects are built from. Loaded from
//! `platformer.toml` (or `.ron`) when present, otherwise defaults.

use nalgebra::Vector2;
use platformer_engine::config::{Config, ConfigError};
use platformer_engine::core::{BodyConfig, PhysicsConfig};
use serde::{Deserialize, Serialize};

/// Game configuration
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// World physics settings
    pub physics: PhysicsConfig,

    /// Player settings
    pub player: PlayerConfig,

    /// Door, key and slope settings
    pub objects: ObjectsConfig,
}

/// Player configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    /// Hitbox size
    pub size: Vector2<f32>,

    /// Spawn point (hitbox min corner)
    pub spawn: Vector2<f32>,

    /// Per-axis speed clamp in units per frame
    pub max_speed: Vector2<f32>,

    /// Horizontal speed added per frame while a direction is held
    pub acceleration: f32,

    /// Horizontal speed removed per frame
    pub friction: f32,

    /// Upward speed given by a jump
    pub jump_height: f32,
}

impl PlayerConfig {
    /// Body settings for the player's rigidbody
    pub fn body(&self) -> BodyConfig {
        BodyConfig::new(self.max_speed)
    }
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            size: Vector2::new(12.0, 20.0),
            spawn: Vector2::new(100.0, 100.0),
            max_speed: Vector2::new(3.0, 8.0),
            acceleration: 1.0,
            friction: 0.5,
            jump_height: 5.5,
        }
    }
}

/// Interactive object configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObjectsConfig {
    /// Key pickup zone size
    pub key_size: Vector2<f32>,

    /// Door collider size
    pub door_size: Vector2<f32>,

    /// Door activation zone width, in door widths
    pub door_activation_multiplier: f32,

    /// Width of each flat landing line on slope platforms
    pub slope_landing_width: f32,
}

impl ObjectsConfig {
    /// Settings for doors
    pub fn door(&self) -> DoorConfig {
        DoorConfig {
            size: self.door_size,
            activation_multiplier: self.door_activation_multiplier,
        }
    }
}

impl Default for ObjectsConfig {
    fn default() -> Self {
        Self {
            key_size: Vector2::new(16.0, 16.0),
            door_size: Vector2::new(16.0, 30.0),
            door_activation_multiplier: 3.0,
            slope_landing_width: 25.0,
        }
    }
}

/// Door construction parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DoorConfig {
    /// Collider size
    pub size: Vector2<f32>,

    /// Activation zone width, in door widths
    pub activation_multiplier: f32,
}

impl Default for DoorConfig {
    fn default() -> Self {
        ObjectsConfig::default().door()
    }
}

fn positive(name: &str, value: f32) -> Result<(), ConfigError> {
    if value > 0.0 && value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::Invalid(format!("{name} must be positive, got {value}")))
    }
}

impl Config for GameConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        self.physics.validate()?;
        self.player.body().validate()?;

        positive("player.size.x", self.player.size.x)?;
        positive("player.size.y", self.player.size.y)?;
        if self.player.friction < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "player.friction must not be negative, got {}",
                self.player.friction
            )));
        }

        positive("objects.key_size.x", self.objects.key_size.x)?;
        positive("objects.key_size.y", self.objects.key_size.y)?;
        positive("objects.door_size.x", self.objects.door_size.x)?;
        positive("objects.door_size.y", self.objects.door_size.y)?;
        positive("objects.door_activation_multiplier", self.objects.door_activation_multiplier)?;
        if self.objects.slope_landing_width < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "objects.slope_landing_width must not be negative, got {}",
                self.objects.slope_landing_width
            )));
        }
        Ok(())
    }
}

/// Game errors
#[derive(thiserror::Error, Debug)]
pub enum GameError {
    /// Settings could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}
