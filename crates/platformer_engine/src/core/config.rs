//! # Physics Configuration
//!
//! Construction parameters for the physics layer. Values normally come from a
//! game's settings file (TOML or RON) via the [`Config`] trait and are passed
//! wholesale to constructors.
//!
//! ## Configuration Categories
//!
//! - **Physics Config**: world gravity and broad-phase cell size
//! - **Body Config**: per-body gravity override and speed clamp

use serde::{Deserialize, Serialize};

use crate::config::{Config, ConfigError};
use crate::foundation::math::Vec2;

/// Largest accepted cell shift; a cell of 2^20 units is already one bucket per level.
pub const MAX_CELL_SHIFT: u32 = 20;

/// # Physics Configuration
///
/// World-wide settings shared by every body and the spatial index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Downward acceleration in units per second per frame
    pub gravity: f32,
    /// Grid cell size exponent: a cell spans `2^cell_shift` world units
    pub cell_shift: u32,
}

impl PhysicsConfig {
    /// Create a new physics configuration
    pub fn new() -> Self {
        Self {
            gravity: 15.0,
            cell_shift: 6,
        }
    }

    /// Set gravity
    #[must_use]
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the grid cell size exponent
    #[must_use]
    pub fn with_cell_shift(mut self, shift: u32) -> Self {
        self.cell_shift = shift;
        self
    }

    /// Size of one grid cell in world units
    pub fn cell_size(&self) -> u32 {
        1 << self.cell_shift.min(MAX_CELL_SHIFT)
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl Config for PhysicsConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !self.gravity.is_finite() {
            return Err(ConfigError::Invalid(format!("gravity must be finite, got {}", self.gravity)));
        }
        if self.cell_shift > MAX_CELL_SHIFT {
            return Err(ConfigError::Invalid(format!(
                "cell_shift must be at most {MAX_CELL_SHIFT}, got {}",
                self.cell_shift
            )));
        }
        Ok(())
    }
}

/// # Body Configuration
///
/// Parameters for a single rigidbody.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BodyConfig {
    /// Replaces the world gravity for this body when set
    pub gravity: Option<f32>,
    /// Absolute velocity limit per axis, in units per frame
    pub max_speed: Vec2,
}

impl BodyConfig {
    /// Create a body configuration with the given speed clamp
    pub fn new(max_speed: Vec2) -> Self {
        Self {
            gravity: None,
            max_speed,
        }
    }

    /// Override world gravity
    #[must_use]
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = Some(gravity);
        self
    }

    /// Gravity this body will use inside the given world
    pub fn effective_gravity(&self, physics: &PhysicsConfig) -> f32 {
        self.gravity.unwrap_or(physics.gravity)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_speed.x < 0.0 || self.max_speed.y < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "max_speed must be non-negative, got ({}, {})",
                self.max_speed.x, self.max_speed.y
            )));
        }
        if let Some(gravity) = self.gravity {
            if !gravity.is_finite() {
                return Err(ConfigError::Invalid(format!("gravity override must be finite, got {gravity}")));
            }
        }
        Ok(())
    }
}

impl Default for BodyConfig {
    fn default() -> Self {
        Self::new(Vec2::new(4.0, 8.0))
    }
}
