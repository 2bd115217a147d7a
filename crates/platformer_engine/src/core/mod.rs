//! # Core Engine Module
//!
//! Shared configuration types used by the physics layer and by games built
//! on top of it.

pub mod config;

pub use config::{BodyConfig, PhysicsConfig, MAX_CELL_SHIFT};
