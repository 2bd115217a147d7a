//! Foundation module - Core utilities and types
//!
//! This module provides fundamental utilities used throughout the engine:
//! - Math types and operations
//! - Identifier generation
//! - Logging utilities

pub mod ids;
pub mod logging;
pub mod math;
