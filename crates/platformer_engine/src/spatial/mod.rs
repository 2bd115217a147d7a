//! Spatial partitioning data structures
//!
//! Provides the grid hash bodies query each frame to find the world
//! geometry they might touch.

mod spatial_index;

pub use spatial_index::{CellKey, SpatialIndex};
