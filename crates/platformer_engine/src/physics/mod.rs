//! Physics module for platformer collision
//!
//! Provides the shape taxonomy, trigger zones and rigidbodies that move
//! through a [`SpatialIndex`](crate::spatial::SpatialIndex) and resolve
//! against the geometry they touch.
//!
//! # Frame order
//!
//! Game logic sets velocities, then calls [`Body::update`] once per body per
//! frame. Each update applies gravity, clamps speed, resolves every hitbox
//! against its broad-phase candidates (dispatching zone messages on the
//! way) and finally moves the body.

pub mod body;
pub mod collision;
pub mod resolve;
pub mod tags;
pub mod zone;

#[cfg(test)]
mod tests;

pub use body::Body;
pub use collision::{
    IntersectionPoint, Segment, Shape, ShapeFactory, ShapeHandle, ShapeIdentity, ShapeKind, Slope,
    SlopePlatform, Space, INTERSECTION_EPSILON,
};
pub use resolve::ResolvedAxes;
pub use tags::{Tag, Tags};
pub use zone::{Zone, ZoneMessage};
