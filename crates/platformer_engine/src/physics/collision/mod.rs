//! Collision geometry
//!
//! # Module Organization
//!
//! - [`primitives`] - Segments, rectangle edges and segment intersection
//! - [`slope`] - Walkable lines and the composite slope platform
//! - [`space`] - Ordered groups of shared shapes
//! - [`shape`] - The shape taxonomy, shared handles and the shape factory
//!
//! # Key Types
//!
//! - [`ShapeHandle`] - Shared reference to a shape; what the index and spaces store
//! - [`ShapeKind`] - Closed set of geometry variants resolved by bodies
//! - [`ShapeFactory`] - Issues shapes with unique ids

pub mod primitives;
pub mod shape;
pub mod slope;
pub mod space;

pub use primitives::{IntersectionPoint, Segment, INTERSECTION_EPSILON};
pub use shape::{Shape, ShapeFactory, ShapeHandle, ShapeIdentity, ShapeKind};
pub use slope::{Slope, SlopePlatform};
pub use space::Space;
