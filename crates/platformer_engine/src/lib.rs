//! # Platformer Engine
//!
//! The physics and spatial-query layer of a 2D platformer.
//!
//! ## Features
//!
//! - **Grid Hash Broad Phase**: shapes bucketed by integer cell coordinates
//! - **Shape Taxonomy**: rectangles, one-way platforms, slopes, slope platforms, zones and spaces
//! - **Axis-Separated Resolution**: per-frame X/Y velocity correction with slope support
//! - **Zone Messaging**: trigger zones publishing through a type-keyed message manager
//! - **Configuration**: TOML/RON settings loaded through a common trait
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use platformer_engine::prelude::*;
//!
//! let physics = PhysicsConfig::default();
//! let factory = ShapeFactory::new();
//! let index = Rc::new(RefCell::new(SpatialIndex::from_config(&physics)));
//!
//! let ground = factory.rectangle(0.0, 200.0, 400.0, 20.0);
//! ground.add_tags(&[Tag::Ground, Tag::Collision]);
//! index.borrow_mut().insert(&ground);
//!
//! let hitbox = factory.rectangle(20.0, 150.0, 10.0, 20.0);
//! let mut body = Body::new(factory.space(vec![hitbox]), Rc::clone(&index), &physics, &BodyConfig::default());
//!
//! for _ in 0..120 {
//!     body.update(1.0 / 60.0);
//! }
//! assert!(body.on_ground());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Configuration
pub mod config;
pub mod core;

pub mod events;
pub mod foundation;
pub mod physics;
pub mod spatial;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        config::{Config, ConfigError},
        core::{BodyConfig, PhysicsConfig},
        events::{message_types, GenericMessage, ListenerId, Message, MessageManager},
        foundation::{
            ids::{IdGenerator, ShapeId},
            math::{Rect, Vec2},
        },
        physics::{
            Body, Shape, ShapeFactory, ShapeHandle, ShapeKind, Slope, SlopePlatform, Space, Tag, Tags, Zone,
            ZoneMessage,
        },
        spatial::SpatialIndex,
    };
}
