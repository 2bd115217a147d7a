//! Scenario tests for bodies moving through indexed geometry

mod platforms;

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::{BodyConfig, PhysicsConfig};
use crate::foundation::math::Vec2;
use crate::physics::{Body, ShapeFactory, ShapeHandle};
use crate::spatial::SpatialIndex;

/// A small world: one factory, one index
struct Fixture {
    factory: ShapeFactory,
    index: Rc<RefCell<SpatialIndex>>,
}

impl Fixture {
    fn new() -> Self {
        Self {
            factory: ShapeFactory::new(),
            index: Rc::new(RefCell::new(SpatialIndex::new(6))),
        }
    }

    /// Insert a shape into the index and hand it back
    fn add(&self, shape: ShapeHandle) -> ShapeHandle {
        self.index.borrow_mut().insert(&shape);
        shape
    }

    /// Body with a single box hitbox; speed clamp is generous enough not to interfere
    fn body(&self, x: f32, y: f32, width: f32, height: f32, gravity: f32) -> Body {
        let space = self.factory.space(vec![self.factory.rectangle(x, y, width, height)]);
        let config = BodyConfig::new(Vec2::new(8.0, 8.0)).with_gravity(gravity);
        Body::new(space, Rc::clone(&self.index), &PhysicsConfig::default(), &config)
    }
}
