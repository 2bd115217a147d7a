//! Rigidbodies
//!
//! A [`Body`] owns a velocity and moves a shared collision space through the
//! world once per frame, resolving against whatever the spatial index
//! returns near it. See [`resolve`](super::resolve) for the per-shape rules.

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::{BodyConfig, PhysicsConfig};
use crate::foundation::ids::ShapeId;
use crate::foundation::math::{Rect, Vec2};
use crate::physics::collision::ShapeHandle;
use crate::physics::resolve::ResolvedAxes;
use crate::physics::tags::Tag;
use crate::spatial::SpatialIndex;

/// Physics rigidbody with gravity, a speed clamp and ground detection
#[derive(Debug)]
pub struct Body {
    pub(super) space: ShapeHandle,
    pub(super) index: Rc<RefCell<SpatialIndex>>,
    pub(super) velocity: Vec2,
    pub(super) gravity: f32,
    pub(super) max_speed: Vec2,
    pub(super) on_ground: bool,
    contacts: ResolvedAxes,
}

impl Body {
    /// Create a body moving `space` and colliding against `index`.
    ///
    /// The space (and, if it is a [`Space`](crate::physics::Space), every
    /// member) is tagged [`Tag::PhysicsBody`]. Its members are the hitboxes;
    /// any other shape is used as the single hitbox.
    pub fn new(
        space: ShapeHandle,
        index: Rc<RefCell<SpatialIndex>>,
        physics: &PhysicsConfig,
        config: &BodyConfig,
    ) -> Self {
        space.add_tags(&[Tag::PhysicsBody]);
        log::debug!("Created body {} at {:?}", space.id(), space.bounds().position());

        Self {
            space,
            index,
            velocity: Vec2::zeros(),
            gravity: config.effective_gravity(physics),
            max_speed: config.max_speed.abs(),
            on_ground: false,
            contacts: ResolvedAxes::empty(),
        }
    }

    /// Advance one frame: apply gravity, clamp, resolve against nearby
    /// geometry, then move the space by the resulting velocity.
    pub fn update(&mut self, dt: f32) {
        let step = self.gravity * dt;
        self.velocity.y += step;
        self.clamp_velocity();

        // Pessimistic reset; ground contact below sets it again this frame.
        if self.velocity.y > -step {
            self.on_ground = false;
        }

        self.contacts = self.resolve_forces();

        let velocity = self.velocity;
        self.space.translate(velocity.x, velocity.y);
    }

    fn clamp_velocity(&mut self) {
        self.velocity.x = clamp_axis(self.velocity.x, self.max_speed.x);
        self.velocity.y = clamp_axis(self.velocity.y, self.max_speed.y);
    }

    /// Shapes that collide on this body's behalf
    pub fn hitboxes(&self) -> Vec<ShapeHandle> {
        let shape = self.space.borrow();
        match shape.as_space() {
            Some(space) => space.members().to_vec(),
            None => vec![self.space.clone()],
        }
    }

    /// Id of the body's space
    pub fn id(&self) -> ShapeId {
        self.space.id()
    }

    /// The space this body moves
    pub fn space(&self) -> &ShapeHandle {
        &self.space
    }

    /// Index the body queries
    pub fn index(&self) -> &Rc<RefCell<SpatialIndex>> {
        &self.index
    }

    /// Current velocity in units per frame
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    /// Replace the velocity
    pub fn set_velocity(&mut self, x: f32, y: f32) {
        self.velocity = Vec2::new(x, y);
    }

    /// Add to the velocity
    pub fn add_velocity(&mut self, x: f32, y: f32) {
        self.velocity += Vec2::new(x, y);
    }

    /// Gravity applied each frame
    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    /// Override gravity
    pub fn set_gravity(&mut self, gravity: f32) {
        self.gravity = gravity;
    }

    /// Per-axis speed limit
    pub fn max_speed(&self) -> Vec2 {
        self.max_speed
    }

    /// Whether the last update ended touching ground
    pub fn on_ground(&self) -> bool {
        self.on_ground
    }

    /// Axes on which a solid or slope was touched during the last update
    pub fn contacts(&self) -> ResolvedAxes {
        self.contacts
    }

    /// Bounds of the whole space
    pub fn bounds(&self) -> Rect {
        self.space.bounds()
    }

    /// Min corner of the space
    pub fn position(&self) -> Vec2 {
        self.bounds().position()
    }

    /// Max corner of the space
    pub fn max_position(&self) -> Vec2 {
        self.bounds().max_position()
    }

    /// Teleport the space, see [`Shape::set_position`](crate::physics::Shape::set_position)
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.space.set_position(x, y);
    }
}

/// Limit `value` to `[-max, max]`. A NaN limit leaves the value alone.
fn clamp_axis(value: f32, max: f32) -> f32 {
    if value > max {
        max
    } else if value < -max {
        -max
    } else {
        value
    }
}
