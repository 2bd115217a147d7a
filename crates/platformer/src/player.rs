//! The controllable player

use std::cell::RefCell;
use std::rc::Rc;

use platformer_engine::core::PhysicsConfig;
use platformer_engine::physics::{Body, ShapeFactory, ShapeHandle, Tag};
use platformer_engine::spatial::SpatialIndex;

use crate::config::PlayerConfig;

/// Buttons read for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlayerInput {
    /// Held left
    pub left: bool,
    /// Held right
    pub right: bool,
    /// Jump pressed this frame
    pub jump: bool,
    /// Interact held
    pub interact: bool,
}

/// Direction the player last ran in
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Facing {
    /// Towards negative x
    Left,
    /// Towards positive x
    #[default]
    Right,
}

/// A body with run, friction and double-jump controls
#[derive(Debug)]
pub struct Player {
    body: Body,
    acceleration: f32,
    friction: f32,
    jump_height: f32,
    double_jump_performed: bool,
    facing: Facing,
}

impl Player {
    /// Player at the configured spawn point, colliding against `index`
    pub fn new(
        factory: &ShapeFactory,
        index: Rc<RefCell<SpatialIndex>>,
        physics: &PhysicsConfig,
        config: &PlayerConfig,
    ) -> Self {
        let hitbox = factory.rectangle(config.spawn.x, config.spawn.y, config.size.x, config.size.y);
        let space = factory.space(vec![hitbox]);
        space.add_tags(&[Tag::Player]);

        Self {
            body: Body::new(space, index, physics, &config.body()),
            acceleration: config.acceleration,
            friction: config.friction,
            jump_height: config.jump_height,
            double_jump_performed: false,
            facing: Facing::default(),
        }
    }

    /// Move the body, then apply friction and this frame's input
    pub fn update(&mut self, dt: f32, input: &PlayerInput) {
        self.body.update(dt);

        if self.double_jump_performed {
            self.double_jump_performed = !self.is_grounded();
        }

        let vx = self.body.velocity().x;
        if vx > self.friction {
            self.body.add_velocity(-self.friction, 0.0);
            self.facing = Facing::Right;
        } else if vx < -self.friction {
            self.body.add_velocity(self.friction, 0.0);
            self.facing = Facing::Left;
        } else {
            let vy = self.body.velocity().y;
            self.body.set_velocity(0.0, vy);
        }

        if input.right {
            self.body.add_velocity(self.acceleration, 0.0);
        }
        if input.left {
            self.body.add_velocity(-self.acceleration, 0.0);
        }

        if input.jump {
            if self.is_grounded() {
                self.jump();
            } else if !self.double_jump_performed {
                self.jump();
                self.double_jump_performed = true;
            }
        }
    }

    fn jump(&mut self) {
        let vx = self.body.velocity().x;
        self.body.set_velocity(vx, -self.jump_height);
    }

    /// Standing on something and not on the way up.
    ///
    /// The body keeps its ground flag while rising faster than one frame of
    /// gravity, so the flag alone would allow jumping again mid-air.
    pub fn is_grounded(&self) -> bool {
        self.body.on_ground() && self.body.velocity().y >= 0.0
    }

    /// Whether the air jump has been used since last touching ground
    pub fn double_jump_performed(&self) -> bool {
        self.double_jump_performed
    }

    /// Direction of the last run
    pub fn facing(&self) -> Facing {
        self.facing
    }

    /// Player rigidbody
    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Player rigidbody, mutably
    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    /// Collision space, tagged [`Tag::Player`]
    pub fn space(&self) -> &ShapeHandle {
        self.body.space()
    }

    /// Teleport the player's hitbox min corner to `(x, y)`
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.body.set_position(x, y);
    }
}
