//! Debug level used to exercise the physics layer

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use nalgebra::Vector2;
use platformer_engine::physics::{ShapeFactory, ShapeHandle, Tag};
use platformer_engine::spatial::SpatialIndex;

use crate::config::GameConfig;
use crate::objects::{Door, Key};
use crate::player::{Player, PlayerInput};

/// Ground strip, floating blocks, a one-way platform, a slope platform and a
/// locked door whose key floats above the ground.
#[derive(Debug)]
pub struct TestingScene {
    factory: ShapeFactory,
    index: Rc<RefCell<SpatialIndex>>,
    terrain: Vec<ShapeHandle>,
    player: Player,
    key: Key,
    door: Door,
    interact: Arc<AtomicBool>,
}

impl TestingScene {
    /// Build the level and insert everything into a fresh index
    pub fn new(config: &GameConfig) -> Self {
        let factory = ShapeFactory::new();
        let index = Rc::new(RefCell::new(SpatialIndex::from_config(&config.physics)));
        let interact = Arc::new(AtomicBool::new(false));

        let terrain = Self::build_terrain(&factory, config);
        let key = Key::new(&factory, Vector2::new(150.0, 100.0), config.objects.key_size);
        let door = Door::new(
            &factory,
            Vector2::new(225.0, 170.0),
            &config.objects.door(),
            Arc::clone(&interact),
        )
        .with_lock(key.lock());

        {
            let mut index = index.borrow_mut();
            index.insert_all(&terrain);
            door.add(&mut index);
            key.add(&mut index);
            log::info!(
                "Scene ready: {} shapes in {} cells of {} units",
                index.len(),
                index.num_buckets(),
                index.cell_size()
            );
        }

        let player = Player::new(&factory, Rc::clone(&index), &config.physics, &config.player);

        Self {
            factory,
            index,
            terrain,
            player,
            key,
            door,
            interact,
        }
    }

    fn build_terrain(factory: &ShapeFactory, config: &GameConfig) -> Vec<ShapeHandle> {
        let mut solids: Vec<ShapeHandle> = (0..8u8)
            .map(|i| factory.rectangle(f32::from(i) * 50.0, 200.0, 50.0, 50.0))
            .collect();
        solids.extend([
            factory.rectangle(400.0, 200.0, 200.0, 200.0),
            factory.rectangle(96.0, 130.0, 40.0, 40.0),
            factory.rectangle(200.0, 130.0, 50.0, 40.0),
            factory.rectangle(375.0, 180.0, 100.0, 20.0),
        ]);
        for solid in &solids {
            solid.add_tags(&[Tag::Ground, Tag::Collision]);
        }

        let platform = factory.platform(168.0, 160.0, 32.0, 10.0);
        let slope = factory.slope_platform(
            Vector2::new(300.0, 200.0),
            Vector2::new(350.0, 180.0),
            config.objects.slope_landing_width,
        );
        for shape in [&platform, &slope] {
            shape.add_tags(&[Tag::Ground]);
        }

        solids.push(platform);
        solids.push(slope);
        solids
    }

    /// Advance one frame with the given input
    pub fn update(&mut self, dt: f32, input: &PlayerInput) {
        self.interact.store(input.interact, Ordering::Release);
        self.player.update(dt, input);

        let mut index = self.index.borrow_mut();
        self.key.sync(&mut index);
        self.door.sync(&mut index);
    }

    /// The player
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// The player, mutably
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// The door's key
    pub fn key(&self) -> &Key {
        &self.key
    }

    /// The locked door
    pub fn door(&self) -> &Door {
        &self.door
    }

    /// Static level geometry
    pub fn terrain(&self) -> &[ShapeHandle] {
        &self.terrain
    }

    /// Shared spatial index
    pub fn index(&self) -> &Rc<RefCell<SpatialIndex>> {
        &self.index
    }

    /// Factory the scene's shapes came from
    pub fn factory(&self) -> &ShapeFactory {
        &self.factory
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objects::OpenDirection;
    use approx::assert_relative_eq;

    // Quarter-unit gravity at one frame per step keeps every position exact.
    const DT: f32 = 1.0;

    fn scene() -> TestingScene {
        let mut config = GameConfig::default();
        config.physics.gravity = 0.25;
        TestingScene::new(&config)
    }

    fn interact() -> PlayerInput {
        PlayerInput {
            interact: true,
            ..PlayerInput::default()
        }
    }

    #[test]
    fn test_scene_contents() {
        let scene = scene();
        let index = scene.index().borrow();

        assert_eq!(scene.terrain().len(), 14);
        // terrain, door collider and zone, key zone
        assert_eq!(index.len(), 17);
        assert!(index.contains(scene.key().zone()));
        assert!(scene.door().is_locked());
    }

    #[test]
    fn test_player_settles_on_ground() {
        let mut scene = scene();
        for _ in 0..60 {
            scene.update(DT, &PlayerInput::default());
        }

        // spawn is above the left floating block
        let body = scene.player().body();
        assert!(body.on_ground());
        assert_relative_eq!(body.max_position().y, 130.0);
        assert_relative_eq!(body.position().x, 100.0);
    }

    #[test]
    fn test_key_pickup_unlocks_door() {
        let mut scene = scene();
        scene.player_mut().set_position(150.0, 100.0);
        scene.update(DT, &PlayerInput::default());

        assert!(scene.key().is_picked_up());
        assert!(!scene.door().is_locked());
        assert!(!scene.index().borrow().contains(scene.key().zone()));
    }

    #[test]
    fn test_locked_door_stays_shut() {
        let mut scene = scene();
        scene.player_mut().set_position(210.0, 180.0);
        scene.update(DT, &interact());

        assert!(!scene.door().is_open());
        assert!(scene.index().borrow().contains(scene.door().collider()));
    }

    #[test]
    fn test_unlocked_door_opens_left() {
        let mut scene = scene();
        scene.player_mut().set_position(150.0, 100.0);
        scene.update(DT, &PlayerInput::default());

        scene.player_mut().set_position(210.0, 180.0);
        scene.update(DT, &PlayerInput::default());
        assert!(!scene.door().is_open());

        scene.update(DT, &interact());
        assert!(scene.door().is_open());
        assert_eq!(scene.door().open_direction(), OpenDirection::Left);

        let index = scene.index().borrow();
        assert!(!index.contains(scene.door().collider()));
        assert!(!index.contains(scene.door().zone()));
    }
}
