//! Doors: a solid collider plus an activation zone

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use nalgebra::Vector2;
use platformer_engine::events::{message_types, Message, MessageManager};
use platformer_engine::foundation::math::Rect;
use platformer_engine::physics::{ShapeFactory, ShapeHandle, Tag, ZoneMessage};
use platformer_engine::spatial::SpatialIndex;

use super::Lock;
use crate::config::DoorConfig;

/// Side of the door the player opened it from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OpenDirection {
    /// Opened from the left half of the activation zone
    Left,
    /// Opened from the right half
    #[default]
    Right,
}

/// Shared between the door and its zone listener
#[derive(Debug, Default)]
struct DoorState {
    open: AtomicBool,
    opens_left: AtomicBool,
}

/// A door the player opens by standing in its zone while holding interact.
///
/// The activation zone starts one door width left of the collider and spans
/// `activation_multiplier` door widths. Opening is decided inside the zone
/// listener; the collider and zone leave the index on the next
/// [`sync`](Self::sync).
#[derive(Debug)]
pub struct Door {
    collider: ShapeHandle,
    zone: ShapeHandle,
    mailbox: Arc<MessageManager>,
    state: Arc<DoorState>,
    locked: Arc<AtomicBool>,
    removed: bool,
}

impl Door {
    /// Door with its collider's min corner at `position`, opened while
    /// `interact` is set
    pub fn new(
        factory: &ShapeFactory,
        position: Vector2<f32>,
        config: &DoorConfig,
        interact: Arc<AtomicBool>,
    ) -> Self {
        let size = config.size;
        let collider = factory.rectangle(position.x, position.y, size.x, size.y);
        collider.add_tags(&[Tag::Collision]);

        let mailbox = Arc::new(MessageManager::new());
        let zone_rect = Rect::new(
            position.x - size.x,
            position.y,
            size.x * config.activation_multiplier,
            size.y,
        );
        let zone = factory.zone(zone_rect, Arc::clone(&mailbox), message_types::DOOR);

        let state = Arc::new(DoorState::default());
        let locked = Arc::new(AtomicBool::new(false));

        let shared = Arc::clone(&state);
        let lock_flag = Arc::clone(&locked);
        let zone_center = zone_rect.center().x;
        mailbox.listen(message_types::DOOR, move |message: &dyn Message| {
            if lock_flag.load(Ordering::Acquire)
                || !interact.load(Ordering::Acquire)
                || shared.open.load(Ordering::Acquire)
            {
                return;
            }
            let Some(zone) = message.downcast_ref::<ZoneMessage>() else {
                return;
            };
            if !zone.entity.has_tags(&[Tag::Player]) {
                return;
            }

            let left = zone.overlap.right() < zone_center;
            shared.opens_left.store(left, Ordering::Release);
            shared.open.store(true, Ordering::Release);
            log::info!("Door opened to the {}", if left { "left" } else { "right" });
        });

        Self {
            collider,
            zone,
            mailbox,
            state,
            locked,
            removed: false,
        }
    }

    /// Keep the door shut until `lock` is released
    #[must_use]
    pub fn with_lock(self, lock: &Lock) -> Self {
        lock.attach(&self.locked);
        self
    }

    /// Put the collider and zone into the index
    pub fn add(&self, index: &mut SpatialIndex) {
        index.insert(&self.collider);
        index.insert(&self.zone);
    }

    /// Once open, take the collider and zone out of the index
    pub fn sync(&mut self, index: &mut SpatialIndex) {
        if self.removed || !self.is_open() {
            return;
        }
        index.remove(&self.zone);
        index.remove(&self.collider);
        self.removed = true;
        log::debug!("Door {} removed from the index", self.collider.id());
    }

    /// Whether the door has been opened
    pub fn is_open(&self) -> bool {
        self.state.open.load(Ordering::Acquire)
    }

    /// Whether an attached lock is still holding the door
    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Acquire)
    }

    /// Direction the door was opened from; `Right` while closed
    pub fn open_direction(&self) -> OpenDirection {
        if self.state.opens_left.load(Ordering::Acquire) {
            OpenDirection::Left
        } else {
            OpenDirection::Right
        }
    }

    /// Solid part of the door
    pub fn collider(&self) -> &ShapeHandle {
        &self.collider
    }

    /// Activation zone
    pub fn zone(&self) -> &ShapeHandle {
        &self.zone
    }

    /// Mailbox the zone publishes on
    pub fn mailbox(&self) -> &Arc<MessageManager> {
        &self.mailbox
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn door(factory: &ShapeFactory, interact: &Arc<AtomicBool>) -> Door {
        Door::new(factory, Vector2::new(225.0, 170.0), &DoorConfig::default(), Arc::clone(interact))
    }

    fn visit(door: &Door, entity: &ShapeHandle, overlap: Rect) {
        door.mailbox()
            .dispatch(&ZoneMessage::new(entity.clone(), overlap, message_types::DOOR));
    }

    #[test]
    fn test_layout() {
        let factory = ShapeFactory::new();
        let door = door(&factory, &Arc::new(AtomicBool::new(false)));

        assert_eq!(door.collider().bounds(), Rect::new(225.0, 170.0, 16.0, 30.0));
        assert!(door.collider().has_tags(&[Tag::Collision]));
        let zone = door.zone().bounds();
        assert_relative_eq!(zone.x, 209.0);
        assert_relative_eq!(zone.width, 48.0);
        assert_relative_eq!(zone.height, 30.0);
    }

    #[test]
    fn test_opens_towards_overlap_side() {
        let factory = ShapeFactory::new();
        let interact = Arc::new(AtomicBool::new(true));
        let player = factory.rectangle(0.0, 0.0, 12.0, 20.0);
        player.add_tags(&[Tag::Player]);

        let left = door(&factory, &interact);
        visit(&left, &player, Rect::new(209.0, 180.0, 10.0, 20.0));
        assert!(left.is_open());
        assert_eq!(left.open_direction(), OpenDirection::Left);

        let right = door(&factory, &interact);
        visit(&right, &player, Rect::new(245.0, 180.0, 12.0, 20.0));
        assert!(right.is_open());
        assert_eq!(right.open_direction(), OpenDirection::Right);
    }

    #[test]
    fn test_requires_player_and_interact() {
        let factory = ShapeFactory::new();
        let interact = Arc::new(AtomicBool::new(false));
        let door = door(&factory, &interact);
        let player = factory.rectangle(0.0, 0.0, 12.0, 20.0);
        player.add_tags(&[Tag::Player]);
        let crate_box = factory.rectangle(0.0, 0.0, 12.0, 20.0);
        let overlap = Rect::new(215.0, 180.0, 12.0, 20.0);

        visit(&door, &player, overlap);
        assert!(!door.is_open());

        interact.store(true, Ordering::Release);
        visit(&door, &crate_box, overlap);
        assert!(!door.is_open());

        visit(&door, &player, overlap);
        assert!(door.is_open());
    }

    #[test]
    fn test_lock_blocks_until_released() {
        let factory = ShapeFactory::new();
        let interact = Arc::new(AtomicBool::new(true));
        let lock = Lock::new(Arc::new(MessageManager::new()), message_types::LOCK);
        let door = door(&factory, &interact).with_lock(&lock);
        let player = factory.rectangle(0.0, 0.0, 12.0, 20.0);
        player.add_tags(&[Tag::Player]);
        let overlap = Rect::new(215.0, 180.0, 12.0, 20.0);

        assert!(door.is_locked());
        visit(&door, &player, overlap);
        assert!(!door.is_open());

        lock.release();
        assert!(!door.is_locked());
        visit(&door, &player, overlap);
        assert!(door.is_open());
    }

    #[test]
    fn test_sync_removes_open_door_from_index() {
        let factory = ShapeFactory::new();
        let interact = Arc::new(AtomicBool::new(true));
        let mut door = door(&factory, &interact);
        let mut index = SpatialIndex::default();
        door.add(&mut index);
        assert_eq!(index.len(), 2);

        door.sync(&mut index);
        assert_eq!(index.len(), 2);

        let player = factory.rectangle(0.0, 0.0, 12.0, 20.0);
        player.add_tags(&[Tag::Player]);
        visit(&door, &player, Rect::new(215.0, 180.0, 12.0, 20.0));
        door.sync(&mut index);

        assert!(index.is_empty());
        assert!(!index.contains(door.collider()));
    }
}
