//! Keys: pickup zones that release a lock

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use nalgebra::Vector2;
use platformer_engine::events::{message_types, GenericMessage, ListenerId, Message, MessageManager};
use platformer_engine::foundation::math::Rect;
use platformer_engine::physics::{ShapeFactory, ShapeHandle, Tag, ZoneMessage};
use platformer_engine::spatial::SpatialIndex;

use super::Lock;

/// A zone the player walks into to pick the key up.
///
/// The key owns a mailbox shared by its zone and its [`Lock`]. The first
/// player-tagged body to enter the zone picks the key up, which dispatches
/// the lock's release message on the same mailbox. Other bodies passing
/// through are ignored.
#[derive(Debug)]
pub struct Key {
    zone: ShapeHandle,
    lock: Lock,
    picked_up: Arc<AtomicBool>,
    listener: ListenerId,
    removed: bool,
}

impl Key {
    /// Key with its pickup zone's min corner at `position`
    pub fn new(factory: &ShapeFactory, position: Vector2<f32>, size: Vector2<f32>) -> Self {
        let mailbox = Arc::new(MessageManager::new());
        let lock = Lock::new(Arc::clone(&mailbox), message_types::LOCK);
        let zone = factory.zone(
            Rect::new(position.x, position.y, size.x, size.y),
            Arc::clone(&mailbox),
            message_types::KEY,
        );

        let picked_up = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&picked_up);
        let weak_mailbox = Arc::downgrade(&mailbox);
        let release_type = lock.message_type().to_owned();

        let listener = mailbox.listen(message_types::KEY, move |message: &dyn Message| {
            let Some(zone) = message.downcast_ref::<ZoneMessage>() else {
                return;
            };
            if !zone.entity.has_tags(&[Tag::Player]) || flag.swap(true, Ordering::AcqRel) {
                return;
            }

            log::info!("Key picked up by {}", zone.entity.id());
            if let Some(mailbox) = weak_mailbox.upgrade() {
                mailbox.dispatch(&GenericMessage::signal(release_type.as_str()));
            }
        });

        Self {
            zone,
            lock,
            picked_up,
            listener,
            removed: false,
        }
    }

    /// The lock this key opens; attach it to doors
    pub fn lock(&self) -> &Lock {
        &self.lock
    }

    /// Pickup zone
    pub fn zone(&self) -> &ShapeHandle {
        &self.zone
    }

    /// Whether the player has taken the key
    pub fn is_picked_up(&self) -> bool {
        self.picked_up.load(Ordering::Acquire)
    }

    /// Put the pickup zone into the index
    pub fn add(&self, index: &mut SpatialIndex) {
        index.insert(&self.zone);
    }

    /// Once picked up, take the zone out of the index and stop listening
    pub fn sync(&mut self, index: &mut SpatialIndex) {
        if self.removed || !self.is_picked_up() {
            return;
        }
        index.remove(&self.zone);
        self.lock.mailbox().stop_listen(message_types::KEY, self.listener);
        self.removed = true;
    }
}
