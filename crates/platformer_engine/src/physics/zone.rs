//! Trigger zones
//!
//! A zone is a box that never blocks movement. When a body's hitbox overlaps
//! it during resolution, the zone publishes a [`ZoneMessage`] on its mailbox.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::events::{Message, MessageManager};
use crate::foundation::math::Rect;
use crate::physics::collision::ShapeHandle;

/// Box bound to a mailbox and a message type
pub struct Zone {
    rect: Rect,
    mailbox: Arc<MessageManager>,
    message_type: String,
}

impl Zone {
    /// New zone publishing `message_type` on `mailbox`
    pub fn new(rect: Rect, mailbox: Arc<MessageManager>, message_type: impl Into<String>) -> Self {
        Self {
            rect,
            mailbox,
            message_type: message_type.into(),
        }
    }

    /// Covered area
    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Mailbox messages are published on
    pub fn mailbox(&self) -> &Arc<MessageManager> {
        &self.mailbox
    }

    /// Type of the published messages
    pub fn message_type(&self) -> &str {
        &self.message_type
    }

    /// Move the zone
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.rect.translate(dx, dy);
    }

    /// Build the message for an entity overlapping `collider`, or `None` if it doesn't overlap
    pub fn trigger(&self, entity: &ShapeHandle, collider: &Rect) -> Option<ZoneMessage> {
        if !self.rect.overlaps(collider) {
            return None;
        }
        Some(ZoneMessage {
            entity: entity.clone(),
            overlap: self.rect.overlap_rect(collider),
            message_type: self.message_type.clone(),
        })
    }
}

impl fmt::Debug for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Zone")
            .field("rect", &self.rect)
            .field("message_type", &self.message_type)
            .finish_non_exhaustive()
    }
}

/// Published when a body overlaps a zone
#[derive(Debug, Clone)]
pub struct ZoneMessage {
    /// Space of the body that entered the zone
    pub entity: ShapeHandle,
    /// Intersection of the zone and the body's hitbox
    pub overlap: Rect,
    message_type: String,
}

impl ZoneMessage {
    /// Construct a message by hand, e.g. to simulate a zone hit
    pub fn new(entity: ShapeHandle, overlap: Rect, message_type: impl Into<String>) -> Self {
        Self {
            entity,
            overlap,
            message_type: message_type.into(),
        }
    }
}

impl Message for ZoneMessage {
    fn message_type(&self) -> &str {
        &self.message_type
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::collision::ShapeFactory;

    #[test]
    fn test_trigger_only_on_overlap() {
        let factory = ShapeFactory::new();
        let entity = factory.space(vec![factory.rectangle(0.0, 0.0, 4.0, 4.0)]);
        let zone = Zone::new(Rect::new(2.0, 2.0, 10.0, 10.0), Arc::new(MessageManager::new()), "key");

        let message = zone.trigger(&entity, &Rect::new(0.0, 0.0, 4.0, 4.0)).expect("overlapping");
        assert_eq!(message.overlap, Rect::new(2.0, 2.0, 2.0, 2.0));
        assert_eq!(message.message_type(), "key");
        assert!(message.entity.ptr_eq(&entity));

        assert!(zone.trigger(&entity, &Rect::new(-4.0, 0.0, 4.0, 4.0)).is_none());
    }
}
