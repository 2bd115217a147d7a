//! Message system for decoupled gameplay reactions
//!
//! Key principles:
//! - Messages are identified by a string type, not by their Rust type
//! - Listeners register per message type and receive every dispatch of it
//! - Removal is deferred and applied at the start of the next dispatch
//! - Handlers run outside the registry lock and may (un)register freely
//!
//! Zones publish [`ZoneMessage`](crate::physics::ZoneMessage)s through a
//! [`MessageManager`]; game objects (doors, keys, locks) listen on it.

mod manager;

use std::any::Any;

pub use manager::{ListenerId, MessageHandler, MessageManager};

/// Message types used by the standard game objects
pub mod message_types {
    /// A body is inside a door's activation zone
    pub const DOOR: &str = "door";
    /// Generic openable interaction
    pub const OPEN: &str = "open";
    /// A lock should release
    pub const LOCK: &str = "lock";
    /// A body touched a key
    pub const KEY: &str = "key";
}

/// Anything that can be dispatched through a [`MessageManager`]
pub trait Message: Any {
    /// Routing key; listeners registered under this type receive the message
    fn message_type(&self) -> &str;

    /// Downcast support for handlers that need the concrete message
    fn as_any(&self) -> &dyn Any;
}

impl dyn Message {
    /// Attempt to view this message as a concrete type
    pub fn downcast_ref<T: Message>(&self) -> Option<&T> {
        self.as_any().downcast_ref::<T>()
    }
}

/// Message carrying arbitrary data under a caller-chosen type
#[derive(Debug, Clone)]
pub struct GenericMessage<T> {
    message_type: String,
    data: T,
}

impl<T: 'static> GenericMessage<T> {
    /// Create a new message
    pub fn new(message_type: impl Into<String>, data: T) -> Self {
        Self {
            message_type: message_type.into(),
            data,
        }
    }

    /// Payload
    pub fn data(&self) -> &T {
        &self.data
    }
}

impl GenericMessage<()> {
    /// Message with no payload, used as a plain signal
    pub fn signal(message_type: impl Into<String>) -> Self {
        Self::new(message_type, ())
    }
}

impl<T: 'static> Message for GenericMessage<T> {
    fn message_type(&self) -> &str {
        &self.message_type
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
