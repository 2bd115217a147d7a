//! Locks released by a message

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use platformer_engine::events::{GenericMessage, MessageManager};

/// A mailbox plus the message type that releases whatever it is attached to
#[derive(Debug, Clone)]
pub struct Lock {
    mailbox: Arc<MessageManager>,
    message_type: String,
}

impl Lock {
    /// Lock released by `message_type` on `mailbox`
    pub fn new(mailbox: Arc<MessageManager>, message_type: impl Into<String>) -> Self {
        Self {
            mailbox,
            message_type: message_type.into(),
        }
    }

    /// Mailbox the release message travels on
    pub fn mailbox(&self) -> &Arc<MessageManager> {
        &self.mailbox
    }

    /// Release message type
    pub fn message_type(&self) -> &str {
        &self.message_type
    }

    /// Set `locked` and clear it on the first release message
    pub fn attach(&self, locked: &Arc<AtomicBool>) {
        locked.store(true, Ordering::Release);
        let flag = Arc::clone(locked);
        self.mailbox.listen_once(self.message_type.as_str(), move |_| {
            flag.store(false, Ordering::Release);
            log::info!("Lock released");
        });
    }

    /// Publish the release message
    pub fn release(&self) {
        self.mailbox.dispatch(&GenericMessage::signal(self.message_type.as_str()));
    }
}
