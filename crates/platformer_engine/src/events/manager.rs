//! Type-keyed publish/subscribe registry

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use super::Message;

/// Process-wide listener id source, shared by every manager.
static NEXT_LISTENER_ID: AtomicU64 = AtomicU64::new(1);

/// Unique handle for a registered listener, used to stop listening
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ListenerId(u64);

impl ListenerId {
    fn next() -> Self {
        Self(NEXT_LISTENER_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw numeric value
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Callback invoked with every dispatched message of the type it listens to
pub type MessageHandler = Arc<dyn Fn(&dyn Message) + Send + Sync>;

struct Listener {
    id: ListenerId,
    handler: MessageHandler,
}

type PendingRemovals = HashMap<String, Vec<ListenerId>>;

/// Routes dispatched messages to the handlers registered for their type.
///
/// Registration takes the registry's write lock. [`dispatch`](Self::dispatch)
/// copies the handler list under the read lock and invokes handlers after
/// releasing it, so handlers may call back into the manager. Removals requested
/// through [`stop_listen`](Self::stop_listen) are queued and only applied when
/// the next dispatch starts.
pub struct MessageManager {
    listeners: RwLock<HashMap<String, Vec<Listener>>>,
    pending_removals: Arc<Mutex<PendingRemovals>>,
}

impl MessageManager {
    /// Create an empty manager
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(HashMap::new()),
            pending_removals: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Register a handler for a message type until it is stopped
    pub fn listen<F>(&self, message_type: impl Into<String>, handler: F) -> ListenerId
    where
        F: Fn(&dyn Message) + Send + Sync + 'static,
    {
        let id = ListenerId::next();
        self.insert(message_type.into(), id, Arc::new(handler));
        id
    }

    /// Register a handler that receives at most one message.
    ///
    /// On its first invocation the handler queues its own removal before
    /// running, and any later invocation (for example from a dispatch that
    /// had already copied the handler list) is ignored.
    pub fn listen_once<F>(&self, message_type: impl Into<String>, handler: F) -> ListenerId
    where
        F: Fn(&dyn Message) + Send + Sync + 'static,
    {
        let message_type = message_type.into();
        let id = ListenerId::next();
        let pending = Arc::clone(&self.pending_removals);
        let fired = AtomicBool::new(false);
        let own_type = message_type.clone();

        let wrapper = move |message: &dyn Message| {
            if fired.swap(true, Ordering::AcqRel) {
                return;
            }
            queue_removal(&pending, &own_type, id);
            handler(message);
        };

        self.insert(message_type, id, Arc::new(wrapper));
        id
    }

    /// Mark a listener for removal. Takes effect when the next dispatch starts.
    ///
    /// Unknown ids are ignored.
    pub fn stop_listen(&self, message_type: &str, id: ListenerId) {
        log::trace!("Listener {} on '{}' marked for removal", id.get(), message_type);
        queue_removal(&self.pending_removals, message_type, id);
    }

    /// Deliver a message to every handler registered for its type.
    ///
    /// Handlers registered or stopped while this call runs do not change the
    /// set of handlers it invokes.
    pub fn dispatch(&self, message: &dyn Message) {
        self.apply_pending_removals();

        let handlers: Vec<MessageHandler> = {
            let listeners = self.listeners.read().unwrap_or_else(PoisonError::into_inner);
            match listeners.get(message.message_type()) {
                Some(list) => list.iter().map(|l| Arc::clone(&l.handler)).collect(),
                None => return,
            }
        };

        log::trace!("Dispatching '{}' to {} handler(s)", message.message_type(), handlers.len());
        for handler in &handlers {
            handler(message);
        }
    }

    /// Number of handlers currently registered for a type, including ones marked for removal
    pub fn listener_count(&self, message_type: &str) -> usize {
        let listeners = self.listeners.read().unwrap_or_else(PoisonError::into_inner);
        listeners.get(message_type).map_or(0, Vec::len)
    }

    /// Number of removals waiting for the next dispatch
    pub fn pending_removal_count(&self) -> usize {
        let pending = self.pending_removals.lock().unwrap_or_else(PoisonError::into_inner);
        pending.values().map(Vec::len).sum()
    }

    fn insert(&self, message_type: String, id: ListenerId, handler: MessageHandler) {
        log::debug!("Listener {} registered for '{}'", id.get(), message_type);
        let mut listeners = self.listeners.write().unwrap_or_else(PoisonError::into_inner);
        listeners
            .entry(message_type)
            .or_default()
            .push(Listener { id, handler });
    }

    fn apply_pending_removals(&self) {
        let pending = {
            let mut pending = self.pending_removals.lock().unwrap_or_else(PoisonError::into_inner);
            if pending.is_empty() {
                return;
            }
            std::mem::take(&mut *pending)
        };

        let mut listeners = self.listeners.write().unwrap_or_else(PoisonError::into_inner);
        for (message_type, ids) in pending {
            if let Some(list) = listeners.get_mut(&message_type) {
                // One occurrence per request; ids are unique so this removes the listener.
                for id in ids {
                    if let Some(index) = list.iter().position(|l| l.id == id) {
                        list.remove(index);
                    }
                }
            }
        }
    }
}

fn queue_removal(pending: &Mutex<PendingRemovals>, message_type: &str, id: ListenerId) {
    let mut pending = pending.lock().unwrap_or_else(PoisonError::into_inner);
    pending.entry(message_type.to_owned()).or_default().push(id);
}

impl Default for MessageManager {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MessageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let listeners = self.listeners.read().unwrap_or_else(PoisonError::into_inner);
        let counts: HashMap<&str, usize> = listeners.iter().map(|(k, v)| (k.as_str(), v.len())).collect();
        f.debug_struct("MessageManager")
            .field("listeners", &counts)
            .field("pending_removals", &self.pending_removal_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{message_types, GenericMessage};
    use std::sync::atomic::AtomicUsize;
    use std::thread;

    fn counter() -> Arc<AtomicUsize> {
        Arc::new(AtomicUsize::new(0))
    }

    #[test]
    fn test_dispatch_reaches_listeners_of_type() {
        let manager = MessageManager::new();
        let doors = counter();
        let keys = counter();

        let d = Arc::clone(&doors);
        manager.listen(message_types::DOOR, move |_| {
            d.fetch_add(1, Ordering::SeqCst);
        });
        let k = Arc::clone(&keys);
        manager.listen(message_types::KEY, move |_| {
            k.fetch_add(1, Ordering::SeqCst);
        });

        manager.dispatch(&GenericMessage::signal(message_types::DOOR));
        manager.dispatch(&GenericMessage::signal(message_types::DOOR));

        assert_eq!(doors.load(Ordering::SeqCst), 2);
        assert_eq!(keys.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_handlers_run_in_registration_order() {
        let manager = MessageManager::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        for tag in 0..3 {
            let order = Arc::clone(&order);
            manager.listen("ordered", move |_| order.lock().unwrap().push(tag));
        }
        manager.dispatch(&GenericMessage::signal("ordered"));

        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_dispatch_without_listeners_is_noop() {
        let manager = MessageManager::new();
        manager.dispatch(&GenericMessage::signal("nobody"));
        assert_eq!(manager.listener_count("nobody"), 0);
    }

    #[test]
    fn test_stop_unknown_listener_is_noop() {
        let manager = MessageManager::new();
        let hits = counter();
        let h = Arc::clone(&hits);
        manager.listen("t", move |_| {
            h.fetch_add(1, Ordering::SeqCst);
        });

        manager.stop_listen("t", ListenerId(u64::MAX));
        manager.stop_listen("missing", ListenerId(u64::MAX - 1));
        manager.dispatch(&GenericMessage::signal("t"));

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(manager.listener_count("t"), 1);
    }

    #[test]
    fn test_stop_listen_is_deferred_until_dispatch() {
        let manager = MessageManager::new();
        let id = manager.listen("t", |_| {});

        manager.stop_listen("t", id);
        assert_eq!(manager.listener_count("t"), 1);
        assert_eq!(manager.pending_removal_count(), 1);

        manager.dispatch(&GenericMessage::signal("other"));
        assert_eq!(manager.listener_count("t"), 0);
        assert_eq!(manager.pending_removal_count(), 0);
    }

    #[test]
    fn test_listen_once_fires_exactly_once() {
        let manager = MessageManager::new();
        let hits = counter();
        let h = Arc::clone(&hits);
        manager.listen_once(message_types::KEY, move |_| {
            h.fetch_add(1, Ordering::SeqCst);
        });

        manager.dispatch(&GenericMessage::signal(message_types::KEY));
        manager.dispatch(&GenericMessage::signal(message_types::KEY));
        manager.dispatch(&GenericMessage::signal(message_types::KEY));

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(manager.listener_count(message_types::KEY), 0);
    }

    #[test]
    fn test_self_removal_keeps_inflight_snapshot() {
        let manager = Arc::new(MessageManager::new());
        let first = counter();
        let second = counter();

        let own_id = Arc::new(Mutex::new(None::<ListenerId>));
        let f = Arc::clone(&first);
        let m = Arc::clone(&manager);
        let slot = Arc::clone(&own_id);
        let id = manager.listen("t", move |_| {
            f.fetch_add(1, Ordering::SeqCst);
            if let Some(id) = *slot.lock().unwrap() {
                m.stop_listen("t", id);
            }
        });
        *own_id.lock().unwrap() = Some(id);

        let s = Arc::clone(&second);
        manager.listen("t", move |_| {
            s.fetch_add(1, Ordering::SeqCst);
        });

        manager.dispatch(&GenericMessage::signal("t"));
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 1);

        manager.dispatch(&GenericMessage::signal("t"));
        assert_eq!(first.load(Ordering::SeqCst), 1);
        assert_eq!(second.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_stopping_a_later_handler_does_not_skip_it_this_dispatch() {
        let manager = Arc::new(MessageManager::new());
        let later_hits = counter();
        let later_id = Arc::new(Mutex::new(None::<ListenerId>));

        let m = Arc::clone(&manager);
        let slot = Arc::clone(&later_id);
        manager.listen("t", move |_| {
            if let Some(id) = *slot.lock().unwrap() {
                m.stop_listen("t", id);
            }
        });
        let l = Arc::clone(&later_hits);
        let id = manager.listen("t", move |_| {
            l.fetch_add(1, Ordering::SeqCst);
        });
        *later_id.lock().unwrap() = Some(id);

        manager.dispatch(&GenericMessage::signal("t"));
        manager.dispatch(&GenericMessage::signal("t"));

        assert_eq!(later_hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_listen_inside_handler_not_in_current_snapshot() {
        let manager = Arc::new(MessageManager::new());
        let late_hits = counter();

        let m = Arc::clone(&manager);
        let l = Arc::clone(&late_hits);
        manager.listen_once("t", move |_| {
            let l = Arc::clone(&l);
            m.listen("t", move |_| {
                l.fetch_add(1, Ordering::SeqCst);
            });
        });

        manager.dispatch(&GenericMessage::signal("t"));
        assert_eq!(late_hits.load(Ordering::SeqCst), 0);

        manager.dispatch(&GenericMessage::signal("t"));
        assert_eq!(late_hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_nested_dispatch_from_handler() {
        let manager = Arc::new(MessageManager::new());
        let unlocked = Arc::new(AtomicBool::new(false));

        let u = Arc::clone(&unlocked);
        manager.listen_once(message_types::LOCK, move |_| u.store(true, Ordering::SeqCst));

        let m = Arc::clone(&manager);
        manager.listen_once(message_types::KEY, move |_| {
            m.dispatch(&GenericMessage::signal(message_types::LOCK));
        });

        manager.dispatch(&GenericMessage::signal(message_types::KEY));
        assert!(unlocked.load(Ordering::SeqCst));
    }

    #[test]
    fn test_listener_ids_unique_across_managers() {
        let a = MessageManager::new();
        let b = MessageManager::new();
        let ids = [a.listen("t", |_| {}), b.listen("t", |_| {}), a.listen("u", |_| {})];
        assert_ne!(ids[0], ids[1]);
        assert_ne!(ids[1], ids[2]);
        assert!(ids[0] < ids[1] && ids[1] < ids[2]);
    }

    #[test]
    fn test_concurrent_listen_and_dispatch() {
        let manager = Arc::new(MessageManager::new());
        let hits = counter();

        let workers: Vec<_> = (0..4)
            .map(|_| {
                let manager = Arc::clone(&manager);
                let hits = Arc::clone(&hits);
                thread::spawn(move || {
                    for _ in 0..50 {
                        let h = Arc::clone(&hits);
                        let id = manager.listen("t", move |_| {
                            h.fetch_add(1, Ordering::SeqCst);
                        });
                        manager.dispatch(&GenericMessage::signal("t"));
                        manager.stop_listen("t", id);
                    }
                })
            })
            .collect();

        for worker in workers {
            worker.join().expect("worker panicked");
        }
        manager.dispatch(&GenericMessage::signal("flush"));

        assert!(hits.load(Ordering::SeqCst) >= 200);
        assert_eq!(manager.listener_count("t"), 0);
    }
}
