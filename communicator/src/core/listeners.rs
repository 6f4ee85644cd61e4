//! Topic-keyed publish/subscribe registry
//!
//! A mapping from topic to an ordered list of handlers. Handlers run
//! synchronously, in registration order, outside the registry lock, so a
//! handler may subscribe, unsubscribe or publish without deadlocking.
//! A panicking handler is logged and skipped; the rest of the pass still runs.

use std::collections::HashMap;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use tracing::error;

/// Callback stored in a registry
pub type Handler<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Registry<T> {
    topics: Mutex<HashMap<String, Vec<(u64, Handler<T>)>>>,
    next_id: AtomicU64,
}

impl<T> Registry<T> {
    fn topics(&self) -> MutexGuard<'_, HashMap<String, Vec<(u64, Handler<T>)>>> {
        self.topics.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

trait Detach: Send + Sync {
    fn detach(&self, topic: &str, id: u64) -> bool;
}

impl<T: 'static> Detach for Registry<T> {
    fn detach(&self, topic: &str, id: u64) -> bool {
        let mut topics = self.topics();
        let Some(handlers) = topics.get_mut(topic) else {
            return false;
        };

        let before = handlers.len();
        handlers.retain(|(handler_id, _)| *handler_id != id);
        let removed = handlers.len() != before;

        if handlers.is_empty() {
            topics.remove(topic);
        }
        removed
    }
}

/// Handle returned by `subscribe`; deregisters exactly one handler.
///
/// Dropping the handle does not unsubscribe.
pub struct Subscription {
    registry: Weak<dyn Detach>,
    topic: String,
    id: u64,
}

impl Subscription {
    /// Remove the handler. Returns `true` only for the call that removed it;
    /// later calls, or calls after the registry is gone, are no-ops.
    pub fn unsubscribe(&self) -> bool {
        match self.registry.upgrade() {
            Some(registry) => registry.detach(&self.topic, self.id),
            None => false,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("topic", &self.topic)
            .field("id", &self.id)
            .finish()
    }
}

/// Ordered handler lists keyed by topic
pub struct ListenerRegistry<T> {
    inner: Arc<Registry<T>>,
}

impl<T> Clone for ListenerRegistry<T> {
    fn clone(&self) -> Self {
        Self { inner: self.inner.clone() }
    }
}

impl<T: 'static> Default for ListenerRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> ListenerRegistry<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Registry {
                topics: Mutex::new(HashMap::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Append a handler to `topic`
    pub fn subscribe<F>(&self, topic: impl Into<String>, handler: F) -> Subscription
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        let topic = topic.into();
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);

        self.inner
            .topics()
            .entry(topic.clone())
            .or_default()
            .push((id, Arc::new(handler)));

        let weak = Arc::downgrade(&self.inner);
        let registry: Weak<dyn Detach> = weak;
        Subscription { registry, topic, id }
    }

    /// Invoke every handler of `topic` with `value`.
    ///
    /// Returns the number of handlers that completed without panicking.
    pub fn notify(&self, topic: &str, value: &T) -> usize {
        let handlers: Vec<Handler<T>> = match self.inner.topics().get(topic) {
            Some(handlers) => handlers.iter().map(|(_, handler)| handler.clone()).collect(),
            None => return 0,
        };

        let mut delivered = 0;
        for handler in handlers {
            match catch_unwind(AssertUnwindSafe(|| handler(value))) {
                Ok(()) => delivered += 1,
                Err(panic) => {
                    let reason = panic
                        .downcast_ref::<&str>()
                        .map(|s| s.to_string())
                        .or_else(|| panic.downcast_ref::<String>().cloned())
                        .unwrap_or_else(|| "unknown panic".to_string());
                    error!(topic, reason = %reason, "Listener panicked; continuing with remaining listeners");
                }
            }
        }
        delivered
    }

    pub fn listener_count(&self, topic: &str) -> usize {
        self.inner.topics().get(topic).map_or(0, Vec::len)
    }

    pub fn clear(&self) {
        self.inner.topics().clear();
    }
}
