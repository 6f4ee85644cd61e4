//! Replicated key-value state over the bus
//!
//! Every instance keeps a full local map. Local writes apply immediately and
//! are broadcast as `state-update` / `state-delete` / `state-clear` events;
//! inbound events are applied as last-writer-wins with no conflict
//! resolution. There is no catch-up: an instance joining late only sees
//! mutations made after it connected.

use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::{AppMessage, MessageType, StateEvent, app_debug, app_error};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::core::{ListenerRegistry, Subscription};
use crate::services::communicator::Communicator;

struct StateInner {
    communicator: Communicator,
    entries: Mutex<HashMap<String, Value>>,
    subscribers: ListenerRegistry<Value>,
    remote_events: Subscription,
}

impl Drop for StateInner {
    fn drop(&mut self) {
        self.remote_events.unsubscribe();
    }
}

/// Shared state attached to one `Communicator`
#[derive(Clone)]
pub struct SharedStateManager {
    inner: Arc<StateInner>,
}

impl SharedStateManager {
    /// Attach to `communicator` and start applying inbound state events
    pub fn new(communicator: Communicator) -> Self {
        let inner = Arc::new_cyclic(|weak: &Weak<StateInner>| {
            let weak = weak.clone();
            let remote_events = communicator.on(MessageType::Broadcast.as_str(), move |message| {
                if let Some(inner) = weak.upgrade() {
                    inner.apply_remote(message);
                }
            });

            StateInner {
                communicator,
                entries: Mutex::new(HashMap::new()),
                subscribers: ListenerRegistry::new(),
                remote_events,
            }
        });

        Self { inner }
    }

    pub fn communicator(&self) -> &Communicator {
        &self.inner.communicator
    }

    /// Store `value` locally, notify subscribers and broadcast the update
    pub fn set(&self, key: &str, value: Value) {
        self.set_with(key, value, true);
    }

    pub fn set_with(&self, key: &str, value: Value, should_broadcast: bool) {
        self.inner.entries().insert(key.to_string(), value.clone());
        self.inner.subscribers.notify(key, &value);

        if should_broadcast {
            self.inner.publish(StateEvent::StateUpdate {
                key: key.to_string(),
                value,
            });
        }
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        self.inner.entries().get(key).cloned()
    }

    /// Typed read; `None` when absent or of a different shape
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get(key).and_then(|value| serde_json::from_value(value).ok())
    }

    /// Watch `key`. Fires right away when the key already has a value, then
    /// on every local or remote update.
    pub fn subscribe<F>(&self, key: &str, callback: F) -> Subscription
    where
        F: Fn(&Value) + Send + Sync + 'static,
    {
        let current = self.get(key);
        let callback = Arc::new(callback);
        let listener = callback.clone();
        let subscription = self.inner.subscribers.subscribe(key, move |value: &Value| listener(value));

        if let Some(value) = current {
            callback(&value);
        }
        subscription
    }

    /// Remove `key` locally and broadcast the deletion.
    ///
    /// Subscribers are not notified of deletions.
    pub fn delete(&self, key: &str) {
        self.delete_with(key, true);
    }

    pub fn delete_with(&self, key: &str, should_broadcast: bool) {
        self.inner.entries().remove(key);

        if should_broadcast {
            self.inner.publish(StateEvent::StateDelete { key: key.to_string() });
        }
    }

    /// Remove every key locally and broadcast the clear
    pub fn clear(&self) {
        self.clear_with(true);
    }

    pub fn clear_with(&self, should_broadcast: bool) {
        self.inner.entries().clear();

        if should_broadcast {
            self.inner.publish(StateEvent::StateClear);
        }
    }

    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.inner.entries().keys().cloned().collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.inner.entries().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.entries().is_empty()
    }
}

impl StateInner {
    fn entries(&self) -> MutexGuard<'_, HashMap<String, Value>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, event: StateEvent) {
        match event.to_payload() {
            Ok(payload) => self.communicator.broadcast(payload),
            Err(e) => app_error!(self.communicator.app_id(), "❌ Failed to encode state event: {}", e),
        }
    }

    fn apply_remote(&self, message: &AppMessage) {
        let Some(event) = StateEvent::from_payload(&message.payload) else {
            return;
        };
        let app_id = self.communicator.app_id();

        match event {
            StateEvent::StateUpdate { key, value } => {
                app_debug!(app_id, "🔄 State update for '{}' from {}", key, message.from);
                self.entries().insert(key.clone(), value.clone());
                self.subscribers.notify(&key, &value);
            }
            StateEvent::StateDelete { key } => {
                app_debug!(app_id, "🔄 State delete for '{}' from {}", key, message.from);
                self.entries().remove(&key);
            }
            StateEvent::StateClear => {
                app_debug!(app_id, "🔄 State clear from {}", message.from);
                self.entries().clear();
            }
        }
    }
}
