//! Message bus client
//!
//! One `Communicator` per application instance holds at most one connection
//! to the relay. Inbound frames are parsed and fanned out to listeners keyed
//! by message type (plus the `*` wildcard). Outbound messages are written
//! immediately or dropped with a warning; nothing is queued.
//!
//! Connection lifecycle:
//! - `connect` moves `disconnected`/`error` → `connecting` → `connected`
//!   (or → `error` → `disconnected` when the open fails)
//! - an unexpected close schedules a reconnect after
//!   `base_delay * 2^(attempt - 1)` until `max_reconnect_attempts` is used up
//! - `disconnect` saturates the attempt counter and cancels any pending
//!   reconnect task

use serde_json::Value;
use shared::{
    AppId, AppMessage, BROADCAST_ID, BusConfig, ConnectionStatus, HUB_ID, HubEvent, MessageType, WILDCARD,
    app_debug, app_error, app_info, app_warn,
};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::core::{ListenerRegistry, ReconnectPolicy, Subscription};
use crate::services::websocket_connector::WebSocketConnector;
use crate::traits::Connector;
use crate::types::{Link, LinkEvent, Outbound};

const STATUS_TOPIC: &str = "status";

/// Mutable connection bookkeeping, guarded by one lock
struct ConnectionState {
    status: ConnectionStatus,
    outbound: Option<mpsc::UnboundedSender<Outbound>>,
    reconnect_attempts: u32,
    pending_reconnect: Option<JoinHandle<()>>,
    /// Bumped by every `connect` (and by `disconnect` while connecting);
    /// connection tasks from an older generation exit without side effects
    generation: u64,
    /// Set by `disconnect`, cleared by `connect`
    closing: bool,
}

struct Inner {
    app_id: AppId,
    config: BusConfig,
    policy: ReconnectPolicy,
    connector: Arc<dyn Connector>,
    listeners: ListenerRegistry<AppMessage>,
    status_listeners: ListenerRegistry<ConnectionStatus>,
    state: Mutex<ConnectionState>,
}

/// Point-to-point and broadcast messaging between named application instances
#[derive(Clone)]
pub struct Communicator {
    inner: Arc<Inner>,
}

impl Communicator {
    /// Create a bus instance using the given transport
    pub fn new(app_id: impl Into<AppId>, connector: Arc<dyn Connector>, config: BusConfig) -> Self {
        let policy = ReconnectPolicy::from_config(&config);
        Self {
            inner: Arc::new(Inner {
                app_id: app_id.into(),
                config,
                policy,
                connector,
                listeners: ListenerRegistry::new(),
                status_listeners: ListenerRegistry::new(),
                state: Mutex::new(ConnectionState {
                    status: ConnectionStatus::Disconnected,
                    outbound: None,
                    reconnect_attempts: 0,
                    pending_reconnect: None,
                    generation: 0,
                    closing: false,
                }),
            }),
        }
    }

    /// Create a bus instance speaking WebSocket to the relay
    pub fn with_websocket(app_id: impl Into<AppId>, config: BusConfig) -> Self {
        Self::new(app_id, Arc::new(WebSocketConnector::new()), config)
    }

    pub fn app_id(&self) -> &AppId {
        &self.inner.app_id
    }

    pub fn config(&self) -> &BusConfig {
        &self.inner.config
    }

    pub fn status(&self) -> ConnectionStatus {
        self.state().status
    }

    /// Reconnect attempts made since the last successful open
    pub fn reconnect_attempts(&self) -> u32 {
        self.state().reconnect_attempts
    }

    /// Whether a reconnect task is scheduled and has not fired yet
    pub fn reconnect_pending(&self) -> bool {
        self.state()
            .pending_reconnect
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Connect to the configured endpoint
    pub fn connect_default(&self) {
        let endpoint = self.inner.config.endpoint.clone();
        self.connect(&endpoint);
    }

    /// Open the connection to `url` in the background.
    ///
    /// No-op (with a warning) while a connection is open or being opened.
    /// Must be called from within a Tokio runtime.
    pub fn connect(&self, url: &str) {
        let app_id = &self.inner.app_id;

        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            app_error!(app_id, "❌ connect({}) called outside a Tokio runtime", url);
            self.update_status(ConnectionStatus::Error);
            return;
        };

        let generation = {
            let mut state = self.state();
            if state.outbound.is_some() || state.status == ConnectionStatus::Connecting {
                app_warn!(app_id, "Already connected; ignoring connect to {}", url);
                return;
            }
            if let Some(pending) = state.pending_reconnect.take() {
                pending.abort();
            }
            state.closing = false;
            state.generation += 1;
            state.status = ConnectionStatus::Connecting;
            state.generation
        };
        self.publish_status(ConnectionStatus::Connecting);

        let this = self.clone();
        let url = url.to_string();
        runtime.spawn(async move {
            this.run_connection(url, generation).await;
        });
    }

    /// Close the connection and disable automatic reconnection.
    ///
    /// A fresh `connect` is needed to resume; the attempt counter is only
    /// reset once that connection opens.
    pub fn disconnect(&self) {
        let cancelled_open = {
            let mut state = self.state();
            state.reconnect_attempts = self.inner.policy.max_attempts;
            state.closing = true;

            if let Some(pending) = state.pending_reconnect.take() {
                pending.abort();
            }

            match state.outbound.take() {
                Some(outbound) => {
                    // Status becomes `disconnected` once the transport reports the close
                    let _ = outbound.send(Outbound::Close);
                    false
                }
                None if state.status == ConnectionStatus::Connecting => {
                    state.generation += 1;
                    state.status = ConnectionStatus::Disconnected;
                    true
                }
                None => false,
            }
        };

        app_info!(self.inner.app_id, "🔌 Disconnecting from hub");
        if cancelled_open {
            self.publish_status(ConnectionStatus::Disconnected);
        }
    }

    /// Send `payload` to one instance (or `"all"` / `"hub"`)
    pub fn send_to(&self, target: &str, payload: Value, kind: MessageType) {
        let message = AppMessage::new(&self.inner.app_id, target, kind, payload);
        self.send(message);
    }

    /// `send_to` with the default `request` type
    pub fn request(&self, target: &str, payload: Value) {
        self.send_to(target, payload, MessageType::Request);
    }

    /// Send `payload` to every other connected instance
    pub fn broadcast(&self, payload: Value) {
        self.send_to(BROADCAST_ID, payload, MessageType::Broadcast);
    }

    /// Listen for messages of one type, or every message with `"*"`
    pub fn on<F>(&self, message_type: &str, callback: F) -> Subscription
    where
        F: Fn(&AppMessage) + Send + Sync + 'static,
    {
        self.inner.listeners.subscribe(message_type, callback)
    }

    /// Listen for status transitions; `callback` runs once right away with
    /// the current status
    pub fn on_status_change<F>(&self, callback: F) -> Subscription
    where
        F: Fn(ConnectionStatus) + Send + Sync + 'static,
    {
        let callback = Arc::new(callback);
        let listener = callback.clone();
        let subscription = self
            .inner
            .status_listeners
            .subscribe(STATUS_TOPIC, move |status: &ConnectionStatus| listener(*status));

        callback(self.status());
        subscription
    }

    fn state(&self) -> MutexGuard<'_, ConnectionState> {
        self.inner.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish_status(&self, status: ConnectionStatus) {
        app_debug!(self.inner.app_id, "Status changed to {}", status);
        self.inner.status_listeners.notify(STATUS_TOPIC, &status);
    }

    fn update_status(&self, status: ConnectionStatus) {
        let changed = {
            let mut state = self.state();
            let changed = state.status != status;
            state.status = status;
            changed
        };
        if changed {
            self.publish_status(status);
        }
    }

    /// Like `update_status`, ignored when `generation` has been superseded
    fn update_status_for(&self, generation: u64, status: ConnectionStatus) -> bool {
        let changed = {
            let mut state = self.state();
            if state.generation != generation {
                return false;
            }
            let changed = state.status != status;
            state.status = status;
            changed
        };
        if changed {
            self.publish_status(status);
        }
        true
    }

    async fn run_connection(self, url: String, generation: u64) {
        let app_id = self.inner.app_id.clone();
        app_info!(app_id, "🔗 Connecting to {}", url);

        let link = match self.inner.connector.open(&url).await {
            Ok(link) => link,
            Err(e) => {
                app_error!(app_id, "❌ Failed to connect to {}: {}", url, e);
                if self.update_status_for(generation, ConnectionStatus::Error) {
                    self.update_status_for(generation, ConnectionStatus::Disconnected);
                    self.schedule_reconnect(url, generation);
                }
                return;
            }
        };

        let Link { outbound, mut inbound } = link;
        {
            let mut state = self.state();
            if state.generation != generation {
                let _ = outbound.send(Outbound::Close);
                return;
            }
            state.outbound = Some(outbound);
            state.reconnect_attempts = 0;
            state.status = ConnectionStatus::Connected;
        }
        self.publish_status(ConnectionStatus::Connected);
        app_info!(app_id, "✅ Connected to communication hub at {}", url);

        self.register();

        while let Some(event) = inbound.recv().await {
            match event {
                LinkEvent::Frame(text) => self.handle_frame(&text),
                LinkEvent::Error(message) => {
                    app_error!(app_id, "❌ Transport error: {}", message);
                    self.update_status_for(generation, ConnectionStatus::Error);
                }
                LinkEvent::Closed => break,
            }
        }

        {
            let mut state = self.state();
            if state.generation != generation {
                return;
            }
            state.outbound = None;
        }
        app_info!(app_id, "🔌 Connection to {} closed", url);
        self.update_status_for(generation, ConnectionStatus::Disconnected);
        self.schedule_reconnect(url, generation);
    }

    fn schedule_reconnect(&self, url: String, generation: u64) {
        let app_id = &self.inner.app_id;
        let policy = self.inner.policy;

        let mut state = self.state();
        if state.generation != generation {
            return;
        }
        if state.closing {
            app_debug!(app_id, "Connection closed by disconnect; not reconnecting");
            return;
        }
        if !policy.allows_another(state.reconnect_attempts) {
            app_info!(app_id, "Max reconnection attempts reached ({})", policy.max_attempts);
            return;
        }

        state.reconnect_attempts += 1;
        let attempt = state.reconnect_attempts;
        let delay = policy.delay_for_attempt(attempt);
        app_info!(
            app_id,
            "⏳ Attempting to reconnect in {}ms (attempt {}/{})",
            delay.as_millis(),
            attempt,
            policy.max_attempts
        );

        let this = self.clone();
        state.pending_reconnect = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            this.reconnect(url, generation);
        }));
    }

    /// Timer body of `schedule_reconnect`. The `closing` and generation
    /// checks share one lock with the switch to `connecting`, so a
    /// `disconnect` that lands after the timer fired still wins.
    fn reconnect(&self, url: String, generation: u64) {
        let next = {
            let mut state = self.state();
            if state.closing || state.generation != generation {
                app_debug!(self.inner.app_id, "Reconnect superseded; not reconnecting");
                return;
            }
            // Our own handle; dropping it detaches the running task
            state.pending_reconnect.take();
            state.generation += 1;
            state.status = ConnectionStatus::Connecting;
            state.generation
        };
        self.publish_status(ConnectionStatus::Connecting);

        let this = self.clone();
        tokio::spawn(async move {
            this.run_connection(url, next).await;
        });
    }

    fn register(&self) {
        let app_id = &self.inner.app_id;
        let registration = HubEvent::Register { app_id: app_id.to_string() };
        match registration.to_payload() {
            Ok(payload) => self.send_to(HUB_ID, payload, MessageType::Event),
            Err(e) => app_error!(app_id, "❌ Failed to encode registration: {}", e),
        }
    }

    fn send(&self, message: AppMessage) {
        let app_id = &self.inner.app_id;

        let frame = match serde_json::to_string(&message) {
            Ok(frame) => frame,
            Err(e) => {
                app_error!(app_id, "❌ Failed to serialize message {}: {}", message.id, e);
                return;
            }
        };

        let outbound = self.state().outbound.clone();
        let Some(outbound) = outbound else {
            app_warn!(
                app_id,
                "⚠️ Not connected. Message {} to {} not sent",
                message.id,
                message.to
            );
            return;
        };

        if outbound.send(Outbound::Frame(frame)).is_err() {
            app_warn!(app_id, "⚠️ Transport closed. Message {} to {} not sent", message.id, message.to);
        } else {
            app_debug!(app_id, "📤 Sent {} message {} to {}", message.kind, message.id, message.to);
        }
    }

    fn handle_frame(&self, text: &str) {
        match serde_json::from_str::<AppMessage>(text) {
            Ok(message) => {
                app_debug!(self.inner.app_id, "📨 Received {} message {} from {}", message.kind, message.id, message.from);
                self.inner.listeners.notify(message.kind.as_str(), &message);
                self.inner.listeners.notify(WILDCARD, &message);
            }
            Err(e) => {
                app_error!(self.inner.app_id, "❌ Failed to parse message: {}", e);
            }
        }
    }
}
