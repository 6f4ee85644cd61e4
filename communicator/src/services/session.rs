//! One application's bus, shared state and message log, built together

use shared::{AppId, AppMessage, BusConfig, WILDCARD};
use std::sync::Arc;

use crate::core::{MessageLog, Subscription};
use crate::services::communicator::Communicator;
use crate::services::shared_state::SharedStateManager;
use crate::traits::Connector;

/// Communication bundle for a single application id
pub struct AppSession {
    communicator: Communicator,
    state: SharedStateManager,
    log: Arc<MessageLog>,
    log_subscription: Subscription,
}

impl AppSession {
    pub fn new(app_id: impl Into<AppId>, connector: Arc<dyn Connector>, config: BusConfig) -> Self {
        Self::from_communicator(Communicator::new(app_id, connector, config))
    }

    pub fn with_websocket(app_id: impl Into<AppId>, config: BusConfig) -> Self {
        Self::from_communicator(Communicator::with_websocket(app_id, config))
    }

    /// Wrap an existing bus instance
    pub fn from_communicator(communicator: Communicator) -> Self {
        let state = SharedStateManager::new(communicator.clone());

        let log = Arc::new(MessageLog::default());
        let sink = log.clone();
        let log_subscription = communicator.on(WILDCARD, move |message| sink.record(message));

        Self {
            communicator,
            state,
            log,
            log_subscription,
        }
    }

    /// Connect to the configured endpoint
    pub fn connect(&self) {
        self.communicator.connect_default();
    }

    pub fn communicator(&self) -> &Communicator {
        &self.communicator
    }

    pub fn state(&self) -> &SharedStateManager {
        &self.state
    }

    pub fn message_log(&self) -> &MessageLog {
        &self.log
    }

    /// Recent inbound messages, newest first
    pub fn messages(&self) -> Vec<AppMessage> {
        self.log.recent()
    }

    /// Stop recording and disconnect
    pub fn close(&self) {
        self.log_subscription.unsubscribe();
        self.communicator.disconnect();
    }
}
