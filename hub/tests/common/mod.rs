//! Common test utilities for hub integration tests
//!
//! Every test gets its own hub on an ephemeral port with a zero-latency
//! generator and the default prewarm seeds.

#![allow(dead_code)]

use cache::{CacheEngine, CannedGenerator, ModelRouter, ResponseService, seed_default_prewarm};
use communicator::{Communicator, Subscription};
use hub::{Hub, RealPeerRegistry};
use shared::{AppMessage, BusConfig, CacheConfig, ConnectionStatus};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Standard timeout for async operations in tests
pub const TEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TestHub {
    pub hub: Hub,
    pub address: SocketAddr,
    server: JoinHandle<()>,
}

impl TestHub {
    pub fn ws_url(&self) -> String {
        format!("ws://{}", self.address)
    }

    pub fn http_url(&self, path: &str) -> String {
        format!("http://{}{}", self.address, path)
    }

    pub async fn registered_apps(&self) -> Vec<String> {
        self.hub
            .state()
            .registry
            .registered_apps()
            .await
            .into_iter()
            .map(|app| app.to_string())
            .collect()
    }

    pub async fn peer_count(&self) -> usize {
        self.hub.state().registry.peer_count().await
    }

    /// A bus pointed at this hub, connected and registered
    pub async fn connect_peer(&self, app_id: &str) -> Communicator {
        let config = BusConfig::default().with_endpoint(self.ws_url());
        let bus = Communicator::with_websocket(app_id, config);
        bus.connect_default();

        assert!(
            wait_for_condition(|| bus.status() == ConnectionStatus::Connected).await,
            "{app_id} never connected"
        );
        assert!(self.wait_for_app(app_id).await, "{app_id} never registered");
        bus
    }

    pub async fn wait_for_app(&self, app_id: &str) -> bool {
        let deadline = Instant::now() + TEST_TIMEOUT;
        while Instant::now() < deadline {
            if self.registered_apps().await.iter().any(|app| app == app_id) {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }

    pub async fn wait_for_peer_count(&self, expected: usize) -> bool {
        let deadline = Instant::now() + TEST_TIMEOUT;
        while Instant::now() < deadline {
            if self.peer_count().await == expected {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }
}

impl Drop for TestHub {
    fn drop(&mut self) {
        self.server.abort();
    }
}

/// Start a hub on 127.0.0.1 with an OS-assigned port
pub async fn spawn_hub() -> TestHub {
    let engine = Arc::new(CacheEngine::new(CacheConfig::default()));
    seed_default_prewarm(&engine);
    let responses = ResponseService::new(
        engine,
        Arc::new(ModelRouter::default()),
        Arc::new(CannedGenerator::new(Duration::ZERO)),
    );
    let hub = Hub::new(Arc::new(RealPeerRegistry::new()), responses);

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind ephemeral port");
    let address = listener.local_addr().expect("local address");
    let server = {
        let hub = hub.clone();
        tokio::spawn(async move {
            let _ = hub.serve(listener).await;
        })
    };

    TestHub { hub, address, server }
}

/// Record every message delivered to `topic`
pub fn record_messages(bus: &Communicator, topic: &str) -> (Arc<Mutex<Vec<AppMessage>>>, Subscription) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = seen.clone();
    let subscription = bus.on(topic, move |message| sink.lock().unwrap().push(message.clone()));
    (seen, subscription)
}

/// Poll `condition` until it holds or `TEST_TIMEOUT` elapses
pub async fn wait_for_condition<F>(condition: F) -> bool
where
    F: Fn() -> bool,
{
    let deadline = Instant::now() + TEST_TIMEOUT;
    while Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    condition()
}
