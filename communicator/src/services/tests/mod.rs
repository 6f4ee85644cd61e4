//! Service-specific tests
//!
//! The bus is driven through an in-memory `Connector` whose far ends are
//! handed to the test, so every frame the bus writes can be inspected and
//! every inbound frame, error or close can be injected.


// Common test utilities for services
#[cfg(test)]
pub mod common {
    use async_trait::async_trait;
    use serde_json::Value;
    use shared::{AppId, AppMessage, BusConfig, ConnectionStatus, MessageType};
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tokio::time::{Instant, timeout};

    use crate::core::Subscription;
    use crate::error::{BusError, BusResult};
    use crate::services::communicator::Communicator;
    use crate::traits::Connector;
    use crate::types::{Link, LinkEnds, LinkEvent, Outbound};

    /// Standard timeout for async operations in tests
    pub const TEST_TIMEOUT: Duration = Duration::from_secs(30);

    pub const HUB_URL: &str = "ws://hub.test:8080";

    /// In-memory transport; each successful open hands its `LinkEnds` to the test
    pub struct ChannelConnector {
        links: mpsc::UnboundedSender<LinkEnds>,
        opens: Mutex<Vec<(String, Instant)>>,
        failures: AtomicU32,
    }

    impl ChannelConnector {
        pub fn new() -> (Arc<Self>, mpsc::UnboundedReceiver<LinkEnds>) {
            let (links, rx) = mpsc::unbounded_channel();
            let connector = Arc::new(Self {
                links,
                opens: Mutex::new(Vec::new()),
                failures: AtomicU32::new(0),
            });
            (connector, rx)
        }

        /// Refuse the next `count` opens
        pub fn fail_next(&self, count: u32) {
            self.failures.store(count, Ordering::SeqCst);
        }

        pub fn open_count(&self) -> usize {
            self.opens.lock().unwrap().len()
        }

        pub fn open_urls(&self) -> Vec<String> {
            self.opens.lock().unwrap().iter().map(|(url, _)| url.clone()).collect()
        }

        pub fn open_instants(&self) -> Vec<Instant> {
            self.opens.lock().unwrap().iter().map(|(_, at)| *at).collect()
        }
    }

    #[async_trait]
    impl Connector for ChannelConnector {
        async fn open(&self, url: &str) -> BusResult<Link> {
            self.opens.lock().unwrap().push((url.to_string(), Instant::now()));

            let refused = self
                .failures
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .is_ok();
            if refused {
                return Err(BusError::connection("connection refused"));
            }

            let (link, ends) = Link::pair();
            self.links
                .send(ends)
                .map_err(|_| BusError::connection("test harness gone"))?;
            Ok(link)
        }
    }

    /// The relay side of one open link
    pub struct RemoteEnd {
        ends: LinkEnds,
    }

    impl RemoteEnd {
        pub async fn next_outbound(&mut self) -> Outbound {
            timeout(TEST_TIMEOUT, self.ends.outbound.recv())
                .await
                .expect("timed out waiting for outbound frame")
                .expect("outbound channel closed")
        }

        /// Next frame written by the bus, parsed
        pub async fn next_message(&mut self) -> AppMessage {
            match self.next_outbound().await {
                Outbound::Frame(text) => serde_json::from_str(&text).expect("bus wrote invalid JSON"),
                Outbound::Close => panic!("expected a frame, got close"),
            }
        }

        /// A frame written by the bus without waiting, if any
        pub fn try_next(&mut self) -> Option<Outbound> {
            self.ends.outbound.try_recv().ok()
        }

        pub fn deliver(&self, message: &AppMessage) {
            let text = serde_json::to_string(message).unwrap();
            self.deliver_raw(&text);
        }

        pub fn deliver_raw(&self, text: &str) {
            self.ends.inbound.send(LinkEvent::Frame(text.to_string())).unwrap();
        }

        pub fn fail(&self, reason: &str) {
            self.ends.inbound.send(LinkEvent::Error(reason.to_string())).unwrap();
        }

        pub fn close(&self) {
            let _ = self.ends.inbound.send(LinkEvent::Closed);
        }
    }

    /// Wait for the bus to open its next link
    pub async fn accept(links: &mut mpsc::UnboundedReceiver<LinkEnds>) -> RemoteEnd {
        let ends = timeout(TEST_TIMEOUT, links.recv())
            .await
            .expect("timed out waiting for connection")
            .expect("connector dropped");
        RemoteEnd { ends }
    }

    pub struct ConnectedBus {
        pub bus: Communicator,
        pub connector: Arc<ChannelConnector>,
        pub links: mpsc::UnboundedReceiver<LinkEnds>,
        pub remote: RemoteEnd,
    }

    /// A bus that is connected and whose registration frame was consumed
    pub async fn connected_bus(app_id: &str) -> ConnectedBus {
        let (connector, mut links) = ChannelConnector::new();
        let bus = Communicator::new(app_id, connector.clone(), test_config());
        bus.connect(HUB_URL);

        let mut remote = accept(&mut links).await;
        let registration = remote.next_message().await;
        assert_eq!(registration.to, "hub");
        assert_eq!(bus.status(), ConnectionStatus::Connected);

        ConnectedBus {
            bus,
            connector,
            links,
            remote,
        }
    }

    pub fn test_config() -> BusConfig {
        BusConfig::default().with_endpoint(HUB_URL)
    }

    pub fn message_from(from: &str, to: &str, kind: MessageType, payload: Value) -> AppMessage {
        AppMessage::new(&AppId::new(from), to, kind, payload)
    }

    /// Record every status the bus reports, starting with the replayed one
    pub fn record_statuses(bus: &Communicator) -> (Arc<Mutex<Vec<ConnectionStatus>>>, Subscription) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let subscription = bus.on_status_change(move |status| sink.lock().unwrap().push(status));
        (seen, subscription)
    }

    /// Record every payload delivered to `topic`
    pub fn record_payloads(bus: &Communicator, topic: &str) -> (Arc<Mutex<Vec<Value>>>, Subscription) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let subscription = bus.on(topic, move |message| sink.lock().unwrap().push(message.payload.clone()));
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
}
