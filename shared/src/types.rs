//! Core shared types and identifiers

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Recipient id addressing every connected peer
pub const BROADCAST_ID: &str = "all";

/// Recipient id addressing the coordinating relay itself
pub const HUB_ID: &str = "hub";

/// Listener topic that receives every message regardless of type
pub const WILDCARD: &str = "*";

/// Identifier of one application instance on the bus
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppId(String);

impl AppId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AppId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AppId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for AppId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Coarse routing tag carried by every message
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Request,
    Response,
    Broadcast,
    Event,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Request => "request",
            MessageType::Response => "response",
            MessageType::Broadcast => "broadcast",
            MessageType::Event => "event",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of communication between application instances.
///
/// Messages are immutable once built; the wire shape is one JSON object per
/// transmitted frame:
///
/// ```json
/// { "id": "...", "from": "...", "to": "...", "type": "request",
///   "payload": {}, "timestamp": 1700000000000 }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AppMessage {
    pub id: String,
    pub from: String,
    pub to: String,
    #[serde(rename = "type")]
    pub kind: MessageType,
    pub payload: Value,
    /// Milliseconds since the Unix epoch
    pub timestamp: i64,
}

impl AppMessage {
    /// Build a message stamped with a fresh id and the current time
    pub fn new(from: &AppId, to: impl Into<String>, kind: MessageType, payload: Value) -> Self {
        let timestamp = Utc::now().timestamp_millis();
        Self {
            id: generate_message_id(from, timestamp),
            from: from.to_string(),
            to: to.into(),
            kind,
            payload,
            timestamp,
        }
    }

    pub fn is_broadcast(&self) -> bool {
        self.to == BROADCAST_ID
    }

    pub fn is_for_hub(&self) -> bool {
        self.to == HUB_ID
    }
}

/// Sender id, creation time and a random base-36 suffix.
///
/// Collision resistant within a session, not unguessable.
pub fn generate_message_id(from: &AppId, timestamp: i64) -> String {
    const ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| ALPHABET[rng.gen_range(0..ALPHABET.len())] as char)
        .collect();
    format!("{from}-{timestamp}-{suffix}")
}

/// Connection state of one bus instance
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Disconnected,
    Connecting,
    Connected,
    Error,
}

impl fmt::Display for ConnectionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConnectionStatus::Disconnected => "disconnected",
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Error => "error",
        };
        f.write_str(name)
    }
}
