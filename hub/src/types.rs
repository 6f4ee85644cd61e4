//! Hub-specific types

use cache::Priority;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::AppId;
use std::fmt;
use tokio::sync::mpsc;
use uuid::Uuid;

/// One WebSocket connection, registered or not
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PeerId(pub Uuid);

impl PeerId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PeerId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A live peer connection and the app id it registered, if any
#[derive(Debug)]
pub struct PeerConnection {
    pub id: PeerId,
    pub app_id: Option<AppId>,
    /// Serialized frames queued for this peer's socket
    pub sender: mpsc::UnboundedSender<String>,
    pub connected_at: DateTime<Utc>,
}

/// Body of `POST /api/ai`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AiRequest {
    #[serde(default)]
    pub agent: String,
    #[serde(default)]
    pub prompt: String,
}

/// Body of `POST /api/websim/ai`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RoutedAiRequest {
    #[serde(default)]
    pub agent: String,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub priority: Priority,
}

/// Body of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub peers: usize,
    pub apps: Vec<String>,
    pub uptime_seconds: u64,
}
