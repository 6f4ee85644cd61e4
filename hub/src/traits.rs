//! Trait definitions for dependency injection

use async_trait::async_trait;
use shared::{AppId, AppMessage};
use tokio::sync::mpsc;

use crate::error::HubResult;
use crate::types::PeerId;

/// Bookkeeping of connected peers and message fan-out
#[mockall::automock]
#[async_trait]
pub trait PeerRegistry: Send + Sync {
    /// Track a new connection; it receives nothing until it registers
    async fn add_peer(&self, peer_id: PeerId, sender: mpsc::UnboundedSender<String>) -> HubResult<()>;

    /// Bind a connection to the app id from its registration event
    async fn bind(&self, peer_id: PeerId, app_id: AppId) -> HubResult<()>;

    /// Forget a connection; returns the app id it was registered under
    async fn remove_peer(&self, peer_id: PeerId) -> Option<AppId>;

    /// Forward `frame` according to `message.to`; returns the number of peers it was queued for
    async fn route(&self, from: PeerId, message: &AppMessage, frame: &str) -> usize;

    async fn peer_count(&self) -> usize;

    async fn registered_apps(&self) -> Vec<AppId>;
}
