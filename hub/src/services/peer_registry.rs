//! Peer registry service implementation
//!
//! Tracks every open relay connection and the app id it registered under.

use async_trait::async_trait;
use chrono::Utc;
use shared::{AppId, AppMessage};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{RwLock, mpsc};
use tracing::{debug, info, warn};

use crate::error::{HubError, HubResult};
use crate::traits::PeerRegistry;
use crate::types::{PeerConnection, PeerId};

/// Real peer registry implementation
#[derive(Clone, Default)]
pub struct RealPeerRegistry {
    peers: Arc<RwLock<HashMap<PeerId, PeerConnection>>>,
}

impl RealPeerRegistry {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PeerRegistry for RealPeerRegistry {
    async fn add_peer(&self, peer_id: PeerId, sender: mpsc::UnboundedSender<String>) -> HubResult<()> {
        let mut peers = self.peers.write().await;
        peers.insert(
            peer_id,
            PeerConnection {
                id: peer_id,
                app_id: None,
                sender,
                connected_at: Utc::now(),
            },
        );
        debug!(peer = %peer_id, total = peers.len(), "Peer added");
        Ok(())
    }

    async fn bind(&self, peer_id: PeerId, app_id: AppId) -> HubResult<()> {
        let mut peers = self.peers.write().await;
        let peer = peers
            .get_mut(&peer_id)
            .ok_or_else(|| HubError::PeerNotFound(peer_id.to_string()))?;

        let previous = peer.app_id.replace(app_id.clone());
        if previous.as_ref().is_some_and(|p| *p != app_id) {
            warn!(peer = %peer_id, ?previous, "Peer re-registered under a new app id");
        }
        info!(peer = %peer_id, app = %app_id, "📝 App registered");
        Ok(())
    }

    async fn remove_peer(&self, peer_id: PeerId) -> Option<AppId> {
        let mut peers = self.peers.write().await;
        let removed = peers.remove(&peer_id)?;
        debug!(peer = %peer_id, total = peers.len(), "Peer removed");
        removed.app_id
    }

    async fn route(&self, from: PeerId, message: &AppMessage, frame: &str) -> usize {
        let peers = self.peers.read().await;
        let broadcast = message.is_broadcast();

        let mut delivered = 0;
        for peer in peers.values() {
            let Some(app_id) = &peer.app_id else {
                continue;
            };
            let wanted = if broadcast {
                peer.id != from
            } else {
                app_id.as_str() == message.to
            };
            // A closed channel means the connection is on its way out
            if wanted && peer.sender.send(frame.to_string()).is_ok() {
                delivered += 1;
            }
        }
        delivered
    }

    async fn peer_count(&self) -> usize {
        self.peers.read().await.len()
    }

    async fn registered_apps(&self) -> Vec<AppId> {
        let peers = self.peers.read().await;
        let mut apps: Vec<AppId> = peers.values().filter_map(|p| p.app_id.clone()).collect();
        apps.sort_by(|a, b| a.as_str().cmp(b.as_str()));
        apps
    }
}
