//! WebSocket relay handler
//!
//! Each connection gets a peer slot. Frames addressed to `"hub"` carrying a
//! `register` event bind the slot to an app id; every other frame is routed
//! through the `PeerRegistry` untouched.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{State, WebSocketUpgrade};
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};
use shared::{AppId, AppMessage, HubEvent};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::state::HubState;
use crate::traits::PeerRegistry;
use crate::types::PeerId;

/// WebSocket upgrade handler
pub async fn relay_handler(ws: WebSocketUpgrade, State(state): State<HubState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: HubState) {
    let peer_id = PeerId::new();
    info!(peer = %peer_id, "🔗 Peer connected");

    let (mut sink, mut stream) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();

    if let Err(e) = state.registry.add_peer(peer_id, tx).await {
        error!(peer = %peer_id, error = %e, "Failed to register connection");
        return;
    }

    let outgoing_task = tokio::spawn(async move {
        while let Some(frame) = rx.recv().await {
            if let Err(e) = sink.send(Message::Text(frame)).await {
                warn!(peer = %peer_id, error = %e, "Failed to forward frame");
                break;
            }
        }
        debug!(peer = %peer_id, "Outgoing task ended");
    });

    while let Some(msg) = stream.next().await {
        let msg = match msg {
            Ok(msg) => msg,
            Err(e) => {
                warn!(peer = %peer_id, error = %e, "WebSocket error");
                break;
            }
        };

        match msg {
            Message::Text(text) => handle_frame(state.registry.as_ref(), peer_id, &text).await,
            Message::Binary(_) => warn!(peer = %peer_id, "Binary frames are not supported"),
            Message::Close(_) => break,
            Message::Ping(_) | Message::Pong(_) => {}
        }
    }

    outgoing_task.abort();
    let app = state.registry.remove_peer(peer_id).await;
    info!(peer = %peer_id, ?app, "👋 Peer disconnected");
}

/// Register or route one inbound text frame
pub async fn handle_frame(registry: &dyn PeerRegistry, peer_id: PeerId, text: &str) {
    let message: AppMessage = match serde_json::from_str(text) {
        Ok(message) => message,
        Err(e) => {
            warn!(peer = %peer_id, error = %e, "Discarding malformed frame");
            return;
        }
    };

    if message.is_for_hub() {
        match HubEvent::from_payload(&message.payload) {
            Some(HubEvent::Register { app_id }) => {
                if let Err(e) = registry.bind(peer_id, AppId::new(app_id)).await {
                    error!(peer = %peer_id, error = %e, "Registration failed");
                }
            }
            None => debug!(peer = %peer_id, id = %message.id, "Ignoring unknown hub event"),
        }
        return;
    }

    let delivered = registry.route(peer_id, &message, text).await;
    if delivered == 0 && !message.is_broadcast() {
        warn!(from = %message.from, to = %message.to, id = %message.id, "⚠️ No peer registered as recipient, message dropped");
    } else {
        debug!(from = %message.from, to = %message.to, delivered, "Relayed message");
    }
}
