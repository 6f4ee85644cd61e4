//! WebSocket transport to the relay

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::debug;
use url::Url;

use crate::error::{BusError, BusResult};
use crate::traits::Connector;
use crate::types::{Link, LinkEnds, LinkEvent, Outbound};

/// Connector backed by `tokio-tungstenite`.
///
/// Each open connection gets a writer task and a reader task that pump the
/// socket into the `Link` channels. Text frames pass through untouched.
#[derive(Debug, Default, Clone)]
pub struct WebSocketConnector;

impl WebSocketConnector {
    pub fn new() -> Self {
        Self
    }
}

fn validate_url(raw: &str) -> BusResult<Url> {
    let url = Url::parse(raw).map_err(|e| BusError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    match url.scheme() {
        "ws" | "wss" => Ok(url),
        other => Err(BusError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{other}'"),
        }),
    }
}

#[async_trait]
impl Connector for WebSocketConnector {
    async fn open(&self, url: &str) -> BusResult<Link> {
        let url = validate_url(url)?;

        let (socket, _response) = connect_async(url.as_str())
            .await
            .map_err(|e| BusError::connection(e.to_string()))?;
        debug!(url = %url, "WebSocket handshake complete");

        let (mut sink, mut stream) = socket.split();
        let (link, ends) = Link::pair();
        let LinkEnds {
            outbound: mut outbound_rx,
            inbound: inbound_tx,
        } = ends;

        let writer_events = inbound_tx.clone();
        tokio::spawn(async move {
            while let Some(outbound) = outbound_rx.recv().await {
                match outbound {
                    Outbound::Frame(text) => {
                        if let Err(e) = sink.send(Message::Text(text)).await {
                            let _ = writer_events.send(LinkEvent::Error(e.to_string()));
                            break;
                        }
                    }
                    Outbound::Close => break,
                }
            }
            // Starts the close handshake; the reader reports `Closed` when it completes
            let _ = sink.close().await;
        });

        tokio::spawn(async move {
            while let Some(frame) = stream.next().await {
                let event = match frame {
                    Ok(Message::Text(text)) => LinkEvent::Frame(text),
                    // Not expected from the relay; handed on so the parse failure is logged
                    Ok(Message::Binary(bytes)) => LinkEvent::Frame(String::from_utf8_lossy(&bytes).into_owned()),
                    Ok(Message::Close(_)) => break,
                    Ok(_) => continue,
                    Err(e) => {
                        let _ = inbound_tx.send(LinkEvent::Error(e.to_string()));
                        break;
                    }
                };
                if inbound_tx.send(event).is_err() {
                    break;
                }
            }
            let _ = inbound_tx.send(LinkEvent::Closed);
        });

        Ok(link)
    }
}
