//! Transport-level types shared by connectors and the bus

use tokio::sync::mpsc;

/// Instruction for the write half of an open connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// One serialized `AppMessage`
    Frame(String),
    /// Close the connection; nothing is written afterwards
    Close,
}

/// Event produced by the read half of an open connection
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// One raw inbound text frame, not yet parsed
    Frame(String),
    /// Transport-level failure; the connection may still close afterwards
    Error(String),
    /// The connection is gone
    Closed,
}

/// An open connection, expressed as a pair of channels.
///
/// Dropping `outbound` closes the connection just like sending
/// `Outbound::Close`. The inbound channel ends after `LinkEvent::Closed`.
#[derive(Debug)]
pub struct Link {
    pub outbound: mpsc::UnboundedSender<Outbound>,
    pub inbound: mpsc::UnboundedReceiver<LinkEvent>,
}

/// The far side of a `Link`, held by whoever pumps bytes for it
#[derive(Debug)]
pub struct LinkEnds {
    pub outbound: mpsc::UnboundedReceiver<Outbound>,
    pub inbound: mpsc::UnboundedSender<LinkEvent>,
}

impl Link {
    /// Create a link together with the ends a transport pumps
    pub fn pair() -> (Link, LinkEnds) {
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (in_tx, in_rx) = mpsc::unbounded_channel();
        (
            Link { outbound: out_tx, inbound: in_rx },
            LinkEnds { outbound: out_rx, inbound: in_tx },
        )
    }
}
