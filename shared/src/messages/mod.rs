//! Payload schemas carried inside `AppMessage::payload`
//!
//! The bus treats payloads as opaque JSON. These modules describe the
//! payloads that components on top of the bus agree on:
//! - `state`: shared-state replication events (broadcast)
//! - `hub`: instance registration with the relay
//! - `collab`: agent handoff and collaboration requests

pub mod collab;
pub mod hub;
pub mod state;

pub use collab::CollabEvent;
pub use hub::HubEvent;
pub use state::StateEvent;
