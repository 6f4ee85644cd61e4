//! Reference relay for the AppConnect bus
//!
//! This library serves the WebSocket endpoint peers connect to, fans
//! broadcasts out to every other registered peer, routes addressed messages
//! by recipient id, and exposes the response cache over HTTP.

pub mod error;
pub mod hub_impl;
pub mod services;
pub mod state;
pub mod traits;
pub mod types;
pub mod web;

// Re-export main types
pub use error::{HubError, HubResult};
pub use hub_impl::Hub;
pub use services::RealPeerRegistry;
pub use state::HubState;
pub use traits::*;
pub use types::*;
