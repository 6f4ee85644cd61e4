//! Service implementations

pub mod peer_registry;

pub use peer_registry::*;
