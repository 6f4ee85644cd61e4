//! Shared types for the AppConnect bus and response cache
//!
//! Contains the wire format exchanged between application instances and the
//! hub, the payload schemas layered on top of it, configuration, and the
//! logging setup used by every binary.

pub mod config;
pub mod errors;
pub mod logging;
pub mod messages;
pub mod types;

pub use config::{BusConfig, CacheConfig};
pub use errors::*;
pub use types::*;

pub use messages::{CollabEvent, HubEvent, StateEvent};
