//! Message bus client library
//!
//! This library lets named application instances exchange JSON messages
//! through a relay, keep a replicated key-value map in sync, and hand work
//! between agents. The transport sits behind the `Connector` trait.

pub mod core;
pub mod error;
pub mod services;
pub mod traits;
pub mod types;

// Re-export main types
pub use crate::core::{ListenerRegistry, MessageLog, ReconnectPolicy, Subscription};
pub use error::{BusError, BusResult};
pub use services::*;
pub use traits::*;
pub use types::*;
