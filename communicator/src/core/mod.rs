//! Pure bus logic with no I/O dependencies

pub mod backoff;
pub mod listeners;
pub mod message_log;

pub use backoff::ReconnectPolicy;
pub use listeners::{Handler, ListenerRegistry, Subscription};
pub use message_log::{DEFAULT_MESSAGE_LOG_CAPACITY, MessageLog};
