//! Message bus error types

use shared::SharedError;
use thiserror::Error;

/// Result type for bus operations
pub type BusResult<T> = Result<T, BusError>;

/// Bus error types
///
/// These never escape `connect`/`send_to`/`broadcast`; they surface as
/// status transitions and log events instead.
#[derive(Error, Debug)]
pub enum BusError {
    #[error("Invalid hub address '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Connection failed: {message}")]
    ConnectionFailed { message: String },

    #[error("Transport error: {message}")]
    Transport { message: String },

    #[error("Serialization error: {message}")]
    SerializationError { message: String },

    #[error("Shared component error")]
    SharedError(#[from] SharedError),
}

impl BusError {
    pub fn connection(message: impl Into<String>) -> Self {
        BusError::ConnectionFailed { message: message.into() }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        BusError::Transport { message: message.into() }
    }
}

impl From<serde_json::Error> for BusError {
    fn from(err: serde_json::Error) -> Self {
        BusError::SerializationError { message: err.to_string() }
    }
}
