//! Cache and response service error types

use shared::SharedError;
use thiserror::Error;

use crate::types::TaskType;

/// Result type for cache operations
pub type CacheResult<T> = Result<T, CacheError>;

/// Cache error types
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    #[error("Generation failed: {message}")]
    GenerationFailed { message: String },

    #[error("No model available for task '{task}'")]
    NoModelAvailable { task: TaskType },

    #[error("Shared component error")]
    SharedError(#[from] SharedError),
}

impl CacheError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        CacheError::InvalidRequest { message: message.into() }
    }

    pub fn generation(message: impl Into<String>) -> Self {
        CacheError::GenerationFailed { message: message.into() }
    }

    /// Whether the caller, not the service, is at fault
    pub fn is_client_error(&self) -> bool {
        matches!(self, CacheError::InvalidRequest { .. })
    }
}
