//! Hub-specific error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use cache::CacheError;
use serde_json::json;
use shared::SharedError;
use thiserror::Error;
use tracing::error;

#[derive(Error, Debug)]
pub enum HubError {
    #[error("HTTP server startup failed on {address}: {message}")]
    ServerStartup { address: String, message: String },

    #[error("WebSocket error for peer {peer}: {message}")]
    WebSocket { peer: String, message: String },

    #[error("Server error: {0}")]
    Server(String),

    #[error("Peer not found: {0}")]
    PeerNotFound(String),

    #[error("Invalid request format: {details}")]
    BadRequest { details: String },

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("Shared component error")]
    SharedError(#[from] SharedError),
}

pub type HubResult<T> = Result<T, HubError>;

impl HubError {
    pub fn bad_request(details: impl Into<String>) -> Self {
        HubError::BadRequest { details: details.into() }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            HubError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            HubError::Cache(e) if e.is_client_error() => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for HubError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            HubError::Cache(CacheError::InvalidRequest { message }) => message.clone(),
            HubError::BadRequest { details } => details.clone(),
            other => {
                error!(error = %other, "Request failed");
                "Failed to process request".to_string()
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
