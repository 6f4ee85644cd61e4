//! Main hub implementation
//!
//! Wires the peer registry and the response service into one axum router
//! and serves it.

use axum::Router;
use axum::routing::{delete, get, post};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use cache::ResponseService;

use crate::error::{HubError, HubResult};
use crate::state::HubState;
use crate::traits::PeerRegistry;
use crate::web::handlers::{
    ai_response, cache_stats, clear_cache, health_check, list_models, relay_handler, routed_ai_response,
};

/// Relay plus cache API
#[derive(Clone)]
pub struct Hub {
    state: HubState,
}

impl Hub {
    pub fn new(registry: Arc<dyn PeerRegistry>, responses: ResponseService) -> Self {
        Self {
            state: HubState::new(registry, responses),
        }
    }

    pub fn state(&self) -> &HubState {
        &self.state
    }

    /// Build the axum router with all routes
    pub fn build_router(&self) -> Router {
        Router::new()
            // Relay
            .route("/", get(relay_handler))
            // Cache API
            .route("/api/ai", post(ai_response))
            .route("/api/websim/ai", post(routed_ai_response))
            .route("/api/cache/stats", get(cache_stats))
            .route("/api/cache", delete(clear_cache))
            .route("/api/models", get(list_models))
            .route("/health", get(health_check))
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(CorsLayer::permissive())
                    .into_inner(),
            )
            .with_state(self.state.clone())
    }

    /// Serve on an already bound listener until the server stops
    pub async fn serve(&self, listener: TcpListener) -> HubResult<()> {
        let router = self.build_router();
        axum::serve(listener, router)
            .await
            .map_err(|e| HubError::Server(e.to_string()))
    }

    /// Bind `address` and serve until ctrl-c
    pub async fn run(&self, address: SocketAddr) -> HubResult<()> {
        let listener = TcpListener::bind(address).await.map_err(|e| HubError::ServerStartup {
            address: address.to_string(),
            message: e.to_string(),
        })?;

        info!("🌐 Relay listening on ws://{}", address);
        info!("📊 Cache API available at http://{}/api", address);

        tokio::select! {
            result = self.serve(listener) => result,
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal");
                Ok(())
            }
        }
    }
}
