//! REST API handlers
//!
//! HTTP access to the response cache and the relay's health.

use axum::extract::State;
use axum::response::Json;
use cache::{CacheStats, ModelProfile, ResponseOutcome};
use serde_json::{Value, json};
use tracing::info;

use crate::error::HubResult;
use crate::state::HubState;
use crate::types::{AiRequest, HealthReport, RoutedAiRequest};

/// `POST /api/ai`
pub async fn ai_response(
    State(state): State<HubState>,
    Json(request): Json<AiRequest>,
) -> HubResult<Json<ResponseOutcome>> {
    let outcome = state.responses.respond(&request.agent, &request.prompt).await?;
    Ok(Json(outcome))
}

/// `POST /api/websim/ai`
pub async fn routed_ai_response(
    State(state): State<HubState>,
    Json(request): Json<RoutedAiRequest>,
) -> HubResult<Json<ResponseOutcome>> {
    let outcome = state
        .responses
        .respond_routed(&request.agent, &request.prompt, request.priority)
        .await?;
    Ok(Json(outcome))
}

/// `GET /api/cache/stats`
pub async fn cache_stats(State(state): State<HubState>) -> Json<CacheStats> {
    Json(state.responses.engine().stats())
}

/// `DELETE /api/cache`
///
/// Drops TTL entries only; prewarmed responses stay.
pub async fn clear_cache(State(state): State<HubState>) -> Json<Value> {
    let engine = state.responses.engine();
    let removed = engine.len();
    engine.clear();
    info!(removed, "🧹 Response cache cleared");

    Json(json!({ "status": "cleared", "removed": removed }))
}

/// `GET /api/models`
pub async fn list_models(State(state): State<HubState>) -> Json<Vec<ModelProfile>> {
    Json(state.responses.router().models().to_vec())
}

/// `GET /health`
pub async fn health_check(State(state): State<HubState>) -> Json<HealthReport> {
    let peers = state.registry.peer_count().await;
    let apps = state
        .registry
        .registered_apps()
        .await
        .into_iter()
        .map(|app| app.to_string())
        .collect();

    Json(HealthReport {
        status: "ok".to_string(),
        peers,
        apps,
        uptime_seconds: state.uptime_seconds(),
    })
}
