//! Health and stats routes.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use schemesage_infer::EmbedderBackend;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(get_health))
        .route("/stats", get(get_stats))
}

/// GET /api/health — liveness.
async fn get_health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// GET /api/stats — catalog and embedder summary.
async fn get_stats(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let engine = &state.engine;
    let corpus = engine.corpus();
    let index = engine.index();
    let uptime = (Utc::now() - state.started_at).num_seconds().max(0);

    Json(serde_json::json!({
        "schemes": corpus.len(),
        "catalogFingerprint": corpus.fingerprint(),
        "embeddingDimension": index.dimension(),
        "embedder": index.embedder().name(),
        "cacheEntries": engine.embedder.cache().len(),
        "profile": engine.profile.to_string(),
        "generatorModel": engine.generator_model,
        "retrievalTimeoutMs": engine.orchestrator.timeout().as_millis() as u64,
        "retrievalLimit": engine.orchestrator.retrieval_limit(),
        "retrievalsInFlight": engine.orchestrator.retrievals_in_flight(),
        "startedAt": state.started_at.to_rfc3339(),
        "uptimeSeconds": uptime,
    }))
}
