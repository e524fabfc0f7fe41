//! Chat route — one user message in, one rendered answer out.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span, Instrument};
use uuid::Uuid;

use crate::state::AppState;
use schemesage_runtime::Outcome;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/get_response", post(get_response))
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub user_input: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub response: String,
    pub outcome: Outcome,
}

/// POST /get_response — always 200; failures are reported in `outcome`.
///
/// A body that is not a JSON object with a string `user_input` is treated
/// as empty input.
async fn get_response(State(state): State<Arc<AppState>>, body: Bytes) -> Json<ChatResponse> {
    let request: ChatRequest = serde_json::from_slice(&body).unwrap_or_else(|e| {
        debug!("Unreadable chat body: {}", e);
        ChatRequest::default()
    });
    let user_input = request.user_input.unwrap_or_default();

    let span = info_span!("get_response", request_id = %Uuid::new_v4());
    let reply = state
        .engine
        .orchestrator
        .answer(&user_input)
        .instrument(span.clone())
        .await;
    span.in_scope(|| debug!("Outcome: {}", reply.outcome));

    Json(ChatResponse {
        response: reply.text,
        outcome: reply.outcome,
    })
}
