//! # REST API for Chat Context
//!
//! The relay call itself happens in the client; these endpoints only assemble
//! what gets sent.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use shared::PrepareChatRequest;
use tracing::info;

use crate::AppState;

/// Create a router for chat APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/context", get(get_sleep_context))
        .route("/prepare", post(prepare_chat))
}

pub async fn get_sleep_context(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /api/chat/context");
    let context = state.chat_context_service.sleep_context(Utc::now());
    (StatusCode::OK, Json(context))
}

/// Relay-ready request with the sleep context prepended
pub async fn prepare_chat(
    State(state): State<AppState>,
    Json(request): Json<PrepareChatRequest>,
) -> impl IntoResponse {
    info!("POST /api/chat/prepare - {} messages", request.messages.len());
    let prepared = state
        .chat_context_service
        .prepare_chat_request(request.messages, request.baby_age, Utc::now());
    (StatusCode::OK, Json(prepared))
}
