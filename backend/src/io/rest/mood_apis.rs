//! # REST API for Mood Check-ins

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get},
    Router,
};
use chrono::{Local, Utc};
use shared::CreateMoodRequest;
use tracing::info;
use uuid::Uuid;

use crate::io::rest::error_response;
use crate::AppState;

/// Create a router for mood related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_moods).post(create_mood))
        .route("/today", get(get_moods_today))
        .route("/latest", get(get_latest_mood))
        .route("/:id", delete(delete_mood))
}

pub async fn list_moods(State(state): State<AppState>) -> Response {
    info!("GET /api/moods");
    (StatusCode::OK, Json(state.mood_service.list_moods())).into_response()
}

pub async fn create_mood(
    State(state): State<AppState>,
    Json(request): Json<CreateMoodRequest>,
) -> Response {
    info!("POST /api/moods - mood: {}", request.mood);

    match state.mood_service.add_mood(request.mood, request.notes, Utc::now()) {
        Ok(entry) => (StatusCode::CREATED, Json(entry)).into_response(),
        Err(e) => error_response("save mood", e),
    }
}

pub async fn get_moods_today(State(state): State<AppState>) -> Response {
    info!("GET /api/moods/today");
    (StatusCode::OK, Json(state.mood_service.moods_today(&Local::now()))).into_response()
}

pub async fn get_latest_mood(State(state): State<AppState>) -> Response {
    info!("GET /api/moods/latest");
    match state.mood_service.latest_mood() {
        Some(entry) => (StatusCode::OK, Json(entry)).into_response(),
        None => (StatusCode::NOT_FOUND, "No mood entries yet").into_response(),
    }
}

pub async fn delete_mood(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    info!("DELETE /api/moods/{}", id);
    match state.mood_service.delete_mood(id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => error_response("delete mood", e),
    }
}
