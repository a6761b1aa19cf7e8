//! # REST API for Sleep Training Data
//!
//! Stores the program and assessment written by the sleep-training flow so
//! the chat context can read them back.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use shared::{SleepAssessment, SleepTrainingProgram};
use tracing::info;

use crate::io::rest::error_response;
use crate::AppState;

/// Create a router for sleep training APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/program", get(get_program).put(put_program))
        .route("/assessment", get(get_assessment).put(put_assessment))
}

pub async fn get_program(State(state): State<AppState>) -> Response {
    info!("GET /api/sleep-training/program");
    match state.sleep_training_repository.load_program() {
        Ok(Some(program)) => (StatusCode::OK, Json(program)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "No sleep training program").into_response(),
        Err(e) => error_response("read sleep training program", e),
    }
}

pub async fn put_program(
    State(state): State<AppState>,
    Json(program): Json<SleepTrainingProgram>,
) -> Response {
    info!("PUT /api/sleep-training/program - method: {}", program.method_id);
    match state.sleep_training_repository.save_program(&program) {
        Ok(()) => (StatusCode::OK, Json(program)).into_response(),
        Err(e) => error_response("save sleep training program", e),
    }
}

pub async fn get_assessment(State(state): State<AppState>) -> Response {
    info!("GET /api/sleep-training/assessment");
    match state.sleep_training_repository.load_assessment() {
        Ok(Some(assessment)) => (StatusCode::OK, Json(assessment)).into_response(),
        Ok(None) => (StatusCode::NOT_FOUND, "No sleep assessment").into_response(),
        Err(e) => error_response("read sleep assessment", e),
    }
}

pub async fn put_assessment(
    State(state): State<AppState>,
    Json(assessment): Json<SleepAssessment>,
) -> Response {
    info!("PUT /api/sleep-training/assessment");
    match state.sleep_training_repository.save_assessment(&assessment) {
        Ok(()) => (StatusCode::OK, Json(assessment)).into_response(),
        Err(e) => error_response("save sleep assessment", e),
    }
}
