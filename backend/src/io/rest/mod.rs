//! # REST API Interface Layer
//!
//! HTTP endpoints for the companion app. Handlers log the request, call one
//! domain operation and translate the outcome:
//!
//! - typed domain errors (`SleepTransitionError`, `FeedingTimerError`,
//!   `MoodError`) become 4xx responses with the error message as body
//! - anything else is logged and returned as a 500
//!
//! No business rules live here.

pub mod chat_apis;
pub mod feeding_apis;
pub mod mood_apis;
pub mod sleep_apis;
pub mod sleep_training_apis;
pub mod tips_apis;
pub mod wake_window_apis;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Router,
};
use tracing::error;

use crate::domain::models::feeding::FeedingTimerError;
use crate::domain::models::mood::MoodError;
use crate::domain::models::sleep::SleepTransitionError;
use crate::AppState;

/// All API routes, nested under `/api`
pub fn router() -> Router<AppState> {
    let api_routes = Router::new()
        .nest("/sleep", sleep_apis::router())
        .nest("/wake-windows", wake_window_apis::router())
        .nest("/moods", mood_apis::router())
        .nest("/feeding", feeding_apis::router())
        .nest("/tips", tips_apis::router())
        .nest("/chat", chat_apis::router())
        .nest("/sleep-training", sleep_training_apis::router());

    Router::new().nest("/api", api_routes)
}

/// Status code for a typed domain error, if the error is one
pub fn domain_error_status(e: &anyhow::Error) -> Option<StatusCode> {
    if let Some(err) = e.downcast_ref::<SleepTransitionError>() {
        return Some(match err {
            SleepTransitionError::WakeBeforeSleepStart => StatusCode::BAD_REQUEST,
            _ => StatusCode::CONFLICT,
        });
    }
    if e.downcast_ref::<FeedingTimerError>().is_some() {
        return Some(StatusCode::CONFLICT);
    }
    if let Some(err) = e.downcast_ref::<MoodError>() {
        return Some(match err {
            MoodError::NotFound(_) => StatusCode::NOT_FOUND,
            MoodError::NotesTooLong => StatusCode::BAD_REQUEST,
        });
    }
    None
}

/// Translate a failed operation into an HTTP response
pub fn error_response(action: &str, e: anyhow::Error) -> Response {
    match domain_error_status(&e) {
        Some(status) => {
            error!("Failed to {}: {}", action, e);
            (status, e.to_string()).into_response()
        }
        None => {
            error!("Failed to {}: {:#}", action, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Error trying to {}", action),
            )
                .into_response()
        }
    }
}
