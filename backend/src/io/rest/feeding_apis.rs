//! # REST API for Feeding
//!
//! The feeding timer and the resulting logs.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use chrono::{Local, Utc};
use shared::StopFeedingRequest;
use tracing::info;

use crate::io::rest::error_response;
use crate::AppState;

/// Create a router for feeding related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/timer", get(get_timer))
        .route("/timer/start", post(start_timer))
        .route("/timer/stop", post(stop_timer))
        .route("/logs", get(list_logs))
        .route("/today", get(get_feeding_today))
}

pub async fn get_timer(State(state): State<AppState>) -> Response {
    info!("GET /api/feeding/timer");
    match state.feeding_service.timer_status(Utc::now()) {
        Ok(status) => (StatusCode::OK, Json(status)).into_response(),
        Err(e) => error_response("read feeding timer", e),
    }
}

pub async fn start_timer(State(state): State<AppState>) -> Response {
    info!("POST /api/feeding/timer/start");
    match state.feeding_service.start_timer(Utc::now()) {
        Ok(status) => (StatusCode::OK, Json(status)).into_response(),
        Err(e) => error_response("start feeding timer", e),
    }
}

/// Stop the timer and record the feed
pub async fn stop_timer(
    State(state): State<AppState>,
    Json(request): Json<StopFeedingRequest>,
) -> Response {
    info!("POST /api/feeding/timer/stop - type: {}", request.feeding_type);
    match state
        .feeding_service
        .stop_timer(Utc::now(), request.feeding_type, request.notes)
    {
        Ok(log) => (StatusCode::CREATED, Json(log)).into_response(),
        Err(e) => error_response("stop feeding timer", e),
    }
}

pub async fn list_logs(State(state): State<AppState>) -> Response {
    info!("GET /api/feeding/logs");
    (StatusCode::OK, Json(state.feeding_service.list_logs())).into_response()
}

pub async fn get_feeding_today(State(state): State<AppState>) -> Response {
    info!("GET /api/feeding/today");
    (StatusCode::OK, Json(state.feeding_service.feeding_today(&Local::now()))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::rest::test_support::{get, json_body, send, test_state};
    use shared::{FeedingLog, FeedingTimerResponse, FeedingTodayResponse, FeedingType};

    #[tokio::test]
    async fn test_timer_round_trip() {
        let state = test_state();

        let idle: FeedingTimerResponse = json_body(get(&state, "/api/feeding/timer").await).await;
        assert!(!idle.is_running);

        let response = send(&state, "POST", "/api/feeding/timer/start", None::<()>).await;
        assert_eq!(response.status(), StatusCode::OK);
        let running: FeedingTimerResponse = json_body(response).await;
        assert!(running.is_running);
        assert!(!running.reminder_due);

        let response = send(&state, "POST", "/api/feeding/timer/start", None::<()>).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let response = send(
            &state,
            "POST",
            "/api/feeding/timer/stop",
            Some(StopFeedingRequest {
                feeding_type: FeedingType::RightBreast,
                notes: String::new(),
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let log: FeedingLog = json_body(response).await;
        assert_eq!(log.feeding_type, FeedingType::RightBreast);

        let today: FeedingTodayResponse = json_body(get(&state, "/api/feeding/today").await).await;
        assert_eq!(today.feed_count_today, 1);
        assert_eq!(today.suggested_next_side, Some(FeedingType::LeftBreast));
    }

    #[tokio::test]
    async fn test_stop_without_start_conflicts() {
        let state = test_state();
        let response = send(
            &state,
            "POST",
            "/api/feeding/timer/stop",
            Some(StopFeedingRequest {
                feeding_type: FeedingType::Bottle,
                notes: String::new(),
            }),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let logs: Vec<FeedingLog> = json_body(get(&state, "/api/feeding/logs").await).await;
        assert!(logs.is_empty());
    }
}
