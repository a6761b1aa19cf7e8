//! # REST API for Sleep Tracking
//!
//! State transitions, the live wake-window prediction and today's summary.
//! Every mutation republishes the prediction snapshot.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{delete, get, post, put},
    Router,
};
use chrono::{Local, Utc};
use shared::{SetBabyAgeRequest, WokeUpResponse};
use std::sync::MutexGuard;
use tracing::{error, info};

use crate::domain::SleepTracker;
use crate::io::rest::error_response;
use crate::storage::SleepStatusRepository;
use crate::AppState;

/// Create a router for sleep related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/status", get(get_status))
        .route("/prediction", get(get_prediction))
        .route("/summary", get(get_summary))
        .route("/fell-asleep", post(fell_asleep))
        .route("/woke-up", post(woke_up))
        .route("/manual-wake", post(manual_wake))
        .route("/baby-age", put(set_baby_age))
        .route("/sessions/:id", delete(delete_session))
}

fn lock_tracker(state: &AppState) -> Result<MutexGuard<'_, SleepTracker<SleepStatusRepository>>, Response> {
    state.sleep_tracker.lock().map_err(|_| {
        error!("Sleep tracker lock poisoned");
        (StatusCode::INTERNAL_SERVER_ERROR, "Sleep tracker unavailable").into_response()
    })
}

fn republish(state: &AppState, tracker: &SleepTracker<SleepStatusRepository>) {
    state.prediction_feed.publish(tracker.snapshot(Utc::now()));
}

pub async fn get_status(State(state): State<AppState>) -> Response {
    info!("GET /api/sleep/status");
    match lock_tracker(&state) {
        Ok(tracker) => (StatusCode::OK, Json(tracker.status_dto())).into_response(),
        Err(response) => response,
    }
}

/// Fresh prediction snapshot for right now
pub async fn get_prediction(State(state): State<AppState>) -> Response {
    info!("GET /api/sleep/prediction");
    match lock_tracker(&state) {
        Ok(tracker) => {
            let snapshot = tracker.snapshot(Utc::now());
            state.prediction_feed.publish(snapshot.clone());
            (StatusCode::OK, Json(snapshot)).into_response()
        }
        Err(response) => response,
    }
}

pub async fn get_summary(State(state): State<AppState>) -> Response {
    info!("GET /api/sleep/summary");
    match lock_tracker(&state) {
        Ok(tracker) => (StatusCode::OK, Json(tracker.summary(&Local::now()))).into_response(),
        Err(response) => response,
    }
}

pub async fn fell_asleep(State(state): State<AppState>) -> Response {
    info!("POST /api/sleep/fell-asleep");
    let mut tracker = match lock_tracker(&state) {
        Ok(tracker) => tracker,
        Err(response) => return response,
    };

    match tracker.fell_asleep(Utc::now()) {
        Ok(()) => {
            republish(&state, &tracker);
            (StatusCode::OK, Json(tracker.status_dto())).into_response()
        }
        Err(e) => error_response("record sleep start", e.into()),
    }
}

pub async fn woke_up(State(state): State<AppState>) -> Response {
    info!("POST /api/sleep/woke-up");
    let mut tracker = match lock_tracker(&state) {
        Ok(tracker) => tracker,
        Err(response) => return response,
    };

    match tracker.woke_up(Utc::now()) {
        Ok(session) => {
            republish(&state, &tracker);
            let response = WokeUpResponse {
                session,
                status: tracker.status_dto(),
            };
            (StatusCode::CREATED, Json(response)).into_response()
        }
        Err(e) => error_response("record wake up", e.into()),
    }
}

pub async fn manual_wake(State(state): State<AppState>) -> Response {
    info!("POST /api/sleep/manual-wake");
    let mut tracker = match lock_tracker(&state) {
        Ok(tracker) => tracker,
        Err(response) => return response,
    };

    match tracker.manual_wake_update(Utc::now()) {
        Ok(()) => {
            republish(&state, &tracker);
            (StatusCode::OK, Json(tracker.status_dto())).into_response()
        }
        Err(e) => error_response("update wake time", e.into()),
    }
}

pub async fn set_baby_age(
    State(state): State<AppState>,
    Json(request): Json<SetBabyAgeRequest>,
) -> Response {
    info!("PUT /api/sleep/baby-age - request: {:?}", request);
    let mut tracker = match lock_tracker(&state) {
        Ok(tracker) => tracker,
        Err(response) => return response,
    };

    tracker.set_baby_age(request.baby_age_months);
    republish(&state, &tracker);
    (StatusCode::OK, Json(tracker.status_dto())).into_response()
}

pub async fn delete_session(
    State(state): State<AppState>,
    Path(session_id): Path<String>,
) -> Response {
    info!("DELETE /api/sleep/sessions/{}", session_id);
    let mut tracker = match lock_tracker(&state) {
        Ok(tracker) => tracker,
        Err(response) => return response,
    };

    if tracker.delete_session(&session_id) {
        StatusCode::NO_CONTENT.into_response()
    } else {
        (StatusCode::NOT_FOUND, "Sleep session not found").into_response()
    }
}
