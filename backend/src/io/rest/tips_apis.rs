//! # REST API for Daily Tips

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use shared::{DailyTipResponse, UserProfile};
use tracing::{error, info};

use crate::domain::daily_tip;
use crate::AppState;

/// Create a router for tip APIs
pub fn router() -> Router<AppState> {
    Router::new().route("/daily", get(get_daily_tip))
}

/// Random tip for the profile in the query string
///
/// Without `babyAgeMonths` the tracker's stored baby age is used.
pub async fn get_daily_tip(
    State(state): State<AppState>,
    Query(profile): Query<UserProfile>,
) -> Response {
    info!("GET /api/tips/daily - profile: {:?}", profile);

    let age_months = match profile.baby_age_months {
        Some(age) => age,
        None => match state.sleep_tracker.lock() {
            Ok(tracker) => tracker.status().baby_age_months,
            Err(_) => {
                error!("Sleep tracker lock poisoned");
                return (StatusCode::INTERNAL_SERVER_ERROR, "Sleep tracker unavailable").into_response();
            }
        },
    };

    let (audience, tip) = daily_tip(Some(age_months as i32), profile.is_expecting, &mut rand::thread_rng());
    let response = DailyTipResponse {
        audience: audience.label().to_string(),
        tip: tip.to_string(),
    };
    (StatusCode::OK, Json(response)).into_response()
}
