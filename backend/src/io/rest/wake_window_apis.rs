//! # REST API for Wake Windows
//!
//! Read-only lookup of the age-bucketed wake-window table.

use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use shared::WakeWindowResponse;
use tracing::info;

use crate::domain::wake_window_for;
use crate::AppState;

/// Create a router for wake window APIs
pub fn router() -> Router<AppState> {
    Router::new().route("/:age", get(get_wake_window))
}

/// Wake window for an age in months; any integer age is accepted
pub async fn get_wake_window(Path(age_months): Path<i32>) -> impl IntoResponse {
    info!("GET /api/wake-windows/{}", age_months);

    let window = wake_window_for(age_months);
    let response = WakeWindowResponse {
        age_months,
        nap_count_label: window.nap_count_label(),
        window,
    };
    (StatusCode::OK, Json(response))
}
