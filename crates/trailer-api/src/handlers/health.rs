//! Liveness endpoint.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::state::AppState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    /// Trailer jobs queued or running in this process
    pub jobs_in_flight: usize,
    pub timestamp: String,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        jobs_in_flight: state.executor.in_flight(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
