//! Trailer scheduling handler.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::{info, warn};
use trailer_models::{GenerateTrailerRequest, GenerateTrailerResponse};
use trailer_storage::StoreLocator;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Schedule trailer generation and acknowledge immediately.
///
/// The job runs in the background; its outcome is only logged.
pub async fn generate_trailer(
    State(state): State<AppState>,
    payload: Result<Json<GenerateTrailerRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<GenerateTrailerResponse>)> {
    let Json(request) = payload.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let source = StoreLocator::parse(&request.source_url).map_err(|e| {
        warn!(source_url = %request.source_url, "Rejected source: {}", e);
        ApiError::InvalidLocator(request.source_url.clone())
    })?;

    let job_id = state.executor.dispatch(source, request.max_clips);
    info!(job_id = %job_id, source_url = %request.source_url, "Trailer generation scheduled");

    Ok((
        StatusCode::ACCEPTED,
        Json(GenerateTrailerResponse::scheduled(job_id, request.source_url)),
    ))
}
