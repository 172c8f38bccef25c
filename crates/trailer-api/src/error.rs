//! Request rejections, rendered as `{"detail": ...}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid S3 URL format: {0}")]
    InvalidLocator(String),

    /// Body missing, not JSON, or missing required fields.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl ApiError {
    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidLocator(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }
}

#[derive(Serialize)]
struct Detail {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::debug!("Rejecting request: {}", self);
        let status = self.status_code();
        (status, Json(Detail { detail: self.to_string() })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_locator_message() {
        let err = ApiError::InvalidLocator("http://bucket/movie.mp4".to_string());
        assert_eq!(err.to_string(), "Invalid S3 URL format: http://bucket/movie.mp4");
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_bad_request_status() {
        let response = ApiError::bad_request("missing field `source_url`").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
