//! Errors from the transcription and clip-scoring service.

use thiserror::Error;

pub type MlResult<T> = Result<T, MlError>;

#[derive(Debug, Error)]
pub enum MlError {
    /// The service could not be reached at all.
    #[error("ML service unavailable: {0}")]
    ServiceUnavailable(String),

    /// The service answered with a non-success status.
    #[error("{endpoint} returned {status}: {body}")]
    RequestFailed {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Invalid response from ML service: {0}")]
    InvalidResponse(String),

    #[error("ML transport error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Malformed ML payload: {0}")]
    Json(#[from] serde_json::Error),
}

impl MlError {
    pub fn request_failed(endpoint: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self::RequestFailed {
            endpoint: endpoint.into(),
            status,
            body: body.into(),
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::ServiceUnavailable(_) => "unavailable",
            Self::RequestFailed { .. } => "request_failed",
            Self::InvalidResponse(_) | Self::Json(_) => "invalid_response",
            Self::Network(_) => "network",
        }
    }
}
