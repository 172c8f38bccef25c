//! ML service request/response types.

use serde::{Deserialize, Serialize};
use trailer_models::{Clip, Transcript};

/// Request body for `POST /transcribe`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscribeRequest {
    /// Local path of the media file, shared with the ML service
    pub media_path: String,
}

/// Request body for `POST /clips`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindClipsRequest {
    pub transcript: Transcript,
}

/// Response from `POST /clips`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindClipsResponse {
    #[serde(default)]
    pub clips: Vec<Clip>,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: Option<String>,
}
