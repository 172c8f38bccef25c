//! HTTP request/response schemas for job scheduling.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::JobId;

/// Request to schedule trailer generation for a stored source video.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GenerateTrailerRequest {
    /// Object store URL of the source, e.g. `s3://bucket/movies/movie.mp4`.
    #[serde(alias = "s3_movie_url")]
    pub source_url: String,

    /// Override for the number of clips in the trailer. Zero or negative
    /// selects every discovered clip.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_clips: Option<i64>,
}

/// Acknowledgement returned before any work begins.
///
/// `processing_id` and `s3_movie_url` repeat `job_id` and `source_url` under
/// the field names older clients read.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct GenerateTrailerResponse {
    pub message: String,
    pub job_id: JobId,
    pub source_url: String,
    pub processing_id: JobId,
    pub s3_movie_url: String,
}

impl GenerateTrailerResponse {
    pub fn scheduled(job_id: JobId, source_url: impl Into<String>) -> Self {
        let source_url = source_url.into();
        Self {
            message: "Trailer generation task started in background.".to_string(),
            processing_id: job_id.clone(),
            job_id,
            s3_movie_url: source_url.clone(),
            source_url,
        }
    }
}
