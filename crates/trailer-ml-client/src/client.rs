//! ML service HTTP client.

use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};
use trailer_models::{Clip, Transcript};

use crate::capability::{ClipFinder, Transcriber};
use crate::error::{MlError, MlResult};
use crate::types::{FindClipsRequest, FindClipsResponse, HealthResponse, TranscribeRequest};

/// Configuration for ML client.
#[derive(Debug, Clone)]
pub struct MlClientConfig {
    /// Base URL of ML service
    pub base_url: String,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for MlClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8001".to_string(),
            timeout: Duration::from_secs(1800), // transcription of a full movie is slow
        }
    }
}

impl MlClientConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("ML_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:8001".to_string()),
            timeout: Duration::from_secs(
                std::env::var("ML_SERVICE_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(1800),
            ),
        }
    }
}

/// Client for the Python ML service.
///
/// Requests are sent once; a failure is reported to the caller as-is.
pub struct MlClient {
    http: Client,
    config: MlClientConfig,
}

impl MlClient {
    /// Create a new ML client.
    pub fn new(config: MlClientConfig) -> MlResult<Self> {
        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(MlError::Network)?;

        Ok(Self { http, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> MlResult<Self> {
        Self::new(MlClientConfig::from_env())
    }

    /// Check if ML service is healthy.
    pub async fn health_check(&self) -> MlResult<bool> {
        let url = format!("{}/health", self.base_url());

        match self.http.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                let health: HealthResponse = response.json().await?;
                Ok(health.status == "healthy" || health.status == "ok")
            }
            Ok(response) => {
                warn!("ML service health check failed: {}", response.status());
                Ok(false)
            }
            Err(e) => {
                warn!("ML service health check error: {}", e);
                Ok(false)
            }
        }
    }

    fn base_url(&self) -> &str {
        self.config.base_url.trim_end_matches('/')
    }

    async fn post_json<B, R>(&self, path: &str, body: &B) -> MlResult<R>
    where
        B: Serialize + ?Sized + Sync,
        R: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url(), path);
        debug!("Sending ML request to {}", url);

        let response = self.http.post(&url).json(body).send().await.map_err(|e| {
            if e.is_connect() {
                MlError::ServiceUnavailable(e.to_string())
            } else {
                MlError::Network(e)
            }
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(MlError::request_failed(path, status.as_u16(), body));
        }

        let bytes = response.bytes().await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl Transcriber for MlClient {
    async fn transcribe(&self, media_path: &Path) -> MlResult<Transcript> {
        let request = TranscribeRequest {
            media_path: media_path.to_string_lossy().to_string(),
        };

        let transcript: Option<Transcript> = self.post_json("/transcribe", &request).await?;
        transcript.ok_or_else(|| MlError::InvalidResponse("transcription returned no result".to_string()))
    }
}

#[async_trait]
impl ClipFinder for MlClient {
    async fn find_clips(&self, transcript: &Transcript) -> MlResult<Vec<Clip>> {
        let request = FindClipsRequest {
            transcript: transcript.clone(),
        };

        let response: FindClipsResponse = self.post_json("/clips", &request).await?;
        Ok(response.clips)
    }
}
