//! Worker configuration.

use std::path::PathBuf;
use std::time::Duration;

use trailer_models::JobId;
use trailer_storage::{StorageResult, StoreLocator};

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Base directory for job workspaces (fetched sources)
    pub job_work_dir: PathBuf,
    /// Base directory for pipeline workspaces (trimmed clips)
    pub pipeline_work_dir: PathBuf,
    /// Directory where finished trailers are written before upload
    pub output_dir: PathBuf,
    /// Bucket receiving published trailers
    pub output_bucket: String,
    /// Key prefix for published trailers
    pub output_prefix: String,
    /// Clip cap applied when a job does not override it. Zero or negative means no cap.
    pub default_max_clips: i64,
    /// Container extension for clips and trailers
    pub output_extension: String,
    /// Maximum concurrent jobs
    pub max_concurrent_jobs: usize,
    /// How long shutdown waits for in-flight jobs
    pub shutdown_timeout: Duration,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            job_work_dir: PathBuf::from("/tmp/trailer/jobs"),
            pipeline_work_dir: PathBuf::from("/tmp/trailer/pipeline"),
            output_dir: PathBuf::from("/tmp/trailer/output"),
            output_bucket: "trailer-outputs".to_string(),
            output_prefix: "trailers".to_string(),
            default_max_clips: 5,
            output_extension: "mp4".to_string(),
            max_concurrent_jobs: 2,
            shutdown_timeout: Duration::from_secs(60),
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            job_work_dir: std::env::var("TRAILER_JOB_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.job_work_dir),
            pipeline_work_dir: std::env::var("TRAILER_PIPELINE_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.pipeline_work_dir),
            output_dir: std::env::var("TRAILER_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            output_bucket: std::env::var("TRAILER_OUTPUT_BUCKET").unwrap_or(defaults.output_bucket),
            output_prefix: std::env::var("TRAILER_OUTPUT_PREFIX").unwrap_or(defaults.output_prefix),
            default_max_clips: std::env::var("TRAILER_MAX_CLIPS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.default_max_clips),
            output_extension: std::env::var("TRAILER_OUTPUT_EXT").unwrap_or(defaults.output_extension),
            max_concurrent_jobs: std::env::var("WORKER_MAX_JOBS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.max_concurrent_jobs),
            shutdown_timeout: Duration::from_secs(
                std::env::var("WORKER_SHUTDOWN_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(60),
            ),
        }
    }

    /// Where a job's trailer is published: `{prefix}/{job_id}/{file_name}`.
    pub fn output_locator(&self, job_id: &JobId, file_name: &str) -> StorageResult<StoreLocator> {
        let prefix = self.output_prefix.trim_matches('/');
        let key = if prefix.is_empty() {
            format!("{}/{}", job_id, file_name)
        } else {
            format!("{}/{}/{}", prefix, job_id, file_name)
        };
        StoreLocator::new(self.output_bucket.clone(), key)
    }
}
