//! Worker error types.

use std::path::PathBuf;

use thiserror::Error;
use trailer_ml_client::MlError;
use trailer_storage::StorageError;

use crate::job::JobStage;

pub type WorkerResult<T> = Result<T, WorkerError>;
pub type PipelineResult<T> = Result<T, PipelineError>;
pub type JobResult<T> = Result<T, JobError>;

/// Failures while wiring up the worker.
#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("ML client error: {0}")]
    Ml(#[from] MlError),
}

impl WorkerError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}

/// Workspace directory could not be created.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("Invalid workspace name: {0:?}")]
    InvalidName(String),

    #[error("Failed to create workspace {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Fatal pipeline failures. Each one stops the run; cleanup still happens.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Transcription failed: {0}")]
    Transcription(String),

    #[error("Clip discovery failed: {0}")]
    ClipDiscovery(String),

    #[error("No clips found")]
    NoClipsFound,

    #[error("No clips selected")]
    NoClipsSelected,

    #[error("All {attempted} clip trims failed")]
    AllTrimsFailed { attempted: usize },

    #[error("Concatenation failed: {0}")]
    Concatenation(String),

    #[error(transparent)]
    Workspace(#[from] WorkspaceError),
}

impl PipelineError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Short machine-readable kind, used as a log field.
    pub fn kind(&self) -> &'static str {
        match self {
            PipelineError::Validation(_) => "validation",
            PipelineError::Transcription(_) => "transcription",
            PipelineError::ClipDiscovery(_) => "clip_discovery",
            PipelineError::NoClipsFound => "no_clips_found",
            PipelineError::NoClipsSelected => "no_clips_selected",
            PipelineError::AllTrimsFailed { .. } => "all_trims_failed",
            PipelineError::Concatenation(_) => "concatenation",
            PipelineError::Workspace(_) => "workspace",
        }
    }
}

/// Job failures. None of them escape the job's own task.
#[derive(Debug, Error)]
pub enum JobError {
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    #[error("Fetch failed ({reason}): {0}", reason = .0.reason())]
    Fetch(StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error("Pipeline reported success but {0} does not exist")]
    OutputMissing(PathBuf),

    #[error("Publish failed: {source}; local copy kept at {path}", path = .retained.display())]
    Publish {
        #[source]
        source: StorageError,
        retained: PathBuf,
    },
}

impl JobError {
    /// Stage that produced the failure.
    pub fn stage(&self) -> JobStage {
        match self {
            JobError::Workspace(_) => JobStage::Workspace,
            JobError::Fetch(_) => JobStage::Fetch,
            JobError::Io(_) | JobError::Pipeline(_) | JobError::OutputMissing(_) => {
                JobStage::Pipeline
            }
            JobError::Publish { .. } => JobStage::Publish,
        }
    }
}
