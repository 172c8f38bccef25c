//! Trailer job definitions.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use trailer_models::JobId;
use trailer_storage::StoreLocator;

/// One request to turn a stored movie into a published trailer.
#[derive(Debug, Clone)]
pub struct TrailerJob {
    pub id: JobId,
    pub source: StoreLocator,
    /// Directory the trailer is written to before upload
    pub output_dir: PathBuf,
    /// Overrides the configured clip cap
    pub max_clips: Option<i64>,
}

impl TrailerJob {
    /// Create a job with a fresh ID.
    pub fn new(source: StoreLocator, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            id: JobId::new(),
            source,
            output_dir: output_dir.into(),
            max_clips: None,
        }
    }

    pub fn with_id(mut self, id: JobId) -> Self {
        self.id = id;
        self
    }

    pub fn with_max_clips(mut self, max_clips: Option<i64>) -> Self {
        self.max_clips = max_clips;
        self
    }

    /// `{job_id}_trailer.{ext}`
    pub fn output_file_name(&self, extension: &str) -> String {
        format!("{}_trailer.{}", self.id, extension)
    }
}

/// Where a job stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStage {
    Workspace,
    Fetch,
    Pipeline,
    Publish,
    Panic,
}

impl JobStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStage::Workspace => "workspace",
            JobStage::Fetch => "fetch",
            JobStage::Pipeline => "pipeline",
            JobStage::Publish => "publish",
            JobStage::Panic => "panic",
        }
    }
}

impl fmt::Display for JobStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    Published { locator: StoreLocator },
    Failed { stage: JobStage, reason: String },
}

impl JobOutcome {
    pub fn is_published(&self) -> bool {
        matches!(self, JobOutcome::Published { .. })
    }

    pub fn failed_stage(&self) -> Option<JobStage> {
        match self {
            JobOutcome::Failed { stage, .. } => Some(*stage),
            JobOutcome::Published { .. } => None,
        }
    }
}

/// What happened to a job. Only logged; nobody polls for it.
#[derive(Debug, Clone)]
pub struct JobReport {
    pub job_id: JobId,
    pub outcome: JobOutcome,
    pub elapsed: Duration,
}
