//! Runs a single trailer job: fetch, generate, publish, clean up.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use futures::FutureExt;
use tracing::{warn, Instrument};
use trailer_media::{EncodingConfig, FfmpegEditor};
use trailer_ml_client::MlClient;
use trailer_storage::{ObjectStore, S3Store, StoreLocator};

use crate::config::WorkerConfig;
use crate::error::{JobError, JobResult, WorkerResult};
use crate::job::{JobOutcome, JobReport, JobStage, TrailerJob};
use crate::logging::JobLogger;
use crate::metrics;
use crate::pipeline::TrailerPipeline;
use crate::workspace::Workspace;

const OPERATION: &str = "trailer_generation";

pub struct JobRunner {
    store: Arc<dyn ObjectStore>,
    pipeline: TrailerPipeline,
    config: WorkerConfig,
}

impl JobRunner {
    pub fn new(store: Arc<dyn ObjectStore>, pipeline: TrailerPipeline, config: WorkerConfig) -> Self {
        Self {
            store,
            pipeline,
            config,
        }
    }

    /// Wire the production collaborators: S3 storage, the ML service and FFmpeg.
    pub async fn from_env(config: WorkerConfig) -> WorkerResult<Self> {
        let store = Arc::new(S3Store::from_env().await?);
        let ml = Arc::new(MlClient::from_env()?);
        if !ml.health_check().await.unwrap_or(false) {
            warn!("ML service is not healthy yet; jobs will fail until it is");
        }
        let editor = Arc::new(FfmpegEditor::new(EncodingConfig::from_env()));

        let pipeline = TrailerPipeline::new(ml.clone(), ml, editor, &config);
        Ok(Self::new(store, pipeline, config))
    }

    pub fn config(&self) -> &WorkerConfig {
        &self.config
    }

    /// Run a job to completion. Failures are logged and reported, never
    /// returned, and a panic anywhere in the job becomes a `panic` outcome.
    ///
    /// The job workspace is removed before this returns, whatever happened.
    pub async fn run(&self, job: &TrailerJob) -> JobReport {
        let logger = JobLogger::new(&job.id, OPERATION);
        let span = logger.span();

        async {
            let started = Instant::now();
            logger.log_start(&format!("source {}", job.source));

            let stage = StageTracker::default();
            let outcome = match AssertUnwindSafe(self.attempt(job, &logger, &stage))
                .catch_unwind()
                .await
            {
                Ok(outcome) => outcome,
                Err(panic) => JobOutcome::Failed {
                    stage: JobStage::Panic,
                    reason: format!(
                        "panicked during {}: {}",
                        stage.current(),
                        panic_message(panic.as_ref())
                    ),
                },
            };

            let elapsed = started.elapsed();
            match &outcome {
                JobOutcome::Published { locator } => {
                    logger.log_completion(&format!("published {} in {:.1}s", locator, elapsed.as_secs_f64()));
                    metrics::record_job_completed(elapsed.as_secs_f64());
                }
                JobOutcome::Failed { stage, reason } => {
                    logger.log_failure(stage.as_str(), reason);
                    metrics::record_job_failed(stage.as_str(), elapsed.as_secs_f64());
                }
            }

            JobReport {
                job_id: job.id.clone(),
                outcome,
                elapsed,
            }
        }
        .instrument(span)
        .await
    }

    /// Workspace, execute, release. An unwind drops the workspace handle,
    /// which removes the directory.
    async fn attempt(&self, job: &TrailerJob, logger: &JobLogger, stage: &StageTracker) -> JobOutcome {
        let workspace = match Workspace::acquire_named(&self.config.job_work_dir, job.id.as_str()).await {
            Ok(workspace) => workspace,
            Err(e) => {
                let err = JobError::from(e);
                return JobOutcome::Failed {
                    stage: err.stage(),
                    reason: err.to_string(),
                };
            }
        };

        let result = self.execute(job, &workspace, logger, stage).await;
        workspace.release().await;
        match result {
            Ok(locator) => JobOutcome::Published { locator },
            Err(e) => JobOutcome::Failed {
                stage: e.stage(),
                reason: e.to_string(),
            },
        }
    }

    async fn execute(
        &self,
        job: &TrailerJob,
        workspace: &Workspace,
        logger: &JobLogger,
        stage: &StageTracker,
    ) -> JobResult<StoreLocator> {
        stage.enter(JobStage::Fetch);
        logger.log_progress(&format!("fetching {}", job.source));
        let source = self
            .store
            .fetch(&job.source, workspace.path())
            .await
            .map_err(JobError::Fetch)?;

        tokio::fs::create_dir_all(&job.output_dir).await?;
        let file_name = job.output_file_name(&self.config.output_extension);
        let output_path = job.output_dir.join(&file_name);
        let max_clips = job.max_clips.unwrap_or(self.config.default_max_clips);

        stage.enter(JobStage::Pipeline);
        logger.log_progress("generating trailer");
        let trailer = self.pipeline.generate(&source, &output_path, max_clips).await?;
        if !trailer.skipped.is_empty() {
            logger.log_warning(&format!(
                "{} of {} selected clips could not be trimmed",
                trailer.skipped.len(),
                trailer.skipped.len() + trailer.clips_used
            ));
        }

        let produced = trailer.file.path();
        if !produced.is_file() {
            return Err(JobError::OutputMissing(produced.to_path_buf()));
        }

        let destination = self
            .config
            .output_locator(&job.id, &file_name)
            .map_err(|source| JobError::Publish {
                source,
                retained: produced.to_path_buf(),
            })?;

        stage.enter(JobStage::Publish);
        logger.log_progress(&format!("publishing to {}", destination));
        let published = self
            .store
            .publish(produced, &destination)
            .await
            .map_err(|source| JobError::Publish {
                source,
                retained: produced.to_path_buf(),
            })?;

        remove_local_output(produced, logger).await;
        Ok(published)
    }
}

async fn remove_local_output(path: &Path, logger: &JobLogger) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        logger.log_warning(&format!("could not remove local output {}: {}", path.display(), e));
    }
}

/// Last stage a job entered, read back when the job panics.
struct StageTracker(Mutex<JobStage>);

impl Default for StageTracker {
    fn default() -> Self {
        Self(Mutex::new(JobStage::Workspace))
    }
}

impl StageTracker {
    fn enter(&self, stage: JobStage) {
        if let Ok(mut current) = self.0.lock() {
            *current = stage;
        }
    }

    fn current(&self) -> JobStage {
        self.0.lock().map(|current| *current).unwrap_or(JobStage::Panic)
    }
}

pub(crate) fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_panic_message() {
        let boxed: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(boxed.as_ref()), "boom");

        let boxed: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(boxed.as_ref()), "bang");

        let boxed: Box<dyn Any + Send> = Box::new(42);
        assert_eq!(panic_message(boxed.as_ref()), "unknown panic");
    }

    #[test]
    fn test_stage_tracker_follows_latest_stage() {
        let tracker = StageTracker::default();
        assert_eq!(tracker.current(), JobStage::Workspace);

        tracker.enter(JobStage::Publish);
        assert_eq!(tracker.current(), JobStage::Publish);
    }
}
