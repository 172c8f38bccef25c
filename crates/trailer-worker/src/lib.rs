//! Trailer generation worker.
//!
//! This crate provides:
//! - The trailer pipeline (transcribe, select, trim, concatenate)
//! - Scoped workspaces with guaranteed cleanup
//! - The job runner (fetch, generate, publish)
//! - A bounded background job executor

pub mod config;
pub mod error;
pub mod executor;
pub mod job;
pub mod job_runner;
pub mod logging;
pub mod metrics;
pub mod pipeline;
pub mod selection;
pub mod workspace;

pub use config::WorkerConfig;
pub use error::{JobError, PipelineError, WorkerError, WorkerResult, WorkspaceError};
pub use executor::JobExecutor;
pub use job::{JobOutcome, JobReport, JobStage, TrailerJob};
pub use job_runner::JobRunner;
pub use logging::JobLogger;
pub use pipeline::{TrailerOutput, TrailerPipeline, TrimFailure};
pub use selection::{rank_clips, select_clips};
pub use workspace::Workspace;
