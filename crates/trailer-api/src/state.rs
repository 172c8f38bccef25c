//! Application state.

use std::sync::Arc;

use trailer_worker::{JobExecutor, JobRunner, WorkerConfig, WorkerResult};

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub executor: Arc<JobExecutor>,
}

impl AppState {
    pub fn new(config: ApiConfig, executor: Arc<JobExecutor>) -> Self {
        Self { config, executor }
    }

    /// Build state with the production job runner.
    pub async fn from_env(config: ApiConfig, worker_config: WorkerConfig) -> WorkerResult<Self> {
        let runner = JobRunner::from_env(worker_config).await?;
        let executor = JobExecutor::new(Arc::new(runner));
        Ok(Self::new(config, Arc::new(executor)))
    }
}
