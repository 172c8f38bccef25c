//! Job executor.

use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};
use trailer_models::JobId;
use trailer_storage::StoreLocator;

use crate::job::{JobStage, TrailerJob};
use crate::job_runner::{panic_message, JobRunner};
use crate::metrics;

/// Bounded pool of background trailer jobs.
///
/// Dispatching never waits: the job's task queues for a permit on its own.
/// Nothing is reported back to the dispatcher.
pub struct JobExecutor {
    runner: Arc<JobRunner>,
    job_semaphore: Arc<Semaphore>,
    in_flight: Arc<AtomicUsize>,
}

impl JobExecutor {
    pub fn new(runner: Arc<JobRunner>) -> Self {
        let permits = runner.config().max_concurrent_jobs.max(1);
        info!("Starting job executor with {} max concurrent jobs", permits);

        Self {
            runner,
            job_semaphore: Arc::new(Semaphore::new(permits)),
            in_flight: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Schedule a job for `source` and return its ID immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn dispatch(&self, source: StoreLocator, max_clips: Option<i64>) -> JobId {
        let job = TrailerJob::new(source, self.runner.config().output_dir.clone())
            .with_max_clips(max_clips);
        self.submit(job)
    }

    /// Schedule a prepared job.
    pub fn submit(&self, job: TrailerJob) -> JobId {
        let job_id = job.id.clone();
        let runner = Arc::clone(&self.runner);
        let semaphore = Arc::clone(&self.job_semaphore);
        let guard = InFlightGuard::enter(Arc::clone(&self.in_flight));

        metrics::record_job_dispatched();
        info!(job_id = %job_id, source = %job.source, "Dispatched trailer job");

        tokio::spawn(async move {
            let _guard = guard;
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    error!(job_id = %job.id, "Job pool closed, dropping job");
                    return;
                }
            };

            // run() contains job panics itself; this only catches a panic in
            // its own reporting.
            let result = AssertUnwindSafe(runner.run(&job)).catch_unwind().await;
            if let Err(panic) = result {
                let reason = panic_message(panic.as_ref());
                error!(job_id = %job.id, stage = JobStage::Panic.as_str(), "Job panicked: {}", reason);
                metrics::record_job_failed(JobStage::Panic.as_str(), 0.0);
            }
        });

        job_id
    }

    /// Jobs dispatched and not yet finished, queued or running.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    /// Wait until every job has finished or `timeout` elapses.
    ///
    /// Returns `true` if the pool drained.
    pub async fn drain(&self, timeout: Duration) -> bool {
        let remaining = self.in_flight();
        if remaining > 0 {
            info!("Waiting for {} in-flight jobs to complete...", remaining);
        }

        let drained = tokio::time::timeout(timeout, async {
            while self.in_flight() > 0 {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        })
        .await
        .is_ok();

        if !drained {
            warn!("{} jobs still running after {:?}", self.in_flight(), timeout);
        }
        drained
    }
}

struct InFlightGuard(Arc<AtomicUsize>);

impl InFlightGuard {
    fn enter(counter: Arc<AtomicUsize>) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}
