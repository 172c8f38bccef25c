//! Structured job logging.

use tracing::{error, info, warn, Span};
use trailer_models::JobId;

/// Job lifecycle events.
///
/// Every event is a child of the job span, so `job_id` and `operation` are
/// recorded once on the span instead of on each event.
#[derive(Debug, Clone)]
pub struct JobLogger {
    job_id: String,
    operation: &'static str,
    span: Span,
}

impl JobLogger {
    pub fn new(job_id: &JobId, operation: &'static str) -> Self {
        let span = tracing::info_span!("job", job_id = %job_id, operation);
        Self {
            job_id: job_id.to_string(),
            operation,
            span,
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(parent: &self.span, "Job started: {}", message);
    }

    pub fn log_progress(&self, message: &str) {
        info!(parent: &self.span, "Job progress: {}", message);
    }

    pub fn log_warning(&self, message: &str) {
        warn!(parent: &self.span, "Job warning: {}", message);
    }

    pub fn log_failure(&self, stage: &str, message: &str) {
        error!(parent: &self.span, stage, "Job failed: {}", message);
    }

    pub fn log_completion(&self, message: &str) {
        info!(parent: &self.span, "Job completed: {}", message);
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn operation(&self) -> &str {
        self.operation
    }

    /// The job span. Instrument the job future with it so pipeline and
    /// storage events land under the same job.
    pub fn span(&self) -> Span {
        self.span.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_logger_creation() {
        let job_id = JobId::from_string("job-123");
        let logger = JobLogger::new(&job_id, "trailer_generation");

        assert_eq!(logger.job_id(), "job-123");
        assert_eq!(logger.operation(), "trailer_generation");
    }
}
