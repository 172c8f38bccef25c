//! Job and pipeline metrics.
//!
//! Recorded through the `metrics` facade; without an installed recorder
//! every call is a no-op.

use metrics::{counter, histogram};

/// Metric names as constants for consistency.
pub mod names {
    pub const JOBS_DISPATCHED_TOTAL: &str = "trailer_jobs_dispatched_total";
    pub const JOBS_COMPLETED_TOTAL: &str = "trailer_jobs_completed_total";
    pub const JOBS_FAILED_TOTAL: &str = "trailer_jobs_failed_total";
    pub const JOB_DURATION_SECONDS: &str = "trailer_job_duration_seconds";

    pub const CLIPS_TRIMMED_TOTAL: &str = "trailer_clips_trimmed_total";
    pub const TRIM_FAILURES_TOTAL: &str = "trailer_trim_failures_total";
}

pub fn record_job_dispatched() {
    counter!(names::JOBS_DISPATCHED_TOTAL).increment(1);
}

pub fn record_job_completed(duration_secs: f64) {
    counter!(names::JOBS_COMPLETED_TOTAL).increment(1);
    histogram!(names::JOB_DURATION_SECONDS, "outcome" => "published").record(duration_secs);
}

pub fn record_job_failed(stage: &'static str, duration_secs: f64) {
    counter!(names::JOBS_FAILED_TOTAL, "stage" => stage).increment(1);
    histogram!(names::JOB_DURATION_SECONDS, "outcome" => "failed").record(duration_secs);
}

pub fn record_clip_trimmed() {
    counter!(names::CLIPS_TRIMMED_TOTAL).increment(1);
}

pub fn record_trim_failure() {
    counter!(names::TRIM_FAILURES_TOTAL).increment(1);
}
