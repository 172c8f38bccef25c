//! Prometheus metrics for the API server.

use std::time::Instant;

use axum::body::Body;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder.
///
/// Returns a handle that renders the exposition text. Job metrics recorded
/// by the worker go through the same recorder.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    pub const HTTP_REQUESTS_TOTAL: &str = "trailer_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "trailer_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "trailer_http_requests_in_flight";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("path", route_label(path).to_string()),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Collapse request paths to a fixed label set so unknown paths cannot
/// grow label cardinality.
fn route_label(path: &str) -> &'static str {
    match path.trim_end_matches('/') {
        "/generate-trailer" => "/generate-trailer",
        "/health" | "/healthz" => "/health",
        "/metrics" => "/metrics",
        _ => "other",
    }
}

/// Metrics middleware for HTTP requests.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);
    let response = next.run(request).await;
    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    record_http_request(&method, &path, response.status().as_u16(), start.elapsed().as_secs_f64());

    response
}
