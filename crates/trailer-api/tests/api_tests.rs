//! API integration tests.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use trailer_api::{create_router, ApiConfig, AppState};
use trailer_media::{MediaEditor, MediaError, MediaFile, MediaResult};
use trailer_ml_client::{ClipFinder, MlError, MlResult, Transcriber};
use trailer_models::{Clip, Transcript};
use trailer_storage::{ObjectStore, StorageError, StorageResult, StoreLocator};
use trailer_worker::{JobExecutor, JobRunner, TrailerPipeline, WorkerConfig};

/// Store without objects: every job ends at the fetch stage.
#[derive(Default)]
struct EmptyStore {
    fetches: AtomicUsize,
}

#[async_trait]
impl ObjectStore for EmptyStore {
    async fn fetch(&self, locator: &StoreLocator, _dest_dir: &Path) -> StorageResult<PathBuf> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Err(StorageError::not_found(locator.to_string()))
    }

    async fn publish(&self, local_path: &Path, _locator: &StoreLocator) -> StorageResult<StoreLocator> {
        Err(StorageError::FileNotFound(local_path.to_path_buf()))
    }
}

struct Unreachable;

#[async_trait]
impl Transcriber for Unreachable {
    async fn transcribe(&self, _media_path: &Path) -> MlResult<Transcript> {
        Err(MlError::ServiceUnavailable("not wired in tests".to_string()))
    }
}

#[async_trait]
impl ClipFinder for Unreachable {
    async fn find_clips(&self, _transcript: &Transcript) -> MlResult<Vec<Clip>> {
        Err(MlError::ServiceUnavailable("not wired in tests".to_string()))
    }
}

#[async_trait]
impl MediaEditor for Unreachable {
    async fn trim(&self, _: &Path, _: f64, _: f64, _: &Path, _: bool) -> MediaResult<MediaFile> {
        Err(MediaError::FfmpegNotFound)
    }

    async fn concatenate(&self, _: &[MediaFile], _: &Path, _: bool) -> MediaResult<MediaFile> {
        Err(MediaError::FfmpegNotFound)
    }
}

struct TestApp {
    router: Router,
    executor: Arc<JobExecutor>,
    store: Arc<EmptyStore>,
    _dir: TempDir,
}

fn test_app() -> TestApp {
    let dir = TempDir::new().unwrap();
    let worker_config = WorkerConfig {
        job_work_dir: dir.path().join("jobs"),
        pipeline_work_dir: dir.path().join("pipeline"),
        output_dir: dir.path().join("output"),
        ..WorkerConfig::default()
    };

    let unreachable = Arc::new(Unreachable);
    let pipeline = TrailerPipeline::new(
        unreachable.clone(),
        unreachable.clone(),
        unreachable,
        &worker_config,
    );
    let store = Arc::new(EmptyStore::default());
    let runner = JobRunner::new(store.clone(), pipeline, worker_config);
    let executor = Arc::new(JobExecutor::new(Arc::new(runner)));

    let state = AppState::new(ApiConfig::default(), executor.clone());
    TestApp {
        router: create_router(state, None),
        executor,
        store,
        _dir: dir,
    }
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = test_app();

    let response = app
        .router
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["x-content-type-options"], "nosniff");
    assert!(response.headers().contains_key("x-request-id"));

    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
    assert!(body["timestamp"].is_string());
    assert_eq!(body["jobs_in_flight"], 0);
}

#[tokio::test]
async fn test_generate_trailer_accepts_valid_locator() {
    let app = test_app();

    let response = app
        .router
        .oneshot(post_json(
            "/generate-trailer",
            r#"{"source_url": "s3://movies/storm.mp4"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Trailer generation task started in background.");
    assert_eq!(body["source_url"], "s3://movies/storm.mp4");
    assert_eq!(body["s3_movie_url"], "s3://movies/storm.mp4");
    assert!(!body["job_id"].as_str().unwrap().is_empty());
    assert_eq!(body["processing_id"], body["job_id"]);

    assert!(app.executor.drain(Duration::from_secs(5)).await);
    assert_eq!(app.store.fetches.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_generate_trailer_accepts_legacy_field_and_trailing_slash() {
    let app = test_app();

    let response = app
        .router
        .oneshot(post_json(
            "/generate-trailer/",
            r#"{"s3_movie_url": "s3://movies/storm.mp4", "max_clips": 3}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    app.executor.drain(Duration::from_secs(5)).await;
}

#[tokio::test]
async fn test_generate_trailer_rejects_malformed_locator() {
    let app = test_app();

    let response = app
        .router
        .oneshot(post_json(
            "/generate-trailer",
            r#"{"source_url": "https://example.com/movie.mp4"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert_eq!(body["detail"], "Invalid S3 URL format: https://example.com/movie.mp4");

    assert_eq!(app.executor.in_flight(), 0);
    assert_eq!(app.store.fetches.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_generate_trailer_rejects_locator_without_key() {
    let app = test_app();

    let response = app
        .router
        .oneshot(post_json("/generate-trailer", r#"{"source_url": "s3://movies/"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_generate_trailer_rejects_missing_field() {
    let app = test_app();

    let response = app
        .router
        .oneshot(post_json("/generate-trailer", r#"{"url": "s3://movies/storm.mp4"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = json_body(response).await;
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn test_metrics_route_absent_when_disabled() {
    let app = test_app();

    let response = app
        .router
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
