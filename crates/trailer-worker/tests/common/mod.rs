//! Recording fakes for the pipeline's collaborators.

#![allow(dead_code)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tempfile::TempDir;
use trailer_media::{MediaEditor, MediaError, MediaFile, MediaResult};
use trailer_ml_client::{ClipFinder, MlError, MlResult, Transcriber};
use trailer_models::{Clip, Transcript, Utterance};
use trailer_storage::{ObjectStore, StorageError, StorageResult, StoreLocator};
use trailer_worker::{JobRunner, TrailerPipeline, WorkerConfig};

pub fn clip(start: f64, score: f64) -> Clip {
    Clip::new(start, start + 5.0, (start as usize) * 10, (start as usize) * 10 + 40, score)
}

/// Temp directories wired into a worker config.
pub struct Fixture {
    pub root: TempDir,
    pub config: WorkerConfig,
}

impl Fixture {
    pub fn new() -> Self {
        let root = TempDir::new().unwrap();
        let config = WorkerConfig {
            job_work_dir: root.path().join("jobs"),
            pipeline_work_dir: root.path().join("pipeline"),
            output_dir: root.path().join("output"),
            output_bucket: "outputs".to_string(),
            ..WorkerConfig::default()
        };
        Self { root, config }
    }

    pub fn source_file(&self) -> PathBuf {
        let path = self.root.path().join("movie.mp4");
        std::fs::write(&path, b"movie").unwrap();
        path
    }

    pub fn pipeline_workspaces(&self) -> usize {
        count_entries(&self.config.pipeline_work_dir)
    }

    pub fn job_workspaces(&self) -> usize {
        count_entries(&self.config.job_work_dir)
    }
}

fn count_entries(dir: &Path) -> usize {
    std::fs::read_dir(dir).map(|entries| entries.count()).unwrap_or(0)
}

pub struct Fakes {
    pub transcriber: Arc<FakeTranscriber>,
    pub clip_finder: Arc<FakeClipFinder>,
    pub editor: Arc<FakeEditor>,
}

impl Fakes {
    pub fn new(clips: Vec<Clip>) -> Self {
        Self {
            transcriber: Arc::new(FakeTranscriber::default()),
            clip_finder: Arc::new(FakeClipFinder::with_clips(clips)),
            editor: Arc::new(FakeEditor::default()),
        }
    }

    pub fn pipeline(&self, config: &WorkerConfig) -> TrailerPipeline {
        TrailerPipeline::new(
            self.transcriber.clone(),
            self.clip_finder.clone(),
            self.editor.clone(),
            config,
        )
    }

    pub fn runner(&self, store: Arc<FakeStore>, config: &WorkerConfig) -> JobRunner {
        JobRunner::new(store, self.pipeline(config), config.clone())
    }
}

#[derive(Default)]
pub struct FakeTranscriber {
    pub fail: bool,
    /// Return a transcript with no utterances
    pub silent: bool,
    pub delay: Duration,
    calls: AtomicUsize,
    running: AtomicUsize,
    peak: AtomicUsize,
}

impl FakeTranscriber {
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn silent() -> Self {
        Self {
            silent: true,
            ..Self::default()
        }
    }

    pub fn slow(delay: Duration) -> Self {
        Self {
            delay,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Most transcriptions observed running at the same time.
    pub fn peak_concurrency(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transcriber for FakeTranscriber {
    async fn transcribe(&self, _media_path: &Path) -> MlResult<Transcript> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let running = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(running, Ordering::SeqCst);

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.running.fetch_sub(1, Ordering::SeqCst);

        if self.fail {
            return Err(MlError::ServiceUnavailable("transcription service down".to_string()));
        }
        if self.silent {
            return Ok(Transcript::default());
        }
        Ok(Transcript::new(vec![
            Utterance::new(0.0, 5.0, "Where were you"),
            Utterance::new(10.0, 15.0, "on the night of the storm?"),
        ]))
    }
}

#[derive(Default)]
pub struct FakeClipFinder {
    clips: Option<Vec<Clip>>,
    calls: AtomicUsize,
}

impl FakeClipFinder {
    pub fn with_clips(clips: Vec<Clip>) -> Self {
        Self {
            clips: Some(clips),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ClipFinder for FakeClipFinder {
    async fn find_clips(&self, _transcript: &Transcript) -> MlResult<Vec<Clip>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.clips
            .clone()
            .ok_or_else(|| MlError::request_failed("/clips", 500, "clip scoring crashed"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrimCall {
    pub start_time: f64,
    pub end_time: f64,
    pub dest: PathBuf,
    pub overwrite: bool,
}

/// Writes placeholder files so workspaces have real contents.
#[derive(Default)]
pub struct FakeEditor {
    /// Trims starting at these times fail
    pub fail_starts: Vec<f64>,
    pub panic_on_concat: bool,
    pub fail_concat: bool,
    /// Report success from concatenate without writing the output
    pub skip_concat_write: bool,
    trims: Mutex<Vec<TrimCall>>,
    concats: Mutex<Vec<Vec<PathBuf>>>,
}

impl FakeEditor {
    pub fn failing_trims_at(starts: &[f64]) -> Self {
        Self {
            fail_starts: starts.to_vec(),
            ..Self::default()
        }
    }

    pub fn panicking_concat() -> Self {
        Self {
            panic_on_concat: true,
            ..Self::default()
        }
    }

    pub fn failing_concat() -> Self {
        Self {
            fail_concat: true,
            ..Self::default()
        }
    }

    pub fn phantom_concat() -> Self {
        Self {
            skip_concat_write: true,
            ..Self::default()
        }
    }

    pub fn trims(&self) -> Vec<TrimCall> {
        self.trims.lock().unwrap().clone()
    }

    pub fn trim_starts(&self) -> Vec<f64> {
        self.trims().iter().map(|t| t.start_time).collect()
    }

    pub fn concats(&self) -> Vec<Vec<PathBuf>> {
        self.concats.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaEditor for FakeEditor {
    async fn trim(
        &self,
        _source: &Path,
        start_time: f64,
        end_time: f64,
        dest: &Path,
        overwrite: bool,
    ) -> MediaResult<MediaFile> {
        self.trims.lock().unwrap().push(TrimCall {
            start_time,
            end_time,
            dest: dest.to_path_buf(),
            overwrite,
        });

        if self.fail_starts.contains(&start_time) {
            return Err(MediaError::ffmpeg_failed(
                "FFmpeg exited with 1",
                Some("Invalid data found when processing input".to_string()),
                Some(1),
            ));
        }
        tokio::fs::write(dest, b"clip").await?;
        Ok(MediaFile::new(dest))
    }

    async fn concatenate(
        &self,
        files: &[MediaFile],
        dest: &Path,
        _overwrite: bool,
    ) -> MediaResult<MediaFile> {
        let paths: Vec<PathBuf> = files.iter().map(|f| f.path().to_path_buf()).collect();
        self.concats.lock().unwrap().push(paths);

        if self.panic_on_concat {
            panic!("concatenate blew up");
        }
        if self.fail_concat {
            return Err(MediaError::ffmpeg_failed(
                "Non-monotonous DTS in output stream",
                None,
                Some(1),
            ));
        }
        if self.skip_concat_write {
            return Ok(MediaFile::new(dest));
        }
        tokio::fs::write(dest, b"trailer").await?;
        Ok(MediaFile::new(dest))
    }
}

/// In-memory object store keyed by locator string.
#[derive(Default)]
pub struct FakeStore {
    objects: HashSet<String>,
    fail_publish: bool,
    fetches: AtomicUsize,
    published: Mutex<Vec<(PathBuf, StoreLocator)>>,
}

impl FakeStore {
    pub fn with_object(locator: &str) -> Self {
        let mut store = Self::default();
        store.objects.insert(locator.to_string());
        store
    }

    pub fn failing_publish(locator: &str) -> Self {
        Self {
            fail_publish: true,
            ..Self::with_object(locator)
        }
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn published(&self) -> Vec<(PathBuf, StoreLocator)> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl ObjectStore for FakeStore {
    async fn fetch(&self, locator: &StoreLocator, dest_dir: &Path) -> StorageResult<PathBuf> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        if !self.objects.contains(&locator.to_string()) {
            return Err(StorageError::not_found(locator.to_string()));
        }

        tokio::fs::create_dir_all(dest_dir).await?;
        let path = dest_dir.join(locator.file_name());
        tokio::fs::write(&path, b"movie").await?;
        Ok(path)
    }

    async fn publish(&self, local_path: &Path, locator: &StoreLocator) -> StorageResult<StoreLocator> {
        if self.fail_publish {
            return Err(StorageError::upload_failed("connection reset by peer"));
        }
        self.published
            .lock()
            .unwrap()
            .push((local_path.to_path_buf(), locator.clone()));
        Ok(locator.clone())
    }
}
