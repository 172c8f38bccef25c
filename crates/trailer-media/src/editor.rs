//! Media editing capability consumed by the trailer pipeline.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::MediaResult;

/// Handle to a media file materialized on local disk.
///
/// The pipeline passes these along in order; it never opens them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFile {
    path: PathBuf,
}

impl MediaFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_path(self) -> PathBuf {
        self.path
    }

    pub fn exists(&self) -> bool {
        self.path.is_file()
    }
}

/// Trims and joins media files.
#[async_trait]
pub trait MediaEditor: Send + Sync {
    /// Cut `[start_time, end_time)` seconds out of `source` into `dest`.
    async fn trim(
        &self,
        source: &Path,
        start_time: f64,
        end_time: f64,
        dest: &Path,
        overwrite: bool,
    ) -> MediaResult<MediaFile>;

    /// Join `files` in the given order into `dest`.
    async fn concatenate(
        &self,
        files: &[MediaFile],
        dest: &Path,
        overwrite: bool,
    ) -> MediaResult<MediaFile>;
}
