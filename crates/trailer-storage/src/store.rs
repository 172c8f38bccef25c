//! Object store capability consumed by trailer jobs.

use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::error::StorageResult;
use crate::locator::StoreLocator;

/// Fetches sources from and publishes results to external storage.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Download `locator` into `dest_dir`, returning the local file path.
    async fn fetch(&self, locator: &StoreLocator, dest_dir: &Path) -> StorageResult<PathBuf>;

    /// Upload `local_path` to `locator`, returning the stored locator.
    async fn publish(&self, local_path: &Path, locator: &StoreLocator) -> StorageResult<StoreLocator>;
}

/// Content type for an uploaded file, from its extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("mp4") | Some("m4v") => "video/mp4",
        Some("mov") => "video/quicktime",
        Some("webm") => "video/webm",
        Some("mkv") => "video/x-matroska",
        Some("mp3") => "audio/mpeg",
        Some("json") => "application/json",
        _ => "application/octet-stream",
    }
}
