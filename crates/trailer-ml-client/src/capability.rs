//! Capabilities the trailer pipeline consumes from the ML layer.

use std::path::Path;

use async_trait::async_trait;
use trailer_models::{Clip, Transcript};

use crate::error::MlResult;

/// Turns a media file's audio into a timed transcript.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, media_path: &Path) -> MlResult<Transcript>;
}

/// Discovers scored highlight clips in a transcript.
///
/// The returned order carries no meaning and the list may be empty.
#[async_trait]
pub trait ClipFinder: Send + Sync {
    async fn find_clips(&self, transcript: &Transcript) -> MlResult<Vec<Clip>>;
}
