//! Trailer generation pipeline.
//!
//! transcribe -> find clips -> rank/select -> trim each -> concatenate
//!
//! Stages run strictly in order and clips are trimmed one at a time. Every
//! run owns a private workspace for its trimmed clips; the workspace is gone
//! by the time [`TrailerPipeline::generate`] returns, whatever the result.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, error, info, warn};
use trailer_media::{MediaEditor, MediaFile};
use trailer_ml_client::{ClipFinder, Transcriber};
use trailer_models::Clip;

use crate::config::WorkerConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::metrics;
use crate::selection::select_clips;
use crate::workspace::Workspace;

const WORKSPACE_PREFIX: &str = "trailer";

/// A selected clip that could not be trimmed. The run continues without it.
#[derive(Debug, Clone, PartialEq)]
pub struct TrimFailure {
    /// Position in the selected sequence
    pub index: usize,
    pub start_time: f64,
    pub end_time: f64,
    pub reason: String,
}

/// Result of a successful run.
#[derive(Debug, Clone)]
pub struct TrailerOutput {
    pub file: MediaFile,
    pub clips_used: usize,
    pub skipped: Vec<TrimFailure>,
}

pub struct TrailerPipeline {
    transcriber: Arc<dyn Transcriber>,
    clip_finder: Arc<dyn ClipFinder>,
    editor: Arc<dyn MediaEditor>,
    work_dir: PathBuf,
    extension: String,
}

impl TrailerPipeline {
    pub fn new(
        transcriber: Arc<dyn Transcriber>,
        clip_finder: Arc<dyn ClipFinder>,
        editor: Arc<dyn MediaEditor>,
        config: &WorkerConfig,
    ) -> Self {
        Self {
            transcriber,
            clip_finder,
            editor,
            work_dir: config.pipeline_work_dir.clone(),
            extension: config.output_extension.clone(),
        }
    }

    /// Build a trailer from `source` and write it to `output`.
    ///
    /// `max_clips <= 0` uses every clip the finder returns.
    pub async fn generate(
        &self,
        source: &Path,
        output: &Path,
        max_clips: i64,
    ) -> PipelineResult<TrailerOutput> {
        info!(
            source = %source.display(),
            output = %output.display(),
            max_clips,
            "Starting trailer generation"
        );

        validate_source(source).await?;
        prepare_output(output).await?;

        let workspace = Workspace::acquire(&self.work_dir, WORKSPACE_PREFIX).await?;
        debug!("Pipeline workspace {}", workspace.path().display());

        let result = self.run_stages(source, output, max_clips, &workspace).await;
        workspace.release().await;

        match &result {
            Ok(trailer) => info!(
                output = %trailer.file.path().display(),
                clips_used = trailer.clips_used,
                skipped = trailer.skipped.len(),
                "Trailer generated"
            ),
            Err(e) => error!(kind = e.kind(), "Trailer generation failed: {}", e),
        }
        result
    }

    async fn run_stages(
        &self,
        source: &Path,
        output: &Path,
        max_clips: i64,
        workspace: &Workspace,
    ) -> PipelineResult<TrailerOutput> {
        info!("Transcribing {}", source.display());
        let transcript = self
            .transcriber
            .transcribe(source)
            .await
            .map_err(|e| {
                debug!(kind = e.kind(), "Transcriber error");
                PipelineError::Transcription(e.to_string())
            })?;

        if transcript.is_empty() {
            warn!("Transcript has no utterances");
        } else {
            debug!(
                utterances = transcript.utterances.len(),
                chars = transcript.char_count(),
                "Transcription done"
            );
        }

        let clips = self
            .clip_finder
            .find_clips(&transcript)
            .await
            .map_err(|e| {
                debug!(kind = e.kind(), "Clip finder error");
                PipelineError::ClipDiscovery(e.to_string())
            })?;
        if clips.is_empty() {
            return Err(PipelineError::NoClipsFound);
        }

        let found = clips.len();
        let selected = select_clips(clips, max_clips);
        if selected.is_empty() {
            return Err(PipelineError::NoClipsSelected);
        }
        info!(found, selected = selected.len(), "Selected clips");

        let (trimmed, skipped) = self.trim_all(source, &selected, workspace).await;
        if trimmed.is_empty() {
            return Err(PipelineError::AllTrimsFailed {
                attempted: selected.len(),
            });
        }

        info!("Concatenating {} clips into {}", trimmed.len(), output.display());
        let file = self
            .editor
            .concatenate(&trimmed, output, true)
            .await
            .map_err(|e| PipelineError::Concatenation(e.to_string()))?;

        Ok(TrailerOutput {
            file,
            clips_used: trimmed.len(),
            skipped,
        })
    }

    async fn trim_all(
        &self,
        source: &Path,
        clips: &[Clip],
        workspace: &Workspace,
    ) -> (Vec<MediaFile>, Vec<TrimFailure>) {
        let mut trimmed = Vec::with_capacity(clips.len());
        let mut skipped = Vec::new();

        for (index, clip) in clips.iter().enumerate() {
            let dest = workspace.join(format!("clip_{}.{}", index, self.extension));
            debug!(index, score = clip.score(), "Trimming {}", clip);

            match self
                .editor
                .trim(source, clip.start_time(), clip.end_time(), &dest, true)
                .await
            {
                Ok(file) => {
                    metrics::record_clip_trimmed();
                    trimmed.push(file);
                }
                Err(e) => {
                    let failure = TrimFailure {
                        index,
                        start_time: clip.start_time(),
                        end_time: clip.end_time(),
                        reason: e.to_string(),
                    };
                    warn!(
                        index,
                        start_time = failure.start_time,
                        end_time = failure.end_time,
                        "Skipping clip: {}", failure.reason
                    );
                    metrics::record_trim_failure();
                    skipped.push(failure);
                }
            }
        }

        (trimmed, skipped)
    }
}

async fn validate_source(source: &Path) -> PipelineResult<()> {
    let metadata = tokio::fs::metadata(source).await.map_err(|e| {
        PipelineError::validation(format!("source {} is not accessible: {}", source.display(), e))
    })?;
    if !metadata.is_file() {
        return Err(PipelineError::validation(format!(
            "source {} is not a file",
            source.display()
        )));
    }
    tokio::fs::File::open(source).await.map_err(|e| {
        PipelineError::validation(format!("source {} is not readable: {}", source.display(), e))
    })?;
    Ok(())
}

async fn prepare_output(output: &Path) -> PipelineResult<()> {
    let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) else {
        return Ok(());
    };
    tokio::fs::create_dir_all(parent).await.map_err(|e| {
        PipelineError::validation(format!(
            "output directory {} cannot be created: {}",
            parent.display(),
            e
        ))
    })
}
