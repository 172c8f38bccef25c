//! FFmpeg-backed [`MediaEditor`].

use std::path::Path;

use async_trait::async_trait;
use tempfile::TempDir;
use tracing::info;

use crate::command::{FfmpegCommand, FfmpegRunner};
use crate::editor::{MediaEditor, MediaFile};
use crate::encoding::EncodingConfig;
use crate::error::{MediaError, MediaResult};

/// Media editor that shells out to the `ffmpeg` binary.
#[derive(Debug, Clone, Default)]
pub struct FfmpegEditor {
    encoding: EncodingConfig,
    runner: FfmpegRunner,
}

impl FfmpegEditor {
    pub fn new(encoding: EncodingConfig) -> Self {
        Self {
            encoding,
            runner: FfmpegRunner::new(),
        }
    }

    /// Build the trim command. Clips are re-encoded, so cuts are frame-accurate.
    pub fn trim_command(
        &self,
        source: &Path,
        start_time: f64,
        end_time: f64,
        dest: &Path,
        overwrite: bool,
    ) -> FfmpegCommand {
        let cmd = FfmpegCommand::new(source, dest)
            .seek(start_time)
            .duration(end_time - start_time);
        self.encoding.apply(cmd).overwrite(overwrite)
    }
}

#[async_trait]
impl MediaEditor for FfmpegEditor {
    async fn trim(
        &self,
        source: &Path,
        start_time: f64,
        end_time: f64,
        dest: &Path,
        overwrite: bool,
    ) -> MediaResult<MediaFile> {
        validate_range(start_time, end_time)?;

        if !source.is_file() {
            return Err(MediaError::FileNotFound(source.to_path_buf()));
        }
        if !overwrite && dest.exists() {
            return Err(MediaError::OutputExists(dest.to_path_buf()));
        }

        info!(
            "Trimming {} -> {} ({:.2}s - {:.2}s)",
            source.display(),
            dest.display(),
            start_time,
            end_time
        );

        let cmd = self.trim_command(source, start_time, end_time, dest, overwrite);
        self.runner.run(&cmd).await?;

        Ok(MediaFile::new(dest))
    }

    async fn concatenate(
        &self,
        files: &[MediaFile],
        dest: &Path,
        overwrite: bool,
    ) -> MediaResult<MediaFile> {
        if files.is_empty() {
            return Err(MediaError::EmptyInput);
        }
        if let Some(missing) = files.iter().find(|f| !f.exists()) {
            return Err(MediaError::FileNotFound(missing.path().to_path_buf()));
        }
        if !overwrite && dest.exists() {
            return Err(MediaError::OutputExists(dest.to_path_buf()));
        }

        // List file lives in its own temp dir, removed on drop
        let temp_dir = TempDir::new()?;
        let list_path = temp_dir.path().join("concat.txt");
        tokio::fs::write(&list_path, concat_list(files)?).await?;

        info!(
            "Concatenating {} clips into {}",
            files.len(),
            dest.display()
        );

        let cmd = FfmpegCommand::new(&list_path, dest)
            .concat_demuxer()
            .codec_copy()
            .faststart()
            .overwrite(overwrite);
        self.runner.run(&cmd).await?;

        Ok(MediaFile::new(dest))
    }
}

fn validate_range(start_time: f64, end_time: f64) -> MediaResult<()> {
    let reason = if !start_time.is_finite() || !end_time.is_finite() {
        "bounds must be finite"
    } else if start_time < 0.0 {
        "start is negative"
    } else if end_time <= start_time {
        "end is not after start"
    } else {
        return Ok(());
    };
    Err(MediaError::invalid_range(start_time, end_time, reason))
}

/// Concat demuxer list: one `file '<path>'` line per input.
///
/// FFmpeg resolves relative entries against the list file's directory, so
/// every path is made absolute against the current directory first.
fn concat_list(files: &[MediaFile]) -> MediaResult<String> {
    files
        .iter()
        .map(|f| -> MediaResult<String> {
            let path = std::path::absolute(f.path())?;
            let escaped = path.to_string_lossy().replace('\'', "'\\''");
            Ok(format!("file '{}'\n", escaped))
        })
        .collect()
}
