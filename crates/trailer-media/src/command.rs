//! FFmpeg command builder and runner.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::debug;

use crate::error::{MediaError, MediaResult};

/// Builder for the two FFmpeg invocations the editor needs: a trim and a
/// concat-demuxer join.
#[derive(Debug, Clone)]
pub struct FfmpegCommand {
    input: PathBuf,
    output: PathBuf,
    /// Placed before `-i`
    input_args: Vec<String>,
    /// Placed between the input and the output path
    output_args: Vec<String>,
    overwrite: bool,
    log_level: &'static str,
}

impl FfmpegCommand {
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            input_args: Vec::new(),
            output_args: Vec::new(),
            overwrite: true,
            log_level: "error",
        }
    }

    fn input_flag(mut self, flag: &str, value: impl Into<String>) -> Self {
        self.input_args.push(flag.to_string());
        self.input_args.push(value.into());
        self
    }

    fn output_flag(mut self, flag: &str, value: impl Into<String>) -> Self {
        self.output_args.push(flag.to_string());
        self.output_args.push(value.into());
        self
    }

    /// Input-side seek, in seconds.
    pub fn seek(self, seconds: f64) -> Self {
        self.input_flag("-ss", format!("{:.3}", seconds))
    }

    /// Amount of input to read, in seconds.
    pub fn duration(self, seconds: f64) -> Self {
        self.input_flag("-t", format!("{:.3}", seconds))
    }

    /// Treat the input as a concat demuxer list with absolute paths.
    pub fn concat_demuxer(self) -> Self {
        self.input_flag("-f", "concat").input_flag("-safe", "0")
    }

    pub fn video_codec(self, codec: impl Into<String>) -> Self {
        self.output_flag("-c:v", codec)
    }

    pub fn audio_codec(self, codec: impl Into<String>) -> Self {
        self.output_flag("-c:a", codec)
    }

    /// Copy every stream as-is.
    pub fn codec_copy(self) -> Self {
        self.output_flag("-c", "copy")
    }

    pub fn crf(self, crf: u8) -> Self {
        self.output_flag("-crf", crf.to_string())
    }

    pub fn preset(self, preset: impl Into<String>) -> Self {
        self.output_flag("-preset", preset)
    }

    pub fn audio_bitrate(self, bitrate: impl Into<String>) -> Self {
        self.output_flag("-b:a", bitrate)
    }

    /// Move the moov atom to the front for progressive playback.
    pub fn faststart(self) -> Self {
        self.output_flag("-movflags", "+faststart")
    }

    /// `-y` when true, `-n` (fail if the output exists) when false.
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Full argument list, without the program name.
    pub fn build_args(&self) -> Vec<String> {
        let overwrite = if self.overwrite { "-y" } else { "-n" };

        [overwrite, "-v", self.log_level]
            .into_iter()
            .map(String::from)
            .chain(self.input_args.iter().cloned())
            .chain(["-i".to_string(), self.input.to_string_lossy().into_owned()])
            .chain(self.output_args.iter().cloned())
            .chain(std::iter::once(self.output.to_string_lossy().into_owned()))
            .collect()
    }
}

/// Executes [`FfmpegCommand`]s. No timeout, no cancellation.
#[derive(Debug, Clone, Default)]
pub struct FfmpegRunner;

impl FfmpegRunner {
    pub fn new() -> Self {
        Self
    }

    /// Run to completion. A non-zero exit becomes `FfmpegFailed` with the
    /// last stderr line as its message.
    pub async fn run(&self, cmd: &FfmpegCommand) -> MediaResult<()> {
        check_ffmpeg()?;

        let args = cmd.build_args();
        debug!("Running FFmpeg: ffmpeg {}", args.join(" "));

        let output = Command::new("ffmpeg")
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output()
            .await?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        let message = last_stderr_line(&stderr).unwrap_or("Unknown error").to_string();
        Err(MediaError::ffmpeg_failed(message, Some(stderr), output.status.code()))
    }
}

/// Last non-blank line of FFmpeg's stderr, which carries the actual failure.
fn last_stderr_line(stderr: &str) -> Option<&str> {
    stderr.lines().rev().map(str::trim).find(|l| !l.is_empty())
}

/// Check if FFmpeg is available.
pub fn check_ffmpeg() -> MediaResult<PathBuf> {
    which::which("ffmpeg").map_err(|_| MediaError::FfmpegNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_args_in_order() {
        let args = FfmpegCommand::new("movie.mp4", "clip_0.mp4")
            .seek(10.0)
            .duration(30.0)
            .video_codec("libx264")
            .crf(18)
            .build_args();

        assert_eq!(
            args,
            [
                "-y", "-v", "error", "-ss", "10.000", "-t", "30.000", "-i", "movie.mp4",
                "-c:v", "libx264", "-crf", "18", "clip_0.mp4",
            ]
        );
    }

    #[test]
    fn test_concat_args() {
        let args = FfmpegCommand::new("list.txt", "trailer.mp4")
            .concat_demuxer()
            .codec_copy()
            .build_args();

        assert_eq!(
            args,
            ["-y", "-v", "error", "-f", "concat", "-safe", "0", "-i", "list.txt", "-c", "copy", "trailer.mp4"]
        );
    }

    #[test]
    fn test_seek_goes_before_input() {
        let args = FfmpegCommand::new("in.mp4", "out.mp4").seek(1.5).build_args();
        let seek = args.iter().position(|a| a == "-ss").unwrap();
        let input = args.iter().position(|a| a == "-i").unwrap();
        assert!(seek < input);
    }

    #[test]
    fn test_no_overwrite_flag() {
        let args = FfmpegCommand::new("in.mp4", "out.mp4").overwrite(false).build_args();
        assert_eq!(args[0], "-n");
    }

    #[test]
    fn test_last_stderr_line() {
        let stderr = "frame=1\nout.mp4: No such file or directory\n\n";
        assert_eq!(last_stderr_line(stderr), Some("out.mp4: No such file or directory"));
        assert_eq!(last_stderr_line("  \n"), None);
    }
}
