//! Editing errors.

use std::path::PathBuf;
use thiserror::Error;

pub type MediaResult<T> = Result<T, MediaError>;

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("ffmpeg binary not found on PATH")]
    FfmpegNotFound,

    /// `message` is the last stderr line; `stderr` keeps the full output.
    #[error("ffmpeg exited with {code}: {message}", code = .exit_code.map_or_else(|| "signal".to_string(), |c| c.to_string()))]
    FfmpegFailed {
        message: String,
        stderr: Option<String>,
        exit_code: Option<i32>,
    },

    #[error("Invalid clip range {start}-{end}: {reason}")]
    InvalidRange { start: f64, end: f64, reason: &'static str },

    #[error("Input file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Refusing to overwrite {0}")]
    OutputExists(PathBuf),

    #[error("No clips to concatenate")]
    EmptyInput,

    #[error("Media I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MediaError {
    pub fn ffmpeg_failed(
        message: impl Into<String>,
        stderr: Option<String>,
        exit_code: Option<i32>,
    ) -> Self {
        Self::FfmpegFailed {
            message: message.into(),
            stderr,
            exit_code,
        }
    }

    pub fn invalid_range(start: f64, end: f64, reason: &'static str) -> Self {
        Self::InvalidRange { start, end, reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ffmpeg_failed_message() {
        let err = MediaError::ffmpeg_failed("Invalid data found", None, Some(1));
        assert_eq!(err.to_string(), "ffmpeg exited with 1: Invalid data found");

        let err = MediaError::ffmpeg_failed("killed", None, None);
        assert_eq!(err.to_string(), "ffmpeg exited with signal: killed");
    }

    #[test]
    fn test_invalid_range_message() {
        let err = MediaError::invalid_range(5.0, 5.0, "end is not after start");
        assert_eq!(err.to_string(), "Invalid clip range 5-5: end is not after start");
    }
}
