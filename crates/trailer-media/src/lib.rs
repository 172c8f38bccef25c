//! FFmpeg CLI wrapper for trailer assembly.
//!
//! This crate provides:
//! - The `MediaEditor` capability (trim / concatenate) consumed by the pipeline
//! - Type-safe FFmpeg command building
//! - An FFmpeg-backed editor implementation

pub mod command;
pub mod editor;
pub mod encoding;
pub mod error;
pub mod ffmpeg;

pub use command::{check_ffmpeg, FfmpegCommand, FfmpegRunner};
pub use editor::{MediaEditor, MediaFile};
pub use encoding::EncodingConfig;
pub use error::{MediaError, MediaResult};
pub use ffmpeg::FfmpegEditor;
