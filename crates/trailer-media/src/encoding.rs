//! Encoding settings for trimmed clips.
//!
//! Every trimmed clip goes through the same settings, which is what lets the
//! concat demuxer join them with stream copy afterwards.

use serde::{Deserialize, Serialize};

use crate::command::FfmpegCommand;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodingConfig {
    /// `libx264` unless a hardware encoder is configured
    pub video_codec: String,
    pub preset: String,
    /// 0-51, lower is better
    pub crf: u8,
    pub audio_codec: String,
    pub audio_bitrate: String,
    pub faststart: bool,
}

impl Default for EncodingConfig {
    fn default() -> Self {
        Self {
            video_codec: "libx264".into(),
            preset: "fast".into(),
            crf: 18,
            audio_codec: "aac".into(),
            audio_bitrate: "128k".into(),
            faststart: true,
        }
    }
}

impl EncodingConfig {
    /// Defaults overridden by `FFMPEG_*` variables. Unparseable values are ignored.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        if let Some(codec) = var("FFMPEG_VIDEO_CODEC") {
            config.video_codec = codec;
        }
        if let Some(preset) = var("FFMPEG_PRESET") {
            config.preset = preset;
        }
        if let Some(crf) = var("FFMPEG_CRF").and_then(|v| v.parse().ok()) {
            config.crf = crf;
        }
        if let Some(codec) = var("FFMPEG_AUDIO_CODEC") {
            config.audio_codec = codec;
        }
        if let Some(bitrate) = var("FFMPEG_AUDIO_BITRATE") {
            config.audio_bitrate = bitrate;
        }
        if let Some(faststart) = var("FFMPEG_FASTSTART") {
            config.faststart = faststart != "0" && !faststart.eq_ignore_ascii_case("false");
        }
        config
    }

    /// Append the output-side encoding flags to `cmd`.
    pub fn apply(&self, cmd: FfmpegCommand) -> FfmpegCommand {
        let cmd = cmd
            .video_codec(&self.video_codec)
            .preset(&self.preset)
            .crf(self.crf)
            .audio_codec(&self.audio_codec)
            .audio_bitrate(&self.audio_bitrate);
        if self.faststart {
            cmd.faststart()
        } else {
            cmd
        }
    }
}
