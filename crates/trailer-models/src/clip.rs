//! Scored highlight clip.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A candidate highlight within a source video.
///
/// Times are in seconds; `start_char`/`end_char` are offsets into the
/// transcript the clip was discovered from. Fields are read-only once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Clip {
    start_time: f64,
    end_time: f64,
    start_char: usize,
    end_char: usize,
    /// Relevance score, higher is better. No fixed range.
    #[serde(default)]
    score: f64,
}

impl Clip {
    /// Create a clip. Ordering of the bounds is the caller's responsibility.
    pub fn new(start_time: f64, end_time: f64, start_char: usize, end_char: usize, score: f64) -> Self {
        Self {
            start_time,
            end_time,
            start_char,
            end_char,
            score,
        }
    }

    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    pub fn end_time(&self) -> f64 {
        self.end_time
    }

    pub fn start_char(&self) -> usize {
        self.start_char
    }

    pub fn end_char(&self) -> usize {
        self.end_char
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    /// Length of the clip in seconds.
    pub fn duration(&self) -> f64 {
        self.end_time - self.start_time
    }

    /// True when any bound is zero-valued.
    ///
    /// This treats "unset" and "legitimately zero" the same way, so a clip
    /// starting at 0.0s counts as empty. Do not use it to validate clips.
    pub fn is_empty(&self) -> bool {
        self.start_time == 0.0 || self.end_time == 0.0 || self.start_char == 0 || self.end_char == 0
    }
}

impl std::fmt::Display for Clip {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Clip(start_time={}, end_time={}, start_char={}, end_char={}, score={})",
            self.start_time, self.end_time, self.start_char, self.end_char, self.score
        )
    }
}
