//! Transcript produced by the ML service.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// A single timed span of spoken text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Utterance {
    pub start_time: f64,
    pub end_time: f64,
    pub text: String,
}

impl Utterance {
    pub fn new(start_time: f64, end_time: f64, text: impl Into<String>) -> Self {
        Self {
            start_time,
            end_time,
            text: text.into(),
        }
    }
}

/// Text-with-timing representation of a media file's audio track.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Transcript {
    #[serde(default)]
    pub utterances: Vec<Utterance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

impl Transcript {
    pub fn new(utterances: Vec<Utterance>) -> Self {
        Self {
            utterances,
            language: None,
        }
    }

    /// True when nothing was spoken. Not an error on its own.
    pub fn is_empty(&self) -> bool {
        self.utterances.is_empty()
    }

    /// End of the last utterance, 0 for an empty transcript.
    pub fn end_time(&self) -> f64 {
        self.utterances.last().map(|u| u.end_time).unwrap_or(0.0)
    }

    /// Total characters across utterances.
    pub fn char_count(&self) -> usize {
        self.utterances.iter().map(|u| u.text.chars().count()).sum()
    }
}
