//! Shared data models for the trailer service.
//!
//! This crate provides Serde-serializable types for:
//! - Scored highlight clips
//! - Transcripts produced by the ML service
//! - Job identifiers
//! - HTTP request/response schemas

pub mod api;
pub mod clip;
pub mod job;
pub mod transcript;

// Re-export common types
pub use api::{GenerateTrailerRequest, GenerateTrailerResponse};
pub use clip::Clip;
pub use job::JobId;
pub use transcript::{Transcript, Utterance};
