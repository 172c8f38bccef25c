//! Client for the Python ML service.
//!
//! The transcription model and the clip-scoring algorithm run in a separate
//! Python service. This crate defines the `Transcriber` and `ClipFinder`
//! capabilities the trailer pipeline depends on and implements both over
//! HTTP.

pub mod capability;
pub mod client;
pub mod error;
pub mod types;

pub use capability::{ClipFinder, Transcriber};
pub use client::{MlClient, MlClientConfig};
pub use error::{MlError, MlResult};
pub use types::{FindClipsRequest, FindClipsResponse, TranscribeRequest};
