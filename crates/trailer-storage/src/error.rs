//! Storage error types.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to configure storage client: {0}")]
    ConfigError(String),

    #[error("Invalid locator: {0}")]
    InvalidLocator(String),

    #[error("Object not found: {0}")]
    NotFound(String),

    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Credentials unavailable: {0}")]
    Credentials(String),

    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Upload failed: {0}")]
    UploadFailed(String),

    #[error("Local file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StorageError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn invalid_locator(msg: impl Into<String>) -> Self {
        Self::InvalidLocator(msg.into())
    }

    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound(key.into())
    }

    pub fn upload_failed(msg: impl Into<String>) -> Self {
        Self::UploadFailed(msg.into())
    }

    pub fn download_failed(msg: impl Into<String>) -> Self {
        Self::DownloadFailed(msg.into())
    }

    /// Short machine-readable reason, used as a log field and metric label.
    pub fn reason(&self) -> &'static str {
        match self {
            StorageError::ConfigError(_) => "config",
            StorageError::InvalidLocator(_) => "invalid_locator",
            StorageError::NotFound(_) => "not_found",
            StorageError::AccessDenied(_) => "access_denied",
            StorageError::Credentials(_) => "credentials",
            StorageError::DownloadFailed(_) => "transport",
            StorageError::UploadFailed(_) => "transport",
            StorageError::FileNotFound(_) => "local_file_missing",
            StorageError::Io(_) => "io",
        }
    }
}
