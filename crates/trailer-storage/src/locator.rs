//! `s3://bucket/key` locators.

use std::fmt;
use std::str::FromStr;

use uuid::Uuid;

use crate::error::{StorageError, StorageResult};

const SCHEME: &str = "s3://";

/// Parsed object store locator.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoreLocator {
    bucket: String,
    key: String,
}

impl StoreLocator {
    /// Build a locator from its parts. Both must be non-empty.
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> StorageResult<Self> {
        let bucket = bucket.into();
        let key = key.into();
        let key = key.trim_start_matches('/');

        if bucket.is_empty() || bucket.contains('/') {
            return Err(StorageError::invalid_locator(format!("bad bucket name '{}'", bucket)));
        }
        if key.is_empty() {
            return Err(StorageError::invalid_locator("missing object key"));
        }

        Ok(Self {
            bucket,
            key: key.to_string(),
        })
    }

    /// Parse `s3://bucket/key`. The scheme is matched case-insensitively.
    pub fn parse(url: &str) -> StorageResult<Self> {
        let url = url.trim();
        let rest = url
            .get(..SCHEME.len())
            .filter(|scheme| scheme.eq_ignore_ascii_case(SCHEME))
            .map(|_| &url[SCHEME.len()..])
            .ok_or_else(|| StorageError::invalid_locator(format!("expected s3:// URL, got '{}'", url)))?;

        let (bucket, key) = rest.split_once('/').unwrap_or((rest, ""));
        Self::new(bucket, key)
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Last segment of the key, or a generated name when the key ends in `/`.
    pub fn file_name(&self) -> String {
        match self.key.rsplit('/').next() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("downloaded_file_{}", Uuid::new_v4().simple()),
        }
    }
}

impl fmt::Display for StoreLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}/{}", SCHEME, self.bucket, self.key)
    }
}

impl FromStr for StoreLocator {
    type Err = StorageError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
