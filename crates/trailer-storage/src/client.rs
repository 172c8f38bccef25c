//! S3 client implementation.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_credential_types::Credentials;
use aws_sdk_s3::config::{Builder, Region};
use aws_sdk_s3::error::{DisplayErrorContext, SdkError};
use aws_sdk_s3::operation::get_object::GetObjectError;
use aws_sdk_s3::operation::put_object::PutObjectError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use tokio::io::AsyncWriteExt;
use tracing::{debug, info};

use crate::error::{StorageError, StorageResult};
use crate::locator::StoreLocator;
use crate::store::{content_type_for, ObjectStore};

/// Configuration for the S3 client.
#[derive(Debug, Clone)]
pub struct S3Config {
    /// Custom endpoint for S3-compatible stores (R2, MinIO). `None` uses AWS.
    pub endpoint_url: Option<String>,
    /// Region
    pub region: String,
    /// Static access key ID. Without it the default AWS credential chain is used.
    pub access_key_id: Option<String>,
    /// Static secret access key
    pub secret_access_key: Option<String>,
    /// Use path-style addressing (required by most S3-compatible stores)
    pub force_path_style: bool,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            endpoint_url: None,
            region: "us-east-1".to_string(),
            access_key_id: None,
            secret_access_key: None,
            force_path_style: false,
        }
    }
}

impl S3Config {
    /// Create config from environment variables.
    pub fn from_env() -> StorageResult<Self> {
        let access_key_id = std::env::var("S3_ACCESS_KEY_ID").ok();
        let secret_access_key = std::env::var("S3_SECRET_ACCESS_KEY").ok();

        if access_key_id.is_some() != secret_access_key.is_some() {
            return Err(StorageError::config_error(
                "S3_ACCESS_KEY_ID and S3_SECRET_ACCESS_KEY must be set together",
            ));
        }

        Ok(Self {
            endpoint_url: std::env::var("S3_ENDPOINT_URL").ok().filter(|s| !s.is_empty()),
            region: std::env::var("S3_REGION")
                .or_else(|_| std::env::var("AWS_REGION"))
                .unwrap_or_else(|_| "us-east-1".to_string()),
            access_key_id,
            secret_access_key,
            force_path_style: std::env::var("S3_FORCE_PATH_STYLE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
        })
    }
}

/// S3-compatible object store.
///
/// Not bound to a single bucket: sources and outputs may live in
/// different buckets, so every call takes a full locator.
#[derive(Clone)]
pub struct S3Store {
    client: Client,
}

impl S3Store {
    /// Create a new client from configuration.
    pub async fn new(config: S3Config) -> StorageResult<Self> {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));

        if let (Some(id), Some(secret)) = (&config.access_key_id, &config.secret_access_key) {
            loader = loader.credentials_provider(Credentials::new(id, secret, None, None, "env"));
        }

        let shared = loader.load().await;

        let mut builder = Builder::from(&shared).force_path_style(config.force_path_style);
        if let Some(endpoint) = &config.endpoint_url {
            builder = builder.endpoint_url(endpoint);
        }

        Ok(Self {
            client: Client::from_conf(builder.build()),
        })
    }

    /// Create from environment variables.
    pub async fn from_env() -> StorageResult<Self> {
        let config = S3Config::from_env()?;
        Self::new(config).await
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn fetch(&self, locator: &StoreLocator, dest_dir: &Path) -> StorageResult<PathBuf> {
        tokio::fs::create_dir_all(dest_dir).await?;
        let local_path = dest_dir.join(locator.file_name());

        debug!("Downloading {} to {}", locator, local_path.display());

        let response = self
            .client
            .get_object()
            .bucket(locator.bucket())
            .key(locator.key())
            .send()
            .await
            .map_err(|e| get_error(locator, e))?;

        let mut body = response.body;
        let mut file = tokio::fs::File::create(&local_path).await?;
        while let Some(chunk) = body
            .try_next()
            .await
            .map_err(|e| StorageError::download_failed(format!("{}: {}", locator, e)))?
        {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        info!("Downloaded {} to {}", locator, local_path.display());
        Ok(local_path)
    }

    async fn publish(&self, local_path: &Path, locator: &StoreLocator) -> StorageResult<StoreLocator> {
        if !local_path.is_file() {
            return Err(StorageError::FileNotFound(local_path.to_path_buf()));
        }

        debug!("Uploading {} to {}", local_path.display(), locator);

        let body = ByteStream::from_path(local_path)
            .await
            .map_err(|e| StorageError::upload_failed(e.to_string()))?;

        self.client
            .put_object()
            .bucket(locator.bucket())
            .key(locator.key())
            .body(body)
            .content_type(content_type_for(local_path))
            .send()
            .await
            .map_err(|e| put_error(locator, e))?;

        info!("Uploaded {} to {}", local_path.display(), locator);
        Ok(locator.clone())
    }
}

fn get_error(locator: &StoreLocator, err: SdkError<GetObjectError>) -> StorageError {
    let status = err.raw_response().map(|r| r.status().as_u16());
    let no_such_key = err
        .as_service_error()
        .map(|e| e.is_no_such_key())
        .unwrap_or(false);

    classify(locator, status, no_such_key, &DisplayErrorContext(&err).to_string())
}

fn put_error(locator: &StoreLocator, err: SdkError<PutObjectError>) -> StorageError {
    let status = err.raw_response().map(|r| r.status().as_u16());
    match classify(locator, status, false, &DisplayErrorContext(&err).to_string()) {
        StorageError::DownloadFailed(msg) | StorageError::NotFound(msg) => {
            StorageError::UploadFailed(msg)
        }
        other => other,
    }
}

/// Map an SDK failure onto a distinguishing storage error.
fn classify(locator: &StoreLocator, status: Option<u16>, no_such_key: bool, detail: &str) -> StorageError {
    if no_such_key || status == Some(404) {
        return StorageError::not_found(locator.to_string());
    }
    if status == Some(403) {
        return StorageError::AccessDenied(locator.to_string());
    }
    // No HTTP response at all: the request never left the client
    if status.is_none() && detail.to_lowercase().contains("credential") {
        return StorageError::Credentials(detail.to_string());
    }
    StorageError::download_failed(format!("{}: {}", locator, detail))
}
