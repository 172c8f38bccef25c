//! S3-compatible object storage.
//!
//! This crate provides:
//! - `StoreLocator` parsing for `s3://bucket/key` URLs
//! - The `ObjectStore` capability (fetch / publish) used by trailer jobs
//! - An `aws-sdk-s3` implementation of it

pub mod client;
pub mod error;
pub mod locator;
pub mod store;

pub use client::{S3Config, S3Store};
pub use error::{StorageError, StorageResult};
pub use locator::StoreLocator;
pub use store::{content_type_for, ObjectStore};
