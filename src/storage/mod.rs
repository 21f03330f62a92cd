//! Storage module for audio-digest
//!
//! Object storage access (S3) and the create-if-missing gate used for the
//! bucket and the uploaded audio object.

mod gate;
mod s3;

pub use gate::{ensure_bucket, ensure_exists, ensure_uploaded};
pub use s3::S3Store;

use async_trait::async_trait;
use std::path::Path;

use crate::Result;

/// Remote object storage operations needed by the pipeline.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Names of every bucket visible to the caller.
    async fn list_buckets(&self) -> Result<Vec<String>>;

    async fn create_bucket(&self, bucket: &str) -> Result<()>;

    /// Keys of every object in `bucket`.
    async fn list_objects(&self, bucket: &str) -> Result<Vec<String>>;

    /// Upload the file at `local_path` under `key`.
    async fn upload_object(&self, bucket: &str, key: &str, local_path: &Path) -> Result<()>;

    /// Download the full body of an object.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>>;
}

/// Build an `s3://bucket/key` URI.
pub fn object_uri(bucket: &str, key: &str) -> String {
    format!("s3://{bucket}/{key}")
}
