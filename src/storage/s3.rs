//! Amazon S3 backed object store

use async_trait::async_trait;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use aws_sdk_s3::Client;
use std::path::Path;

use crate::storage::ObjectStore;
use crate::{DigestError, Result};

/// Buckets in this region must be created without a location constraint.
const DEFAULT_S3_REGION: &str = "us-east-1";

pub struct S3Store {
    client: Client,
    region: String,
}

impl S3Store {
    pub fn new(client: Client, region: impl Into<String>) -> Self {
        Self {
            client,
            region: region.into(),
        }
    }

    /// Build a client from a shared SDK config, pinned to `region`.
    pub fn from_sdk_config(sdk_config: &aws_config::SdkConfig, region: &str) -> Self {
        let config = aws_sdk_s3::config::Builder::from(sdk_config)
            .region(Region::new(region.to_string()))
            .build();
        Self::new(Client::from_conf(config), region)
    }

    fn bucket_configuration(&self) -> Option<CreateBucketConfiguration> {
        if self.region == DEFAULT_S3_REGION {
            return None;
        }
        Some(
            CreateBucketConfiguration::builder()
                .location_constraint(BucketLocationConstraint::from(self.region.as_str()))
                .build(),
        )
    }
}

fn storage_error(action: &str, err: impl std::error::Error) -> DigestError {
    DigestError::Storage(format!("{action}: {}", DisplayErrorContext(err)))
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn list_buckets(&self) -> Result<Vec<String>> {
        let output = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(|e| storage_error("failed to list buckets", e))?;

        Ok(output
            .buckets()
            .iter()
            .filter_map(|b| b.name())
            .map(str::to_string)
            .collect())
    }

    async fn create_bucket(&self, bucket: &str) -> Result<()> {
        self.client
            .create_bucket()
            .bucket(bucket)
            .set_create_bucket_configuration(self.bucket_configuration())
            .send()
            .await
            .map_err(|e| storage_error(&format!("failed to create bucket '{bucket}'"), e))?;

        tracing::info!(bucket, region = %self.region, "created bucket");
        Ok(())
    }

    async fn list_objects(&self, bucket: &str) -> Result<Vec<String>> {
        let mut pages = self
            .client
            .list_objects_v2()
            .bucket(bucket)
            .into_paginator()
            .send();

        let mut keys = Vec::new();
        while let Some(page) = pages.next().await {
            let page = page
                .map_err(|e| storage_error(&format!("failed to list objects in '{bucket}'"), e))?;
            keys.extend(
                page.contents()
                    .iter()
                    .filter_map(|o| o.key())
                    .map(str::to_string),
            );
        }

        Ok(keys)
    }

    async fn upload_object(&self, bucket: &str, key: &str, local_path: &Path) -> Result<()> {
        let body = ByteStream::from_path(local_path).await.map_err(|e| {
            DigestError::Storage(format!(
                "failed to read {}: {}",
                local_path.display(),
                e
            ))
        })?;

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(|e| storage_error(&format!("failed to upload s3://{bucket}/{key}"), e))?;

        Ok(())
    }

    async fn get_object(&self, bucket: &str, key: &str) -> Result<Vec<u8>> {
        let output = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| storage_error(&format!("failed to fetch s3://{bucket}/{key}"), e))?;

        let body = output.body.collect().await.map_err(|e| {
            DigestError::Storage(format!("failed to read body of s3://{bucket}/{key}: {e}"))
        })?;

        Ok(body.into_bytes().to_vec())
    }
}
