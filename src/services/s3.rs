use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::{BucketLocationConstraint, CreateBucketConfiguration};
use aws_sdk_s3::Client;

use crate::error::{AppError, Result};

use super::BlobStore;

const DEFAULT_REGION: &str = "us-east-1";

/// Buckets in the default region must be created without a location
/// constraint; every other region requires one.
pub fn location_constraint(region: &str) -> Option<&str> {
    if region == DEFAULT_REGION {
        None
    } else {
        Some(region)
    }
}

pub struct S3BlobStore {
    client: Client,
    bucket: String,
    region: String,
}

impl S3BlobStore {
    pub fn new(sdk_config: &aws_config::SdkConfig, bucket: String, region: String) -> Self {
        Self {
            client: Client::new(sdk_config),
            bucket,
            region,
        }
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    fn container(&self) -> &str {
        &self.bucket
    }

    async fn container_exists(&self) -> Result<bool> {
        match self.client.head_bucket().bucket(&self.bucket).send().await {
            Ok(_) => Ok(true),
            Err(e) if e.as_service_error().map(|se| se.is_not_found()).unwrap_or(false) => Ok(false),
            Err(e) => Err(AppError::BlobStore(format!(
                "HeadBucket {} failed: {}",
                self.bucket,
                DisplayErrorContext(&e)
            ))),
        }
    }

    async fn create_container(&self) -> Result<()> {
        let mut request = self.client.create_bucket().bucket(&self.bucket);

        if let Some(region) = location_constraint(&self.region) {
            request = request.create_bucket_configuration(
                CreateBucketConfiguration::builder()
                    .location_constraint(BucketLocationConstraint::from(region))
                    .build(),
            );
        }

        request.send().await.map_err(|e| {
            AppError::BlobStore(format!(
                "CreateBucket {} failed: {}",
                self.bucket,
                DisplayErrorContext(&e)
            ))
        })?;
        Ok(())
    }

    async fn put_object(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                AppError::BlobStore(format!(
                    "PutObject s3://{}/{} failed: {}",
                    self.bucket,
                    key,
                    DisplayErrorContext(&e)
                ))
            })?;
        Ok(())
    }
}
