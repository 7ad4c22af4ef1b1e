use super::storage_repository::StorageRepository;
use crate::domain::speech::{SpeechError, StoredAsset, Visibility};
use async_trait::async_trait;
use aws_sdk_s3::{primitives::ByteStream, types::ObjectCannedAcl, Client as S3Client};
use std::sync::Arc;

/// AWS S3 implementation of the storage repository
pub struct S3StorageRepository {
    s3_client: Arc<S3Client>,
    region: String,
}

impl S3StorageRepository {
    pub fn new(s3_client: Arc<S3Client>, region: String) -> Self {
        Self { s3_client, region }
    }

    /// Virtual-hosted style URL of a public object.
    /// `PutObject` does not return a location, so it is built from the key.
    pub fn public_uri(&self, bucket: &str, key: &str) -> String {
        let encoded_key = key
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect::<Vec<_>>()
            .join("/");

        format!(
            "https://{}.s3.{}.amazonaws.com/{}",
            bucket, self.region, encoded_key
        )
    }

    fn canned_acl(visibility: Visibility) -> ObjectCannedAcl {
        match visibility {
            Visibility::PublicRead => ObjectCannedAcl::PublicRead,
        }
    }
}

#[async_trait]
impl StorageRepository for S3StorageRepository {
    async fn put(&self, asset: &StoredAsset, body: Vec<u8>) -> Result<String, SpeechError> {
        let size = body.len();

        tracing::debug!(
            bucket = %asset.bucket,
            key = %asset.key,
            content_type = %asset.content_type,
            size_bytes = size,
            "Uploading object to S3"
        );

        self.s3_client
            .put_object()
            .bucket(&asset.bucket)
            .key(&asset.key)
            .body(ByteStream::from(body))
            .content_type(&asset.content_type)
            .acl(Self::canned_acl(asset.visibility))
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = ?e,
                    error_display = %e,
                    bucket = %asset.bucket,
                    key = %asset.key,
                    "S3 put_object failed"
                );
                SpeechError::Storage(format!("S3 upload of '{}' failed: {}", asset.key, e))
            })?;

        let uri = self.public_uri(&asset.bucket, &asset.key);
        tracing::info!(key = %asset.key, size_bytes = size, uri = %uri, "Object uploaded");

        Ok(uri)
    }

    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, SpeechError> {
        let output = self
            .s3_client
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = ?e,
                    error_display = %e,
                    bucket = %bucket,
                    key = %key,
                    "S3 get_object failed"
                );
                SpeechError::Storage(format!("S3 download of '{}' failed: {}", key, e))
            })?;

        let data = output.body.collect().await.map_err(|e| {
            tracing::error!(error = %e, key = %key, "Failed to read S3 object body");
            SpeechError::Storage(format!("failed to read '{}': {}", key, e))
        })?;

        let bytes = data.into_bytes().to_vec();
        tracing::debug!(key = %key, size_bytes = bytes.len(), "Object downloaded");

        Ok(bytes)
    }
}
