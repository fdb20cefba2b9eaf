use std::time::Duration;

use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::types::{CompletedMultipartUpload, CompletedPart};
use aws_sdk_s3::Client;

use super::{Disposition, SignerError, UrlSigner};
use crate::config::StorageConfig;
use crate::upload::models::PartETag;

/// S3-compatible URL signer backed by the AWS SDK.
/// Works against AWS proper or any compatible endpoint (MinIO, Backblaze B2).
pub struct S3Signer {
    bucket: String,
    region: String,
    endpoint: Option<String>,
    client: Client,
}

impl S3Signer {
    pub async fn new(config: &StorageConfig) -> Self {
        let base = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&base);
        if let Some(ref endpoint) = config.endpoint {
            builder = builder.endpoint_url(endpoint);
        }
        if config.force_path_style {
            builder = builder.force_path_style(true);
        }
        // Static credentials when configured, otherwise the default provider chain
        if let (Some(key_id), Some(secret)) = (
            config.access_key_id.as_deref(),
            config.secret_access_key.as_deref(),
        ) {
            builder = builder.credentials_provider(Credentials::new(
                key_id,
                secret,
                None,
                None,
                "storage-gateway",
            ));
        }

        Self {
            bucket: config.bucket.clone(),
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
            client: Client::from_conf(builder.build()),
        }
    }

    fn presigning(expires_in: Duration) -> Result<PresigningConfig, SignerError> {
        PresigningConfig::expires_in(expires_in).map_err(|e| SignerError::Presign(e.to_string()))
    }

    /// Fallback object location when the store omits one in its response.
    fn object_location(&self, key: &str) -> String {
        match self.endpoint {
            Some(ref endpoint) => {
                format!("{}/{}/{}", endpoint.trim_end_matches('/'), self.bucket, key)
            }
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                self.bucket, self.region, key
            ),
        }
    }
}

#[async_trait]
impl UrlSigner for S3Signer {
    async fn presigned_put_url(
        &self,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> Result<String, SignerError> {
        let presigned = self
            .client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .presigned(Self::presigning(expires_in)?)
            .await
            .map_err(|e| SignerError::Backend(e.to_string()))?;

        Ok(presigned.uri().to_string())
    }

    async fn presigned_get_url(
        &self,
        key: &str,
        disposition: Disposition,
        expires_in: Duration,
    ) -> Result<String, SignerError> {
        let filename = key.rsplit('/').next().unwrap_or(key);
        let content_disposition = match disposition {
            Disposition::Inline => format!("inline; filename=\"{filename}\""),
            Disposition::Attachment => format!("attachment; filename=\"{filename}\""),
        };

        let presigned = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .response_content_disposition(content_disposition)
            .presigned(Self::presigning(expires_in)?)
            .await
            .map_err(|e| SignerError::Backend(e.to_string()))?;

        Ok(presigned.uri().to_string())
    }

    async fn initiate_multipart(
        &self,
        key: &str,
        content_type: &str,
    ) -> Result<String, SignerError> {
        let output = self
            .client
            .create_multipart_upload()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| SignerError::Backend(e.to_string()))?;

        let upload_id = output
            .upload_id()
            .ok_or_else(|| SignerError::Backend("store returned no upload id".to_string()))?;

        tracing::info!(key, upload_id, "Multipart upload initiated");
        Ok(upload_id.to_string())
    }

    async fn presigned_part_url(
        &self,
        key: &str,
        upload_id: &str,
        part_number: i32,
        expires_in: Duration,
    ) -> Result<String, SignerError> {
        let presigned = self
            .client
            .upload_part()
            .bucket(&self.bucket)
            .key(key)
            .upload_id(upload_id)
            .part_number(part_number)
            .presigned(Self::presigning(expires_in)?)
            .await
            .map_err(|e| SignerError::Backend(e.to_string()))?;

        Ok(presigned.uri().to_string())
    }

    async fn complete_multipart(
        &self,
        key: &str,
        upload_id: &str,
        parts: &[PartETag],
    ) -> Result<String, SignerError> {
        let completed = CompletedMultipartUpload::builder()
            .set_parts(Some(
                parts
                    .iter()
                    .map(|p| {
                        CompletedPart::builder()
                            .part_number(p.part_number)
                            .e_tag(&p.e_tag)
                            .build()
                    })
                    .collect(),
            ))
            .build();

        let output = self
            .client
            .complete_multipart_upload()
            .bucket(&self.bucket)
            .key(key)
            .upload_id(upload_id)
            .multipart_upload(completed)
            .send()
            .await
            .map_err(|e| SignerError::Backend(e.to_string()))?;

        let location = output
            .location()
            .map(str::to_string)
            .unwrap_or_else(|| self.object_location(key));

        tracing::info!(key, upload_id, %location, "Multipart upload completed");
        Ok(location)
    }
}
