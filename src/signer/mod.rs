mod s3;

pub use s3::S3Signer;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::upload::models::PartETag;

#[derive(Debug, Error)]
pub enum SignerError {
    #[error("Presigning error: {0}")]
    Presign(String),
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Content-Disposition hint for presigned GET URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Render in the browser.
    Inline,
    /// Force a download.
    Attachment,
}

/// Abstraction over the object store's signing and multipart capabilities.
/// The store itself moves the bytes; this service only mints URLs and
/// finalizes multipart objects from part tags supplied by the caller.
#[async_trait]
pub trait UrlSigner: Send + Sync {
    /// Presigned PUT URL for a single-shot upload.
    async fn presigned_put_url(
        &self,
        key: &str,
        content_type: &str,
        expires_in: Duration,
    ) -> Result<String, SignerError>;

    /// Presigned GET URL with a disposition hint.
    async fn presigned_get_url(
        &self,
        key: &str,
        disposition: Disposition,
        expires_in: Duration,
    ) -> Result<String, SignerError>;

    /// Start a multipart upload, returning the store-assigned upload id.
    async fn initiate_multipart(&self, key: &str, content_type: &str)
        -> Result<String, SignerError>;

    /// Presigned PUT URL for one part of a multipart upload.
    async fn presigned_part_url(
        &self,
        key: &str,
        upload_id: &str,
        part_number: i32,
        expires_in: Duration,
    ) -> Result<String, SignerError>;

    /// Finalize a multipart upload from part tags, returning the object location.
    /// Parts must already be in ascending part-number order.
    async fn complete_multipart(
        &self,
        key: &str,
        upload_id: &str,
        parts: &[PartETag],
    ) -> Result<String, SignerError>;
}
