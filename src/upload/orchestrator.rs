use std::sync::Arc;
use std::time::Duration;

use super::models::{MultipartUploadInfo, PartETag};
use crate::error::{MultipartPhase, StorageError};
use crate::signer::{Disposition, UrlSigner};

/// Default URL lifetime when the caller does not supply one.
const DEFAULT_EXPIRATION_MINUTES: i64 = 60;
/// Seven days, the longest expiry the store will sign for.
const MAX_EXPIRATION_MINUTES: i64 = 10080;
/// Highest part number the store accepts in a multipart upload.
const MAX_PART_NUMBER: i32 = 10000;

/// Drives the presign and multipart workflows: validates inputs, delegates to
/// the signer, and wraps signer failures with domain context. Never retries;
/// every failure is surfaced to the caller immediately.
pub struct UploadOrchestrator {
    signer: Arc<dyn UrlSigner>,
}

impl UploadOrchestrator {
    pub fn new(signer: Arc<dyn UrlSigner>) -> Self {
        Self { signer }
    }

    /// Presigned PUT URL for a single-shot (non-multipart) upload.
    pub async fn presigned_upload_url(
        &self,
        file_name: &str,
        content_type: &str,
        expiration_minutes: Option<i64>,
    ) -> Result<String, StorageError> {
        require("fileName", file_name)?;
        require("contentType", content_type)?;
        let expires_in = expiration(expiration_minutes)?;

        tracing::debug!(file_name, content_type, "Generating presigned upload URL");

        self.signer
            .presigned_put_url(file_name, content_type, expires_in)
            .await
            .map_err(|source| {
                tracing::error!(file_name, error = %source, "Failed to generate presigned upload URL");
                StorageError::PresignedUrlGeneration {
                    file_name: file_name.to_string(),
                    source,
                }
            })
    }

    /// Start a multipart upload. The caller is responsible for tracking the
    /// returned upload id.
    pub async fn initiate_multipart(
        &self,
        file_name: &str,
        content_type: &str,
    ) -> Result<MultipartUploadInfo, StorageError> {
        require("fileName", file_name)?;
        require("contentType", content_type)?;

        tracing::info!(file_name, content_type, "Initiating multipart upload");

        let upload_id = self
            .signer
            .initiate_multipart(file_name, content_type)
            .await
            .map_err(|source| {
                tracing::error!(file_name, error = %source, "Failed to initiate multipart upload");
                StorageError::MultipartUpload {
                    phase: MultipartPhase::Initiate,
                    message: format!("Failed to initiate multipart upload for file '{file_name}'"),
                    file_name: Some(file_name.to_string()),
                    upload_id: None,
                    source: Some(source),
                }
            })?;

        Ok(MultipartUploadInfo {
            upload_id,
            file_name: file_name.to_string(),
        })
    }

    /// Presigned PUT URL for one part of an in-flight multipart upload.
    pub async fn part_upload_url(
        &self,
        file_name: &str,
        upload_id: &str,
        part_number: i32,
        expiration_minutes: Option<i64>,
    ) -> Result<String, StorageError> {
        require("fileName", file_name)?;
        require("uploadId", upload_id)?;
        if !(1..=MAX_PART_NUMBER).contains(&part_number) {
            return Err(StorageError::invalid(
                "partNumber",
                format!("Part number must be between 1 and {MAX_PART_NUMBER}"),
            ));
        }
        let expires_in = expiration(expiration_minutes)?;

        tracing::debug!(upload_id, part_number, "Generating presigned part URL");

        self.signer
            .presigned_part_url(file_name, upload_id, part_number, expires_in)
            .await
            .map_err(|source| {
                tracing::error!(upload_id, part_number, error = %source, "Failed to generate presigned part URL");
                StorageError::MultipartUpload {
                    phase: MultipartPhase::PartUrl,
                    message: format!("Failed to generate presigned URL for part {part_number}"),
                    file_name: Some(file_name.to_string()),
                    upload_id: Some(upload_id.to_string()),
                    source: Some(source),
                }
            })
    }

    /// Finalize a multipart upload from the caller's part tags and return the
    /// object location. Parts are submitted in ascending part-number order as
    /// the store requires.
    pub async fn complete_multipart(
        &self,
        file_name: &str,
        upload_id: &str,
        parts: &[PartETag],
    ) -> Result<String, StorageError> {
        require("fileName", file_name)?;
        require("uploadId", upload_id)?;
        if parts.is_empty() {
            return Err(StorageError::invalid(
                "parts",
                "Parts list cannot be empty",
            ));
        }

        let mut ordered = parts.to_vec();
        ordered.sort_by_key(|p| p.part_number);

        tracing::info!(
            upload_id,
            parts_count = ordered.len(),
            "Completing multipart upload"
        );

        self.signer
            .complete_multipart(file_name, upload_id, &ordered)
            .await
            .map_err(|source| {
                tracing::error!(upload_id, error = %source, "Failed to complete multipart upload");
                StorageError::MultipartUpload {
                    phase: MultipartPhase::Complete,
                    message: "Failed to complete multipart upload".to_string(),
                    file_name: Some(file_name.to_string()),
                    upload_id: Some(upload_id.to_string()),
                    source: Some(source),
                }
            })
    }

    /// Presigned GET URL that downloads as an attachment.
    pub async fn presigned_download_url(
        &self,
        file_name: &str,
        expiration_minutes: Option<i64>,
    ) -> Result<String, StorageError> {
        self.presigned_get_url(file_name, Disposition::Attachment, expiration_minutes)
            .await
    }

    /// Presigned GET URL that renders inline in the browser.
    pub async fn presigned_view_url(
        &self,
        file_name: &str,
        expiration_minutes: Option<i64>,
    ) -> Result<String, StorageError> {
        self.presigned_get_url(file_name, Disposition::Inline, expiration_minutes)
            .await
    }

    async fn presigned_get_url(
        &self,
        file_name: &str,
        disposition: Disposition,
        expiration_minutes: Option<i64>,
    ) -> Result<String, StorageError> {
        require("fileName", file_name)?;
        let expires_in = expiration(expiration_minutes)?;

        tracing::debug!(file_name, ?disposition, "Generating presigned GET URL");

        self.signer
            .presigned_get_url(file_name, disposition, expires_in)
            .await
            .map_err(|source| {
                tracing::error!(file_name, error = %source, "Failed to generate presigned GET URL");
                StorageError::PresignedUrlGeneration {
                    file_name: file_name.to_string(),
                    source,
                }
            })
    }
}

/// Reject empty or all-whitespace identifiers before touching the signer.
fn require(field: &'static str, value: &str) -> Result<(), StorageError> {
    if value.trim().is_empty() {
        return Err(StorageError::invalid(
            field,
            format!("{field} must not be empty"),
        ));
    }
    Ok(())
}

/// Validate the caller-supplied expiry and convert it to a duration.
fn expiration(minutes: Option<i64>) -> Result<Duration, StorageError> {
    let minutes = minutes.unwrap_or(DEFAULT_EXPIRATION_MINUTES);
    if !(1..=MAX_EXPIRATION_MINUTES).contains(&minutes) {
        return Err(StorageError::invalid(
            "expirationMinutes",
            format!("Expiration minutes must be between 1 and {MAX_EXPIRATION_MINUTES} (7 days)"),
        ));
    }
    Ok(Duration::from_secs(minutes as u64 * 60))
}
