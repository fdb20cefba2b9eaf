use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle of a tracked multipart upload. Transitions only move forward:
/// Initiated -> (InProgress) -> Completed, or -> Failed from any non-terminal
/// state. The tracker does not enforce this; callers supply valid transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UploadStatus {
    Initiated,
    InProgress,
    Completed,
    Failed,
}

/// One record per multipart upload, keyed by the store-assigned upload id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadMetadata {
    pub upload_id: String,
    pub file_name: String,
    pub content_type: String,
    pub created_at: DateTime<Utc>,
    pub status: UploadStatus,
    /// Final object location; set only once the upload is Completed.
    #[serde(default)]
    pub location: Option<String>,
}

impl UploadMetadata {
    /// Fresh record for a just-initiated upload.
    pub fn initiated(upload_id: String, file_name: String, content_type: String) -> Self {
        Self {
            upload_id,
            file_name,
            content_type,
            created_at: Utc::now(),
            status: UploadStatus::Initiated,
            location: None,
        }
    }

    /// The same record moved to Completed with its final location.
    pub fn completed(self, location: String) -> Self {
        Self {
            status: UploadStatus::Completed,
            location: Some(location),
            ..self
        }
    }
}

/// Part number / ETag pair submitted when finalizing a multipart upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartETag {
    pub part_number: i32,
    pub e_tag: String,
}

/// Identifiers returned by a successful multipart initiation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultipartUploadInfo {
    pub upload_id: String,
    pub file_name: String,
}
