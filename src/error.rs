use thiserror::Error;

use crate::signer::SignerError;

/// Phase of the multipart workflow in which a failure occurred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MultipartPhase {
    Initiate,
    PartUrl,
    Complete,
}

impl std::fmt::Display for MultipartPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MultipartPhase::Initiate => write!(f, "initiate"),
            MultipartPhase::PartUrl => write!(f, "part-url"),
            MultipartPhase::Complete => write!(f, "complete"),
        }
    }
}

/// Closed set of failures surfaced by the orchestrator and tracker.
/// Each variant carries the context the API layer needs to build a response.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("{message}")]
    InvalidRequest {
        field: &'static str,
        message: String,
    },
    #[error("Upload with ID '{upload_id}' was not found")]
    UploadNotFound { upload_id: String },
    #[error("Failed to generate presigned URL for file '{file_name}'")]
    PresignedUrlGeneration {
        file_name: String,
        #[source]
        source: SignerError,
    },
    #[error("{message}")]
    MultipartUpload {
        phase: MultipartPhase,
        message: String,
        file_name: Option<String>,
        upload_id: Option<String>,
        #[source]
        source: Option<SignerError>,
    },
    #[error("{0}")]
    Unexpected(String),
}

impl StorageError {
    pub fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        StorageError::InvalidRequest {
            field,
            message: message.into(),
        }
    }
}
