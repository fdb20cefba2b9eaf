use dashmap::DashMap;

use super::models::UploadMetadata;
use crate::error::StorageError;

/// In-memory store of upload metadata, keyed by upload id.
///
/// Backed by a sharded concurrent map: individual track/remove calls are
/// atomic per key, and no coarse lock serializes unrelated requests. State
/// lives for the process lifetime only -- there is no expiry and no
/// persistence, removal is always an explicit caller operation.
#[derive(Default)]
pub struct UploadTracker {
    uploads: DashMap<String, UploadMetadata>,
}

impl UploadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or fully replace the record for `metadata.upload_id`.
    /// Last writer wins on concurrent calls for the same key; no merging.
    /// Status overwrites are accepted as-is -- callers own transition validity.
    pub fn track(&self, metadata: UploadMetadata) {
        tracing::debug!(
            upload_id = %metadata.upload_id,
            file_name = %metadata.file_name,
            status = ?metadata.status,
            "Tracking upload"
        );
        self.uploads.insert(metadata.upload_id.clone(), metadata);
    }

    /// Look up a tracked upload.
    pub fn get(&self, upload_id: &str) -> Result<UploadMetadata, StorageError> {
        self.uploads
            .get(upload_id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| {
                tracing::warn!(upload_id, "Upload not found");
                StorageError::UploadNotFound {
                    upload_id: upload_id.to_string(),
                }
            })
    }

    /// All tracked uploads, most recently created first.
    pub fn list_all(&self) -> Vec<UploadMetadata> {
        let mut uploads: Vec<UploadMetadata> = self
            .uploads
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        uploads.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        uploads
    }

    /// Remove a tracked upload. Removing an absent id is a no-op.
    pub fn remove(&self, upload_id: &str) {
        let removed = self.uploads.remove(upload_id).is_some();
        tracing::debug!(upload_id, removed, "Remove upload");
    }
}
