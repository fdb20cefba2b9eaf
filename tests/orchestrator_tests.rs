use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use storage_gateway::error::{MultipartPhase, StorageError};
use storage_gateway::signer::{Disposition, SignerError, UrlSigner};
use storage_gateway::upload::models::{PartETag, UploadMetadata, UploadStatus};
use storage_gateway::upload::{UploadOrchestrator, UploadTracker};

/// Signer double that records calls and either succeeds with canned values or
/// fails every operation.
struct MockSigner {
    calls: AtomicUsize,
    fail: bool,
    received_parts: Mutex<Vec<i32>>,
}

impl MockSigner {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail: false,
            received_parts: Mutex::new(Vec::new()),
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail: true,
            received_parts: Mutex::new(Vec::new()),
        })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> Result<(), SignerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(SignerError::Backend("injected failure".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl UrlSigner for MockSigner {
    async fn presigned_put_url(
        &self,
        key: &str,
        _content_type: &str,
        _expires_in: Duration,
    ) -> Result<String, SignerError> {
        self.check()?;
        Ok(format!("https://signed.example/{key}?verb=put"))
    }

    async fn presigned_get_url(
        &self,
        key: &str,
        disposition: Disposition,
        _expires_in: Duration,
    ) -> Result<String, SignerError> {
        self.check()?;
        let hint = match disposition {
            Disposition::Inline => "inline",
            Disposition::Attachment => "attachment",
        };
        Ok(format!("https://signed.example/{key}?disposition={hint}"))
    }

    async fn initiate_multipart(
        &self,
        _key: &str,
        _content_type: &str,
    ) -> Result<String, SignerError> {
        self.check()?;
        Ok("upload-abc".to_string())
    }

    async fn presigned_part_url(
        &self,
        key: &str,
        upload_id: &str,
        part_number: i32,
        _expires_in: Duration,
    ) -> Result<String, SignerError> {
        self.check()?;
        Ok(format!(
            "https://signed.example/{key}?uploadId={upload_id}&partNumber={part_number}"
        ))
    }

    async fn complete_multipart(
        &self,
        key: &str,
        _upload_id: &str,
        parts: &[PartETag],
    ) -> Result<String, SignerError> {
        self.check()?;
        let mut received = self.received_parts.lock().unwrap();
        received.extend(parts.iter().map(|p| p.part_number));
        Ok(format!("https://bucket.example/{key}"))
    }
}

fn part(part_number: i32, e_tag: &str) -> PartETag {
    PartETag {
        part_number,
        e_tag: e_tag.to_string(),
    }
}

fn assert_invalid(err: StorageError, expected_field: &str) {
    match err {
        StorageError::InvalidRequest { field, .. } => assert_eq!(field, expected_field),
        other => panic!("expected InvalidRequest, got {other:?}"),
    }
}

// ============================================================================
// Validation short-circuits before any signer call
// ============================================================================

#[tokio::test]
async fn test_presigned_upload_url_rejects_out_of_range_expiry() {
    let signer = MockSigner::new();
    let orchestrator = UploadOrchestrator::new(signer.clone());

    for minutes in [0, -5, 10081] {
        let err = orchestrator
            .presigned_upload_url("a.png", "image/png", Some(minutes))
            .await
            .unwrap_err();
        assert_invalid(err, "expirationMinutes");
    }
    assert_eq!(signer.call_count(), 0);
}

#[tokio::test]
async fn test_expiry_bounds_are_inclusive() {
    let signer = MockSigner::new();
    let orchestrator = UploadOrchestrator::new(signer.clone());

    orchestrator
        .presigned_upload_url("a.png", "image/png", Some(1))
        .await
        .unwrap();
    orchestrator
        .presigned_upload_url("a.png", "image/png", Some(10080))
        .await
        .unwrap();
    assert_eq!(signer.call_count(), 2);
}

#[tokio::test]
async fn test_part_url_rejects_out_of_range_part_number() {
    let signer = MockSigner::new();
    let orchestrator = UploadOrchestrator::new(signer.clone());

    for part_number in [0, -1, 10001] {
        let err = orchestrator
            .part_upload_url("a.png", "upload-abc", part_number, Some(60))
            .await
            .unwrap_err();
        assert_invalid(err, "partNumber");
    }
    assert_eq!(signer.call_count(), 0);
}

#[tokio::test]
async fn test_empty_and_whitespace_identifiers_rejected() {
    let signer = MockSigner::new();
    let orchestrator = UploadOrchestrator::new(signer.clone());

    let err = orchestrator
        .presigned_upload_url("", "image/png", None)
        .await
        .unwrap_err();
    assert_invalid(err, "fileName");

    let err = orchestrator
        .presigned_upload_url("a.png", "   ", None)
        .await
        .unwrap_err();
    assert_invalid(err, "contentType");

    let err = orchestrator
        .part_upload_url("a.png", "  ", 1, None)
        .await
        .unwrap_err();
    assert_invalid(err, "uploadId");

    let err = orchestrator.presigned_download_url(" ", None).await.unwrap_err();
    assert_invalid(err, "fileName");

    assert_eq!(signer.call_count(), 0);
}

#[tokio::test]
async fn test_complete_rejects_empty_parts() {
    let signer = MockSigner::new();
    let orchestrator = UploadOrchestrator::new(signer.clone());

    let err = orchestrator
        .complete_multipart("a.png", "upload-abc", &[])
        .await
        .unwrap_err();
    assert_invalid(err, "parts");
    assert_eq!(signer.call_count(), 0);
}

// ============================================================================
// Delegation and error wrapping
// ============================================================================

#[tokio::test]
async fn test_initiate_returns_upload_info() {
    let orchestrator = UploadOrchestrator::new(MockSigner::new());

    let info = orchestrator
        .initiate_multipart("a.png", "image/png")
        .await
        .unwrap();
    assert_eq!(info.upload_id, "upload-abc");
    assert_eq!(info.file_name, "a.png");
}

#[tokio::test]
async fn test_complete_submits_parts_in_ascending_order() {
    let signer = MockSigner::new();
    let orchestrator = UploadOrchestrator::new(signer.clone());

    let parts = vec![part(3, "etag3"), part(1, "etag1"), part(2, "etag2")];
    orchestrator
        .complete_multipart("a.png", "upload-abc", &parts)
        .await
        .unwrap();

    let received = signer.received_parts.lock().unwrap();
    assert_eq!(*received, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_signer_failure_wraps_presign_error() {
    let orchestrator = UploadOrchestrator::new(MockSigner::failing());

    let err = orchestrator
        .presigned_upload_url("a.png", "image/png", None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StorageError::PresignedUrlGeneration { ref file_name, .. } if file_name == "a.png"
    ));
}

#[tokio::test]
async fn test_signer_failure_wraps_multipart_phases() {
    let orchestrator = UploadOrchestrator::new(MockSigner::failing());

    let err = orchestrator
        .initiate_multipart("a.png", "image/png")
        .await
        .unwrap_err();
    match err {
        StorageError::MultipartUpload {
            phase,
            file_name,
            upload_id,
            ..
        } => {
            assert_eq!(phase, MultipartPhase::Initiate);
            assert_eq!(file_name.as_deref(), Some("a.png"));
            assert_eq!(upload_id, None);
        }
        other => panic!("expected MultipartUpload, got {other:?}"),
    }

    let err = orchestrator
        .part_upload_url("a.png", "upload-abc", 1, None)
        .await
        .unwrap_err();
    match err {
        StorageError::MultipartUpload {
            phase, upload_id, ..
        } => {
            assert_eq!(phase, MultipartPhase::PartUrl);
            assert_eq!(upload_id.as_deref(), Some("upload-abc"));
        }
        other => panic!("expected MultipartUpload, got {other:?}"),
    }

    let err = orchestrator
        .complete_multipart("a.png", "upload-abc", &[part(1, "etag1")])
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        StorageError::MultipartUpload {
            phase: MultipartPhase::Complete,
            ..
        }
    ));
}

#[tokio::test]
async fn test_view_and_download_differ_only_in_disposition() {
    let orchestrator = UploadOrchestrator::new(MockSigner::new());

    let download = orchestrator
        .presigned_download_url("a.png", None)
        .await
        .unwrap();
    let view = orchestrator.presigned_view_url("a.png", None).await.unwrap();

    assert!(download.contains("disposition=attachment"));
    assert!(view.contains("disposition=inline"));
}

// ============================================================================
// End-to-end: initiate -> part URL -> complete -> tracked state
// ============================================================================

#[tokio::test]
async fn test_multipart_flow_updates_tracking() {
    let orchestrator = UploadOrchestrator::new(MockSigner::new());
    let tracker = UploadTracker::new();

    let info = orchestrator
        .initiate_multipart("a.png", "image/png")
        .await
        .unwrap();
    tracker.track(UploadMetadata::initiated(
        info.upload_id.clone(),
        info.file_name.clone(),
        "image/png".to_string(),
    ));
    assert_eq!(
        tracker.get(&info.upload_id).unwrap().status,
        UploadStatus::Initiated
    );

    let url = orchestrator
        .part_upload_url("a.png", &info.upload_id, 1, Some(60))
        .await
        .unwrap();
    assert!(url.contains("partNumber=1"));

    let location = orchestrator
        .complete_multipart("a.png", &info.upload_id, &[part(1, "etag1")])
        .await
        .unwrap();
    let existing = tracker.get(&info.upload_id).unwrap();
    tracker.track(existing.completed(location.clone()));

    let upload = tracker.get(&info.upload_id).unwrap();
    assert_eq!(upload.status, UploadStatus::Completed);
    assert_eq!(upload.location, Some(location));
}
