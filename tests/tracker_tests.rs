use std::sync::Arc;

use chrono::{Duration, Utc};
use storage_gateway::error::StorageError;
use storage_gateway::upload::models::{UploadMetadata, UploadStatus};
use storage_gateway::upload::UploadTracker;

fn sample_upload(upload_id: &str) -> UploadMetadata {
    UploadMetadata::initiated(
        upload_id.to_string(),
        "photos/test.png".to_string(),
        "image/png".to_string(),
    )
}

#[test]
fn test_track_and_get() {
    let tracker = UploadTracker::new();
    tracker.track(sample_upload("u1"));

    let upload = tracker.get("u1").expect("upload should exist");
    assert_eq!(upload.upload_id, "u1");
    assert_eq!(upload.file_name, "photos/test.png");
    assert_eq!(upload.content_type, "image/png");
    assert_eq!(upload.status, UploadStatus::Initiated);
    assert_eq!(upload.location, None);
}

#[test]
fn test_get_not_found() {
    let tracker = UploadTracker::new();

    let err = tracker.get("never-tracked").unwrap_err();
    assert!(matches!(
        err,
        StorageError::UploadNotFound { ref upload_id } if upload_id == "never-tracked"
    ));
}

#[test]
fn test_track_replaces_whole_record() {
    let tracker = UploadTracker::new();
    tracker.track(sample_upload("u1"));

    let replacement = tracker
        .get("u1")
        .unwrap()
        .completed("https://bucket.example/photos/test.png".to_string());
    tracker.track(replacement);

    let upload = tracker.get("u1").unwrap();
    assert_eq!(upload.status, UploadStatus::Completed);
    assert_eq!(
        upload.location,
        Some("https://bucket.example/photos/test.png".to_string())
    );
}

#[test]
fn test_track_overwrite_is_last_writer_wins() {
    let tracker = UploadTracker::new();

    let mut first = sample_upload("u1");
    first.status = UploadStatus::Failed;
    tracker.track(first);

    // Second record has no trace of the first one's fields
    let mut second = sample_upload("u1");
    second.file_name = "other/key.bin".to_string();
    second.content_type = "application/octet-stream".to_string();
    tracker.track(second);

    let upload = tracker.get("u1").unwrap();
    assert_eq!(upload.file_name, "other/key.bin");
    assert_eq!(upload.status, UploadStatus::Initiated);
    assert_eq!(upload.location, None);
}

#[test]
fn test_list_all_newest_first() {
    let tracker = UploadTracker::new();

    let mut older = sample_upload("u1");
    older.created_at = Utc::now() - Duration::minutes(10);
    let mut newer = sample_upload("u2");
    newer.created_at = Utc::now();

    tracker.track(older);
    tracker.track(newer);

    let uploads = tracker.list_all();
    assert_eq!(uploads.len(), 2);
    assert_eq!(uploads[0].upload_id, "u2");
    assert_eq!(uploads[1].upload_id, "u1");
}

#[test]
fn test_list_all_empty() {
    let tracker = UploadTracker::new();
    assert!(tracker.list_all().is_empty());
}

#[test]
fn test_remove_is_idempotent() {
    let tracker = UploadTracker::new();
    tracker.track(sample_upload("u1"));

    tracker.remove("u1");
    assert!(tracker.get("u1").is_err());

    // Removing an absent id twice is a no-op, not an error
    tracker.remove("missing");
    tracker.remove("missing");
    assert!(tracker.list_all().is_empty());
}

#[test]
fn test_metadata_wire_format_is_camel_case() {
    let tracker = UploadTracker::new();
    tracker.track(
        sample_upload("u1").completed("https://bucket.example/photos/test.png".to_string()),
    );

    let json = serde_json::to_value(tracker.list_all()).unwrap();
    let upload = &json[0];
    assert_eq!(upload["uploadId"], "u1");
    assert_eq!(upload["fileName"], "photos/test.png");
    assert_eq!(upload["contentType"], "image/png");
    assert_eq!(upload["status"], "Completed");
    assert_eq!(upload["location"], "https://bucket.example/photos/test.png");
    assert!(upload["createdAt"].is_string());
}

#[test]
fn test_concurrent_track_same_key() {
    let tracker = Arc::new(UploadTracker::new());

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let tracker = Arc::clone(&tracker);
            std::thread::spawn(move || {
                for _ in 0..100 {
                    let mut upload = sample_upload("shared");
                    upload.file_name = format!("writer-{i}.bin");
                    tracker.track(upload);
                    tracker.remove("missing");
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    // One of the writers won; the record is intact either way
    let upload = tracker.get("shared").unwrap();
    assert!(upload.file_name.starts_with("writer-"));
    assert_eq!(tracker.list_all().len(), 1);
}

#[test]
fn test_concurrent_track_distinct_keys() {
    let tracker = Arc::new(UploadTracker::new());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let tracker = Arc::clone(&tracker);
            std::thread::spawn(move || {
                for j in 0..50 {
                    tracker.track(sample_upload(&format!("u-{i}-{j}")));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(tracker.list_all().len(), 200);
}
