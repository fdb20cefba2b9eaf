//! storage-gateway - HTTP API for S3 presigned URLs and multipart uploads
//!
//! This crate is a thin façade over an S3-compatible object store:
//! - Presigned upload/download/view URLs (clients move the bytes themselves)
//! - Multipart upload orchestration (initiate, per-part URL, complete)
//! - In-process tracking of upload state, queryable over HTTP

pub mod api;
pub mod config;
pub mod error;
pub mod signer;
pub mod upload;

use config::Config;
use upload::{UploadOrchestrator, UploadTracker};

/// Shared application state
pub struct AppState {
    pub config: Config,
    pub orchestrator: UploadOrchestrator,
    pub tracker: UploadTracker,
}
