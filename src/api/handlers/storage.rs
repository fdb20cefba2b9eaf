use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::response::{ApiError, AppJson, AppQuery, RequestContext};
use crate::upload::models::{MultipartUploadInfo, PartETag, UploadMetadata};
use crate::AppState;

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUploadRequest {
    pub file_name: String,
    pub content_type: String,
    #[serde(default)]
    pub expiration_minutes: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitiateMultipartRequest {
    pub file_name: String,
    pub content_type: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultipartPartUrlRequest {
    pub file_name: String,
    pub upload_id: String,
    pub part_number: i32,
    #[serde(default)]
    pub expiration_minutes: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteMultipartRequest {
    pub file_name: String,
    pub upload_id: String,
    pub parts: Vec<PartETag>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresignedGetParams {
    pub file_name: String,
    #[serde(default)]
    pub expiration_minutes: Option<i64>,
}

#[derive(Debug, Serialize)]
pub struct UrlResponse {
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct LocationResponse {
    pub location: String,
}

// ============================================================================
// Handlers
// ============================================================================

pub async fn presigned_upload_url(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    AppJson(req): AppJson<PresignedUploadRequest>,
) -> Result<Json<UrlResponse>, ApiError> {
    let url = state
        .orchestrator
        .presigned_upload_url(&req.file_name, &req.content_type, req.expiration_minutes)
        .await
        .map_err(|e| ApiError::from_storage(&ctx, e))?;

    Ok(Json(UrlResponse { url }))
}

pub async fn initiate_multipart_upload(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    AppJson(req): AppJson<InitiateMultipartRequest>,
) -> Result<Json<MultipartUploadInfo>, ApiError> {
    let info = state
        .orchestrator
        .initiate_multipart(&req.file_name, &req.content_type)
        .await
        .map_err(|e| ApiError::from_storage(&ctx, e))?;

    state.tracker.track(UploadMetadata::initiated(
        info.upload_id.clone(),
        info.file_name.clone(),
        req.content_type,
    ));

    Ok(Json(info))
}

pub async fn multipart_part_url(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    AppJson(req): AppJson<MultipartPartUrlRequest>,
) -> Result<Json<UrlResponse>, ApiError> {
    let url = state
        .orchestrator
        .part_upload_url(
            &req.file_name,
            &req.upload_id,
            req.part_number,
            req.expiration_minutes,
        )
        .await
        .map_err(|e| ApiError::from_storage(&ctx, e))?;

    Ok(Json(UrlResponse { url }))
}

pub async fn complete_multipart_upload(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    AppJson(req): AppJson<CompleteMultipartRequest>,
) -> Result<Json<LocationResponse>, ApiError> {
    let location = state
        .orchestrator
        .complete_multipart(&req.file_name, &req.upload_id, &req.parts)
        .await
        .map_err(|e| ApiError::from_storage(&ctx, e))?;

    // Move the tracked record to Completed. An untracked upload id is a 404
    // even though the object was finalized; the tracker is the system of
    // record for upload state.
    let existing = state
        .tracker
        .get(&req.upload_id)
        .map_err(|e| ApiError::from_storage(&ctx, e))?;
    state.tracker.track(existing.completed(location.clone()));

    Ok(Json(LocationResponse { location }))
}

pub async fn list_uploads(State(state): State<Arc<AppState>>) -> Json<Vec<UploadMetadata>> {
    Json(state.tracker.list_all())
}

pub async fn presigned_download_url(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    AppQuery(params): AppQuery<PresignedGetParams>,
) -> Result<Json<UrlResponse>, ApiError> {
    let url = state
        .orchestrator
        .presigned_download_url(&params.file_name, params.expiration_minutes)
        .await
        .map_err(|e| ApiError::from_storage(&ctx, e))?;

    Ok(Json(UrlResponse { url }))
}

pub async fn presigned_view_url(
    State(state): State<Arc<AppState>>,
    ctx: RequestContext,
    AppQuery(params): AppQuery<PresignedGetParams>,
) -> Result<Json<UrlResponse>, ApiError> {
    let url = state
        .orchestrator
        .presigned_view_url(&params.file_name, params.expiration_minutes)
        .await
        .map_err(|e| ApiError::from_storage(&ctx, e))?;

    Ok(Json(UrlResponse { url }))
}
