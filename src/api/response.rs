use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts, Request};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StorageError;

// ============================================================================
// Problem-details body
// ============================================================================

/// Structured error body returned by every failing endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    pub status: u16,
    pub title: String,
    pub detail: String,
    pub instance: String,
    pub trace_id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upload_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

/// An error ready to be rendered as a problem-details response.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    problem: Problem,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/problem+json")],
            Json(self.problem),
        )
            .into_response()
    }
}

// ============================================================================
// Request context (correlation id + instance path)
// ============================================================================

/// Per-request correlation data used when building error responses.
/// The trace id comes from the x-request-id header set by the request-id
/// middleware; a fresh UUID is generated if the header is missing.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub instance: String,
    pub trace_id: String,
}

impl RequestContext {
    fn from_parts(parts: &axum::http::request::Parts) -> Self {
        let trace_id = parts
            .headers
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        Self {
            instance: parts.uri.path().to_string(),
            trace_id,
        }
    }

    fn from_request(req: &Request) -> Self {
        let trace_id = req
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        Self {
            instance: req.uri().path().to_string(),
            trace_id,
        }
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        Ok(RequestContext::from_parts(parts))
    }
}

// ============================================================================
// StorageError -> response mapping (single conversion point)
// ============================================================================

impl ApiError {
    /// Convert a domain error into a problem-details response and log it with
    /// the correlation id. Internal causes are never exposed to the caller.
    pub fn from_storage(ctx: &RequestContext, err: StorageError) -> Self {
        let (status, title, detail) = match &err {
            StorageError::InvalidRequest { .. } => {
                (StatusCode::BAD_REQUEST, "Invalid Request", err.to_string())
            }
            StorageError::UploadNotFound { .. } => {
                (StatusCode::NOT_FOUND, "Upload Not Found", err.to_string())
            }
            StorageError::PresignedUrlGeneration { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "URL Generation Failed",
                "Failed to generate presigned URL. Please try again.".to_string(),
            ),
            StorageError::MultipartUpload { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Upload Failed",
                err.to_string(),
            ),
            StorageError::Unexpected(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal Server Error",
                "An unexpected error occurred. Please try again later.".to_string(),
            ),
        };

        let (upload_id, file_name) = match &err {
            StorageError::UploadNotFound { upload_id } => (Some(upload_id.clone()), None),
            StorageError::PresignedUrlGeneration { file_name, .. } => {
                (None, Some(file_name.clone()))
            }
            StorageError::MultipartUpload {
                upload_id,
                file_name,
                ..
            } => (upload_id.clone(), file_name.clone()),
            _ => (None, None),
        };

        if status.is_server_error() {
            tracing::error!(
                trace_id = %ctx.trace_id,
                instance = %ctx.instance,
                error = %err,
                "Request failed"
            );
        } else {
            tracing::warn!(
                trace_id = %ctx.trace_id,
                instance = %ctx.instance,
                error = %err,
                "Request rejected"
            );
        }

        Self {
            status,
            problem: Problem {
                status: status.as_u16(),
                title: title.to_string(),
                detail,
                instance: ctx.instance.clone(),
                trace_id: ctx.trace_id.clone(),
                timestamp: Utc::now(),
                upload_id,
                file_name,
            },
        }
    }

    fn bad_request(ctx: &RequestContext, detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            problem: Problem {
                status: StatusCode::BAD_REQUEST.as_u16(),
                title: "Invalid Request".to_string(),
                detail: detail.into(),
                instance: ctx.instance.clone(),
                trace_id: ctx.trace_id.clone(),
                timestamp: Utc::now(),
                upload_id: None,
                file_name: None,
            },
        }
    }
}

// ============================================================================
// Custom extractors (reject with problem-details bodies)
// ============================================================================

/// Drop-in replacement for `axum::Json` that rejects with a problem body.
pub struct AppJson<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for AppJson<T>
where
    axum::Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, ApiError> {
        let ctx = RequestContext::from_request(&req);
        match axum::Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(AppJson(value)),
            Err(rejection) => {
                let detail = match rejection {
                    JsonRejection::JsonDataError(err) => {
                        format!("Invalid request body: {}", err.body_text())
                    }
                    JsonRejection::JsonSyntaxError(_) => "Malformed JSON in request body".into(),
                    JsonRejection::MissingJsonContentType(_) => {
                        "Missing Content-Type: application/json header".into()
                    }
                    _ => "Failed to read request body".into(),
                };
                Err(ApiError::bad_request(&ctx, detail))
            }
        }
    }
}

/// Drop-in replacement for `axum::extract::Query` that rejects with a problem body.
pub struct AppQuery<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequestParts<S> for AppQuery<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, ApiError> {
        let ctx = RequestContext::from_parts(parts);
        let query = parts.uri.query().unwrap_or_default();
        serde_qs::from_str(query)
            .map(AppQuery)
            .map_err(|e| ApiError::bad_request(&ctx, friendly_query_error(&e.to_string())))
    }
}

/// Translate serde/serde_qs error messages into human-friendly descriptions.
fn friendly_query_error(raw: &str) -> String {
    let cleaned = raw
        .replace("i32", "integer")
        .replace("i64", "integer")
        .replace("u32", "non-negative integer")
        .replace("u64", "non-negative integer");

    format!("Invalid query parameter: {cleaned}")
}
