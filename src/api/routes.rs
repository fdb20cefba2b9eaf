use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

use super::handlers;
use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        // Presigned single-shot upload
        .route("/upload/presigned-url", post(handlers::presigned_upload_url))
        // Multipart workflow
        .route(
            "/upload/multipart/initiate",
            post(handlers::initiate_multipart_upload),
        )
        .route(
            "/upload/multipart/part-url",
            post(handlers::multipart_part_url),
        )
        .route(
            "/upload/multipart/complete",
            post(handlers::complete_multipart_upload),
        )
        // Tracked uploads
        .route("/uploads", get(handlers::list_uploads))
        // Presigned reads
        .route(
            "/download/presigned-url",
            get(handlers::presigned_download_url),
        )
        .route("/view/presigned-url", get(handlers::presigned_view_url))
        // Internal
        .route("/_internal/health", get(handlers::health));

    if state.config.cors_allow_all {
        tracing::warn!("CORS_ALLOW_ALL enabled — responding to any origin.");
        router = router.layer(CorsLayer::permissive());
    }

    // Request id is set outermost so the trace span and handlers both see it.
    router
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}
