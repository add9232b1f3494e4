//! Upload target standing in for presigned S3 URLs when objects live on the
//! local filesystem.
//!
//! Anyone who can reach the server may overwrite any object through this
//! route, so `STORAGE_BACKEND=local` is for development only.

use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
};
use bytes::Bytes;
use saasbase_core::AppError;
use std::sync::Arc;

#[utoipa::path(
    put,
    path = "/local-media/{key}",
    tag = "local-media",
    params(("key" = String, Path, description = "Object key from the issued upload URL")),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Object stored"),
        (status = 400, description = "Invalid key or empty body", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip(state, headers, body), fields(key = %key, size_bytes = body.len()))]
pub async fn put_object(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, HttpAppError> {
    if body.is_empty() {
        return Err(AppError::InvalidInput("Upload body is empty".to_string()).into());
    }
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream");

    state
        .storage
        .upload_with_key(&key, body.to_vec(), content_type)
        .await?;

    Ok(StatusCode::OK)
}
