use crate::auth::AuthenticatedUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use saasbase_core::constants::AVATAR_CACHE_CONTROL;
use saasbase_core::models::{UploadRequest, UploadTicket};
use saasbase_core::AppError;
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/user/avatar",
    tag = "avatar",
    responses(
        (status = 200, description = "Avatar image, 200x200", body = Vec<u8>, content_type = "image/png"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 404, description = "No avatar uploaded", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(user_id = %user.user_id, operation = "get_avatar"))]
pub async fn get_avatar(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
) -> Result<Response, HttpAppError> {
    let avatar = state
        .avatars
        .get_avatar(&user.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Avatar not found".to_string()))?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, avatar.content_type.to_string()),
            (header::CONTENT_LENGTH, avatar.content_length().to_string()),
            (header::CACHE_CONTROL, AVATAR_CACHE_CONTROL.to_string()),
        ],
        avatar.data,
    )
        .into_response())
}

#[utoipa::path(
    post,
    path = "/user/avatar",
    tag = "avatar",
    request_body = UploadRequest,
    responses(
        (status = 200, description = "Presigned upload URL issued", body = UploadTicket),
        (status = 400, description = "Invalid file name or type", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 409, description = "A concurrent upload replaced the avatar first", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(
    skip(state, request),
    fields(user_id = %user.user_id, file_name = %request.file_name, operation = "upload_avatar")
)]
pub async fn upload_avatar(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    ValidatedJson(request): ValidatedJson<UploadRequest>,
) -> Result<Json<UploadTicket>, HttpAppError> {
    let ticket = state.avatars.replace_avatar(&user.user_id, &request).await?;
    Ok(Json(ticket))
}

#[utoipa::path(
    delete,
    path = "/user/avatar",
    tag = "avatar",
    responses(
        (status = 204, description = "Avatar removed"),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(user_id = %user.user_id, operation = "delete_avatar"))]
pub async fn delete_avatar(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
) -> Result<StatusCode, HttpAppError> {
    let removed = state.avatars.remove_avatar(&user.user_id).await?;
    tracing::info!(removed, "Avatar removed");
    Ok(StatusCode::NO_CONTENT)
}
