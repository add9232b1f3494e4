use crate::auth::AuthenticatedUser;
use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, Json};
use saasbase_core::models::{SecurityUpdate, UserProfile, UserProfileEdit};
use std::sync::Arc;

#[utoipa::path(
    get,
    path = "/user",
    tag = "user",
    responses(
        (status = 200, description = "Profile of the caller", body = UserProfile),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state), fields(user_id = %user.user_id, operation = "get_user"))]
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
) -> Result<Json<UserProfile>, HttpAppError> {
    let mut profile = state.users.get_user(&user.user_id).await?;
    if user.email.is_some() {
        profile.email = user.email;
    }
    Ok(Json(profile))
}

#[utoipa::path(
    post,
    path = "/user",
    tag = "user",
    request_body = UserProfileEdit,
    responses(
        (status = 200, description = "Profile updated", body = String),
        (status = 400, description = "Invalid profile fields", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, edit), fields(user_id = %user.user_id, operation = "edit_user"))]
pub async fn edit_user(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    ValidatedJson(edit): ValidatedJson<UserProfileEdit>,
) -> Result<Json<&'static str>, HttpAppError> {
    state.users.edit_user(&user.user_id, edit).await?;
    Ok(Json("OK"))
}

#[utoipa::path(
    post,
    path = "/user/security",
    tag = "user",
    request_body = SecurityUpdate,
    responses(
        (status = 200, description = "Credentials updated", body = String),
        (status = 400, description = "Nothing to change or invalid new values", body = ErrorResponse),
        (status = 401, description = "Missing token or wrong current password", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    ),
    security(("bearer_auth" = []))
)]
#[tracing::instrument(skip(state, update), fields(user_id = %user.user_id, operation = "update_security"))]
pub async fn update_security(
    State(state): State<Arc<AppState>>,
    user: AuthenticatedUser,
    ValidatedJson(update): ValidatedJson<SecurityUpdate>,
) -> Result<Json<&'static str>, HttpAppError> {
    state.users.update_security(&user.user_id, update).await?;
    Ok(Json("OK"))
}
