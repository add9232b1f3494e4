use std::sync::Arc;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use saasbase_core::AppError;

use super::TokenVerifier;
use crate::error::HttpAppError;

#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<dyn TokenVerifier>,
}

fn bearer_token(request: &Request) -> Result<&str, AppError> {
    let header = request
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("Authorization token missing".to_string()))?;

    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthorized("Invalid authorization header format".to_string()))
}

pub async fn auth_middleware(
    State(auth_state): State<Arc<AuthState>>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = match bearer_token(&request) {
        Ok(token) => token.to_string(),
        Err(e) => {
            tracing::debug!(
                path = %request.uri().path(),
                reason = %e,
                "Rejected unauthenticated request"
            );
            return HttpAppError(e).into_response();
        }
    };

    match auth_state.verifier.verify(&token).await {
        Ok(user) => {
            tracing::debug!(user_id = %user.user_id, "Authenticated request");
            request.extensions_mut().insert(user);
            next.run(request).await
        }
        Err(e) => {
            tracing::info!(
                path = %request.uri().path(),
                reason = %e,
                "Token verification failed"
            );
            HttpAppError(e).into_response()
        }
    }
}
