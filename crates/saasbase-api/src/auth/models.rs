use crate::error::HttpAppError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use saasbase_core::AppError;
use serde::{Deserialize, Serialize};

/// Claims read from a Cognito ID or access token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CognitoClaims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub iss: String,
    pub exp: i64,
    /// "id" or "access"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_use: Option<String>,
}

/// Caller identity, inserted into request extensions by the auth middleware
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub email: Option<String>,
}

impl From<CognitoClaims> for AuthenticatedUser {
    fn from(claims: CognitoClaims) -> Self {
        Self {
            user_id: claims.sub,
            email: claims.email,
        }
    }
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = HttpAppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or_else(|| {
                HttpAppError(AppError::Unauthorized(
                    "Missing authenticated user".to_string(),
                ))
            })
    }
}
