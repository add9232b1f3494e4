//! Bearer token authentication
//!
//! The middleware resolves the caller through a [`TokenVerifier`] and stores
//! the resulting [`AuthenticatedUser`] in the request extensions, where
//! handlers pick it up as an extractor.

pub mod cognito;
pub mod identity;
pub mod middleware;
pub mod models;

use async_trait::async_trait;
use saasbase_core::AppError;

pub use cognito::CognitoJwtVerifier;
pub use identity::CognitoIdentityProvider;
pub use middleware::{auth_middleware, AuthState};
pub use models::{AuthenticatedUser, CognitoClaims};

/// Turns a bearer token into the identity it was issued for.
///
/// Every failure is an `AppError::Unauthorized`.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    async fn verify(&self, token: &str) -> Result<AuthenticatedUser, AppError>;
}
