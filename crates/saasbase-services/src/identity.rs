//! Identity-provider account operations
//!
//! Password checks and credential changes happen in the identity provider
//! that issued the caller's token, not in the users table. The API crate
//! supplies the Cognito implementation.

use async_trait::async_trait;
use saasbase_core::AppError;

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// `Ok(false)` when the provider rejects the username/password pair.
    async fn verify_password(&self, username: &str, password: &str) -> Result<bool, AppError>;

    /// Apply whichever of the new email and password are present.
    async fn update_credentials(
        &self,
        username: &str,
        new_email: Option<&str>,
        new_password: Option<&str>,
    ) -> Result<(), AppError>;
}
