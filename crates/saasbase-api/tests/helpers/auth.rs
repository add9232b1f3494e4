use async_trait::async_trait;
use saasbase_api::{AuthenticatedUser, TokenVerifier};
use saasbase_core::AppError;
use saasbase_services::IdentityProvider;

/// Accepts tokens of the form `test-token:{user_id}`.
pub struct StaticTokenVerifier;

pub const TOKEN_PREFIX: &str = "test-token:";

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let user_id = token
            .strip_prefix(TOKEN_PREFIX)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| AppError::Unauthorized("Invalid token".to_string()))?;
        Ok(AuthenticatedUser {
            user_id: user_id.to_string(),
            email: Some(format!("{}@example.com", user_id)),
        })
    }
}

pub fn bearer(user_id: &str) -> String {
    format!("Bearer {}{}", TOKEN_PREFIX, user_id)
}

/// Password every test user signs in with.
pub const TEST_PASSWORD: &str = "test-password";

/// Accepts [`TEST_PASSWORD`] for any user; credential changes always succeed.
pub struct StaticIdentityProvider;

#[async_trait]
impl IdentityProvider for StaticIdentityProvider {
    async fn verify_password(&self, _username: &str, password: &str) -> Result<bool, AppError> {
        Ok(password == TEST_PASSWORD)
    }

    async fn update_credentials(
        &self,
        _username: &str,
        _new_email: Option<&str>,
        _new_password: Option<&str>,
    ) -> Result<(), AppError> {
        Ok(())
    }
}
