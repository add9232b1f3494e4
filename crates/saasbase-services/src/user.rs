use std::sync::Arc;

use saasbase_core::models::{SecurityUpdate, UserProfile, UserProfileEdit};
use saasbase_core::AppError;
use saasbase_db::UserRepository;
use validator::Validate;

use crate::identity::IdentityProvider;

#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    identity: Arc<dyn IdentityProvider>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self { users, identity }
    }

    /// Stored profile, or one carrying only the id for a user who never
    /// saved anything.
    pub async fn get_user(&self, user_id: &str) -> Result<UserProfile, AppError> {
        let profile = self.users.get(user_id).await?;
        Ok(profile.unwrap_or_else(|| UserProfile::empty(user_id)))
    }

    #[tracing::instrument(skip(self, edit))]
    pub async fn edit_user(
        &self,
        user_id: &str,
        edit: UserProfileEdit,
    ) -> Result<UserProfile, AppError> {
        edit.validate()?;
        let profile = self.get_user(user_id).await?.merge(edit);
        self.users.put(&profile).await?;
        tracing::info!("User profile updated");
        Ok(profile)
    }

    /// Change the caller's email and/or password after re-checking the
    /// current password. A new email is mirrored into the users table.
    #[tracing::instrument(skip(self, update))]
    pub async fn update_security(
        &self,
        user_id: &str,
        update: SecurityUpdate,
    ) -> Result<(), AppError> {
        update.validate()?;
        if update.is_empty() {
            return Err(AppError::InvalidInput(
                "Provide a new password or a new email address".to_string(),
            ));
        }

        if !self
            .identity
            .verify_password(user_id, &update.old_password)
            .await?
        {
            tracing::warn!("Current password rejected");
            return Err(AppError::Unauthorized("Not Authorized".to_string()));
        }

        self.identity
            .update_credentials(
                user_id,
                update.new_email_address.as_deref(),
                update.new_password.as_deref(),
            )
            .await?;

        if let Some(email) = update.new_email_address.as_deref() {
            self.users.set_email(user_id, email).await?;
        }

        tracing::info!(
            email_changed = update.new_email_address.is_some(),
            password_changed = update.new_password.is_some(),
            "User credentials updated"
        );
        Ok(())
    }
}
