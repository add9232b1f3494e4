use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Profile record stored in the users table
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UserProfile {
    pub fn empty(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Default::default()
        }
    }

    /// Overlay the fields present in `edit`; absent fields keep their value.
    pub fn merge(mut self, edit: UserProfileEdit) -> Self {
        if let Some(first_name) = edit.first_name {
            self.first_name = Some(first_name);
        }
        if let Some(last_name) = edit.last_name {
            self.last_name = Some(last_name);
        }
        self
    }
}

/// Editable profile fields
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UserProfileEdit {
    #[validate(length(max = 100, message = "First name must be at most 100 characters"))]
    pub first_name: Option<String>,
    #[validate(length(max = 100, message = "Last name must be at most 100 characters"))]
    pub last_name: Option<String>,
}

/// Credential change for the caller's identity-provider account
///
/// The current password is always required; at least one of the new values
/// has to be present for the request to do anything.
#[derive(Clone, Default, Deserialize, Serialize, ToSchema, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SecurityUpdate {
    #[validate(length(min = 1, max = 256, message = "Current password is required"))]
    pub old_password: String,
    #[validate(length(min = 8, max = 256, message = "New password must be 8 to 256 characters"))]
    pub new_password: Option<String>,
    #[validate(email(message = "New email address is not valid"))]
    pub new_email_address: Option<String>,
}

impl SecurityUpdate {
    pub fn is_empty(&self) -> bool {
        self.new_password.is_none() && self.new_email_address.is_none()
    }
}

impl std::fmt::Debug for SecurityUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecurityUpdate")
            .field("old_password", &"<redacted>")
            .field("new_password", &self.new_password.as_ref().map(|_| "<redacted>"))
            .field("new_email_address", &self.new_email_address)
            .finish()
    }
}
