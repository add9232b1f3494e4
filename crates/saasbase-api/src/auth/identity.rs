//! Cognito admin API client for credential changes

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_cognitoidentityprovider::config::{Credentials, Region};
use aws_sdk_cognitoidentityprovider::error::DisplayErrorContext;
use aws_sdk_cognitoidentityprovider::operation::admin_initiate_auth::AdminInitiateAuthError;
use aws_sdk_cognitoidentityprovider::operation::admin_set_user_password::AdminSetUserPasswordError;
use aws_sdk_cognitoidentityprovider::types::{AttributeType, AuthFlowType};
use aws_sdk_cognitoidentityprovider::Client;
use saasbase_core::{AppError, Config};
use saasbase_services::IdentityProvider;

/// [`IdentityProvider`] over a Cognito user pool.
///
/// Needs an app client with `ALLOW_ADMIN_USER_PASSWORD_AUTH` enabled.
pub struct CognitoIdentityProvider {
    client: Client,
    user_pool_id: String,
    client_id: String,
}

impl CognitoIdentityProvider {
    pub fn new(client: Client, user_pool_id: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            client,
            user_pool_id: user_pool_id.into(),
            client_id: client_id.into(),
        }
    }

    pub async fn from_config(
        config: &Config,
        user_pool_id: &str,
        client_id: &str,
    ) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.aws_region().to_string()))
            .load()
            .await;

        let mut builder = aws_sdk_cognitoidentityprovider::config::Builder::from(&sdk_config);
        if let (Some(id), Some(secret)) =
            (config.aws_access_key_id(), config.aws_secret_access_key())
        {
            builder = builder.credentials_provider(Credentials::new(
                id,
                secret,
                None,
                None,
                "saasbase-config",
            ));
        }

        Self::new(Client::from_conf(builder.build()), user_pool_id, client_id)
    }

    fn backend_error<E>(&self, operation: &str, err: E) -> AppError
    where
        E: std::error::Error + 'static,
    {
        let message = DisplayErrorContext(err).to_string();
        tracing::error!(
            user_pool_id = %self.user_pool_id,
            operation = operation,
            error = %message,
            "Cognito request failed"
        );
        AppError::Internal(format!("{} failed", operation))
    }
}

#[async_trait]
impl IdentityProvider for CognitoIdentityProvider {
    async fn verify_password(&self, username: &str, password: &str) -> Result<bool, AppError> {
        let result = self
            .client
            .admin_initiate_auth()
            .user_pool_id(&self.user_pool_id)
            .client_id(&self.client_id)
            .auth_flow(AuthFlowType::AdminNoSrpAuth)
            .auth_parameters("USERNAME", username)
            .auth_parameters("PASSWORD", password)
            .send()
            .await;

        match result {
            Ok(output) => Ok(output.authentication_result().is_some()),
            Err(e)
                if matches!(
                    e.as_service_error(),
                    Some(AdminInitiateAuthError::NotAuthorizedException(_))
                        | Some(AdminInitiateAuthError::UserNotFoundException(_))
                ) =>
            {
                Ok(false)
            }
            Err(e) => Err(self.backend_error("AdminInitiateAuth", e)),
        }
    }

    async fn update_credentials(
        &self,
        username: &str,
        new_email: Option<&str>,
        new_password: Option<&str>,
    ) -> Result<(), AppError> {
        if let Some(email) = new_email {
            let attribute = |name: &str, value: &str| {
                AttributeType::builder()
                    .name(name)
                    .value(value)
                    .build()
                    .map_err(|e| AppError::Internal(e.to_string()))
            };
            self.client
                .admin_update_user_attributes()
                .user_pool_id(&self.user_pool_id)
                .username(username)
                .user_attributes(attribute("email", email)?)
                .user_attributes(attribute("email_verified", "false")?)
                .send()
                .await
                .map_err(|e| self.backend_error("AdminUpdateUserAttributes", e))?;
            tracing::info!(username = %username, "Cognito email updated");
        }

        if let Some(password) = new_password {
            let result = self
                .client
                .admin_set_user_password()
                .user_pool_id(&self.user_pool_id)
                .username(username)
                .password(password)
                .permanent(true)
                .send()
                .await;

            match result {
                Ok(_) => tracing::info!(username = %username, "Cognito password updated"),
                Err(e)
                    if matches!(
                        e.as_service_error(),
                        Some(AdminSetUserPasswordError::InvalidPasswordException(_))
                    ) =>
                {
                    return Err(AppError::InvalidInput(
                        "New password does not satisfy the password policy".to_string(),
                    ));
                }
                Err(e) => return Err(self.backend_error("AdminSetUserPassword", e)),
            }
        }

        Ok(())
    }
}
