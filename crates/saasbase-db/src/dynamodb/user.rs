use async_trait::async_trait;
use aws_sdk_dynamodb::error::DisplayErrorContext;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Client;
use saasbase_core::models::UserProfile;

use super::conversions::{item_to_profile, profile_to_item};
use super::keys::{ATTR_EMAIL, ATTR_USER_ID};
use crate::error::{IndexError, IndexResult};
use crate::traits::UserRepository;

/// [`UserRepository`] backed by the users table
#[derive(Clone)]
pub struct DynamoUserRepository {
    client: Client,
    table_name: String,
}

impl DynamoUserRepository {
    pub fn new(client: Client, table_name: impl Into<String>) -> Self {
        Self {
            client,
            table_name: table_name.into(),
        }
    }
}

#[async_trait]
impl UserRepository for DynamoUserRepository {
    async fn get(&self, user_id: &str) -> IndexResult<Option<UserProfile>> {
        let response = self
            .client
            .get_item()
            .table_name(&self.table_name)
            .key(ATTR_USER_ID, AttributeValue::S(user_id.to_string()))
            .send()
            .await
            .map_err(|e| {
                let message = DisplayErrorContext(e).to_string();
                tracing::error!(
                    table = %self.table_name,
                    user_id = %user_id,
                    error = %message,
                    "DynamoDB user lookup failed"
                );
                IndexError::Backend(message)
            })?;

        response.item.as_ref().map(item_to_profile).transpose()
    }

    async fn put(&self, profile: &UserProfile) -> IndexResult<()> {
        let start = std::time::Instant::now();
        self.client
            .put_item()
            .table_name(&self.table_name)
            .set_item(Some(profile_to_item(profile)))
            .send()
            .await
            .map_err(|e| {
                let message = DisplayErrorContext(e).to_string();
                tracing::error!(
                    table = %self.table_name,
                    user_id = %profile.user_id,
                    error = %message,
                    "DynamoDB user write failed"
                );
                IndexError::Backend(message)
            })?;

        tracing::info!(
            table = %self.table_name,
            user_id = %profile.user_id,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "User profile saved"
        );
        Ok(())
    }

    async fn set_email(&self, user_id: &str, email: &str) -> IndexResult<()> {
        self.client
            .update_item()
            .table_name(&self.table_name)
            .key(ATTR_USER_ID, AttributeValue::S(user_id.to_string()))
            .update_expression("SET #email = :email")
            .expression_attribute_names("#email", ATTR_EMAIL)
            .expression_attribute_values(":email", AttributeValue::S(email.to_string()))
            .send()
            .await
            .map_err(|e| {
                let message = DisplayErrorContext(e).to_string();
                tracing::error!(
                    table = %self.table_name,
                    user_id = %user_id,
                    error = %message,
                    "DynamoDB user email update failed"
                );
                IndexError::Backend(message)
            })?;

        tracing::info!(table = %self.table_name, user_id = %user_id, "User email updated");
        Ok(())
    }
}
