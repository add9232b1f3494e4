use std::sync::Arc;

use saasbase_core::{Config, IndexBackend};

#[cfg(feature = "dynamodb")]
use crate::dynamodb::{build_client, DynamoMediaIndex, DynamoUserRepository};
use crate::error::IndexResult;
use crate::memory::{InMemoryMediaIndex, InMemoryUserRepository};
use crate::traits::{MediaIndex, UserRepository};

/// The repositories a running service needs, sharing one backend.
#[derive(Clone)]
pub struct Repositories {
    pub media: Arc<dyn MediaIndex>,
    pub users: Arc<dyn UserRepository>,
}

impl Repositories {
    pub fn in_memory() -> Self {
        Self {
            media: Arc::new(InMemoryMediaIndex::new()),
            users: Arc::new(InMemoryUserRepository::new()),
        }
    }
}

/// Create the index repositories selected by `INDEX_BACKEND`
pub async fn create_repositories(config: &Config) -> IndexResult<Repositories> {
    match config.index_backend() {
        #[cfg(feature = "dynamodb")]
        IndexBackend::DynamoDb => {
            let client = build_client(config).await;
            tracing::info!(
                media_table = %config.media_table_name(),
                users_table = %config.users_table_name(),
                "Using DynamoDB index backend"
            );
            Ok(Repositories {
                media: Arc::new(DynamoMediaIndex::new(
                    client.clone(),
                    config.media_table_name(),
                )),
                users: Arc::new(DynamoUserRepository::new(
                    client,
                    config.users_table_name(),
                )),
            })
        }

        #[cfg(not(feature = "dynamodb"))]
        IndexBackend::DynamoDb => Err(crate::error::IndexError::Config(
            "DynamoDB index backend not available (dynamodb feature not enabled)".to_string(),
        )),

        IndexBackend::Memory => {
            tracing::warn!("Using in-memory index backend; data is lost on restart");
            Ok(Repositories::in_memory())
        }
    }
}
