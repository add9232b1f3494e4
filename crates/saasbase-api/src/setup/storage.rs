use anyhow::{Context, Result};
use saasbase_core::Config;
use saasbase_services::Storage;
use std::sync::Arc;

pub async fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    let storage = saasbase_services::create_storage(config)
        .await
        .context("Failed to initialize storage backend")?;

    tracing::info!(
        backend = %storage.backend_type(),
        bucket = %config.media_bucket_name(),
        "Storage backend ready"
    );
    Ok(storage)
}
