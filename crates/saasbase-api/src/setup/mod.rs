//! Application setup and initialization
//!
//! Everything `main` needs to go from a [`Config`] to a running router,
//! split by concern so tests can assemble the same pieces around in-memory
//! backends.

pub mod routes;
pub mod server;
pub mod services;
pub mod storage;

use crate::auth::{CognitoIdentityProvider, CognitoJwtVerifier, TokenVerifier};
use crate::state::AppState;
use anyhow::{Context, Result};
use saasbase_core::Config;
use saasbase_services::IdentityProvider;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    config.validate().context("Configuration validation failed")?;

    crate::telemetry::init_telemetry(config.environment());
    tracing::info!("Configuration loaded and validated successfully");

    let storage = storage::setup_storage(&config).await?;
    let repositories = saasbase_db::create_repositories(&config)
        .await
        .context("Failed to initialize index backend")?;

    let identity = setup_identity(&config).await?;
    let state = services::initialize_services(&config, repositories, storage, identity);
    let verifier = setup_verifier(&config)?;

    let router = routes::setup_routes(&config, state.clone(), verifier)?;

    Ok((state, router))
}

fn setup_verifier(config: &Config) -> Result<Arc<dyn TokenVerifier>> {
    let user_pool_id = config
        .cognito_user_pool_id()
        .context("COGNITO_USER_POOL_ID must be set")?;
    let verifier = CognitoJwtVerifier::new(config.aws_region(), user_pool_id);
    tracing::info!(jwks_url = %verifier.jwks_url(), "Cognito token verification enabled");
    Ok(Arc::new(verifier))
}

async fn setup_identity(config: &Config) -> Result<Arc<dyn IdentityProvider>> {
    let user_pool_id = config
        .cognito_user_pool_id()
        .context("COGNITO_USER_POOL_ID must be set")?;
    let client_id = config
        .cognito_client_id()
        .context("COGNITO_CLIENT_ID must be set for credential changes")?;
    let identity = CognitoIdentityProvider::from_config(config, user_pool_id, client_id).await;
    Ok(Arc::new(identity))
}
