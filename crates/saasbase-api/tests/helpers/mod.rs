//! Test helpers: build the router over in-memory and local backends.
//!
//! Run from workspace root: `cargo test -p saasbase-api`.

pub mod auth;
pub mod fixtures;

use axum_test::TestServer;
use saasbase_api::setup::{routes, services};
use saasbase_core::naming::NamingConvention;
use saasbase_core::{BaseConfig, Config, IndexBackend, ServiceConfig, StorageBackend};
use saasbase_db::Repositories;
use saasbase_storage::{LocalStorage, Storage};
use std::sync::Arc;
use tempfile::TempDir;

pub const TEST_BASE_URL: &str = "http://localhost:3000/local-media";

/// Test application: server plus owned resources.
pub struct TestApp {
    pub server: TestServer,
    pub _temp_dir: TempDir,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with_root("/").await
}

/// Setup test app with in-memory index and local storage, serving the
/// service routes under `api_root_path`.
pub async fn setup_test_app_with_root(api_root_path: &str) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let config = create_test_config(&temp_dir, api_root_path);

    let storage: Arc<dyn Storage> = Arc::new(
        LocalStorage::new(temp_dir.path(), TEST_BASE_URL.to_string())
            .await
            .expect("Failed to create local storage"),
    );
    let state = services::initialize_services(
        &config,
        Repositories::in_memory(),
        storage,
        Arc::new(auth::StaticIdentityProvider),
    );

    let app = routes::setup_routes(&config, state, Arc::new(auth::StaticTokenVerifier))
        .expect("Failed to setup routes");
    let server = TestServer::new(app.into_make_service()).expect("Failed to create test server");

    TestApp {
        server,
        _temp_dir: temp_dir,
    }
}

fn create_test_config(temp_dir: &TempDir, api_root_path: &str) -> Config {
    let naming = NamingConvention::new("saasbase", "test");
    Config(Box::new(ServiceConfig {
        base: BaseConfig {
            server_port: 3000,
            api_root_path: api_root_path.to_string(),
            cors_origins: vec!["*".to_string()],
            environment: "test".to_string(),
        },
        aws_region: "us-east-1".to_string(),
        aws_access_key_id: None,
        aws_secret_access_key: None,
        dynamo_db_endpoint: None,
        s3_endpoint: None,
        users_table_name: naming.users_table(),
        media_table_name: naming.media_table(),
        media_bucket_name: naming.media_bucket(),
        naming,
        storage_backend: StorageBackend::Local,
        index_backend: IndexBackend::Memory,
        local_storage_path: Some(temp_dir.path().to_string_lossy().to_string()),
        local_storage_base_url: Some(TEST_BASE_URL.to_string()),
        cognito_user_pool_id: Some("us-east-1_test".to_string()),
        cognito_client_id: None,
        media_size_mb_limit: 10,
        upload_url_expiry_secs: 3600,
    }))
}

/// Path part of an upload URL issued by the local backend.
pub fn upload_path(upload_url: &str) -> String {
    upload_url
        .strip_prefix("http://localhost:3000")
        .expect("upload URL points at the local backend")
        .to_string()
}
