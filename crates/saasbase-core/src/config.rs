//! Configuration module
//!
//! Service settings are read once from the environment (with `.env`
//! support), validated at startup and then passed by value to every
//! constructor that needs them.

use std::env;

use crate::constants::DEFAULT_UPLOAD_URL_EXPIRY_SECS;
use crate::naming::{NamingConvention, DEFAULT_APP_NAME, DEFAULT_STAGE};
use crate::storage_types::{IndexBackend, StorageBackend};

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_AWS_REGION: &str = "us-east-1";
const MEDIA_SIZE_MB_LIMIT: usize = 10;

/// Server-level settings
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub api_root_path: String,
    pub cors_origins: Vec<String>,
    pub environment: String,
}

/// Settings for the media and profile service
#[derive(Clone, Debug)]
pub struct ServiceConfig {
    pub base: BaseConfig,
    pub naming: NamingConvention,
    // AWS
    pub aws_region: String,
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub dynamo_db_endpoint: Option<String>,
    pub s3_endpoint: Option<String>,
    // Resource names
    pub users_table_name: String,
    pub media_table_name: String,
    pub media_bucket_name: String,
    // Backends
    pub storage_backend: StorageBackend,
    pub index_backend: IndexBackend,
    pub local_storage_path: Option<String>,
    pub local_storage_base_url: Option<String>,
    // Auth
    pub cognito_user_pool_id: Option<String>,
    pub cognito_client_id: Option<String>,
    // Media
    pub media_size_mb_limit: usize,
    pub upload_url_expiry_secs: u64,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ServiceConfig>);

impl Config {
    fn as_service(&self) -> &ServiceConfig {
        &self.0
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = ServiceConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_service().validate()
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_env(&self.as_service().base.environment)
    }

    pub fn server_port(&self) -> u16 {
        self.as_service().base.server_port
    }

    pub fn api_root_path(&self) -> &str {
        &self.as_service().base.api_root_path
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_service().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.as_service().base.environment
    }

    pub fn naming(&self) -> &NamingConvention {
        &self.as_service().naming
    }

    pub fn aws_region(&self) -> &str {
        &self.as_service().aws_region
    }

    pub fn aws_access_key_id(&self) -> Option<&str> {
        self.as_service().aws_access_key_id.as_deref()
    }

    pub fn aws_secret_access_key(&self) -> Option<&str> {
        self.as_service().aws_secret_access_key.as_deref()
    }

    pub fn dynamo_db_endpoint(&self) -> Option<&str> {
        self.as_service().dynamo_db_endpoint.as_deref()
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.as_service().s3_endpoint.as_deref()
    }

    pub fn users_table_name(&self) -> &str {
        &self.as_service().users_table_name
    }

    pub fn media_table_name(&self) -> &str {
        &self.as_service().media_table_name
    }

    pub fn media_bucket_name(&self) -> &str {
        &self.as_service().media_bucket_name
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.as_service().storage_backend
    }

    pub fn index_backend(&self) -> IndexBackend {
        self.as_service().index_backend
    }

    pub fn local_storage_path(&self) -> Option<&str> {
        self.as_service().local_storage_path.as_deref()
    }

    pub fn local_storage_base_url(&self) -> Option<&str> {
        self.as_service().local_storage_base_url.as_deref()
    }

    pub fn cognito_user_pool_id(&self) -> Option<&str> {
        self.as_service().cognito_user_pool_id.as_deref()
    }

    pub fn cognito_client_id(&self) -> Option<&str> {
        self.as_service().cognito_client_id.as_deref()
    }

    pub fn media_size_mb_limit(&self) -> usize {
        self.as_service().media_size_mb_limit
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.as_service().media_size_mb_limit * 1024 * 1024
    }

    pub fn upload_url_expiry_secs(&self) -> u64 {
        self.as_service().upload_url_expiry_secs
    }
}

fn is_production_env(environment: &str) -> bool {
    let env = environment.to_lowercase();
    env == "production" || env == "prod"
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        if is_production_env(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }
        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let server_port = env::var("PORT")
            .unwrap_or_else(|_| DEFAULT_PORT.to_string())
            .parse()
            .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?;

        let naming = NamingConvention::new(
            non_empty_var("APP_NAME").unwrap_or_else(|| DEFAULT_APP_NAME.to_string()),
            non_empty_var("STAGE").unwrap_or_else(|| DEFAULT_STAGE.to_string()),
        );

        let storage_backend = match non_empty_var("STORAGE_BACKEND") {
            Some(value) => value.parse()?,
            None => StorageBackend::S3,
        };
        let index_backend = match non_empty_var("INDEX_BACKEND") {
            Some(value) => value.parse()?,
            None => IndexBackend::DynamoDb,
        };

        let local_storage_base_url = non_empty_var("LOCAL_STORAGE_BASE_URL").or_else(|| {
            (storage_backend == StorageBackend::Local)
                .then(|| format!("http://localhost:{}/local-media", server_port))
        });

        Ok(Self {
            base: BaseConfig {
                server_port,
                api_root_path: non_empty_var("API_ROOT_PATH").unwrap_or_else(|| "/".to_string()),
                cors_origins,
                environment,
            },
            aws_region: non_empty_var("AWS_REGION")
                .unwrap_or_else(|| DEFAULT_AWS_REGION.to_string()),
            aws_access_key_id: non_empty_var("AWS_ACCESS_ID"),
            aws_secret_access_key: non_empty_var("AWS_ACCESS_SECRET"),
            dynamo_db_endpoint: non_empty_var("DYNAMO_DB_ENDPOINT"),
            s3_endpoint: non_empty_var("S3_ENDPOINT"),
            users_table_name: non_empty_var("USERS_TABLE_NAME")
                .unwrap_or_else(|| naming.users_table()),
            media_table_name: non_empty_var("MEDIA_TABLE_NAME")
                .unwrap_or_else(|| naming.media_table()),
            media_bucket_name: non_empty_var("MEDIA_BUCKET_NAME")
                .unwrap_or_else(|| naming.media_bucket()),
            naming,
            storage_backend,
            index_backend,
            local_storage_path: non_empty_var("LOCAL_STORAGE_PATH"),
            local_storage_base_url,
            cognito_user_pool_id: non_empty_var("COGNITO_USER_POOL_ID"),
            cognito_client_id: non_empty_var("COGNITO_CLIENT_ID"),
            media_size_mb_limit: env::var("MEDIA_SIZE_MB_LIMIT")
                .unwrap_or_else(|_| MEDIA_SIZE_MB_LIMIT.to_string())
                .parse()
                .unwrap_or(MEDIA_SIZE_MB_LIMIT),
            upload_url_expiry_secs: env::var("UPLOAD_URL_EXPIRY_SECS")
                .unwrap_or_else(|_| DEFAULT_UPLOAD_URL_EXPIRY_SECS.to_string())
                .parse()
                .unwrap_or(DEFAULT_UPLOAD_URL_EXPIRY_SECS),
        })
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.cognito_user_pool_id.is_none() {
            return Err(anyhow::anyhow!(
                "COGNITO_USER_POOL_ID must be set to verify bearer tokens"
            ));
        }

        if self.upload_url_expiry_secs == 0 || self.upload_url_expiry_secs > 7 * 24 * 3600 {
            return Err(anyhow::anyhow!(
                "UPLOAD_URL_EXPIRY_SECS must be between 1 and 604800"
            ));
        }

        if self.media_size_mb_limit == 0 {
            return Err(anyhow::anyhow!("MEDIA_SIZE_MB_LIMIT must be at least 1"));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.media_bucket_name.is_empty() {
                    return Err(anyhow::anyhow!(
                        "MEDIA_BUCKET_NAME must be set when using S3 storage backend"
                    ));
                }
            }
            StorageBackend::Local => {
                if self.local_storage_path.is_none() {
                    return Err(anyhow::anyhow!(
                        "LOCAL_STORAGE_PATH must be set when using local storage backend"
                    ));
                }
                if is_production_env(&self.base.environment) {
                    return Err(anyhow::anyhow!(
                        "STORAGE_BACKEND=local is not allowed in production: its upload route is unauthenticated"
                    ));
                }
            }
        }

        if self.index_backend == IndexBackend::Memory && is_production_env(&self.base.environment)
        {
            return Err(anyhow::anyhow!(
                "INDEX_BACKEND=memory is not allowed in production"
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ServiceConfig {
        let naming = NamingConvention::default();
        ServiceConfig {
            base: BaseConfig {
                server_port: DEFAULT_PORT,
                api_root_path: "/".to_string(),
                cors_origins: vec!["*".to_string()],
                environment: "development".to_string(),
            },
            aws_region: DEFAULT_AWS_REGION.to_string(),
            aws_access_key_id: None,
            aws_secret_access_key: None,
            dynamo_db_endpoint: None,
            s3_endpoint: None,
            users_table_name: naming.users_table(),
            media_table_name: naming.media_table(),
            media_bucket_name: naming.media_bucket(),
            naming,
            storage_backend: StorageBackend::S3,
            index_backend: IndexBackend::DynamoDb,
            local_storage_path: None,
            local_storage_base_url: None,
            cognito_user_pool_id: Some("us-east-1_abc".to_string()),
            cognito_client_id: None,
            media_size_mb_limit: MEDIA_SIZE_MB_LIMIT,
            upload_url_expiry_secs: DEFAULT_UPLOAD_URL_EXPIRY_SECS,
        }
    }

    #[test]
    fn test_sample_config_is_valid() {
        let config = Config(Box::new(sample()));
        assert!(config.validate().is_ok());
        assert_eq!(config.media_table_name(), "saasbase-dev-media-table");
        assert_eq!(config.max_upload_bytes(), 10 * 1024 * 1024);
        assert!(!config.is_production());
    }

    #[test]
    fn test_missing_user_pool_is_rejected() {
        let mut config = sample();
        config.cognito_user_pool_id = None;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_local_backend_requires_path() {
        let mut config = sample();
        config.storage_backend = StorageBackend::Local;
        assert!(config.validate().is_err());
        config.local_storage_path = Some("/tmp/media".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_memory_index_rejected_in_production() {
        let mut config = sample();
        config.index_backend = IndexBackend::Memory;
        assert!(config.validate().is_ok());
        config.base.environment = "prod".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_local_storage_rejected_in_production() {
        let mut config = sample();
        config.storage_backend = StorageBackend::Local;
        config.local_storage_path = Some("/tmp/media".to_string());
        config.base.environment = "production".to_string();
        assert!(config.validate().is_err());
    }
}
