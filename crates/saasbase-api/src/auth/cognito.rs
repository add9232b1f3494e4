//! RS256 JWT validation against a Cognito user pool's JWKS

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use saasbase_core::AppError;
use serde::Deserialize;
use tokio::sync::RwLock;

use super::models::{AuthenticatedUser, CognitoClaims};
use super::TokenVerifier;

const DEFAULT_CACHE_TTL_SECONDS: i64 = 3600;

#[derive(Debug, Clone, Deserialize)]
pub struct Jwks {
    pub keys: Vec<Jwk>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Jwk {
    #[serde(rename = "kty")]
    pub key_type: String,
    #[serde(rename = "kid")]
    pub key_id: Option<String>,
    #[serde(rename = "n")]
    pub modulus: Option<String>,
    #[serde(rename = "e")]
    pub exponent: Option<String>,
}

#[derive(Clone)]
struct CachedKey {
    key: DecodingKey,
    expires_at: DateTime<Utc>,
}

/// Verifies Cognito-issued tokens.
///
/// Signing keys are fetched from the pool's JWKS on first use of each `kid`
/// and cached for an hour.
pub struct CognitoJwtVerifier {
    issuer: String,
    jwks_url: String,
    http: reqwest::Client,
    cache: Arc<RwLock<HashMap<String, CachedKey>>>,
    cache_ttl_seconds: i64,
}

impl CognitoJwtVerifier {
    pub fn new(region: &str, user_pool_id: &str) -> Self {
        let issuer = Self::issuer_for(region, user_pool_id);
        Self {
            jwks_url: format!("{}/.well-known/jwks.json", issuer),
            issuer,
            http: reqwest::Client::new(),
            cache: Arc::new(RwLock::new(HashMap::new())),
            cache_ttl_seconds: DEFAULT_CACHE_TTL_SECONDS,
        }
    }

    pub fn issuer_for(region: &str, user_pool_id: &str) -> String {
        format!(
            "https://cognito-idp.{}.amazonaws.com/{}",
            region, user_pool_id
        )
    }

    pub fn jwks_url(&self) -> &str {
        &self.jwks_url
    }

    async fn fetch_jwks(&self) -> Result<Jwks, AppError> {
        let response = self
            .http
            .get(&self.jwks_url)
            .send()
            .await
            .map_err(|e| AppError::Unauthorized(format!("Failed to fetch JWKS: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Unauthorized(format!(
                "JWKS endpoint returned error: {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::Unauthorized(format!("Failed to parse JWKS: {}", e)))
    }

    fn jwk_to_decoding_key(jwk: &Jwk) -> Result<DecodingKey, AppError> {
        if jwk.key_type != "RSA" {
            return Err(AppError::Unauthorized(format!(
                "Unsupported key type: {}",
                jwk.key_type
            )));
        }
        let n = jwk
            .modulus
            .as_deref()
            .ok_or_else(|| AppError::Unauthorized("RSA key missing modulus".to_string()))?;
        let e = jwk
            .exponent
            .as_deref()
            .ok_or_else(|| AppError::Unauthorized("RSA key missing exponent".to_string()))?;
        DecodingKey::from_rsa_components(n, e)
            .map_err(|e| AppError::Unauthorized(format!("Failed to create RSA key: {}", e)))
    }

    async fn decoding_key(&self, kid: &str) -> Result<DecodingKey, AppError> {
        {
            let cache = self.cache.read().await;
            if let Some(cached) = cache.get(kid) {
                if cached.expires_at > Utc::now() {
                    return Ok(cached.key.clone());
                }
            }
        }

        let jwks = self.fetch_jwks().await?;
        let jwk = jwks
            .keys
            .iter()
            .find(|k| k.key_id.as_deref() == Some(kid))
            .ok_or_else(|| AppError::Unauthorized(format!("Key ID {} not found in JWKS", kid)))?;
        let key = Self::jwk_to_decoding_key(jwk)?;

        let mut cache = self.cache.write().await;
        cache.insert(
            kid.to_string(),
            CachedKey {
                key: key.clone(),
                expires_at: Utc::now() + chrono::Duration::seconds(self.cache_ttl_seconds),
            },
        );
        tracing::debug!(kid = %kid, "Cached JWKS signing key");

        Ok(key)
    }

    fn validation(&self) -> Validation {
        let mut validation = Validation::new(Algorithm::RS256);
        validation.set_issuer(&[self.issuer.as_str()]);
        validation.validate_exp = true;
        // Cognito access tokens carry `client_id` instead of `aud`.
        validation.validate_aud = false;
        validation.leeway = 0;
        validation
    }
}

#[async_trait]
impl TokenVerifier for CognitoJwtVerifier {
    async fn verify(&self, token: &str) -> Result<AuthenticatedUser, AppError> {
        let header = decode_header(token)
            .map_err(|e| AppError::Unauthorized(format!("Invalid token header: {}", e)))?;
        if header.alg != Algorithm::RS256 {
            return Err(AppError::Unauthorized(format!(
                "Unsupported algorithm: {:?}",
                header.alg
            )));
        }
        let kid = header
            .kid
            .ok_or_else(|| AppError::Unauthorized("Token header has no kid".to_string()))?;

        let key = self.decoding_key(&kid).await?;
        let token_data = decode::<CognitoClaims>(token, &key, &self.validation()).map_err(|e| {
            tracing::debug!(error = %e, "JWT validation failed");
            match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::Unauthorized("Token has expired".to_string())
                }
                jsonwebtoken::errors::ErrorKind::InvalidIssuer => {
                    AppError::Unauthorized("Invalid token issuer".to_string())
                }
                _ => AppError::Unauthorized("Invalid token".to_string()),
            }
        })?;

        Ok(token_data.claims.into())
    }
}
