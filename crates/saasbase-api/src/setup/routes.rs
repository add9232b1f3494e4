//! Route configuration and setup

use crate::auth::{auth_middleware, AuthState, TokenVerifier};
use crate::handlers;
use crate::state::AppState;
use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{get, post, put},
    Json, Router,
};
use saasbase_core::{Config, StorageBackend};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Build the application router.
///
/// Service routes live under `API_ROOT_PATH`; the OpenAPI document, the
/// RapiDoc UI and the local upload target stay at the server root.
pub fn setup_routes(
    config: &Config,
    state: Arc<AppState>,
    verifier: Arc<dyn TokenVerifier>,
) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;
    let auth_state = Arc::new(AuthState { verifier });

    let protected = protected_routes().layer(axum::middleware::from_fn_with_state(
        auth_state,
        auth_middleware,
    ));
    let service_routes = public_routes().merge(protected).with_state(state.clone());

    let mut app = match root_prefix(config.api_root_path()) {
        Some(prefix) => {
            tracing::info!(prefix = %prefix, "Mounting routes under API root path");
            Router::new().nest(&prefix, service_routes)
        }
        None => service_routes,
    };

    if config.storage_backend() == StorageBackend::Local {
        tracing::info!("Local storage backend: accepting uploads at /local-media");
        app = app.merge(local_media_routes(config).with_state(state));
    }

    let app = app
        .route(
            "/api/openapi.json",
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
        .merge(utoipa_rapidoc::RapiDoc::new("/api/openapi.json").path("/docs"))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .map_response(|res: axum::response::Response<_>| res.map(axum::body::Body::new))
                .layer(RequestBodyLimitLayer::new(config.max_upload_bytes())),
        );

    Ok(app)
}

/// `None` when routes are served from `/`.
fn root_prefix(api_root_path: &str) -> Option<String> {
    let trimmed = api_root_path.trim().trim_matches('/');
    if trimmed.is_empty() {
        None
    } else {
        Some(format!("/{}", trimmed))
    }
}

fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [
        Method::GET,
        Method::POST,
        Method::PUT,
        Method::DELETE,
        Method::OPTIONS,
    ];

    let cors = if config.cors_origins().iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins()
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}

fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::health::root))
        .route("/health", get(handlers::health::health_check))
}

fn protected_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/user",
            get(handlers::user::get_user).post(handlers::user::edit_user),
        )
        .route("/user/security", post(handlers::user::update_security))
        .route(
            "/user/avatar",
            get(handlers::avatar::get_avatar)
                .post(handlers::avatar::upload_avatar)
                .delete(handlers::avatar::delete_avatar),
        )
}

/// Unauthenticated PUT to any key under the storage root. Development only;
/// `Config::validate` refuses the local backend in production.
fn local_media_routes(config: &Config) -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/local-media/{*key}",
            put(handlers::local_media::put_object),
        )
        .layer(DefaultBodyLimit::max(config.max_upload_bytes()))
}
