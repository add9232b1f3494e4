//! saasbase API library
//!
//! HTTP handlers, authentication middleware and application setup for the
//! user profile and avatar service.

mod api_doc;
mod handlers;
mod telemetry;

pub mod auth;
pub mod error;
pub mod setup;
pub mod state;

pub use api_doc::get_openapi_spec;
pub use auth::{AuthenticatedUser, CognitoIdentityProvider, CognitoJwtVerifier, TokenVerifier};
pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
