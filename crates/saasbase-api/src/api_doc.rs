//! OpenAPI documentation, served at `/api/openapi.json` and rendered by
//! RapiDoc at `/docs`.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::error;
use crate::handlers;
use saasbase_core::models;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "saasbase API",
        version = "0.1.0",
        description = "User profile and avatar service. Avatars are uploaded straight to object storage through presigned URLs and served as cached 200x200 crops."
    ),
    paths(
        handlers::health::root,
        handlers::health::health_check,
        handlers::user::get_user,
        handlers::user::edit_user,
        handlers::user::update_security,
        handlers::avatar::get_avatar,
        handlers::avatar::upload_avatar,
        handlers::avatar::delete_avatar,
        handlers::local_media::put_object,
    ),
    components(schemas(
        error::ErrorResponse,
        models::UserProfile,
        models::UserProfileEdit,
        models::SecurityUpdate,
        models::UploadRequest,
        models::UploadTicket,
        models::MediaRecord,
        models::MediaStatus,
        models::SourceKey,
        models::ResizeSpec,
        models::Sizing,
        models::OutputFormat,
        models::Center,
        models::CenterKeyword,
    )),
    modifiers(&BearerAuth),
    tags(
        (name = "health", description = "Liveness endpoints"),
        (name = "user", description = "Profile of the authenticated user"),
        (name = "avatar", description = "Avatar upload, retrieval and removal"),
        (name = "local-media", description = "Upload target for the local storage backend")
    )
)]
pub struct ApiDoc;

pub fn get_openapi_spec() -> utoipa::openapi::OpenApi {
    ApiDoc::openapi()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lists_avatar_paths() {
        let spec = get_openapi_spec();
        assert!(spec.paths.paths.contains_key("/user/avatar"));
        assert!(spec.paths.paths.contains_key("/user"));
        assert!(spec.paths.paths.contains_key("/user/security"));
        assert!(spec.paths.paths.contains_key("/health"));
        let components = spec.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
