//! OpenAPI documentation configuration.
//!
//! Defines [`ApiDoc`], the generated specification for the REST API:
//! endpoint paths from the inbound layer, the shared error schema, and the
//! session cookie security scheme. Swagger UI serves the document in debug
//! builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{Error, ErrorCode};
use crate::domain::ports::{DraftView, StagedFileView};
use crate::inbound::http::auth::{LoginBody, SessionBody, SessionUser, SignUpBody};
use crate::inbound::http::feed::{FeedAuthorDto, FeedPhotoDto};
use crate::inbound::http::uploads::{CaptionBody, CreatedPhotoDto, SubmitResponse};

/// Enrich the generated document with the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login or /api/v1/signup.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Voyage gallery backend API",
        description = "HTTP interface for the shared photo gallery: accounts, feed and uploads."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::sign_up,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::get_session,
        crate::inbound::http::feed::list_photos,
        crate::inbound::http::uploads::get_draft,
        crate::inbound::http::uploads::stage_file,
        crate::inbound::http::uploads::remove_staged_file,
        crate::inbound::http::uploads::set_caption,
        crate::inbound::http::uploads::submit_draft,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        SignUpBody,
        LoginBody,
        SessionBody,
        SessionUser,
        FeedPhotoDto,
        FeedAuthorDto,
        DraftView,
        StagedFileView,
        CaptionBody,
        SubmitResponse,
        CreatedPhotoDto,
    )),
    tags(
        (name = "accounts", description = "Sign-up, sign-in and session state"),
        (name = "feed", description = "The shared photo feed"),
        (name = "uploads", description = "Per-user upload drafts and batch submission"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI document structure.
    use super::*;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn error_schema_has_required_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get("Error").expect("Error schema");

        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "message");
    }

    #[test]
    fn registers_every_endpoint_path() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/v1/signup",
            "/api/v1/login",
            "/api/v1/logout",
            "/api/v1/session",
            "/api/v1/photos",
            "/api/v1/uploads",
            "/api/v1/uploads/{id}",
            "/api/v1/uploads/caption",
            "/api/v1/uploads/submit",
            "/health/ready",
            "/health/live",
        ] {
            assert!(
                doc.paths.paths.contains_key(path),
                "OpenAPI document should describe {path}"
            );
        }
    }
}
