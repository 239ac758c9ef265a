//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint from the inbound layer (auth, gadgets,
//!   health)
//! - **Schemas**: domain types and request/response bodies
//! - **Security**: bearer tokens and the `access_token` cookie fallback
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling. The
//! realtime gateway at `/ws/gadgets/` is not part of the document.

use crate::domain::{Error, ErrorCode, Gadget, GadgetId, User};
use crate::inbound::http::gadgets::{
    BulkDeleteRequest, BulkDeleteResponse, GadgetPatchRequest, GadgetRequest,
};
use crate::inbound::http::users::{AccessResponse, LoginRequest, LoginResponse, RefreshRequest};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Enrich the generated document with both credential schemes.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Access token issued by POST /api/auth/login/."))
                    .build(),
            ),
        );
        components.add_security_scheme(
            "AccessCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "access_token",
                "Access token cookie set by login and refresh.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Gadget inventory API",
        description = "Owner-scoped gadget inventory with token authentication and health probes."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = []), ("AccessCookie" = [])),
    paths(
        crate::inbound::http::users::login,
        crate::inbound::http::users::refresh,
        crate::inbound::http::users::current_user,
        crate::inbound::http::users::logout,
        crate::inbound::http::gadgets::list_gadgets,
        crate::inbound::http::gadgets::create_gadget,
        crate::inbound::http::gadgets::bulk_delete_gadgets,
        crate::inbound::http::gadgets::get_gadget,
        crate::inbound::http::gadgets::replace_gadget,
        crate::inbound::http::gadgets::update_gadget,
        crate::inbound::http::gadgets::delete_gadget,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        User,
        Gadget,
        GadgetId,
        LoginRequest,
        LoginResponse,
        RefreshRequest,
        AccessResponse,
        GadgetRequest,
        GadgetPatchRequest,
        BulkDeleteRequest,
        BulkDeleteResponse,
    )),
    tags(
        (name = "auth", description = "Login, token refresh and the caller's profile"),
        (name = "gadgets", description = "The caller's gadget inventory"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;
