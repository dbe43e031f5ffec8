//! OpenAPI documentation configuration.
//!
//! Defines [`ApiDoc`], the generated specification for the REST API. It
//! registers every HTTP path from the inbound layer, the error schema
//! wrappers, and the bearer-token security scheme. Swagger UI serves the
//! document at `/docs` in debug builds.

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};

/// Enrich the generated document with the bearer-token security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "BearerToken",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Bhulekh land-records API",
        description = "Property registry, document store, ownership-transfer workflow and public record verification."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("BearerToken" = [])),
    paths(
        crate::inbound::http::properties::register_property,
        crate::inbound::http::properties::list_properties,
        crate::inbound::http::properties::get_property,
        crate::inbound::http::documents::upload_document,
        crate::inbound::http::documents::list_documents,
        crate::inbound::http::mutations::create_mutation,
        crate::inbound::http::mutations::list_mutations,
        crate::inbound::http::mutations::get_mutation,
        crate::inbound::http::mutations::approve_mutation,
        crate::inbound::http::mutations::reject_mutation,
        crate::inbound::http::mutations::cancel_mutation,
        crate::inbound::http::verify::verify_property,
        crate::inbound::http::verify::verify_document,
        crate::inbound::http::verify::verify_transaction,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(ErrorSchema, ErrorCodeSchema)),
    tags(
        (name = "properties", description = "Parcel registration and lookup"),
        (name = "documents", description = "Document upload and listing"),
        (name = "mutations", description = "Ownership-transfer workflow"),
        (name = "verification", description = "Public record verification"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
