//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::{AppSettings, SettingsError};
pub use state_builders::build_http_state;

use actix_web::dev::Server;
use actix_web::{App, HttpServer, web};

#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::documents::{list_documents, upload_document};
use crate::inbound::http::health::{HealthState, live, ready};
use crate::inbound::http::mutations::{
    approve_mutation, cancel_mutation, create_mutation, get_mutation, list_mutations,
    reject_mutation,
};
use crate::inbound::http::properties::{get_property, list_properties, register_property};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::verify::{verify_document, verify_property, verify_transaction};
use crate::middleware::Trace;

/// Register every `/api/v1` route on a service config.
///
/// Shared between the production server and HTTP-level tests so both mount
/// the exact same surface.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(register_property)
        .service(list_properties)
        .service(get_property)
        .service(upload_document)
        .service(list_documents)
        .service(create_mutation)
        .service(list_mutations)
        .service(get_mutation)
        .service(approve_mutation)
        .service(reject_mutation)
        .service(cancel_mutation)
        .service(verify_property)
        .service(verify_document)
        .service(verify_transaction);
}

/// Construct the Actix HTTP server from loaded settings.
///
/// # Errors
/// Returns [`std::io::Error`] when the settings are unusable or binding the
/// socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    settings: &AppSettings,
) -> std::io::Result<Server> {
    let http_state = web::Data::new(
        build_http_state(settings).map_err(|err| std::io::Error::other(err.to_string()))?,
    );
    let bind_addr = settings
        .bind_addr()
        .map_err(|err| std::io::Error::other(err.to_string()))?;
    // Leave headroom above the domain limit so oversize uploads surface as
    // a 400 from the document store rather than an opaque 413.
    let payload_limit = usize::try_from(settings.max_upload_bytes().saturating_mul(2))
        .unwrap_or(usize::MAX);

    let server_health_state = health_state.clone();
    let server = HttpServer::new(move || {
        let api = web::scope("/api/v1").configure(configure_api);

        let app = App::new()
            .app_data(server_health_state.clone())
            .app_data(http_state.clone())
            .app_data(web::PayloadConfig::new(payload_limit))
            .wrap(Trace)
            .service(api)
            .service(ready)
            .service(live);

        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

        app
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
