//! Backend entry-point: wires settings, tracing and the HTTP server.

use actix_web::web;
use ortho_config::OrthoConfig;
use color_eyre::eyre::{Result, WrapErr};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use bhulekh_backend::inbound::http::health::HealthState;
use bhulekh_backend::server::{AppSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load().wrap_err("failed to load settings")?;
    let health_state = web::Data::new(HealthState::new());
    let server =
        create_server(health_state, &settings).wrap_err("failed to start the HTTP server")?;
    server.await.wrap_err("server terminated abnormally")
}
