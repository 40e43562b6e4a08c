//! Edge entry-point: loads configuration, wires adapters and serves the
//! locale middleware, page hand-off and verification endpoints.

mod server;

use std::io;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, build_http_state, create_server};
use storefront_edge::inbound::http::health::HealthState;
use storefront_edge::settings::EdgeSettings;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = EdgeSettings::load().map_err(|e| io::Error::other(e.to_string()))?;
    let config = settings.resolve().map_err(io::Error::other)?;
    let http_state = build_http_state(&config)?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(
        health_state,
        ServerConfig::new(config.bind_addr, config.routing, http_state),
    )?;
    info!(addr = %config.bind_addr, "edge listening");
    server.await
}
