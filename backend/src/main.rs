//! Backend entry-point: loads settings, wires stores and serves the API.

mod server;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use clinic_backend::inbound::http::health::HealthState;
use clinic_backend::inbound::http::session_config::{BuildMode, SessionSettings};
use clinic_backend::settings::AppSettings;
use server::{ServerConfig, StoreBackend};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(error) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(%error, "tracing init failed");
    }

    let settings = AppSettings::load().map_err(std::io::Error::other)?;
    let bind_addr = settings.bind_addr().map_err(std::io::Error::other)?;
    let stores = match settings.supabase().map_err(std::io::Error::other)? {
        Some(config) => StoreBackend::Supabase(config),
        None => StoreBackend::InMemory(settings.seed_admin()),
    };

    let session = SessionSettings::from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;
    info!(fingerprint = %session.key_fingerprint(), "session key loaded");

    let config = ServerConfig::new(session, bind_addr, stores);
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(server::make_metrics());

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting server");
    server::create_server(health_state, config).await?.await
}
