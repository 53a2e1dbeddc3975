//! Backend entry-point: loads settings, seeds the directory and serves the
//! REST, WebSocket and OpenAPI endpoints.

mod server;

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use backend::inbound::http::health::HealthState;
use backend::inbound::http::session_config::{BuildMode, session_settings_from_env};
use backend::outbound::realtime::{InMemoryRealtimeStore, load_directory_seed};
use server::{ServerConfig, ServerSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let session = session_settings_from_env(&DefaultEnv::new(), BuildMode::from_debug_assertions())
        .map_err(std::io::Error::other)?;

    let store = Arc::new(InMemoryRealtimeStore::new());
    match &settings.directory_seed {
        Some(path) => {
            let records = load_directory_seed(path).map_err(std::io::Error::other)?;
            info!(path = %path.display(), users = records.len(), "directory seeded");
            store.seed_directory(records);
        }
        None => warn!("no directory seed configured; starting with an empty directory"),
    }

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(session, settings.bind_addr(), store);
    let server = create_server(health_state.clone(), config)?;
    info!(bind_addr = %settings.bind_addr(), "listening");

    let result = server.await;
    health_state.mark_unhealthy();
    result
}
