//! Medfleet server - fleet risk engine and dispatch planner backend.

use anyhow::Result;
use axum::routing::get;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use medfleet_registry::RegistryClient;
use medfleet_server::config::Config;
use medfleet_server::engine::{MaintenanceEngine, SystemClock};
use medfleet_server::persistence::JsonFileStore;
use medfleet_server::state::AppState;
use medfleet_server::{api, loops};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medfleet_server=debug".parse()?),
        )
        .init();

    tracing::info!("Starting medfleet server...");

    let config = Config::from_env();
    let port = config.server_port;

    let store = JsonFileStore::open(&config.storage_path)?;
    let engine = MaintenanceEngine::new(Box::new(store), Arc::new(SystemClock));
    let registry = RegistryClient::new(&config.registry_url);
    let state = Arc::new(AppState::new(engine, registry));

    if config.simulator_enabled {
        tokio::spawn(loops::telemetry_sim_loop::run_telemetry_sim_loop(
            state.clone(),
            config.simulator_interval_ms,
        ));
    }

    let app = api::routes()
        .route("/health", get(|| async { "OK" }))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
