//! HTTP API server for hidden movement commitments and reveal proofs.

use std::error::Error;
use std::sync::Arc;

use tokio::sync::RwLock;

mod config;
mod handlers;
mod logging;
mod routes;

use config::ServerConfig;
use fogmove_prover::setup::RevealKeys;

/// Application state shared across handlers
pub struct AppState {
    pub keys: Arc<RevealKeys>,
    pub config: ServerConfig,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<(), Box<dyn Error>> {
    logging::init();

    let config = ServerConfig::from_env()?;
    tracing::info!(
        bind_addr = %config.bind_addr,
        keys_dir = %config.keys_dir.display(),
        max_points = config.circuit.max_points,
        hash_rounds = config.circuit.hash_rounds,
        "starting proof server"
    );

    // Load or generate circuit keys
    let keys_dir = config.keys_dir.clone();
    let params = config.circuit;
    let keys =
        tokio::task::spawn_blocking(move || RevealKeys::load_or_setup(&keys_dir, params)).await??;

    let bind_addr = config.bind_addr;
    let state = Arc::new(RwLock::new(AppState {
        keys: Arc::new(keys),
        config,
    }));

    let app = routes::app(state);

    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!(addr = %bind_addr, "listening");
    axum::serve(listener, app).await?;

    Ok(())
}
