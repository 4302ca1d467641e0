//! Lockboard service entry point
//!
//! Serves the dashboard API on localhost and runs the chain-clock and
//! transaction-watcher loops. Configuration comes from the JSON file named
//! by LOCKBOARD_CONFIG, falling back to local-Anvil defaults.

use std::path::PathBuf;

use lockboard_api::server::{spawn_background_tasks, start_server};
use lockboard_api::AppState;
use lockboard_core::AppConfig;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lockboard=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .init();

    tracing::info!("Starting Lockboard service");

    let config = match std::env::var_os("LOCKBOARD_CONFIG") {
        Some(path) => {
            let path = PathBuf::from(path);
            match AppConfig::load(&path) {
                Ok(config) => {
                    tracing::info!(path = %path.display(), "Loaded configuration");
                    config
                }
                Err(e) => {
                    tracing::error!("Configuration error: {}", e);
                    return Err(std::io::Error::new(
                        std::io::ErrorKind::InvalidData,
                        e.to_string(),
                    ));
                }
            }
        }
        None => AppConfig::default(),
    };

    let port = config.api_port;
    tracing::info!(
        url = %config.rpc.url,
        chain_id = config.rpc.chain_id,
        "RPC endpoint configured"
    );

    let state = AppState::with_config(config);
    spawn_background_tasks(state.clone());
    start_server(state, port).await
}
