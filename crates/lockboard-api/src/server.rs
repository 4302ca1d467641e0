//! HTTP server setup and background tasks

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::routes::create_router;
use crate::AppState;

/// Poll cadence for the chain clock and the receipt watcher.
const POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Create the full application router with middleware
pub fn create_app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Start the HTTP server
pub async fn start_server(state: AppState, port: u16) -> Result<(), std::io::Error> {
    let app = create_app(state);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));

    tracing::info!("Starting API server on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Spawn the chain-clock sampler and the transaction watcher loops.
pub fn spawn_background_tasks(state: AppState) {
    let clock_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(POLL_INTERVAL);
        loop {
            interval.tick().await;
            let Some(client) = clock_state.client().await else {
                continue;
            };
            match client.latest_block_timestamp().await {
                Ok(timestamp) => clock_state.clock().record(timestamp),
                Err(e) => {
                    tracing::debug!(error = %e, "block timestamp poll failed");
                }
            }
        }
    });

    let watch_state = state;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(POLL_INTERVAL);
        loop {
            interval.tick().await;
            let Some(client) = watch_state.client().await else {
                continue;
            };
            watch_state
                .watcher()
                .poll_once(&client, watch_state.refresh())
                .await;
        }
    });
}
