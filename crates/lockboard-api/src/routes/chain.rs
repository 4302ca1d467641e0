//! Chain and RPC endpoint status

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use lockboard_core::RpcConfig;

use crate::dto::{ChainStatusResponse, RpcConfigRequest};
use crate::routes::ApiResult;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/status", get(get_status))
        .route("/config", post(set_config))
}

/// GET /chain/status - connectivity, configured chain, clock source
pub async fn get_status(State(state): State<AppState>) -> ApiResult<ChainStatusResponse> {
    let config = state.config().await;
    let chain_configured = state.resolve_contracts().await.is_ok();

    let block_height = match state.client().await {
        Some(client) => client.block_number().await.ok(),
        None => None,
    };

    let (current_time, time_source) = state.clock().now_seconds();

    Ok(Json(ChainStatusResponse {
        connected: block_height.is_some(),
        url: config.rpc.url,
        chain_id: config.rpc.chain_id,
        chain_configured,
        block_height,
        time_source,
        current_time,
    }))
}

/// POST /chain/config - point the service at a different RPC endpoint
pub async fn set_config(
    State(state): State<AppState>,
    Json(request): Json<RpcConfigRequest>,
) -> ApiResult<ChainStatusResponse> {
    tracing::info!(url = %request.url, chain_id = request.chain_id, "RPC config updated");
    state
        .set_rpc_config(RpcConfig {
            url: request.url,
            chain_id: request.chain_id,
        })
        .await;

    get_status(State(state)).await
}
