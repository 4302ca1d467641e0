//! Wallet session endpoints
//!
//! The wallet itself lives in the operator's browser; this only tracks the
//! connected address so ownership checks can gate mutating routes.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::dto::{ApiError, WalletConnectRequest, WalletResponse};
use crate::routes::{fail, ApiResult};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_wallet))
        .route("/connect", post(connect))
        .route("/disconnect", post(disconnect))
}

/// GET /wallet - currently connected address
pub async fn get_wallet(State(state): State<AppState>) -> ApiResult<WalletResponse> {
    let wallet = state.wallet().await.ok_or((
        StatusCode::NOT_FOUND,
        Json(ApiError::wallet_not_connected()),
    ))?;

    Ok(Json(WalletResponse {
        address: wallet.address,
        connected_secs: wallet.connected_at.elapsed().as_secs(),
    }))
}

/// POST /wallet/connect - record the signer address
pub async fn connect(
    State(state): State<AppState>,
    Json(request): Json<WalletConnectRequest>,
) -> ApiResult<WalletResponse> {
    let wallet = state.set_wallet(&request.address).await.map_err(fail)?;
    tracing::info!(address = %wallet.address, "wallet connected");

    Ok(Json(WalletResponse {
        address: wallet.address,
        connected_secs: 0,
    }))
}

/// POST /wallet/disconnect
pub async fn disconnect(State(state): State<AppState>) -> Json<serde_json::Value> {
    state.disconnect_wallet().await;
    Json(serde_json::json!({ "disconnected": true }))
}
