//! Transaction reporting and notification polling
//!
//! Wallets broadcast on their own; they report the hash here so the watcher
//! can confirm it and fire the right refresh signals.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};

use crate::dto::{TxSubmittedRequest, TxSubmittedResponse};
use crate::routes::{parse_tx_hash, ApiResult};
use crate::watcher::{TxNotification, WatchedItemInfo};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/submitted", post(submitted))
        .route("/notifications", get(notifications))
        .route("/watched", get(watched))
}

/// POST /tx/submitted - report a broadcast hash for watching
pub async fn submitted(
    State(state): State<AppState>,
    Json(request): Json<TxSubmittedRequest>,
) -> ApiResult<TxSubmittedResponse> {
    let tx_hash = parse_tx_hash(&request.tx_hash)?;
    let description = request
        .description
        .unwrap_or_else(|| request.operation.as_str().to_string());
    tracing::info!(tx_hash = %tx_hash, operation = request.operation.as_str(), "transaction reported");

    let watch_id = state
        .watcher()
        .add_tx(tx_hash, request.operation, description);

    Ok(Json(TxSubmittedResponse { watch_id }))
}

/// GET /tx/notifications - drain settled transaction notifications
pub async fn notifications(State(state): State<AppState>) -> Json<Vec<TxNotification>> {
    Json(state.watcher().drain_notifications())
}

/// GET /tx/watched - transactions still awaiting a receipt
pub async fn watched(State(state): State<AppState>) -> Json<Vec<WatchedItemInfo>> {
    Json(state.watcher().watched_items())
}
