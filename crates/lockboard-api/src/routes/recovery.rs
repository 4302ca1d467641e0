//! Emergency recovery of stray tokens sent to the locker
//!
//! Only the locker contract's owner may recover, and never the LP token
//! itself; the builder enforces the latter.

use axum::{extract::State, routing::post, Json, Router};
use lockboard_core::ProtocolError;
use lplocker::{fetch_locker_owner, tx_builder};

use crate::dto::{RecoveryRequest, UnsignedCallResponse};
use crate::routes::{
    fail, parse_address, parse_amount, require_client, require_wallet, ApiResult,
};
use crate::watcher::Operation;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(recover))
}

/// POST /recovery - build a recoverToken call for a stray token
pub async fn recover(
    State(state): State<AppState>,
    Json(request): Json<RecoveryRequest>,
) -> ApiResult<UnsignedCallResponse> {
    let token = parse_address(&request.token)?;
    let amount = parse_amount(&request.amount)?;
    let contracts = state.resolve_contracts().await.map_err(fail)?;
    let client = require_client(&state).await?;
    let wallet = require_wallet(&state).await?;

    let owner = fetch_locker_owner(&client, &contracts).await.map_err(fail)?;
    if !owner.same_as(wallet.address.as_str()) {
        return Err(fail(ProtocolError::NotOwner {
            wallet: wallet.address.to_string(),
            owner: owner.to_string(),
        }));
    }

    let call = tx_builder::build_recover_token(&contracts, &token, amount).map_err(fail)?;
    tracing::info!(token = %token, amount, "recovery call built");
    Ok(Json(UnsignedCallResponse::new(call, Operation::Recovery)))
}
