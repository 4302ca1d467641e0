//! Fees panel: per-lock fee state and claiming

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use lockboard_core::ProtocolError;
use lplocker::{
    fetch_claimable_fees, fetch_lock, fetch_total_accumulated_fees, lock_exists, tx_builder,
};

use crate::dto::{FeesResponse, UnsignedCallResponse};
use crate::routes::{fail, parse_lock_id, require_client, require_wallet, ApiResult};
use crate::watcher::Operation;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/:lock_id", get(get_fees))
        .route("/:lock_id/update", post(update_fees))
        .route("/:lock_id/claim", post(claim_fees))
}

/// GET /fees/:lock_id - claimable and lifetime fees for a lock
pub async fn get_fees(
    State(state): State<AppState>,
    Path(lock_id): Path<String>,
) -> ApiResult<FeesResponse> {
    let lock_id = parse_lock_id(&lock_id)?;
    let contracts = state.resolve_contracts().await.map_err(fail)?;
    let client = require_client(&state).await?;

    let claimable = fetch_claimable_fees(&client, &contracts, &lock_id)
        .await
        .map_err(fail)?;
    let total_accumulated = fetch_total_accumulated_fees(&client, &contracts, &lock_id)
        .await
        .map_err(fail)?;

    Ok(Json(FeesResponse {
        claimable,
        total_accumulated,
    }))
}

/// POST /fees/:lock_id/update - refresh the contract's fee accounting
pub async fn update_fees(
    State(state): State<AppState>,
    Path(lock_id): Path<String>,
) -> ApiResult<UnsignedCallResponse> {
    let lock_id = parse_lock_id(&lock_id)?;
    let contracts = owner_gate(&state, &lock_id).await?;

    let call = tx_builder::build_update_claimable_fees(&contracts, &lock_id);
    Ok(Json(UnsignedCallResponse::new(call, Operation::UpdateFees)))
}

/// POST /fees/:lock_id/claim - claim accrued fees
pub async fn claim_fees(
    State(state): State<AppState>,
    Path(lock_id): Path<String>,
) -> ApiResult<UnsignedCallResponse> {
    let lock_id = parse_lock_id(&lock_id)?;
    let contracts = owner_gate(&state, &lock_id).await?;

    let call = tx_builder::build_claim_lp_fees(&contracts, &lock_id);
    Ok(Json(UnsignedCallResponse::new(call, Operation::ClaimFees)))
}

async fn owner_gate(
    state: &AppState,
    lock_id: &lockboard_core::LockId,
) -> Result<lockboard_core::ChainContracts, crate::routes::ErrorResponse> {
    let contracts = state.resolve_contracts().await.map_err(fail)?;
    let client = require_client(state).await?;
    let wallet = require_wallet(state).await?;

    let lock = fetch_lock(&client, &contracts, lock_id)
        .await
        .map_err(fail)?;
    if !lock_exists(&lock) {
        return Err(fail(ProtocolError::LockNotFound {
            lock_id: lock_id.clone(),
        }));
    }

    if !lock.owner.same_as(wallet.address.as_str()) {
        return Err(fail(ProtocolError::NotOwner {
            wallet: wallet.address.to_string(),
            owner: lock.owner.to_string(),
        }));
    }

    Ok(contracts)
}
