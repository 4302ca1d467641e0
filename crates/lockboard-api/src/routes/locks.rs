//! Locks panel: enumeration, per-lock detail, and withdrawal management

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use lockboard_core::{ChainContracts, ProtocolError};
use lplocker::state::{Lock, LockView, LockerState};
use lplocker::{
    can_withdraw, display_state, fetch_lock, fetch_locker_state, lock_exists, tx_builder,
};

use crate::dto::{AmountRequest, UnsignedCallResponse};
use crate::routes::{
    fail, parse_amount, parse_lock_id, require_client, require_wallet, ApiResult, ErrorResponse,
};
use crate::watcher::Operation;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_locks))
        .route("/:lock_id", get(get_lock))
        .route("/:lock_id/trigger", post(trigger_withdrawal))
        .route("/:lock_id/cancel", post(cancel_withdrawal))
        .route("/:lock_id/withdraw", post(withdraw))
}

/// GET /locks - all locks with display state derived at the current time
pub async fn list_locks(State(state): State<AppState>) -> ApiResult<LockerState> {
    let contracts = state.resolve_contracts().await.map_err(fail)?;
    let client = require_client(&state).await?;
    let viewer = state.wallet().await.map(|w| w.address);

    let (now, time_source) = state.clock().now_seconds();
    let locker_state =
        fetch_locker_state(&client, &contracts, viewer.as_ref(), now, time_source)
            .await
            .map_err(fail)?;

    Ok(Json(locker_state))
}

/// GET /locks/:lock_id - one lock with display state
pub async fn get_lock(
    State(state): State<AppState>,
    Path(lock_id): Path<String>,
) -> ApiResult<LockView> {
    let lock_id = parse_lock_id(&lock_id)?;
    let contracts = state.resolve_contracts().await.map_err(fail)?;
    let client = require_client(&state).await?;

    let lock = fetch_lock(&client, &contracts, &lock_id)
        .await
        .map_err(fail)?;
    if !lock_exists(&lock) {
        return Err(fail(ProtocolError::LockNotFound { lock_id }));
    }

    let (now, _) = state.clock().now_seconds();
    let is_own = match state.wallet().await {
        Some(wallet) => lock.owner.same_as(wallet.address.as_str()),
        None => false,
    };

    Ok(Json(LockView {
        display: display_state(&lock, now),
        lock,
        is_own,
    }))
}

/// POST /locks/:lock_id/trigger - start the withdrawal timelock
pub async fn trigger_withdrawal(
    State(state): State<AppState>,
    Path(lock_id): Path<String>,
) -> ApiResult<UnsignedCallResponse> {
    let lock_id = parse_lock_id(&lock_id)?;
    let (lock, contracts) = load_owned_lock(&state, &lock_id).await?;

    if !lock.is_liquidity_locked {
        return Err(fail(ProtocolError::ActionNotAllowed {
            reason: "lock is already fully withdrawn".to_string(),
        }));
    }
    if lock.is_withdrawal_triggered {
        return Err(fail(ProtocolError::ActionNotAllowed {
            reason: "withdrawal is already triggered for this lock".to_string(),
        }));
    }

    let call = tx_builder::build_trigger_withdrawal(&contracts, &lock_id);
    Ok(Json(UnsignedCallResponse::new(
        call,
        Operation::TriggerWithdrawal,
    )))
}

/// POST /locks/:lock_id/cancel - cancel a pending withdrawal trigger
pub async fn cancel_withdrawal(
    State(state): State<AppState>,
    Path(lock_id): Path<String>,
) -> ApiResult<UnsignedCallResponse> {
    let lock_id = parse_lock_id(&lock_id)?;
    let (lock, contracts) = load_owned_lock(&state, &lock_id).await?;

    if !lock.is_withdrawal_triggered {
        return Err(fail(ProtocolError::ActionNotAllowed {
            reason: "no withdrawal is pending for this lock".to_string(),
        }));
    }

    let call = tx_builder::build_cancel_withdrawal_trigger(&contracts, &lock_id);
    Ok(Json(UnsignedCallResponse::new(
        call,
        Operation::CancelWithdrawal,
    )))
}

/// POST /locks/:lock_id/withdraw - withdraw LP tokens from a matured lock
pub async fn withdraw(
    State(state): State<AppState>,
    Path(lock_id): Path<String>,
    Json(request): Json<AmountRequest>,
) -> ApiResult<UnsignedCallResponse> {
    let lock_id = parse_lock_id(&lock_id)?;
    let amount = parse_amount(&request.amount)?;
    let (lock, contracts) = load_owned_lock(&state, &lock_id).await?;

    // Gate on the chain-derived clock; the contract is still the final
    // arbiter if local fallback time is ahead of it.
    let (now, _) = state.clock().now_seconds();
    if !can_withdraw(&lock, now) {
        let status = lplocker::derive_status(&lock, now);
        return Err(fail(ProtocolError::ActionNotAllowed {
            reason: format!("lock is not withdrawable (status: {})", status.label()),
        }));
    }

    if amount > lock.amount {
        return Err(fail(ProtocolError::InvalidAmount {
            message: format!(
                "withdrawal of {} exceeds locked amount {}",
                amount, lock.amount
            ),
        }));
    }

    let call = tx_builder::build_withdraw_lp(&contracts, &lock_id, amount).map_err(fail)?;
    Ok(Json(UnsignedCallResponse::new(call, Operation::Withdraw)))
}

/// Fetch a lock and require the connected wallet to be its owner.
/// Ownership compares case-insensitively; addresses are not case-sensitive.
async fn load_owned_lock(
    state: &AppState,
    lock_id: &lockboard_core::LockId,
) -> Result<(Lock, ChainContracts), ErrorResponse> {
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

    Ok((lock, contracts))
}
