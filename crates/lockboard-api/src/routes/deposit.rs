//! Deposit panel: preview, ERC-20 approval, and locking

use axum::{
    extract::{Query, State},
    routing::{get, post},
    Json, Router,
};
use lockboard_core::ProtocolError;
use lplocker::{fetch_wallet_allowance, fetch_wallet_lp_balance, tx_builder};
use serde::Deserialize;

use crate::dto::{AmountRequest, DepositPreviewResponse, UnsignedCallResponse};
use crate::routes::{fail, parse_amount, require_client, require_wallet, ApiResult};
use crate::watcher::Operation;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(deposit))
        .route("/preview", get(preview))
        .route("/approve", post(approve))
}

#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    pub amount: String,
}

/// GET /deposit/preview?amount=N - wallet funds and allowance relative to an
/// intended deposit
pub async fn preview(
    State(state): State<AppState>,
    Query(query): Query<PreviewQuery>,
) -> ApiResult<DepositPreviewResponse> {
    let amount = parse_amount(&query.amount)?;
    let contracts = state.resolve_contracts().await.map_err(fail)?;
    let client = require_client(&state).await?;
    let wallet = require_wallet(&state).await?;

    let wallet_balance = fetch_wallet_lp_balance(&client, &contracts, &wallet.address)
        .await
        .map_err(fail)?;
    let allowance = fetch_wallet_allowance(&client, &contracts, &wallet.address)
        .await
        .map_err(fail)?;

    Ok(Json(DepositPreviewResponse {
        wallet_balance,
        allowance,
        amount,
        needs_approval: amount > allowance,
        sufficient_balance: amount <= wallet_balance,
    }))
}

/// POST /deposit/approve - grant the locker an LP token allowance
pub async fn approve(
    State(state): State<AppState>,
    Json(request): Json<AmountRequest>,
) -> ApiResult<UnsignedCallResponse> {
    let amount = parse_amount(&request.amount)?;
    let contracts = state.resolve_contracts().await.map_err(fail)?;
    require_wallet(&state).await?;

    let call = tx_builder::build_approve(&contracts, amount).map_err(fail)?;
    Ok(Json(UnsignedCallResponse::new(call, Operation::Approve)))
}

/// POST /deposit - lock LP tokens
///
/// Rejects deposits the current allowance cannot cover, so the operator is
/// pointed at the approval step instead of a contract revert.
pub async fn deposit(
    State(state): State<AppState>,
    Json(request): Json<AmountRequest>,
) -> ApiResult<UnsignedCallResponse> {
    let amount = parse_amount(&request.amount)?;
    let contracts = state.resolve_contracts().await.map_err(fail)?;
    let client = require_client(&state).await?;
    let wallet = require_wallet(&state).await?;

    let allowance = fetch_wallet_allowance(&client, &contracts, &wallet.address)
        .await
        .map_err(fail)?;
    if amount > allowance {
        return Err(fail(ProtocolError::ActionNotAllowed {
            reason: format!(
                "allowance {} does not cover deposit of {}, approve first",
                allowance, amount
            ),
        }));
    }

    let balance = fetch_wallet_lp_balance(&client, &contracts, &wallet.address)
        .await
        .map_err(fail)?;
    if amount > balance {
        return Err(fail(ProtocolError::InvalidAmount {
            message: format!("deposit of {} exceeds wallet balance {}", amount, balance),
        }));
    }

    let call = tx_builder::build_lock_liquidity(&contracts, amount).map_err(fail)?;
    Ok(Json(UnsignedCallResponse::new(call, Operation::Deposit)))
}
