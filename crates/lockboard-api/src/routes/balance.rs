//! Balance panel: LP tokens held by the locker

use axum::{extract::State, routing::get, Json, Router};
use lplocker::fetch_lp_balance;

use crate::dto::BalanceResponse;
use crate::routes::{fail, require_client, ApiResult};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_balance))
}

/// GET /balance - LP token balance of the locker contract
pub async fn get_balance(State(state): State<AppState>) -> ApiResult<BalanceResponse> {
    let contracts = state.resolve_contracts().await.map_err(fail)?;
    let client = require_client(&state).await?;

    let locker_balance = fetch_lp_balance(&client, &contracts).await.map_err(fail)?;

    Ok(Json(BalanceResponse { locker_balance }))
}
