//! API route handlers
//!
//! One module per dashboard panel. Every handler isolates its own failures
//! into a structured error response on its own route; no error propagates
//! into a sibling panel.

pub mod balance;
pub mod chain;
pub mod deposit;
pub mod fees;
pub mod health;
pub mod locks;
pub mod recovery;
pub mod tx;
pub mod wallet;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use evm_rpc_client::EvmClient;
use lockboard_core::{Address, Error, LockId, TokenUnits, TxHash};

use crate::dto::{ApiError, RefreshResponse};
use crate::state::{AppState, WalletState};

/// Create the API router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/refresh", get(refresh_snapshot))
        .nest("/chain", chain::router())
        .nest("/wallet", wallet::router())
        .nest("/locks", locks::router())
        .nest("/balance", balance::router())
        .nest("/fees", fees::router())
        .nest("/deposit", deposit::router())
        .nest("/recovery", recovery::router())
        .nest("/tx", tx::router())
        .with_state(state)
}

/// GET /refresh - current refresh counters as change-tokens
async fn refresh_snapshot(State(state): State<AppState>) -> Json<RefreshResponse> {
    Json(RefreshResponse {
        snapshot: state.refresh().snapshot(),
    })
}

pub(crate) type ErrorResponse = (StatusCode, Json<ApiError>);
pub(crate) type ApiResult<T> = Result<Json<T>, ErrorResponse>;

/// Map a core error onto its HTTP status and structured body.
pub(crate) fn fail(err: impl Into<Error>) -> ErrorResponse {
    let err = err.into();
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(ApiError::from(&err)))
}

pub(crate) async fn require_client(state: &AppState) -> Result<EvmClient, ErrorResponse> {
    state.client().await.ok_or((
        StatusCode::SERVICE_UNAVAILABLE,
        Json(ApiError::rpc_unavailable()),
    ))
}

pub(crate) async fn require_wallet(state: &AppState) -> Result<WalletState, ErrorResponse> {
    state.wallet().await.ok_or((
        StatusCode::UNAUTHORIZED,
        Json(ApiError::wallet_not_connected()),
    ))
}

pub(crate) fn parse_amount(raw: &str) -> Result<TokenUnits, ErrorResponse> {
    raw.trim().parse().map_err(|_| {
        (
            StatusCode::BAD_REQUEST,
            Json(ApiError::bad_request(format!(
                "amount must be a decimal integer in token base units, got {:.32}",
                raw
            ))),
        )
    })
}

pub(crate) fn parse_lock_id(raw: &str) -> Result<LockId, ErrorResponse> {
    LockId::parse(raw).map_err(fail)
}

pub(crate) fn parse_address(raw: &str) -> Result<Address, ErrorResponse> {
    Address::parse(raw).map_err(fail)
}

pub(crate) fn parse_tx_hash(raw: &str) -> Result<TxHash, ErrorResponse> {
    TxHash::parse(raw).map_err(fail)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use evm_rpc_client::transport::mock::MockTransport;
    use evm_rpc_client::EvmClient;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 1 << 20)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn state_with_mock(mock: MockTransport) -> AppState {
        let state = AppState::new();
        state
            .set_client(EvmClient::with_transport(Arc::new(mock)))
            .await;
        state
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = create_router(AppState::new());
        let response = app
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_list_locks_empty() {
        let mock = MockTransport::new();
        // getAllLockIds: dynamic array at offset 0x20, length 0
        let empty_array = format!("0x{:064x}{:064x}", 0x20, 0);
        mock.expect("eth_call", Ok(json!(empty_array)));
        let state = state_with_mock(mock).await;

        let app = create_router(state);
        let response = app
            .oneshot(Request::get("/locks").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["totalLocks"], 0);
        assert_eq!(body["locks"], json!([]));
        assert_eq!(body["timeSource"], "local");
    }

    #[tokio::test]
    async fn test_deposit_without_wallet_is_unauthorized() {
        let state = state_with_mock(MockTransport::new()).await;
        let app = create_router(state);

        let response = app
            .oneshot(
                Request::post("/deposit")
                    .header("content-type", "application/json")
                    .body(Body::from(json!({ "amount": "1000" }).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = body_json(response).await;
        assert_eq!(body["code"], "wallet_not_connected");
    }

    #[tokio::test]
    async fn test_bad_amount_is_rejected_before_any_rpc() {
        let mock = MockTransport::new();
        let state = state_with_mock(mock).await;
        let app = create_router(state);

        let response = app
            .oneshot(
                Request::post("/deposit/approve")
                    .header("content-type", "application/json")
                    .body(Body::from(json!({ "amount": "1.5" }).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "bad_request");
    }

    const LOCK_OWNER: &str = "0xe7f1725e7734ce288f8367e1bb143e90bb3f0512";
    const LOCK_ID: &str = "0x0000000000000000000000000000000000000000000000000000000000000001";

    /// getLockInfo tuple for a locked, untriggered lock owned by `owner`.
    fn lock_info_hex(owner: &str) -> String {
        let word = |tail: &str| format!("{:0>64}", tail);
        let addr = |a: &str| word(a.trim_start_matches("0x"));
        let mut out = String::from("0x");
        out.push_str(&addr(owner));
        out.push_str(&addr("0x5fbdb2315678afecb367f032d93f642f64180aa3"));
        out.push_str(&addr("0xa85233c63b9ee964add6f2cffe00fd84eb32338f"));
        out.push_str(&word("64")); // amount
        out.push_str(&word("0")); // unlock time
        out.push_str(&word("1")); // locked
        out.push_str(&word("0")); // not triggered
        out
    }

    #[tokio::test]
    async fn test_trigger_by_non_owner_is_forbidden() {
        let mock = MockTransport::new();
        mock.expect("eth_call", Ok(json!(lock_info_hex(LOCK_OWNER))));
        let state = state_with_mock(mock).await;
        state
            .set_wallet("0x09635f643e140090a9a8dcd712ed6285858cebef")
            .await
            .unwrap();

        let app = create_router(state);
        let response = app
            .oneshot(
                Request::post(format!("/locks/{}/trigger", LOCK_ID))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let body = body_json(response).await;
        assert_eq!(body["code"], "not_owner");
    }

    #[tokio::test]
    async fn test_trigger_by_owner_in_mixed_case_succeeds() {
        let mock = MockTransport::new();
        mock.expect("eth_call", Ok(json!(lock_info_hex(LOCK_OWNER))));
        let state = state_with_mock(mock).await;
        // Checksummed casing of the same owner address must pass the gate.
        state
            .set_wallet("0xE7f1725E7734CE288F8367e1Bb143E90bb3F0512")
            .await
            .unwrap();

        let app = create_router(state);
        let response = app
            .oneshot(
                Request::post(format!("/locks/{}/trigger", LOCK_ID))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["operation"], "trigger_withdrawal");
        assert!(body["call"]["data"]
            .as_str()
            .unwrap()
            .starts_with("0x9cb15243"));
    }

    #[tokio::test]
    async fn test_submitted_rejects_garbage_tx_hash() {
        let state = state_with_mock(MockTransport::new()).await;
        let app = create_router(state);

        let response = app
            .clone()
            .oneshot(
                Request::post("/tx/submitted")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({
                            "txHash": "definitely-not-a-32-byte-hash",
                            "operation": "deposit"
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], "invalid_address");

        // A well-formed hash registers a watch.
        let response = app
            .oneshot(
                Request::post("/tx/submitted")
                    .header("content-type", "application/json")
                    .body(Body::from(
                        json!({
                            "txHash": format!("0x{:064x}", 7),
                            "operation": "deposit"
                        })
                        .to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(!body["watchId"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_refresh_counters_reflect_signals() {
        let state = AppState::new();
        state.refresh().signal(lockboard_core::RefreshDomain::Fees);
        let app = create_router(state);

        let response = app
            .oneshot(Request::get("/refresh").body(Body::empty()).unwrap())
            .await
            .unwrap();

        let body = body_json(response).await;
        assert_eq!(body["fees"], 1);
        assert_eq!(body["locks"], 0);
    }
}
