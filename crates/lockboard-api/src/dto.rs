//! Data Transfer Objects for API requests and responses

use lockboard_core::{
    classify, Address, ChainId, Error, ErrorAdvice, RefreshSnapshot, TimeSource, TokenUnits,
};
use lplocker::state::amount_string;
use lplocker::UnsignedCall;
use serde::{Deserialize, Serialize};

use crate::watcher::Operation;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

impl Default for HealthResponse {
    fn default() -> Self {
        Self {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Chain/endpoint status response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainStatusResponse {
    pub connected: bool,
    pub url: String,
    pub chain_id: ChainId,
    pub chain_configured: bool,
    pub block_height: Option<u64>,
    /// Clock currently used for timelock comparisons
    pub time_source: TimeSource,
    pub current_time: u64,
}

/// RPC configuration request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RpcConfigRequest {
    pub url: String,
    pub chain_id: ChainId,
}

/// Wallet connection request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WalletConnectRequest {
    pub address: String,
}

/// Connected wallet response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletResponse {
    pub address: Address,
    pub connected_secs: u64,
}

/// Locker LP balance response (balance panel)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceResponse {
    #[serde(with = "amount_string")]
    pub locker_balance: TokenUnits,
}

/// Fee state for one lock (fees panel)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeesResponse {
    #[serde(with = "amount_string")]
    pub claimable: TokenUnits,
    #[serde(with = "amount_string")]
    pub total_accumulated: TokenUnits,
}

/// Deposit panel preview: wallet funds, allowance, and whether an approval
/// has to precede the deposit
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DepositPreviewResponse {
    #[serde(with = "amount_string")]
    pub wallet_balance: TokenUnits,
    #[serde(with = "amount_string")]
    pub allowance: TokenUnits,
    #[serde(with = "amount_string")]
    pub amount: TokenUnits,
    pub needs_approval: bool,
    pub sufficient_balance: bool,
}

/// Amount-bearing write request (deposit, approve, withdraw)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmountRequest {
    /// Token base units, decimal string
    pub amount: String,
}

/// Emergency recovery request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryRequest {
    /// Stray token to recover (never the LP token)
    pub token: String,
    pub amount: String,
}

/// Unsigned call handed back for external signing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnsignedCallResponse {
    pub call: UnsignedCall,
    pub operation: Operation,
    /// What to report the broadcast hash as, via POST /tx/submitted
    pub report_as: Operation,
}

impl UnsignedCallResponse {
    pub fn new(call: UnsignedCall, operation: Operation) -> Self {
        Self {
            call,
            operation,
            report_as: operation,
        }
    }
}

/// Broadcast report from the wallet side. The hash arrives as a raw string
/// and is validated by the handler before it reaches the watcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxSubmittedRequest {
    pub tx_hash: String,
    pub operation: Operation,
    #[serde(default)]
    pub description: Option<String>,
}

/// Watch registration response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxSubmittedResponse {
    pub watch_id: String,
}

/// Pollable refresh counters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    #[serde(flatten)]
    pub snapshot: RefreshSnapshot,
}

/// Structured API error: machine code plus the operator-facing category,
/// remedy and retry hint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(flatten)]
    pub advice: ErrorAdvice,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>, advice: ErrorAdvice) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            advice,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            code: "bad_request".to_string(),
            message: message.into(),
            advice: ErrorAdvice {
                category: "Invalid request".to_string(),
                suggestion: "Check the request parameters and try again.".to_string(),
                retryable: true,
            },
        }
    }

    pub fn rpc_unavailable() -> Self {
        Self {
            code: "rpc_unavailable".to_string(),
            message: "RPC endpoint not connected".to_string(),
            advice: ErrorAdvice {
                category: "Network connection error".to_string(),
                suggestion: "Configure a reachable RPC endpoint via POST /chain/config."
                    .to_string(),
                retryable: true,
            },
        }
    }

    pub fn wallet_not_connected() -> Self {
        Self {
            code: "wallet_not_connected".to_string(),
            message: "No wallet connected".to_string(),
            advice: ErrorAdvice {
                category: "Unauthorized access".to_string(),
                suggestion: "Connect a wallet via POST /wallet/connect first.".to_string(),
                retryable: false,
            },
        }
    }
}

impl From<&Error> for ApiError {
    fn from(err: &Error) -> Self {
        Self {
            code: err.error_code().to_string(),
            message: err.to_string(),
            advice: classify(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockboard_core::{ConfigError, GatewayError};

    #[test]
    fn test_api_error_carries_advice() {
        let err = Error::Config(ConfigError::ChainNotConfigured { chain_id: 5 });
        let api: ApiError = (&err).into();
        assert_eq!(api.code, "chain_not_configured");
        assert_eq!(api.advice.category, "Unsupported network");

        let json = serde_json::to_value(&api).unwrap();
        assert!(json["suggestion"].as_str().unwrap().contains("5"));
        assert_eq!(json["retryable"], false);
    }

    #[test]
    fn test_api_error_retryable_for_transient_failures() {
        let err = Error::Gateway(GatewayError::Unreachable {
            url: "http://localhost".into(),
        });
        let api: ApiError = (&err).into();
        assert!(api.advice.retryable);
    }

    #[test]
    fn test_balance_response_amount_as_string() {
        let response = BalanceResponse {
            locker_balance: 12_345,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["lockerBalance"], "12345");
    }
}
