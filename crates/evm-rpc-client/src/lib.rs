//! evm-rpc-client: Thin EVM JSON-RPC client for the locker contract surface
//!
//! Wraps a JSON-RPC transport with the handful of typed calls the dashboard
//! needs: `eth_call` reads against the locker and LP token, block metadata
//! for the chain clock, and receipt lookups for the transaction watcher.

pub mod abi;
pub mod chain_clock;
pub mod transport;

use std::sync::Arc;

use lockboard_core::{Address, BlockHeight, ChainId, GatewayError, TxHash, UnixSeconds};
use serde_json::{json, Value};

pub use chain_clock::{ChainClock, ClockSample};
pub use transport::{HttpTransport, Transport};

/// Result type for client operations
pub type Result<T> = std::result::Result<T, GatewayError>;

/// Terminal status of a mined transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReceiptStatus {
    Success,
    Reverted,
}

/// EVM JSON-RPC client
#[derive(Clone)]
pub struct EvmClient {
    transport: Arc<dyn Transport>,
}

impl EvmClient {
    /// Connect over HTTP.
    pub fn connect(url: &str) -> Result<Self> {
        Ok(Self {
            transport: Arc::new(HttpTransport::new(url)?),
        })
    }

    /// Build over an arbitrary transport (tests use an in-memory one).
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    /// Chain ID reported by the endpoint.
    pub async fn chain_id(&self) -> Result<ChainId> {
        let result = self.transport.request("eth_chainId", json!([])).await?;
        abi::quantity_from_hex(result_str(&result)?)
    }

    /// Latest block number.
    pub async fn block_number(&self) -> Result<BlockHeight> {
        let result = self.transport.request("eth_blockNumber", json!([])).await?;
        abi::quantity_from_hex(result_str(&result)?)
    }

    /// Timestamp of the latest block. Authoritative clock for timelock
    /// comparisons; local wall time is only a fallback.
    pub async fn latest_block_timestamp(&self) -> Result<UnixSeconds> {
        let result = self
            .transport
            .request("eth_getBlockByNumber", json!(["latest", false]))
            .await?;

        let timestamp = result
            .get("timestamp")
            .and_then(Value::as_str)
            .ok_or_else(|| GatewayError::MalformedResponse {
                message: "block object missing timestamp".to_string(),
            })?;

        abi::quantity_from_hex(timestamp)
    }

    /// `eth_call` against `to` with raw calldata, returning raw bytes.
    pub async fn call(&self, to: &Address, data: &[u8]) -> Result<Vec<u8>> {
        let params = json!([
            {
                "to": to.as_str(),
                "data": format!("0x{}", hex::encode(data)),
            },
            "latest"
        ]);

        let result = self.transport.request("eth_call", params).await?;
        abi::decode_hex(result_str(&result)?)
    }

    /// Receipt status for a transaction, `None` while still pending.
    pub async fn transaction_receipt(&self, tx_hash: &TxHash) -> Result<Option<ReceiptStatus>> {
        let result = self
            .transport
            .request("eth_getTransactionReceipt", json!([tx_hash.as_str()]))
            .await?;

        if result.is_null() {
            return Ok(None);
        }

        let status = result
            .get("status")
            .and_then(Value::as_str)
            .ok_or_else(|| GatewayError::MalformedResponse {
                message: "receipt missing status field".to_string(),
            })?;

        match abi::quantity_from_hex(status)? {
            1 => Ok(Some(ReceiptStatus::Success)),
            0 => Ok(Some(ReceiptStatus::Reverted)),
            other => Err(GatewayError::MalformedResponse {
                message: format!("receipt status {} is not 0 or 1", other),
            }),
        }
    }

    /// Check if the endpoint responds at all.
    pub async fn is_online(&self) -> bool {
        self.block_number().await.is_ok()
    }
}

fn result_str(value: &Value) -> Result<&str> {
    value.as_str().ok_or_else(|| GatewayError::MalformedResponse {
        message: format!("expected hex string result, got {}", value),
    })
}
