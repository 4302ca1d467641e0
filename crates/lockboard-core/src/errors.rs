//! Error types for Lockboard

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::types::{ChainId, LockId};

/// Core errors that can occur in Lockboard
#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),
}

/// Configuration errors. Fatal to the current view, recoverable by
/// switching networks or fixing the config.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("No contract addresses configured for chain ID {chain_id}")]
    ChainNotConfigured { chain_id: ChainId },

    #[error("Invalid address: {reason}")]
    InvalidAddress { reason: String },

    #[error("Failed to load config: {reason}")]
    LoadFailed { reason: String },
}

/// Errors talking to the chain through the RPC gateway
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("RPC endpoint unreachable at {url}")]
    Unreachable { url: String },

    #[error("RPC error {code}: {message}")]
    RpcError { code: i64, message: String },

    /// A read that returned successfully but whose shape does not match the
    /// declared contract surface. Never coerced, always surfaced.
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String },

    #[error("Transaction not found: {tx_hash}")]
    TxNotFound { tx_hash: String },
}

/// Locker protocol errors
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Connected wallet {wallet} is not the lock owner {owner}")]
    NotOwner { wallet: String, owner: String },

    #[error("Invalid amount: {message}")]
    InvalidAmount { message: String },

    #[error("Action not allowed: {reason}")]
    ActionNotAllowed { reason: String },

    #[error("Lock not found: {lock_id}")]
    LockNotFound { lock_id: LockId },
}

/// Result type alias for Lockboard operations
pub type Result<T> = std::result::Result<T, Error>;

impl ConfigError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ChainNotConfigured { .. } => "chain_not_configured",
            Self::InvalidAddress { .. } => "invalid_address",
            Self::LoadFailed { .. } => "config_load_failed",
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::ChainNotConfigured { .. } => 422,
            Self::InvalidAddress { .. } => 400,
            Self::LoadFailed { .. } => 500,
        }
    }
}

impl GatewayError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unreachable { .. } => "rpc_unreachable",
            Self::RpcError { .. } => "rpc_error",
            Self::MalformedResponse { .. } => "malformed_response",
            Self::TxNotFound { .. } => "tx_not_found",
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::Unreachable { .. } => 503,
            Self::RpcError { .. } => 502,
            Self::MalformedResponse { .. } => 502,
            Self::TxNotFound { .. } => 404,
        }
    }
}

impl ProtocolError {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotOwner { .. } => "not_owner",
            Self::InvalidAmount { .. } => "invalid_amount",
            Self::ActionNotAllowed { .. } => "action_not_allowed",
            Self::LockNotFound { .. } => "lock_not_found",
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotOwner { .. } => 403,
            Self::InvalidAmount { .. } => 400,
            Self::ActionNotAllowed { .. } => 422,
            Self::LockNotFound { .. } => 404,
        }
    }
}

impl Error {
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Config(e) => e.error_code(),
            Self::Gateway(e) => e.error_code(),
            Self::Protocol(e) => e.error_code(),
        }
    }

    pub fn status_code(&self) -> u16 {
        match self {
            Self::Config(e) => e.status_code(),
            Self::Gateway(e) => e.status_code(),
            Self::Protocol(e) => e.status_code(),
        }
    }
}

/// Human-readable guidance attached to every surfaced error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorAdvice {
    /// Short category, e.g. "Contract call reverted"
    pub category: String,
    /// Suggested remedy for the operator
    pub suggestion: String,
    /// Whether retrying the same action can plausibly succeed
    pub retryable: bool,
}

/// Classify an error message into a category and remedy.
///
/// Pattern-matches on the underlying message the way wallet and RPC stacks
/// phrase their failures, so the operator gets more than a raw string.
pub fn classify(err: &Error) -> ErrorAdvice {
    match err {
        Error::Config(ConfigError::ChainNotConfigured { chain_id }) => ErrorAdvice {
            category: "Unsupported network".to_string(),
            suggestion: format!(
                "Chain {} has no configured locker deployment. Switch your wallet to a supported network.",
                chain_id
            ),
            retryable: false,
        },
        Error::Config(_) => ErrorAdvice {
            category: "Configuration error".to_string(),
            suggestion: "Check the service configuration and restart.".to_string(),
            retryable: false,
        },
        Error::Protocol(ProtocolError::NotOwner { .. }) => ErrorAdvice {
            category: "Unauthorized access".to_string(),
            suggestion: "Only the lock owner can perform this action. Connect the owner wallet."
                .to_string(),
            retryable: false,
        },
        Error::Protocol(_) => ErrorAdvice {
            category: "Action rejected".to_string(),
            suggestion: "Check the request parameters and try again.".to_string(),
            retryable: true,
        },
        Error::Gateway(g) => classify_gateway_message(g),
    }
}

fn classify_gateway_message(err: &GatewayError) -> ErrorAdvice {
    let message = err.to_string();
    let lower = message.to_ascii_lowercase();

    let (category, suggestion, retryable) = if lower.contains("execution reverted") {
        (
            "Contract call reverted",
            "The contract may not be initialized, or the call violates a contract check.",
            false,
        )
    } else if lower.contains("insufficient funds") {
        (
            "Insufficient funds for gas",
            "Add more ETH to the wallet to cover gas fees.",
            false,
        )
    } else if lower.contains("rate limit") {
        (
            "Rate limit exceeded",
            "Too many requests. Wait a moment and try again.",
            true,
        )
    } else if lower.contains("timeout") || lower.contains("timed out") {
        (
            "Request timeout",
            "The request took too long. Try again or check the RPC endpoint.",
            true,
        )
    } else if lower.contains("not found") {
        (
            "Resource not found",
            "The requested item could not be found. Check the contract address.",
            false,
        )
    } else if matches!(err, GatewayError::Unreachable { .. }) || lower.contains("network") {
        (
            "Network connection error",
            "Check your connection and make sure the RPC endpoint is on the right chain.",
            true,
        )
    } else if matches!(err, GatewayError::MalformedResponse { .. }) {
        (
            "Unexpected contract data",
            "The contract returned data in an unexpected shape. Verify the configured address points at the locker.",
            false,
        )
    } else {
        (
            "Chain request failed",
            "Check the RPC endpoint and try again.",
            true,
        )
    };

    ErrorAdvice {
        category: category.to_string(),
        suggestion: suggestion.to_string(),
        retryable,
    }
}
