//! Configuration types for Lockboard

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::ConfigError;
use crate::types::{Address, ChainId};

/// RPC endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RpcConfig {
    /// JSON-RPC URL (e.g., "http://127.0.0.1:8545")
    pub url: String,

    /// Chain this endpoint is expected to serve
    pub chain_id: ChainId,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:8545".to_string(),
            chain_id: chains::ANVIL_LOCAL,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// RPC endpoint settings
    pub rpc: RpcConfig,

    /// API server port
    #[serde(default = "default_api_port")]
    pub api_port: u16,
}

fn default_api_port() -> u16 {
    18545
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            rpc: RpcConfig::default(),
            api_port: default_api_port(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file.
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            reason: format!("{}: {}", path.display(), e),
        })?;
        serde_json::from_str(&raw).map_err(|e| ConfigError::LoadFailed {
            reason: format!("{}: {}", path.display(), e),
        })
    }
}

/// Well-known chain IDs
pub mod chains {
    use crate::types::ChainId;

    pub const BASE_MAINNET: ChainId = 8453;
    pub const ANVIL_LOCAL: ChainId = 31337;
}

/// Deployed contract addresses for one chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainContracts {
    /// LPLocker contract
    pub locker: Address,
    /// Underlying LP token (ERC-20)
    pub lp_token: Address,
}

/// Immutable chain-id → contract-address table.
///
/// Lookup for an unknown chain is an error, never a default: serving a
/// zero or stale address would silently point every read at the wrong
/// contract.
#[derive(Debug, Clone)]
pub struct ChainAddressBook {
    entries: HashMap<ChainId, ChainContracts>,
}

impl ChainAddressBook {
    /// Built-in deployments.
    pub fn builtin() -> Self {
        let mut entries = HashMap::new();

        entries.insert(
            chains::BASE_MAINNET,
            ChainContracts {
                locker: Address::parse("0xe7f1725e7734ce288f8367e1bb143e90bb3f0512")
                    .expect("static address"),
                lp_token: Address::parse("0x5fbdb2315678afecb367f032d93f642f64180aa3")
                    .expect("static address"),
            },
        );

        entries.insert(
            chains::ANVIL_LOCAL,
            ChainContracts {
                locker: Address::parse("0x09635f643e140090a9a8dcd712ed6285858cebef")
                    .expect("static address"),
                lp_token: Address::parse("0xa85233c63b9ee964add6f2cffe00fd84eb32338f")
                    .expect("static address"),
            },
        );

        Self { entries }
    }

    /// Empty book, for tests.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Builder-style entry insertion, for tests and overrides at startup.
    pub fn with_entry(mut self, chain_id: ChainId, contracts: ChainContracts) -> Self {
        self.entries.insert(chain_id, contracts);
        self
    }

    /// Resolve the deployed contracts for a chain.
    pub fn resolve(&self, chain_id: ChainId) -> Result<&ChainContracts, ConfigError> {
        self.entries
            .get(&chain_id)
            .ok_or(ConfigError::ChainNotConfigured { chain_id })
    }

    pub fn configured_chains(&self) -> Vec<ChainId> {
        let mut chains: Vec<ChainId> = self.entries.keys().copied().collect();
        chains.sort_unstable();
        chains
    }
}

impl Default for ChainAddressBook {
    fn default() -> Self {
        Self::builtin()
    }
}
