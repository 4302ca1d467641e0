//! Application state shared across API handlers

use std::sync::Arc;
use std::time::Instant;

use evm_rpc_client::{ChainClock, EvmClient};
use lockboard_core::{
    Address, AppConfig, ChainAddressBook, ChainContracts, ChainId, ConfigError,
    RefreshCoordinator, RpcConfig,
};
use tokio::sync::RwLock;

use crate::watcher::TxWatcher;

/// State representing a connected wallet
#[derive(Clone, Debug)]
pub struct WalletState {
    /// The wallet's address, normalized to lowercase hex
    pub address: Address,
    /// When the wallet was connected
    pub connected_at: Instant,
}

impl WalletState {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            connected_at: Instant::now(),
        }
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: RwLock<AppConfig>,
    client: RwLock<Option<EvmClient>>,
    wallet: RwLock<Option<WalletState>>,
    address_book: ChainAddressBook,
    refresh: RefreshCoordinator,
    clock: ChainClock,
    watcher: TxWatcher,
}

impl AppState {
    /// Create a new application state with default config and the built-in
    /// address book.
    pub fn new() -> Self {
        Self::with_config(AppConfig::default())
    }

    /// Create with a specific config
    pub fn with_config(config: AppConfig) -> Self {
        Self::with_parts(config, ChainAddressBook::builtin())
    }

    /// Create with a specific config and address book (tests override the
    /// book to point at mock deployments).
    pub fn with_parts(config: AppConfig, address_book: ChainAddressBook) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config: RwLock::new(config),
                client: RwLock::new(None),
                wallet: RwLock::new(None),
                address_book,
                refresh: RefreshCoordinator::new(),
                clock: ChainClock::new(),
                watcher: TxWatcher::new(),
            }),
        }
    }

    /// Get current config
    pub async fn config(&self) -> AppConfig {
        self.inner.config.read().await.clone()
    }

    /// Update RPC configuration. Drops the cached client and clock sample;
    /// they belong to the old endpoint.
    pub async fn set_rpc_config(&self, rpc: RpcConfig) {
        let mut config = self.inner.config.write().await;
        config.rpc = rpc;

        let mut client = self.inner.client.write().await;
        *client = None;
        self.inner.clock.clear();
    }

    /// Get or create the RPC client
    pub async fn client(&self) -> Option<EvmClient> {
        {
            let client = self.inner.client.read().await;
            if client.is_some() {
                return client.clone();
            }
        }

        let config = self.inner.config.read().await;
        tracing::info!("Creating RPC client for URL: {}", config.rpc.url);
        match EvmClient::connect(&config.rpc.url) {
            Ok(client) => {
                let mut cached = self.inner.client.write().await;
                *cached = Some(client.clone());
                Some(client)
            }
            Err(e) => {
                tracing::warn!("Failed to create RPC client for {}: {}", config.rpc.url, e);
                None
            }
        }
    }

    /// Install a pre-built client (tests inject a mock transport here).
    pub async fn set_client(&self, client: EvmClient) {
        let mut cached = self.inner.client.write().await;
        *cached = Some(client);
    }

    /// Chain the config claims to be pointed at
    pub async fn chain_id(&self) -> ChainId {
        self.inner.config.read().await.rpc.chain_id
    }

    /// Resolve the deployed contracts for the configured chain.
    /// Unconfigured chains are a hard error, never a default pair.
    pub async fn resolve_contracts(&self) -> Result<ChainContracts, ConfigError> {
        let chain_id = self.chain_id().await;
        self.inner.address_book.resolve(chain_id).cloned()
    }

    pub fn address_book(&self) -> &ChainAddressBook {
        &self.inner.address_book
    }

    /// Get current wallet state
    pub async fn wallet(&self) -> Option<WalletState> {
        self.inner.wallet.read().await.clone()
    }

    /// Set connected wallet with address validation.
    pub async fn set_wallet(&self, address: &str) -> Result<WalletState, ConfigError> {
        let address = Address::parse(address)?;
        let state = WalletState::new(address);
        let mut wallet = self.inner.wallet.write().await;
        *wallet = Some(state.clone());
        Ok(state)
    }

    /// Disconnect wallet (clear wallet state)
    pub async fn disconnect_wallet(&self) {
        let mut wallet = self.inner.wallet.write().await;
        *wallet = None;
    }

    pub fn refresh(&self) -> &RefreshCoordinator {
        &self.inner.refresh
    }

    pub fn clock(&self) -> &ChainClock {
        &self.inner.clock
    }

    pub fn watcher(&self) -> &TxWatcher {
        &self.inner.watcher
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lockboard_core::config::chains;

    #[tokio::test]
    async fn test_wallet_connect_validates_address() {
        let state = AppState::new();
        assert!(state.set_wallet("not-an-address").await.is_err());
        assert!(state.wallet().await.is_none());

        let connected = state
            .set_wallet("0xE7f1725E7734CE288F8367e1Bb143E90bb3F0512")
            .await
            .unwrap();
        assert_eq!(
            connected.address.as_str(),
            "0xe7f1725e7734ce288f8367e1bb143e90bb3f0512"
        );
        assert!(state.wallet().await.is_some());

        state.disconnect_wallet().await;
        assert!(state.wallet().await.is_none());
    }

    #[tokio::test]
    async fn test_resolve_contracts_unknown_chain() {
        let mut config = AppConfig::default();
        config.rpc.chain_id = 999;
        let state = AppState::with_config(config);

        let err = state.resolve_contracts().await.unwrap_err();
        assert!(matches!(err, ConfigError::ChainNotConfigured { chain_id: 999 }));
    }

    #[tokio::test]
    async fn test_set_rpc_config_drops_clock_sample() {
        let state = AppState::new();
        state.clock().record(1_750_000_000);
        assert!(state.clock().has_fresh_sample());

        state
            .set_rpc_config(RpcConfig {
                url: "http://127.0.0.1:9999".into(),
                chain_id: chains::BASE_MAINNET,
            })
            .await;

        assert!(!state.clock().has_fresh_sample());
        assert_eq!(state.chain_id().await, chains::BASE_MAINNET);
    }
}
