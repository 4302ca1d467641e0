//! Background transaction watcher
//!
//! The wallet signs and broadcasts; this service only learns a hash. The
//! watcher polls receipts for reported hashes and, on success, fires the
//! refresh signals for the domains that operation touches. Reverted
//! transactions produce a failure notification and no signal, leaving the
//! panel free to retry.

use std::sync::Mutex;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use evm_rpc_client::{EvmClient, ReceiptStatus};
use lockboard_core::{RefreshCoordinator, RefreshDomain, TxHash};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Items older than this are timed out and removed.
const TIMEOUT: Duration = Duration::from_secs(40 * 60);

/// A mutating dashboard operation and the refresh domains it affects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    Approve,
    Deposit,
    TriggerWithdrawal,
    CancelWithdrawal,
    Withdraw,
    UpdateFees,
    ClaimFees,
    Recovery,
}

impl Operation {
    /// Refresh domains a confirmed transaction of this kind invalidates.
    pub fn domains(&self) -> &'static [RefreshDomain] {
        match self {
            // Allowance feeds the deposit panel's balance reads.
            Self::Approve => &[RefreshDomain::Balances],
            Self::Deposit => &[RefreshDomain::Locks, RefreshDomain::Balances],
            Self::TriggerWithdrawal | Self::CancelWithdrawal => &[RefreshDomain::Locks],
            Self::Withdraw => &[RefreshDomain::Locks, RefreshDomain::Balances],
            Self::UpdateFees => &[RefreshDomain::Fees],
            Self::ClaimFees => &[RefreshDomain::Fees, RefreshDomain::Balances],
            Self::Recovery => &[RefreshDomain::Balances],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Deposit => "deposit",
            Self::TriggerWithdrawal => "trigger_withdrawal",
            Self::CancelWithdrawal => "cancel_withdrawal",
            Self::Withdraw => "withdraw",
            Self::UpdateFees => "update_fees",
            Self::ClaimFees => "claim_fees",
            Self::Recovery => "recovery",
        }
    }
}

#[derive(Clone)]
struct WatchItem {
    id: String,
    tx_hash: TxHash,
    operation: Operation,
    description: String,
    submitted_at: Instant,
}

/// Resolution pushed to the frontend once a watched transaction settles
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxNotification {
    pub id: String,
    /// "confirmed" | "reverted" | "timeout"
    pub kind: String,
    pub operation: Operation,
    pub description: String,
    pub tx_hash: TxHash,
    pub timestamp: u64,
}

/// Currently watched transaction, for display
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchedItemInfo {
    pub id: String,
    pub tx_hash: TxHash,
    pub operation: Operation,
    pub description: String,
    pub elapsed_secs: u64,
}

#[derive(Default)]
struct WatcherInner {
    items: Vec<WatchItem>,
    notifications: Vec<TxNotification>,
}

/// Shared watcher handle
#[derive(Clone, Default)]
pub struct TxWatcher {
    inner: Arc<Mutex<WatcherInner>>,
}

impl TxWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a broadcast transaction for receipt watching.
    pub fn add_tx(&self, tx_hash: TxHash, operation: Operation, description: String) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.items.push(WatchItem {
            id: id.clone(),
            tx_hash,
            operation,
            description,
            submitted_at: Instant::now(),
        });
        id
    }

    pub fn watched_items(&self) -> Vec<WatchedItemInfo> {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner
            .items
            .iter()
            .map(|item| WatchedItemInfo {
                id: item.id.clone(),
                tx_hash: item.tx_hash.clone(),
                operation: item.operation,
                description: item.description.clone(),
                elapsed_secs: item.submitted_at.elapsed().as_secs(),
            })
            .collect()
    }

    /// Take all settled notifications, leaving the queue empty.
    pub fn drain_notifications(&self) -> Vec<TxNotification> {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        std::mem::take(&mut inner.notifications)
    }

    /// One poll pass over every watched item.
    ///
    /// The lock is never held across an await: items are snapshotted,
    /// receipts fetched, then resolutions applied. A poll error keeps the
    /// item for the next tick.
    pub async fn poll_once(&self, client: &EvmClient, refresh: &RefreshCoordinator) {
        let snapshot: Vec<WatchItem> = {
            let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            inner.items.clone()
        };

        for item in snapshot {
            if item.submitted_at.elapsed() > TIMEOUT {
                tracing::warn!(tx_hash = %item.tx_hash, "watched transaction timed out");
                self.resolve(&item, "timeout");
                continue;
            }

            match client.transaction_receipt(&item.tx_hash).await {
                Ok(Some(ReceiptStatus::Success)) => {
                    tracing::info!(
                        tx_hash = %item.tx_hash,
                        operation = item.operation.as_str(),
                        "transaction confirmed"
                    );
                    for domain in item.operation.domains() {
                        refresh.signal(*domain);
                    }
                    self.resolve(&item, "confirmed");
                }
                Ok(Some(ReceiptStatus::Reverted)) => {
                    tracing::warn!(tx_hash = %item.tx_hash, "transaction reverted");
                    self.resolve(&item, "reverted");
                }
                Ok(None) => {} // still pending
                Err(e) => {
                    tracing::debug!(tx_hash = %item.tx_hash, error = %e, "receipt poll failed");
                }
            }
        }
    }

    fn resolve(&self, item: &WatchItem, kind: &str) {
        let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.items.retain(|i| i.id != item.id);
        inner.notifications.push(TxNotification {
            id: item.id.clone(),
            kind: kind.to_string(),
            operation: item.operation,
            description: item.description.clone(),
            tx_hash: item.tx_hash.clone(),
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or(0),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use evm_rpc_client::transport::mock::MockTransport;
    use serde_json::{json, Value};

    fn client_with(mock: MockTransport) -> EvmClient {
        EvmClient::with_transport(Arc::new(mock))
    }

    fn tx_hash(tail: u8) -> TxHash {
        TxHash::parse(&format!("0x{:064x}", tail)).unwrap()
    }

    #[test]
    fn test_deposit_signals_locks_and_balances_not_fees() {
        let domains = Operation::Deposit.domains();
        assert!(domains.contains(&RefreshDomain::Locks));
        assert!(domains.contains(&RefreshDomain::Balances));
        assert!(!domains.contains(&RefreshDomain::Fees));
    }

    #[test]
    fn test_claim_fees_signals_fees_and_balances() {
        let domains = Operation::ClaimFees.domains();
        assert!(domains.contains(&RefreshDomain::Fees));
        assert!(domains.contains(&RefreshDomain::Balances));
        assert!(!domains.contains(&RefreshDomain::Locks));
    }

    #[tokio::test]
    async fn test_confirmed_tx_signals_and_notifies() {
        let watcher = TxWatcher::new();
        let refresh = RefreshCoordinator::new();
        let mock = MockTransport::new();
        mock.expect("eth_getTransactionReceipt", Ok(json!({"status": "0x1"})));
        let client = client_with(mock);

        watcher.add_tx(tx_hash(0xaa), Operation::Deposit, "Deposit 5 LP".into());
        watcher.poll_once(&client, &refresh).await;

        let snap = refresh.snapshot();
        assert_eq!(snap.locks, 1);
        assert_eq!(snap.balances, 1);
        assert_eq!(snap.fees, 0);

        let notifications = watcher.drain_notifications();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].kind, "confirmed");
        assert!(watcher.watched_items().is_empty());
        // Drained means drained.
        assert!(watcher.drain_notifications().is_empty());
    }

    #[tokio::test]
    async fn test_reverted_tx_notifies_without_signalling() {
        let watcher = TxWatcher::new();
        let refresh = RefreshCoordinator::new();
        let mock = MockTransport::new();
        mock.expect("eth_getTransactionReceipt", Ok(json!({"status": "0x0"})));
        let client = client_with(mock);

        watcher.add_tx(tx_hash(0xbb), Operation::Withdraw, "Withdraw".into());
        watcher.poll_once(&client, &refresh).await;

        assert_eq!(refresh.snapshot(), Default::default());
        let notifications = watcher.drain_notifications();
        assert_eq!(notifications[0].kind, "reverted");
    }

    #[tokio::test]
    async fn test_pending_tx_stays_watched() {
        let watcher = TxWatcher::new();
        let refresh = RefreshCoordinator::new();
        let mock = MockTransport::new();
        mock.expect("eth_getTransactionReceipt", Ok(Value::Null));
        let client = client_with(mock);

        watcher.add_tx(tx_hash(0xcc), Operation::ClaimFees, "Claim fees".into());
        watcher.poll_once(&client, &refresh).await;

        assert_eq!(watcher.watched_items().len(), 1);
        assert!(watcher.drain_notifications().is_empty());
        assert_eq!(refresh.snapshot(), Default::default());
    }

    #[tokio::test]
    async fn test_poll_error_keeps_item_for_next_tick() {
        let watcher = TxWatcher::new();
        let refresh = RefreshCoordinator::new();
        let mock = MockTransport::new();
        mock.expect(
            "eth_getTransactionReceipt",
            Err(lockboard_core::GatewayError::Unreachable {
                url: "http://127.0.0.1:8545".into(),
            }),
        );
        let client = client_with(mock);

        watcher.add_tx(tx_hash(0xdd), Operation::Recovery, "Recover".into());
        watcher.poll_once(&client, &refresh).await;

        assert_eq!(watcher.watched_items().len(), 1);
        assert!(watcher.drain_notifications().is_empty());
    }
}
