//! Locker state discovery via contract reads

use evm_rpc_client::{abi, EvmClient};
use lockboard_core::{
    Address, ChainContracts, GatewayError, LockId, TimeSource, TokenUnits, UnixSeconds,
};

use crate::constants::{
    LOCK_INFO_WORDS, SEL_ERC20_ALLOWANCE, SEL_ERC20_BALANCE_OF, SEL_GET_ALL_LOCK_IDS,
    SEL_GET_CLAIMABLE_FEES, SEL_GET_LOCK_INFO, SEL_GET_LP_BALANCE,
    SEL_GET_TOTAL_ACCUMULATED_FEES, SEL_OWNER,
};
use crate::state::{Lock, LockView, LockerState};
use crate::status;

/// Enumerate all lock ids known to the locker.
pub async fn fetch_lock_ids(
    client: &EvmClient,
    contracts: &ChainContracts,
) -> Result<Vec<LockId>, GatewayError> {
    let data = abi::encode_call(SEL_GET_ALL_LOCK_IDS, &[]);
    let out = client.call(&contracts.locker, &data).await?;
    abi::decode_lock_id_array(&out)
}

/// Fetch one lock record.
pub async fn fetch_lock(
    client: &EvmClient,
    contracts: &ChainContracts,
    lock_id: &LockId,
) -> Result<Lock, GatewayError> {
    let data = abi::encode_call(SEL_GET_LOCK_INFO, &[abi::word_from_lock_id(lock_id)]);
    let out = client.call(&contracts.locker, &data).await?;
    parse_lock_info(lock_id, &out)
}

/// Whether a fetched record is a real lock. An unknown id reads back as an
/// all-zero tuple, recognizable by its zero owner.
pub fn lock_exists(lock: &Lock) -> bool {
    !lock.owner.same_as("0x0000000000000000000000000000000000000000")
}

/// Decode the 7-field `getLockInfo` tuple. Fewer or more words is a
/// malformed read, not something to pad or truncate.
fn parse_lock_info(lock_id: &LockId, data: &[u8]) -> Result<Lock, GatewayError> {
    let words = abi::expect_words(data, LOCK_INFO_WORDS)?;

    Ok(Lock {
        lock_id: lock_id.clone(),
        owner: abi::address_from_word(&words[0])?,
        fee_receiver: abi::address_from_word(&words[1])?,
        token_contract: abi::address_from_word(&words[2])?,
        amount: abi::amount_from_word(&words[3])?,
        unlock_time: abi::u64_from_word(&words[4])?,
        is_liquidity_locked: abi::bool_from_word(&words[5])?,
        is_withdrawal_triggered: abi::bool_from_word(&words[6])?,
    })
}

/// Fetch the complete locker state: every lock with its display state
/// derived at `now`, viewed from `viewer`'s perspective.
///
/// A single lock that fails to decode is skipped with a log line rather
/// than poisoning the whole panel.
pub async fn fetch_locker_state(
    client: &EvmClient,
    contracts: &ChainContracts,
    viewer: Option<&Address>,
    now: UnixSeconds,
    time_source: TimeSource,
) -> Result<LockerState, GatewayError> {
    let lock_ids = fetch_lock_ids(client, contracts).await?;

    let mut locks = Vec::with_capacity(lock_ids.len());
    for lock_id in &lock_ids {
        match fetch_lock(client, contracts, lock_id).await {
            Ok(lock) => {
                let is_own = viewer.is_some_and(|v| lock.owner.same_as(v.as_str()));
                let display = status::display_state(&lock, now);
                locks.push(LockView {
                    lock,
                    display,
                    is_own,
                });
            }
            Err(e) => {
                tracing::debug!(
                    lock_id = %lock_id,
                    error = %e,
                    "Skipping unparseable lock"
                );
            }
        }
    }

    let own_locks = locks.iter().filter(|l| l.is_own).count();

    Ok(LockerState {
        total_locks: locks.len(),
        own_locks,
        locks,
        current_time: now,
        time_source,
    })
}

async fn fetch_u256(
    client: &EvmClient,
    to: &Address,
    selector: [u8; 4],
    args: &[abi::Word],
) -> Result<TokenUnits, GatewayError> {
    let data = abi::encode_call(selector, args);
    let out = client.call(to, &data).await?;
    let words = abi::expect_words(&out, 1)?;
    abi::amount_from_word(&words[0])
}

/// LP tokens currently held by the locker contract.
pub async fn fetch_lp_balance(
    client: &EvmClient,
    contracts: &ChainContracts,
) -> Result<TokenUnits, GatewayError> {
    fetch_u256(client, &contracts.locker, SEL_GET_LP_BALANCE, &[]).await
}

/// Fees claimable right now for a lock.
pub async fn fetch_claimable_fees(
    client: &EvmClient,
    contracts: &ChainContracts,
    lock_id: &LockId,
) -> Result<TokenUnits, GatewayError> {
    fetch_u256(
        client,
        &contracts.locker,
        SEL_GET_CLAIMABLE_FEES,
        &[abi::word_from_lock_id(lock_id)],
    )
    .await
}

/// Lifetime fees accumulated for a lock.
pub async fn fetch_total_accumulated_fees(
    client: &EvmClient,
    contracts: &ChainContracts,
    lock_id: &LockId,
) -> Result<TokenUnits, GatewayError> {
    fetch_u256(
        client,
        &contracts.locker,
        SEL_GET_TOTAL_ACCUMULATED_FEES,
        &[abi::word_from_lock_id(lock_id)],
    )
    .await
}

/// Contract owner (the only address allowed to recover stray tokens).
pub async fn fetch_locker_owner(
    client: &EvmClient,
    contracts: &ChainContracts,
) -> Result<Address, GatewayError> {
    let data = abi::encode_call(SEL_OWNER, &[]);
    let out = client.call(&contracts.locker, &data).await?;
    let words = abi::expect_words(&out, 1)?;
    abi::address_from_word(&words[0])
}

/// Wallet's LP token balance (deposit panel).
pub async fn fetch_wallet_lp_balance(
    client: &EvmClient,
    contracts: &ChainContracts,
    wallet: &Address,
) -> Result<TokenUnits, GatewayError> {
    fetch_u256(
        client,
        &contracts.lp_token,
        SEL_ERC20_BALANCE_OF,
        &[abi::word_from_address(wallet)],
    )
    .await
}

/// LP token allowance granted by the wallet to the locker.
pub async fn fetch_wallet_allowance(
    client: &EvmClient,
    contracts: &ChainContracts,
    wallet: &Address,
) -> Result<TokenUnits, GatewayError> {
    fetch_u256(
        client,
        &contracts.lp_token,
        SEL_ERC20_ALLOWANCE,
        &[
            abi::word_from_address(wallet),
            abi::word_from_address(&contracts.locker),
        ],
    )
    .await
}
