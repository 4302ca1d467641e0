//! LP Token Locker protocol implementation
//!
//! The locker contract holds LP tokens under per-deposit locks. A lock is
//! withdrawable only after its owner triggers withdrawal and the timelock
//! elapses; accrued trading fees can be claimed per lock; stray tokens can
//! be recovered by the contract owner (never the LP token itself).

pub mod constants;
pub mod fetch;
pub mod state;
pub mod status;
pub mod tx_builder;

pub use fetch::{
    fetch_claimable_fees, fetch_lock, fetch_lock_ids, fetch_locker_owner, fetch_locker_state,
    fetch_lp_balance, fetch_total_accumulated_fees, fetch_wallet_allowance,
    fetch_wallet_lp_balance, lock_exists,
};
pub use state::{DisplayState, Lock, LockView, LockerState};
pub use status::{can_withdraw, derive_status, display_state, LockStatus};
pub use tx_builder::UnsignedCall;
