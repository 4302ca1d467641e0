//! Lock status derivation
//!
//! Pure functions of `(lock, now_seconds)`. No caching, no hidden state:
//! callers re-derive on every fetch.

use lockboard_core::UnixSeconds;

use crate::state::{DisplayState, Lock};

/// Display status of a lock
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockStatus {
    /// Fully withdrawn, nothing left to manage
    Unlocked,
    /// Withdrawal triggered and the timelock has elapsed
    Withdrawable,
    /// Withdrawal triggered, still inside the timelock
    TimelockActive,
    /// Deposited and locked, withdrawal not triggered
    Locked,
}

impl LockStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Unlocked => "Unlocked",
            Self::Withdrawable => "Withdrawable",
            Self::TimelockActive => "Timelock Active",
            Self::Locked => "Locked",
        }
    }

    pub fn color_class(&self) -> &'static str {
        match self {
            Self::Unlocked => "bg-gray-500/20 text-gray-400",
            Self::Withdrawable => "bg-green-500/20 text-green-400",
            Self::TimelockActive => "bg-yellow-500/20 text-yellow-400",
            Self::Locked => "bg-blue-500/20 text-blue-400",
        }
    }
}

/// Derive the display status of a lock at `now`.
///
/// `unlock_time == 0` while triggered means the deadline has not been
/// observed yet, not that an epoch-zero deadline elapsed, so such a lock
/// stays in `TimelockActive`.
pub fn derive_status(lock: &Lock, now: UnixSeconds) -> LockStatus {
    if !lock.is_liquidity_locked {
        return LockStatus::Unlocked;
    }

    if lock.is_withdrawal_triggered {
        if lock.unlock_time > 0 && now >= lock.unlock_time {
            return LockStatus::Withdrawable;
        }
        return LockStatus::TimelockActive;
    }

    LockStatus::Locked
}

/// Whether a withdrawal issued at `now` can succeed on-chain.
pub fn can_withdraw(lock: &Lock, now: UnixSeconds) -> bool {
    derive_status(lock, now) == LockStatus::Withdrawable
}

/// Bundle status into the serializable display form.
pub fn display_state(lock: &Lock, now: UnixSeconds) -> DisplayState {
    let status = derive_status(lock, now);
    DisplayState {
        status_label: status.label().to_string(),
        status_color: status.color_class().to_string(),
        can_withdraw: status == LockStatus::Withdrawable,
    }
}
