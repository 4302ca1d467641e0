//! Refresh coordination between dashboard panels
//!
//! Panels never push data at each other. After a successful write, the
//! acting panel signals the domains it touched; every other panel compares
//! its remembered snapshot against the current one and re-fetches on
//! inequality. Counters are session-scoped change-tokens, not state: they
//! start at zero, only ever increment, and reset on restart.

use std::fmt;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

/// A coarse grouping of chain-derived data that panels re-fetch together
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefreshDomain {
    Locks,
    Balances,
    Fees,
    All,
}

impl RefreshDomain {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Locks => "locks",
            Self::Balances => "balances",
            Self::Fees => "fees",
            Self::All => "all",
        }
    }
}

impl fmt::Display for RefreshDomain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Point-in-time view of all three counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshSnapshot {
    pub locks: u64,
    pub balances: u64,
    pub fees: u64,
}

#[derive(Debug, Default)]
struct Counters {
    locks: u64,
    balances: u64,
    fees: u64,
}

/// Shared refresh-counter store.
///
/// All three counters live behind one lock so that `signal(All)` is atomic
/// with respect to observers: a reader either sees none of the three
/// increments or all of them, never a partial update. Increment-only
/// semantics make every other race benign; a reader that misses a signal
/// picks it up on its next poll.
#[derive(Clone, Default)]
pub struct RefreshCoordinator {
    inner: Arc<RwLock<Counters>>,
}

impl RefreshCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal that a domain's chain-derived data changed.
    pub fn signal(&self, domain: RefreshDomain) {
        let mut counters = self.inner.write().unwrap_or_else(|e| e.into_inner());
        match domain {
            RefreshDomain::Locks => counters.locks += 1,
            RefreshDomain::Balances => counters.balances += 1,
            RefreshDomain::Fees => counters.fees += 1,
            RefreshDomain::All => {
                counters.locks += 1;
                counters.balances += 1;
                counters.fees += 1;
            }
        }
        tracing::debug!(domain = %domain, "refresh signalled");
    }

    /// Current counter for a domain. `All` returns the sum, useful as a
    /// single coarse change-token.
    pub fn counter_for(&self, domain: RefreshDomain) -> u64 {
        let counters = self.inner.read().unwrap_or_else(|e| e.into_inner());
        match domain {
            RefreshDomain::Locks => counters.locks,
            RefreshDomain::Balances => counters.balances,
            RefreshDomain::Fees => counters.fees,
            RefreshDomain::All => counters.locks + counters.balances + counters.fees,
        }
    }

    /// Consistent view of all three counters under a single read lock.
    pub fn snapshot(&self) -> RefreshSnapshot {
        let counters = self.inner.read().unwrap_or_else(|e| e.into_inner());
        RefreshSnapshot {
            locks: counters.locks,
            balances: counters.balances,
            fees: counters.fees,
        }
    }
}
