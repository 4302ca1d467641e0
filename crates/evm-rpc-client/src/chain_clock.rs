//! Chain-derived clock with local fallback
//!
//! Timelock comparisons must use the chain's notion of time when we have
//! it: local clock skew can make a lock look withdrawable before the
//! contract agrees, which turns into a reverted transaction. The clock
//! therefore caches the latest block timestamp and only falls back to wall
//! time when no fresh sample exists, and it always reports which source a
//! reading came from.

use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use lockboard_core::{TimeSource, UnixSeconds};

/// A chain sample older than this no longer wins over local time.
const SAMPLE_STALE_AFTER: Duration = Duration::from_secs(120);

/// One recorded block-timestamp observation
#[derive(Debug, Clone, Copy)]
pub struct ClockSample {
    pub block_timestamp: UnixSeconds,
    pub sampled_at: Instant,
}

/// Shared clock handle. Writers (the poll task) replace whole samples;
/// readers never see a partially written one.
#[derive(Clone, Default)]
pub struct ChainClock {
    sample: Arc<RwLock<Option<ClockSample>>>,
}

impl ChainClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a freshly polled block timestamp.
    pub fn record(&self, block_timestamp: UnixSeconds) {
        let mut sample = self.sample.write().unwrap_or_else(|e| e.into_inner());
        *sample = Some(ClockSample {
            block_timestamp,
            sampled_at: Instant::now(),
        });
    }

    /// Drop the cached sample (e.g. after an RPC endpoint change).
    pub fn clear(&self) {
        let mut sample = self.sample.write().unwrap_or_else(|e| e.into_inner());
        *sample = None;
    }

    /// Current time in seconds plus the source it came from.
    ///
    /// A fresh chain sample is advanced by the wall time elapsed since it
    /// was taken, so readings between polls keep moving forward.
    pub fn now_seconds(&self) -> (UnixSeconds, TimeSource) {
        let sample = self.sample.read().unwrap_or_else(|e| e.into_inner());

        if let Some(sample) = *sample {
            let age = sample.sampled_at.elapsed();
            if age <= SAMPLE_STALE_AFTER {
                return (sample.block_timestamp + age.as_secs(), TimeSource::Chain);
            }
        }

        (local_now(), TimeSource::Local)
    }

    pub fn has_fresh_sample(&self) -> bool {
        matches!(self.now_seconds(), (_, TimeSource::Chain))
    }
}

fn local_now() -> UnixSeconds {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
