//! Timestamp representation for serialization.
//!
//! Both upstream schemas report times as unix milliseconds, so that is the
//! canonical unit here as well.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A point in time as unix milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Timestamp(pub u64);

impl Timestamp {
    /// Create from unix milliseconds.
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Create from unix seconds.
    pub const fn from_secs(secs: u64) -> Self {
        Self(secs * 1000)
    }

    /// The current wall-clock time.
    pub fn now() -> Self {
        Self(
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis() as u64,
        )
    }

    /// Get the value in unix milliseconds.
    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    /// Time elapsed between this timestamp and `now`.
    ///
    /// Timestamps in the future (clock skew between client and backend)
    /// report zero rather than underflowing.
    pub fn age(&self, now: Timestamp) -> Duration {
        Duration::from_millis(now.0.saturating_sub(self.0))
    }
}

impl From<u64> for Timestamp {
    fn from(millis: u64) -> Self {
        Self(millis)
    }
}
