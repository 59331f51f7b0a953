//! Store Configuration
//!
//! A store has exactly two knobs: the TTL applied to every entry, and whether
//! a successful read pushes the entry's deadline out by another TTL. The sweep
//! period is derived from the TTL, never configured on its own.

use std::time::Duration;

/// Lower bound on the sweep period, so tiny TTLs don't spin the sweeper.
pub const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Upper bound on the sweep period, so the sweeper's deadlines stay representable.
pub const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Configuration for a [`TtlStore`](crate::TtlStore).
///
/// # Example
///
/// ```
/// use ttlstore::StoreConfig;
/// use std::time::Duration;
///
/// let config = StoreConfig::new(Duration::from_secs(30)).with_extend_on_access(true);
/// assert_eq!(config.sweep_interval(), Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreConfig {
    /// Time-to-live applied to every entry (default: 60s)
    pub ttl: Duration,

    /// Whether a successful `get` resets the entry's deadline (default: false)
    pub extend_on_access: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(60),
            extend_on_access: false,
        }
    }
}

impl StoreConfig {
    /// Creates a configuration with the given TTL and no extension on access.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            ..Default::default()
        }
    }

    /// Sets the TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Enables or disables extending an entry's life on every successful read.
    pub fn with_extend_on_access(mut self, extend: bool) -> Self {
        self.extend_on_access = extend;
        self
    }

    /// Period between background sweeps: the TTL, clamped to
    /// [`MIN_SWEEP_INTERVAL`]..=[`MAX_SWEEP_INTERVAL`].
    pub fn sweep_interval(&self) -> Duration {
        self.ttl.clamp(MIN_SWEEP_INTERVAL, MAX_SWEEP_INTERVAL)
    }
}
