//! A stored value paired with its expiration deadline.
//!
//! Deadlines use `tokio::time::Instant`, which reads the same monotonic clock as
//! `std::time::Instant` at runtime but follows Tokio's paused clock in tests.

use std::time::Duration;
use tokio::time::Instant;

/// Deadline used when `now + ttl` does not fit in an `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Represents a stored value with its expiry time.
///
/// Every entry has a deadline: it is set on creation and on every touch.
#[derive(Debug, Clone)]
pub struct Entry<V> {
    /// The stored value
    value: V,
    /// When this entry expires
    expires_at: Instant,
}

impl<V> Entry<V> {
    /// Creates an entry that expires `ttl` from now.
    pub fn new(value: V, ttl: Duration) -> Self {
        Self {
            value,
            expires_at: deadline(ttl),
        }
    }

    /// Resets the deadline to `now + ttl`.
    #[inline]
    pub fn touch(&mut self, ttl: Duration) {
        self.expires_at = deadline(ttl);
    }

    /// Checks if this entry has expired.
    #[inline]
    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    /// Returns the stored value.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// Returns the expiration deadline.
    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    /// Returns how long until the entry expires, zero once expired.
    pub fn remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}

fn deadline(ttl: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(ttl).unwrap_or_else(|| now + FAR_FUTURE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_entry_not_expired_before_ttl() {
        let entry = Entry::new("value", Duration::from_secs(1));

        tokio::time::advance(Duration::from_millis(999)).await;
        assert!(!entry.is_expired());
        assert_eq!(entry.remaining(), Duration::from_millis(1));
        assert_eq!(*entry.value(), "value");
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expired_at_deadline() {
        let entry = Entry::new("value", Duration::from_secs(1));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(entry.is_expired());
        assert_eq!(entry.remaining(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_touch_extends_life() {
        let mut entry = Entry::new(1, Duration::from_secs(1));

        tokio::time::advance(Duration::from_millis(500)).await;
        entry.touch(Duration::from_secs(1));

        tokio::time::advance(Duration::from_millis(900)).await;
        assert!(!entry.is_expired());

        tokio::time::advance(Duration::from_millis(100)).await;
        assert!(entry.is_expired());
    }

    #[test]
    fn test_zero_ttl_expires_immediately() {
        let entry = Entry::new((), Duration::ZERO);
        assert!(entry.is_expired());
    }

    #[test]
    fn test_huge_ttl_does_not_overflow() {
        let entry = Entry::new((), Duration::MAX);
        assert!(!entry.is_expired());
        assert!(entry.remaining() > Duration::from_secs(86_400 * 365));
    }
}
