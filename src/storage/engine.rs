//! Thread-Safe Storage Engine with Store-Wide TTL
//!
//! This module implements the table behind every [`TtlStore`](crate::TtlStore):
//! a `HashMap` from string keys to [`Entry`] values, guarded by one `RwLock`.
//!
//! ## Design Decisions
//!
//! 1. **One Lock**: The whole table sits behind a single `RwLock`, so every
//!    operation is linearizable against every other, sweeps included.
//! 2. **Lazy Expiry**: `get` treats an expired entry as absent but leaves it in
//!    place; physical removal is the sweeper's job.
//! 3. **Touch on Access**: With `extend_on_access`, a hit pushes the deadline
//!    out by another TTL inside the same exclusive critical section.
//!
//! ## Locking
//!
//! ```text
//! ┌──────────────────────────────┬───────────┐
//! │ operation                    │ lock      │
//! ├──────────────────────────────┼───────────┤
//! │ set / delete / clear / purge │ exclusive │
//! │ get (extend_on_access)       │ exclusive │
//! │ get (no extension)           │ shared    │
//! │ count / contains_key / ttl   │ shared    │
//! └──────────────────────────────┴───────────┘
//! ```

use crate::config::StoreConfig;
use crate::storage::entry::Entry;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::Duration;
use tracing::{trace, warn};

type Table<V> = HashMap<String, Entry<V>>;

/// The synchronized key-value table with expiry support.
///
/// The engine itself never starts a background task; pair it with an
/// [`ExpirySweeper`](crate::storage::ExpirySweeper), or use
/// [`TtlStore`](crate::TtlStore) which does both.
///
/// # Example
///
/// ```
/// use ttlstore::{StorageEngine, StoreConfig, Value};
/// use std::time::Duration;
///
/// let engine: StorageEngine<Value> = StorageEngine::new(StoreConfig::new(Duration::from_secs(60)));
///
/// engine.set("name", "Ariz");
/// assert_eq!(engine.get("name"), Some(Value::from("Ariz")));
///
/// engine.delete("name");
/// assert_eq!(engine.get("name"), None);
/// ```
pub struct StorageEngine<V> {
    data: RwLock<Table<V>>,

    config: StoreConfig,

    /// Statistics: total SET operations
    set_count: AtomicU64,

    /// Statistics: GET operations that found a live entry
    hit_count: AtomicU64,

    /// Statistics: GET operations that found nothing live
    miss_count: AtomicU64,

    /// Statistics: DELETE operations that removed an entry
    del_count: AtomicU64,

    /// Statistics: entries removed by reclamation passes
    reclaimed_count: AtomicU64,
}

impl<V> std::fmt::Debug for StorageEngine<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageEngine")
            .field("config", &self.config)
            .field("entries", &self.count())
            .field("set_count", &self.set_count.load(Ordering::Relaxed))
            .field("hit_count", &self.hit_count.load(Ordering::Relaxed))
            .finish()
    }
}

impl<V> Default for StorageEngine<V> {
    fn default() -> Self {
        Self::new(StoreConfig::default())
    }
}

impl<V> StorageEngine<V> {
    /// Creates an empty engine.
    pub fn new(config: StoreConfig) -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
            config,
            set_count: AtomicU64::new(0),
            hit_count: AtomicU64::new(0),
            miss_count: AtomicU64::new(0),
            del_count: AtomicU64::new(0),
            reclaimed_count: AtomicU64::new(0),
        }
    }

    // Every critical section is a single map operation or a `retain`, so a
    // panicking holder cannot leave the table half-updated.
    fn read(&self) -> RwLockReadGuard<'_, Table<V>> {
        self.data.read().unwrap_or_else(|poisoned| {
            warn!("Recovering poisoned store lock (read)");
            PoisonError::into_inner(poisoned)
        })
    }

    fn write(&self) -> RwLockWriteGuard<'_, Table<V>> {
        self.data.write().unwrap_or_else(|poisoned| {
            warn!("Recovering poisoned store lock (write)");
            PoisonError::into_inner(poisoned)
        })
    }

    /// Returns the configuration this engine was built with.
    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Returns the TTL applied to every entry.
    pub fn ttl(&self) -> Duration {
        self.config.ttl
    }

    /// Returns whether reads extend an entry's life.
    pub fn extend_on_access(&self) -> bool {
        self.config.extend_on_access
    }

    /// Inserts or overwrites `key`, expiring one TTL from now.
    ///
    /// # Returns
    ///
    /// Returns `true` if a new key was created, `false` if an existing key was replaced.
    pub fn set(&self, key: impl Into<String>, value: impl Into<V>) -> bool {
        self.set_count.fetch_add(1, Ordering::Relaxed);

        let key = key.into();
        let value = value.into();

        // Deadline is taken under the lock so it is never older than the write
        let mut data = self.write();
        trace!(key = %key, "set");
        data.insert(key, Entry::new(value, self.config.ttl)).is_none()
    }

    /// Removes `key`. Deleting a missing key is a no-op.
    ///
    /// # Returns
    ///
    /// Returns `true` if an entry (live or not yet reclaimed) was removed.
    pub fn delete(&self, key: &str) -> bool {
        let removed = self.write().remove(key).is_some();

        if removed {
            self.del_count.fetch_add(1, Ordering::Relaxed);
            trace!(key = %key, "delete");
        }

        removed
    }

    /// Returns the physical number of entries, including expired ones the
    /// sweeper has not reached yet.
    pub fn count(&self) -> usize {
        self.read().len()
    }

    /// Returns true if the table holds no entries at all.
    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }

    /// Checks if `key` holds a live entry. Never extends its life.
    pub fn contains_key(&self, key: &str) -> bool {
        self.read()
            .get(key)
            .map(|entry| !entry.is_expired())
            .unwrap_or(false)
    }

    /// Returns the remaining life of a live `key`. Never extends its life.
    pub fn ttl_of(&self, key: &str) -> Option<Duration> {
        self.read()
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(Entry::remaining)
    }

    /// Removes every entry.
    pub fn clear(&self) {
        self.write().clear();
    }

    /// Removes every expired entry.
    ///
    /// This is called by the background expiry sweeper.
    ///
    /// # Returns
    ///
    /// Returns the number of entries that were removed.
    pub fn purge_expired(&self) -> usize {
        let mut data = self.write();
        let before = data.len();

        data.retain(|_, entry| !entry.is_expired());

        let removed = before - data.len();
        drop(data);

        if removed > 0 {
            self.reclaimed_count
                .fetch_add(removed as u64, Ordering::Relaxed);
        }

        removed
    }

    /// Returns a snapshot of the engine's counters.
    pub fn stats(&self) -> StoreStats {
        StoreStats {
            entries: self.count(),
            sets: self.set_count.load(Ordering::Relaxed),
            hits: self.hit_count.load(Ordering::Relaxed),
            misses: self.miss_count.load(Ordering::Relaxed),
            deletes: self.del_count.load(Ordering::Relaxed),
            reclaimed: self.reclaimed_count.load(Ordering::Relaxed),
        }
    }
}

impl<V: Clone> StorageEngine<V> {
    /// Gets a clone of the value for `key`.
    ///
    /// Returns `None` if the key doesn't exist or has expired. An expired entry
    /// is left in the table for the sweeper. When `extend_on_access` is set, a
    /// hit resets the entry's deadline before the value is read.
    pub fn get(&self, key: &str) -> Option<V> {
        let value = if self.config.extend_on_access {
            let mut data = self.write();
            match data.get_mut(key) {
                Some(entry) if !entry.is_expired() => {
                    entry.touch(self.config.ttl);
                    Some(entry.value().clone())
                }
                _ => None,
            }
        } else {
            self.read()
                .get(key)
                .filter(|entry| !entry.is_expired())
                .map(|entry| entry.value().clone())
        };

        let counter = if value.is_some() {
            &self.hit_count
        } else {
            &self.miss_count
        };
        counter.fetch_add(1, Ordering::Relaxed);

        value
    }
}

/// Store statistics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StoreStats {
    /// Entries physically present, expired or not
    pub entries: usize,
    /// Total SET operations
    pub sets: u64,
    /// GET operations that returned a value
    pub hits: u64,
    /// GET operations that returned nothing
    pub misses: u64,
    /// DELETE operations that removed an entry
    pub deletes: u64,
    /// Expired entries removed by reclamation
    pub reclaimed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn engine(ttl: Duration, extend_on_access: bool) -> StorageEngine<Value> {
        StorageEngine::new(StoreConfig::new(ttl).with_extend_on_access(extend_on_access))
    }

    #[test]
    fn test_get_nonexistent() {
        let engine = engine(Duration::from_secs(60), false);
        assert_eq!(engine.get("hello"), None);
        assert!(engine.is_empty());
    }

    #[test]
    fn test_set_and_get() {
        let engine = engine(Duration::from_secs(60), false);

        assert!(engine.set("hello", "world"));
        assert_eq!(engine.get("hello"), Some(Value::from("world")));
    }

    #[test]
    fn test_set_overwrites() {
        let engine = engine(Duration::from_secs(60), false);

        assert!(engine.set("key", 1));
        assert!(!engine.set("key", 2));
        assert_eq!(engine.get("key"), Some(Value::Int(2)));
        assert_eq!(engine.count(), 1);
    }

    #[test]
    fn test_delete() {
        let engine = engine(Duration::from_secs(60), false);

        engine.set("hello", "world");
        assert!(engine.delete("hello"));
        assert_eq!(engine.get("hello"), None);

        // Deleting again is a no-op
        assert!(!engine.delete("hello"));
        assert!(!engine.delete("never-set"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_without_extension() {
        let engine = engine(Duration::from_secs(1), false);
        engine.set("hello", "world");

        tokio::time::advance(Duration::from_millis(500)).await;
        assert_eq!(engine.get("hello"), Some(Value::from("world")));

        tokio::time::advance(Duration::from_millis(600)).await;
        assert_eq!(engine.get("hello"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_does_not_extend_when_disabled() {
        let engine = engine(Duration::from_secs(1), false);
        engine.set("key", "value");

        for _ in 0..3 {
            tokio::time::advance(Duration::from_millis(300)).await;
            assert!(engine.get("key").is_some());
        }

        tokio::time::advance(Duration::from_millis(100)).await;
        assert_eq!(engine.get("key"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_touch_on_access_postpones_expiry() {
        let engine = engine(Duration::from_secs(1), true);
        engine.set("key", "value");

        // Keep reading just inside the TTL, well past the original deadline
        for _ in 0..10 {
            tokio::time::advance(Duration::from_millis(900)).await;
            assert!(engine.get("key").is_some());
        }

        // Expires exactly one TTL after the last access
        tokio::time::advance(Duration::from_millis(999)).await;
        assert!(engine.contains_key("key"));
        tokio::time::advance(Duration::from_millis(1)).await;
        assert_eq!(engine.get("key"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_lazy() {
        let engine = engine(Duration::from_millis(100), false);
        engine.set("key", "value");

        tokio::time::advance(Duration::from_millis(200)).await;

        assert_eq!(engine.get("key"), None);
        assert!(!engine.contains_key("key"));
        // Still physically present until a purge
        assert_eq!(engine.count(), 1);

        assert_eq!(engine.purge_expired(), 1);
        assert_eq!(engine.count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_expired_entry_is_not_revived_by_get() {
        let engine = engine(Duration::from_millis(100), true);
        engine.set("key", "value");

        tokio::time::advance(Duration::from_millis(100)).await;
        assert_eq!(engine.get("key"), None);

        // A miss must not have touched the entry
        assert_eq!(engine.purge_expired(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_deadline_starts_after_lock_wait() {
        use std::sync::Arc;
        use std::thread;
        use tokio::runtime::Handle;

        let engine = Arc::new(engine(Duration::from_secs(1), false));

        let guard = engine.write();
        let writer = {
            let engine = Arc::clone(&engine);
            let handle = Handle::current();
            thread::spawn(move || {
                let _runtime = handle.enter();
                engine.set("key", "value");
            })
        };

        // Writer blocks on the lock while the clock moves on
        thread::sleep(Duration::from_millis(20));
        tokio::time::advance(Duration::from_millis(500)).await;
        drop(guard);
        writer.join().unwrap();

        assert_eq!(engine.ttl_of("key"), Some(Duration::from_secs(1)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_refreshes_deadline() {
        let engine = engine(Duration::from_secs(1), false);
        engine.set("key", "old");

        tokio::time::advance(Duration::from_millis(800)).await;
        engine.set("key", "new");

        tokio::time::advance(Duration::from_millis(800)).await;
        assert_eq!(engine.get("key"), Some(Value::from("new")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_of() {
        let engine = engine(Duration::from_secs(10), false);
        engine.set("key", "value");

        tokio::time::advance(Duration::from_secs(4)).await;
        assert_eq!(engine.ttl_of("key"), Some(Duration::from_secs(6)));
        assert_eq!(engine.ttl_of("missing"), None);

        tokio::time::advance(Duration::from_secs(6)).await;
        assert_eq!(engine.ttl_of("key"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired_keeps_live_entries() {
        let engine = engine(Duration::from_secs(1), false);

        engine.set("key1", "value1");
        engine.set("key2", "value2");
        tokio::time::advance(Duration::from_millis(600)).await;
        engine.set("key3", "value3");
        tokio::time::advance(Duration::from_millis(600)).await;

        assert_eq!(engine.purge_expired(), 2);
        assert_eq!(engine.count(), 1);
        assert!(engine.contains_key("key3"));
    }

    #[test]
    fn test_clear() {
        let engine = engine(Duration::from_secs(60), false);

        engine.set("key1", "value1");
        engine.set("key2", "value2");
        assert_eq!(engine.count(), 2);

        engine.clear();
        assert!(engine.is_empty());
    }

    #[test]
    fn test_stats() {
        let engine = engine(Duration::from_secs(60), false);

        engine.set("a", 1);
        engine.set("b", 2);
        engine.get("a");
        engine.get("missing");
        engine.delete("b");
        engine.delete("b");

        assert_eq!(
            engine.stats(),
            StoreStats {
                entries: 1,
                sets: 2,
                hits: 1,
                misses: 1,
                deletes: 1,
                reclaimed: 0,
            }
        );
    }

    #[test]
    fn test_generic_payload() {
        let engine: StorageEngine<u64> = StorageEngine::new(StoreConfig::default());

        engine.set("hits", 3u64);
        assert_eq!(engine.get("hits"), Some(3));
    }

    #[test]
    fn test_concurrent_access() {
        use std::sync::Arc;
        use std::thread;

        let engine = Arc::new(engine(Duration::from_secs(60), true));
        let mut handles = vec![];

        // Spawn multiple writers
        for i in 0..10 {
            let engine = Arc::clone(&engine);
            handles.push(thread::spawn(move || {
                for j in 0..100 {
                    let key = format!("key-{}-{}", i, j);
                    engine.set(key.clone(), j);
                    assert_eq!(engine.get(&key), Some(Value::Int(j)));
                }
            }));
        }

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(engine.count(), 1000);
        assert_eq!(engine.stats().hits, 1000);
    }
}
