//! The public store: a [`StorageEngine`] plus the sweeper that reclaims it.

use crate::config::StoreConfig;
use crate::error::Result;
use crate::storage::{ExpirySweeper, StorageEngine};
use crate::value::Value;
use std::ops::Deref;
use std::sync::Arc;

/// An in-memory key-value store whose entries expire one TTL after they were
/// written (or last read, with `extend_on_access`).
///
/// Constructing a store starts its background sweeper on the current Tokio
/// runtime. All table operations (`set`, `get`, `delete`, `count`, the typed
/// getters, ...) come from [`StorageEngine`] through `Deref` and are plain
/// synchronous calls, safe to make from any thread.
///
/// Dropping the store stops the sweeper. [`TtlStore::close`] also waits for
/// the sweeper task to exit.
///
/// # Example
///
/// ```
/// use ttlstore::{StoreConfig, TtlStore};
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() {
/// let store: TtlStore = TtlStore::new(StoreConfig::new(Duration::from_secs(30)));
///
/// store.set("session:42", "active");
/// assert_eq!(store.get_string("session:42").unwrap(), Some("active".to_string()));
///
/// store.close().await;
/// # }
/// ```
#[derive(Debug)]
pub struct TtlStore<V = Value> {
    engine: Arc<StorageEngine<V>>,
    sweeper: ExpirySweeper,
}

impl<V> TtlStore<V>
where
    V: Send + Sync + 'static,
{
    /// Creates an empty store and starts its sweeper.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime. Use [`TtlStore::try_new`]
    /// to get an error instead.
    pub fn new(config: StoreConfig) -> Self {
        let engine = Arc::new(StorageEngine::new(config));
        let sweeper = ExpirySweeper::start(Arc::clone(&engine));
        Self { engine, sweeper }
    }

    /// Creates an empty store, failing with
    /// [`StoreError::NoRuntime`](crate::StoreError::NoRuntime) outside a Tokio runtime.
    pub fn try_new(config: StoreConfig) -> Result<Self> {
        let engine = Arc::new(StorageEngine::new(config));
        let sweeper = ExpirySweeper::try_start(Arc::clone(&engine))?;
        Ok(Self { engine, sweeper })
    }
}

impl<V> TtlStore<V> {
    /// Returns a shared handle to the underlying engine.
    pub fn engine(&self) -> &Arc<StorageEngine<V>> {
        &self.engine
    }

    /// Returns true while the background sweeper is running.
    pub fn is_sweeping(&self) -> bool {
        !self.sweeper.is_finished()
    }

    /// Signals the sweeper to stop.
    ///
    /// The store stays usable; expired entries are then only hidden from
    /// reads, never reclaimed, unless [`StorageEngine::purge_expired`] is called.
    pub fn shutdown(&self) {
        self.sweeper.stop();
    }

    /// Stops the sweeper and waits for it to exit, consuming the store.
    pub async fn close(self) {
        self.sweeper.join().await;
    }
}

impl<V> Deref for TtlStore<V> {
    type Target = StorageEngine<V>;

    fn deref(&self) -> &Self::Target {
        &self.engine
    }
}
