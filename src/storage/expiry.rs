//! Background Expiry Sweeper
//!
//! This module implements a background task that periodically scans the table
//! for expired entries and removes them. This is called "active expiry" as
//! opposed to "lazy expiry" (a read simply ignoring a stale entry).
//!
//! ## Why Do We Need This?
//!
//! Reads never delete. If an entry expires and is never written again, only
//! the sweeper will ever reclaim its memory.
//!
//! ## Design
//!
//! The sweeper runs as a Tokio task and alternates between two states:
//! 1. **Idle**: waits for the next tick, one period = `max(ttl, 1s)` (capped at 30 years)
//! 2. **Sweeping**: takes the table's write lock and removes every expired entry
//!
//! It stops when its handle signals shutdown, or when the handle is dropped.

use crate::config::MAX_SWEEP_INTERVAL;
use crate::error::{Result, StoreError};
use crate::storage::StorageEngine;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, trace, warn};

/// A handle to the running expiry sweeper.
///
/// When this handle is dropped, the sweeper task will be stopped.
#[derive(Debug)]
pub struct ExpirySweeper {
    /// Sender to signal shutdown
    shutdown_tx: watch::Sender<bool>,

    /// The sweeper task, taken by `join`
    task: Option<JoinHandle<()>>,

    /// Time between sweeps
    interval: Duration,
}

impl ExpirySweeper {
    /// Starts the expiry sweeper on the current Tokio runtime.
    ///
    /// The period is derived from the engine's configuration.
    ///
    /// # Panics
    ///
    /// Panics if called outside of a Tokio runtime, like `tokio::spawn`.
    /// Use [`ExpirySweeper::try_start`] to get an error instead.
    ///
    /// # Example
    ///
    /// ```
    /// use ttlstore::storage::{ExpirySweeper, StorageEngine};
    /// use ttlstore::{StoreConfig, Value};
    /// use std::sync::Arc;
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let engine: Arc<StorageEngine<Value>> = Arc::new(StorageEngine::new(StoreConfig::default()));
    /// let sweeper = ExpirySweeper::start(Arc::clone(&engine));
    ///
    /// // Sweeper runs in the background...
    ///
    /// sweeper.join().await;
    /// # }
    /// ```
    pub fn start<V>(engine: Arc<StorageEngine<V>>) -> Self
    where
        V: Send + Sync + 'static,
    {
        Self::spawn_on(&Handle::current(), engine)
    }

    /// Starts the expiry sweeper, or fails with [`StoreError::NoRuntime`]
    /// when there is no Tokio runtime to run it on.
    pub fn try_start<V>(engine: Arc<StorageEngine<V>>) -> Result<Self>
    where
        V: Send + Sync + 'static,
    {
        let handle = Handle::try_current().map_err(|_| StoreError::NoRuntime)?;
        Ok(Self::spawn_on(&handle, engine))
    }

    fn spawn_on<V>(handle: &Handle, engine: Arc<StorageEngine<V>>) -> Self
    where
        V: Send + Sync + 'static,
    {
        let interval = engine.config().sweep_interval();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        // The ticker is armed here, not on first poll, so sweeps line up with
        // the moment the store was created.
        let ticker = {
            let _guard = handle.enter();
            let now = Instant::now();
            let start = now
                .checked_add(interval)
                .unwrap_or_else(|| now + MAX_SWEEP_INTERVAL);
            let mut ticker = time::interval_at(start, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            ticker
        };

        let task = handle.spawn(sweeper_loop(engine, ticker, shutdown_rx));

        info!(
            interval = ?interval,
            "Background expiry sweeper started"
        );

        Self {
            shutdown_tx,
            task: Some(task),
            interval,
        }
    }

    /// Returns the time between sweeps.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Signals the sweeper to stop. Idempotent.
    ///
    /// This is called automatically when the handle is dropped.
    pub fn stop(&self) {
        if !self.shutdown_tx.send_replace(true) {
            info!("Background expiry sweeper stopped");
        }
    }

    /// Returns true once the sweeper task has exited.
    pub fn is_finished(&self) -> bool {
        self.task.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Stops the sweeper and waits for its task to exit.
    pub async fn join(mut self) {
        self.stop();

        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "Expiry sweeper task ended abnormally");
            }
        }
    }
}

impl Drop for ExpirySweeper {
    fn drop(&mut self) {
        self.stop();
    }
}

/// The main sweeper loop.
async fn sweeper_loop<V>(
    engine: Arc<StorageEngine<V>>,
    mut ticker: time::Interval,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    loop {
        // Wait for the next tick or shutdown signal
        tokio::select! {
            _ = ticker.tick() => {}
            result = shutdown_rx.changed() => {
                if result.is_err() || *shutdown_rx.borrow() {
                    debug!("Expiry sweeper received shutdown signal");
                    return;
                }
            }
        }

        let reclaimed = engine.purge_expired();

        if reclaimed > 0 {
            debug!(
                reclaimed = reclaimed,
                remaining = engine.count(),
                "Expired entries reclaimed"
            );
        } else {
            trace!("Sweep found no expired entries");
        }
    }
}
