//! # ttlstore - An In-Process Key-Value Store with Expiring Entries
//!
//! ttlstore keeps short-lived values in memory: rate-limit counters, session
//! flags, memoized lookups. Every entry expires one store-wide TTL after it was
//! written, or after it was last read when touch-on-access is enabled.
//!
//! ## Features
//!
//! - **Store-Wide TTL**: One duration for every entry, fixed at construction
//! - **Touch on Access**: Optionally, reads keep hot entries alive
//! - **Typed Values**: A tagged [`Value`] payload with typed getters that
//!   report mismatches as errors
//! - **Lazy + Active Expiry**: Reads ignore stale entries; a background Tokio
//!   task removes them
//! - **Explicit Lifecycle**: Dropping or closing a store stops its sweeper
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐  set / get / delete / count   ┌──────────────────────────┐
//! │   callers    │──────────────────────────────>│      StorageEngine       │
//! │ (any thread) │                               │ RwLock<HashMap<String,   │
//! └──────────────┘                               │            Entry<V>>>    │
//!                                                └────────────▲─────────────┘
//!                                                             │ purge_expired
//!                                                ┌────────────┴─────────────┐
//!                                                │      ExpirySweeper       │
//!                                                │ (tick = max(ttl, 1s))    │
//!                                                └──────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use ttlstore::{StoreConfig, TtlStore};
//! use std::time::Duration;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let config = StoreConfig::new(Duration::from_secs(1)).with_extend_on_access(true);
//! let store: TtlStore = TtlStore::new(config);
//!
//! store.set("n", 123);
//! assert_eq!(store.get_int("n").unwrap(), Some(123));
//!
//! // Asking for the wrong kind is an error, not a panic
//! assert!(store.get_string("n").unwrap_err().is_type_mismatch());
//!
//! store.close().await;
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`storage`]: The table, its entries and the background sweeper
//! - [`value`]: The tagged payload type
//! - [`config`]: Store configuration
//! - [`error`]: Error types

pub mod config;
pub mod error;
pub mod storage;
pub mod value;

// Re-export commonly used types for convenience
pub use config::{StoreConfig, MAX_SWEEP_INTERVAL, MIN_SWEEP_INTERVAL};
pub use error::{Result, StoreError};
pub use storage::{ExpirySweeper, StorageEngine, StoreStats, TtlStore};
pub use value::{Value, ValueKind};

/// Version of ttlstore
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
