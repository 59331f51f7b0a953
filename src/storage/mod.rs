//! Storage Module
//!
//! This module provides the core storage functionality for ttlstore:
//! a lock-guarded table of expiring entries and the background sweeper
//! that reclaims them.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        TtlStore                             │
//! │  ┌───────────────────────────────────────────────────────┐  │
//! │  │                  StorageEngine                        │  │
//! │  │   RwLock<HashMap<String, Entry<V>>>  +  counters      │  │
//! │  └───────────────────────────────────────────────────────┘  │
//! │                            ▲                                │
//! │                            │ purge_expired() every tick     │
//! │              ┌─────────────┴─────────────┐                  │
//! │              │     ExpirySweeper         │                  │
//! │              │  (Background Tokio Task)  │                  │
//! │              └───────────────────────────┘                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Features
//!
//! - **Store-Wide TTL**: Every entry lives for the same configured duration
//! - **Touch on Access**: Optionally, each successful read restarts the clock
//! - **Lazy Expiry**: Expired entries are invisible to reads immediately
//! - **Active Expiry**: The sweeper physically removes them every period
//!
//! ## Example
//!
//! ```
//! use ttlstore::storage::StorageEngine;
//! use ttlstore::{StoreConfig, Value};
//! use std::time::Duration;
//!
//! let engine: StorageEngine<Value> = StorageEngine::new(StoreConfig::new(Duration::from_secs(3600)));
//!
//! engine.set("name", "Ariz");
//! assert_eq!(engine.get_string("name").unwrap(), Some("Ariz".to_string()));
//! ```

pub mod engine;
pub mod entry;
pub mod expiry;
pub mod store;
mod typed;

// Re-export commonly used types
pub use engine::{StorageEngine, StoreStats};
pub use entry::Entry;
pub use expiry::ExpirySweeper;
pub use store::TtlStore;
