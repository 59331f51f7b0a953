//! Fixed-window rate limiter built on ttlstore.
//!
//! Each client gets one counter per window, keyed by the window's index, so a
//! counter lives exactly as long as its window and the sweeper reclaims it
//! afterwards.
//!
//! Run with `cargo run --example rate_limit`, and `RUST_LOG=ttlstore=debug`
//! to watch the sweeper.

use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use ttlstore::{StoreConfig, TtlStore};

/// Length of one rate-limit window
const WINDOW: Duration = Duration::from_secs(1);

/// Requests allowed per client per window
const LIMIT: i64 = 5;

struct RateLimiter {
    counters: TtlStore,
}

impl RateLimiter {
    fn new() -> Self {
        Self {
            counters: TtlStore::new(StoreConfig::new(WINDOW)),
        }
    }

    /// Records a request from `client`, returning whether it is allowed.
    fn check(&self, client: &str) -> anyhow::Result<bool> {
        let window = SystemTime::now().duration_since(UNIX_EPOCH)?.as_millis() / WINDOW.as_millis();
        let key = format!("{}:{}", client, window);

        let seen = self.counters.get_int(&key)?.unwrap_or(0);
        if seen >= LIMIT {
            return Ok(false);
        }

        self.counters.set(key, seen + 1);
        Ok(true)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    info!("ttlstore v{} rate limiter demo", ttlstore::VERSION);

    let limiter = RateLimiter::new();

    for round in 0..3 {
        for client in ["alice", "bob"] {
            let burst = if client == "alice" { 8 } else { 3 };
            let mut allowed = 0;

            for _ in 0..burst {
                if limiter.check(client)? {
                    allowed += 1;
                }
            }

            if allowed < burst {
                warn!(round, client, allowed, rejected = burst - allowed, "Client throttled");
            } else {
                info!(round, client, allowed, "All requests allowed");
            }
        }

        info!(counters = limiter.counters.count(), "Round finished");
        tokio::time::sleep(WINDOW * 2).await;
    }

    let stats = limiter.counters.stats();
    info!(
        hits = stats.hits,
        misses = stats.misses,
        reclaimed = stats.reclaimed,
        "Demo finished"
    );

    limiter.counters.close().await;
    Ok(())
}
