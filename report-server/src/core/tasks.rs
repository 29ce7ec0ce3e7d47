//! 后台任务
//!
//! Periodic maintenance around the response cache. Expired entries are
//! already evicted lazily on `get`; the sweeper keeps abandoned keys from
//! accumulating between requests.

use std::time::Duration;

use crate::core::ServerState;

/// How often the sweeper wakes up
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Spawn the cache sweeper; it stops when the state's shutdown token fires
pub fn spawn_cache_sweeper(state: ServerState) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(SWEEP_INTERVAL);
        // The first tick fires immediately; skip it
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = state.shutdown.cancelled() => {
                    tracing::debug!("Cache sweeper stopped");
                    break;
                }
                _ = ticker.tick() => {
                    let dropped =
                        state.report_cache.sweep_expired() + state.filters_cache.sweep_expired();
                    if dropped > 0 {
                        tracing::debug!(dropped, "Swept expired cache entries");
                    }
                }
            }
        }
    });
}
