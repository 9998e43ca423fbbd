//! Memory Sweep Task
//!
//! Expired memory entries are already ignored on read; sweeping only bounds
//! memory held by keys that are never read again.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::MemoryCache;

/// Spawns a task that removes expired memory entries every `interval`.
///
/// Runs until aborted through the returned handle.
pub fn spawn_cleanup_task(
    memory: Arc<RwLock<MemoryCache>>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(interval_ms = interval_ms(interval), "starting memory sweep task");

        loop {
            tokio::time::sleep(interval).await;

            let removed = memory.write().await.cleanup_expired();

            if removed > 0 {
                info!("memory sweep: removed {} expired entries", removed);
            } else {
                debug!("memory sweep: no expired entries found");
            }
        }
    })
}

/// Interval in whole milliseconds, saturating at `u64::MAX`.
fn interval_ms(interval: Duration) -> u64 {
    u64::try_from(interval.as_millis()).unwrap_or(u64::MAX)
}
