//! Key Index Module
//!
//! The list of currently valid keys, stored as an ordinary never-expiring
//! record under a reserved name that normal key validation rejects.
//!
//! Updates are read-modify-write. Within one process every update runs
//! through a single FIFO queue, so concurrent writers never drop each
//! other's keys. Across processes the index is not coordinated: two
//! processes updating at once can lose the slower writer's key. The value
//! itself is still on the backend, so the loss shows up only as a miss
//! until that key is set again. No distributed lock is taken for this.

use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::cache::entry::{current_timestamp_ms, is_expired_at};
use crate::cache::EntryStore;
use crate::error::Result;
use crate::key::CacheKey;

/// Storage key of the index record. `~` is outside the cache key alphabet.
pub const KEY_INDEX_KEY: &str = "~keys";

// == Key Index Entry ==
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyIndexEntry {
    pub key: CacheKey,
    /// Unix milliseconds; `None` never expires, `Some(0)` is an invalidation
    pub expires_at_millis: Option<u64>,
}

impl KeyIndexEntry {
    pub fn is_expired(&self, now: u64) -> bool {
        is_expired_at(self.expires_at_millis, now)
    }
}

// == Key Index ==
#[derive(Debug, Default)]
pub struct KeyIndex {
    /// Serializes `update`; tokio's mutex grants the lock in FIFO order
    write_queue: Mutex<()>,
}

impl KeyIndex {
    pub fn new() -> Self {
        Self::default()
    }

    // == List ==
    /// Returns every unexpired entry in the index.
    ///
    /// A missing index is empty. An unreadable index is logged and treated
    /// as empty; its keys read as misses until they are set again.
    pub async fn list(&self, store: &EntryStore) -> Result<Vec<KeyIndexEntry>> {
        let Some(record) = store.read_record(KEY_INDEX_KEY).await? else {
            return Ok(Vec::new());
        };

        let entries: Vec<KeyIndexEntry> = match serde_json::from_str(&record.value) {
            Ok(entries) => entries,
            Err(e) => {
                warn!(error = %e, "ignoring unreadable key index");
                return Ok(Vec::new());
            }
        };

        let now = current_timestamp_ms();
        Ok(entries.into_iter().filter(|e| !e.is_expired(now)).collect())
    }

    // == Update ==
    /// Replaces any entry for `entry.key` with `entry`.
    ///
    /// An expired or invalidated `entry` removes the key instead. The whole
    /// list is rewritten, so a failed write leaves the previous index intact.
    pub async fn update(&self, store: &EntryStore, entry: KeyIndexEntry) -> Result<()> {
        let _turn = self.write_queue.lock().await;

        let mut entries = self.list(store).await?;
        entries.retain(|existing| existing.key != entry.key);

        let removed = entry.is_expired(current_timestamp_ms());
        if removed {
            debug!(key = %entry.key, "removing key from index");
        } else {
            debug!(key = %entry.key, "recording key in index");
            entries.push(entry);
        }

        let serialized = serde_json::to_string(&entries)?;
        store.write_record(KEY_INDEX_KEY, Some(serialized.as_str()), None).await
    }
}
