//! Cache Facade Module
//!
//! Composes the entry store, key index and memory cache into the public
//! `get` / `set` / `keys` surface.
//!
//! # Write Path
//! 1. Resolve the value and persist it (entry store)
//! 2. Record or remove the key (key index, serialized)
//! 3. Mirror the value in memory
//!
//! The index is only touched after the value write succeeds, so a failed
//! write never leaves a key listed but unreadable.
//!
//! # Read Path
//! 1. Memory hit → return
//! 2. Key not in the index → miss, without reading the record
//! 3. Read the record, mirror it in memory unless the key was set while
//!    the read was in flight, return

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{OnceCell, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::cache::{
    CacheStats, CacheValue, EntryStore, Expiration, KeyIndex, MemoryCache, SetOptions,
};
use crate::config::{CacheConfig, DirectorySource};
use crate::error::{CacheError, Result};
use crate::key::CacheKey;
use crate::tasks::spawn_cleanup_task;

// == Disk Cache ==
/// TTL cache persisted to a mounted directory or an object store.
///
/// Clones share one memory layer and one index write queue. Separate
/// `DiskCache::new` calls against the same backend do not share memory;
/// building a fresh instance is how a re-read from the backend is forced.
#[derive(Debug, Clone)]
pub struct DiskCache {
    inner: Arc<CacheInner>,
}

#[derive(Debug)]
struct CacheInner {
    directory: DirectorySource,
    store: OnceCell<EntryStore>,
    index: KeyIndex,
    memory: Arc<RwLock<MemoryCache>>,
    default_expiration: Expiration,
    sweep_interval: Duration,
}

impl DiskCache {
    // == Constructor ==
    pub fn new(config: CacheConfig) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                directory: config.directory,
                store: OnceCell::new(),
                index: KeyIndex::new(),
                memory: Arc::new(RwLock::new(MemoryCache::new())),
                default_expiration: config.default_expiration,
                sweep_interval: config.sweep_interval,
            }),
        }
    }

    /// Entry store over the resolved backend, resolving it on first use.
    async fn entry_store(&self) -> Result<&EntryStore> {
        self.inner
            .store
            .get_or_try_init(|| async {
                let backend = self.inner.directory.resolve().await?;
                info!(backend = %backend.describe(), "disk cache backend resolved");
                Ok::<_, CacheError>(EntryStore::new(backend))
            })
            .await
    }

    // == Get ==
    /// Returns the cached value for `key`, or `None` on a miss.
    ///
    /// Fails with `InvalidKey` before any I/O if `key` is not valid.
    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let key = CacheKey::parse(key)?;

        let (cached, generation) = {
            let mut memory = self.inner.memory.write().await;
            (memory.get(&key), memory.generation(&key))
        };
        if let Some(value) = cached {
            debug!(%key, "memory hit");
            return Ok(Some(value));
        }

        let store = self.entry_store().await?;
        let listed = self
            .inner
            .index
            .list(store)
            .await?
            .into_iter()
            .any(|entry| entry.key == key);
        if !listed {
            debug!(%key, "key not in index");
            return Ok(None);
        }

        match store.get(&key).await? {
            Some(entry) => {
                let filled = self.inner.memory.write().await.fill(
                    key.clone(),
                    entry.value.clone(),
                    entry.expires_at_millis,
                    generation,
                );
                if !filled {
                    debug!(%key, "key was set during the read; not caching");
                }
                Ok(Some(entry.value))
            }
            None => {
                warn!(%key, "key is indexed but its record is missing or expired");
                Ok(None)
            }
        }
    }

    // == Set ==
    /// Caches `value` under `key`; `None` invalidates the key.
    ///
    /// A pending value is awaited first. If it fails, the error is returned
    /// as `ValueComputation` and nothing is written.
    pub async fn set<'a>(
        &self,
        key: &str,
        value: impl Into<CacheValue<'a>>,
        options: SetOptions,
    ) -> Result<()> {
        let key = CacheKey::parse(key)?;
        let expiration = options.expiration.unwrap_or(self.inner.default_expiration);

        let store = self.entry_store().await?;
        let written = store.set(&key, value, expiration).await?;
        let expires_at = written.index_entry.expires_at_millis;

        self.inner.index.update(store, written.index_entry).await?;
        self.inner
            .memory
            .write()
            .await
            .set(key, written.value, expires_at);
        Ok(())
    }

    // == Invalidate ==
    /// Removes `key` from the cache. Same as `set(key, None, ..)`.
    pub async fn invalidate(&self, key: &str) -> Result<()> {
        self.set(key, None::<String>, SetOptions::default()).await
    }

    // == Keys ==
    /// Every key currently listed as valid.
    pub async fn keys(&self) -> Result<Vec<CacheKey>> {
        let store = self.entry_store().await?;
        let entries = self.inner.index.list(store).await?;
        Ok(entries.into_iter().map(|entry| entry.key).collect())
    }

    // == Stats ==
    /// Memory layer statistics.
    pub async fn stats(&self) -> CacheStats {
        self.inner.memory.read().await.stats()
    }

    // == Memory Sweeper ==
    /// Starts the background task that drops expired memory entries,
    /// running every `sweep_interval` from the config.
    pub fn spawn_memory_sweeper(&self) -> JoinHandle<()> {
        spawn_cleanup_task(self.inner.memory.clone(), self.inner.sweep_interval)
    }
}
