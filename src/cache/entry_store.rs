//! Entry Store Module
//!
//! Reads and writes single cache records against a backend, applying the
//! codec and the expiry check. Exactly one backend write per `set` and one
//! backend read per `get`.

use tracing::{debug, warn};

use crate::backend::Backend;
use crate::cache::codec;
use crate::cache::entry::current_timestamp_ms;
use crate::cache::{CacheValue, Expiration, KeyIndexEntry};
use crate::error::{CacheError, Result};
use crate::key::CacheKey;

// == Resolved Entry ==
/// A live, non-tombstoned record read back from the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEntry {
    pub value: String,
    pub expires_at_millis: Option<u64>,
}

// == Stored Write ==
/// Outcome of a successful `set`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredWrite {
    /// Entry to record in the key index
    pub index_entry: KeyIndexEntry,
    /// The resolved value that was written; `None` for an invalidation
    pub value: Option<String>,
}

// == Entry Store ==
#[derive(Debug, Clone)]
pub struct EntryStore {
    backend: Backend,
}

impl EntryStore {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }

    // == Get ==
    /// Returns the live value for `key`, or `None` if it is missing,
    /// expired, invalidated or unreadable.
    pub async fn get(&self, key: &CacheKey) -> Result<Option<ResolvedEntry>> {
        self.read_record(key.as_str()).await
    }

    // == Set ==
    /// Resolves `value` and persists it under `key`.
    ///
    /// A pending value that fails to resolve is returned as
    /// `ValueComputation` before anything reaches the backend.
    pub async fn set<'a>(
        &self,
        key: &CacheKey,
        value: impl Into<CacheValue<'a>>,
        expiration: Expiration,
    ) -> Result<StoredWrite> {
        let value = value.into().resolve().await?;

        let expires_at_millis = match value {
            Some(_) => expiration.expires_at_from(current_timestamp_ms()),
            None => Some(codec::TOMBSTONE_EXPIRES_AT),
        };
        self.write_record(key.as_str(), value.as_deref(), expires_at_millis)
            .await?;

        Ok(StoredWrite {
            index_entry: KeyIndexEntry {
                key: key.clone(),
                expires_at_millis,
            },
            value,
        })
    }

    // == Raw Record Access ==
    // Takes an unchecked storage key so the key index can use its reserved name.

    pub(crate) async fn read_record(&self, storage_key: &str) -> Result<Option<ResolvedEntry>> {
        let Some(raw) = self
            .backend
            .read(storage_key)
            .await
            .map_err(|e| CacheError::backend(storage_key, e))?
        else {
            debug!(key = storage_key, "no record on backend");
            return Ok(None);
        };

        let entry = match codec::decode(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(key = storage_key, error = %e, "ignoring corrupt cache record");
                return Ok(None);
            }
        };

        if entry.is_expired(current_timestamp_ms()) {
            debug!(key = storage_key, "record expired or invalidated");
            return Ok(None);
        }

        match entry.resolved_value() {
            Ok(Some(value)) => Ok(Some(ResolvedEntry {
                value,
                expires_at_millis: entry.expires_at_millis,
            })),
            Ok(None) => Ok(None),
            Err(e) => {
                warn!(key = storage_key, error = %e, "ignoring corrupt cache record");
                Ok(None)
            }
        }
    }

    pub(crate) async fn write_record(
        &self,
        storage_key: &str,
        value: Option<&str>,
        expires_at_millis: Option<u64>,
    ) -> Result<()> {
        let encoded = codec::encode(value, expires_at_millis)?;
        self.backend
            .write(storage_key, &encoded)
            .await
            .map_err(|e| CacheError::backend(storage_key, e))?;
        debug!(key = storage_key, expires_at = ?expires_at_millis, "record written");
        Ok(())
    }
}
