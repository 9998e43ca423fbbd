//! Disk TTL Cache - a time-to-live key-value cache that persists values to
//! a mounted directory or an object store.
//!
//! Values survive process restarts and can be shared between processes
//! that point at the same backend. A key index lists valid keys without
//! scanning the backend, and an in-memory layer avoids repeated reads.
//!
//! ```no_run
//! use disk_ttl_cache::{Backend, CacheConfig, DiskCache, SetOptions};
//!
//! # async fn run() -> disk_ttl_cache::Result<()> {
//! let cache = DiskCache::new(CacheConfig::new(Backend::mounted("/var/cache/app")));
//! cache.set("meaning-of-life", "42", SetOptions::default()).await?;
//! assert_eq!(cache.get("meaning-of-life").await?.as_deref(), Some("42"));
//! # Ok(())
//! # }
//! ```

pub mod backend;
pub mod cache;
pub mod config;
pub mod error;
pub mod key;
pub mod tasks;

pub use backend::{Backend, MemoryObjectStore, ObjectStoreClient, ObjectStoreError};
pub use cache::{CacheStats, CacheValue, DiskCache, Expiration, SetOptions};
pub use config::{CacheConfig, DirectorySource};
pub use error::{BackendError, CacheError, Result};
pub use key::{cast_to_safe_cache_key, CacheKey, Procedure};
