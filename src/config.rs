//! Configuration Module
//!
//! Describes where the cache persists to and how long values live, with
//! environment-variable loading for the mounted-directory case.

use std::env;
use std::fmt;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};

use crate::backend::Backend;
use crate::cache::{Expiration, DEFAULT_EXPIRATION_SECS};
use crate::error::{CacheError, Result};

/// Default mounted directory when none is configured
pub const DEFAULT_DIRECTORY: &str = ".disk-cache";

/// Default seconds between memory sweeps
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

/// Async function producing the backend, run at most once per cache.
pub type DirectoryResolver =
    Arc<dyn Fn() -> BoxFuture<'static, anyhow::Result<Backend>> + Send + Sync>;

// == Directory Source ==
/// The backend to persist to, given up front or resolved on first use.
#[derive(Clone)]
pub enum DirectorySource {
    Resolved(Backend),
    Deferred(DirectoryResolver),
}

impl DirectorySource {
    /// Defers choosing the backend until the cache is first used.
    ///
    /// Useful when the location comes from somewhere async, such as a
    /// secrets store. A failed resolution is retried on the next call.
    pub fn deferred<F, Fut>(resolver: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Backend>> + Send + 'static,
    {
        DirectorySource::Deferred(Arc::new(move || resolver().boxed()))
    }

    pub(crate) async fn resolve(&self) -> Result<Backend> {
        match self {
            DirectorySource::Resolved(backend) => Ok(backend.clone()),
            DirectorySource::Deferred(resolver) => {
                resolver().await.map_err(CacheError::DirectoryResolution)
            }
        }
    }
}

impl From<Backend> for DirectorySource {
    fn from(backend: Backend) -> Self {
        DirectorySource::Resolved(backend)
    }
}

impl fmt::Debug for DirectorySource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DirectorySource::Resolved(backend) => f.debug_tuple("Resolved").field(backend).finish(),
            DirectorySource::Deferred(_) => f.write_str("Deferred(..)"),
        }
    }
}

// == Cache Config ==
/// Cache configuration parameters.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Where records are persisted
    pub directory: DirectorySource,
    /// Expiration applied when `set` does not specify one
    pub default_expiration: Expiration,
    /// Interval between sweeps of expired in-memory entries
    pub sweep_interval: Duration,
}

impl CacheConfig {
    pub fn new(directory: impl Into<DirectorySource>) -> Self {
        Self {
            directory: directory.into(),
            default_expiration: Expiration::default(),
            sweep_interval: Duration::from_secs(DEFAULT_SWEEP_INTERVAL_SECS),
        }
    }

    pub fn with_default_expiration(mut self, expiration: Expiration) -> Self {
        self.default_expiration = expiration;
        self
    }

    pub fn with_sweep_interval(mut self, interval: Duration) -> Self {
        self.sweep_interval = interval;
        self
    }

    /// Creates a new CacheConfig for a mounted directory from environment variables.
    ///
    /// # Environment Variables
    /// - `DISK_CACHE_DIRECTORY` - Mounted directory (default: `.disk-cache`)
    /// - `DISK_CACHE_DEFAULT_TTL` - Default TTL in seconds, `0` disables expiry (default: 300)
    /// - `DISK_CACHE_SWEEP_INTERVAL` - Memory sweep interval in seconds (default: 60)
    pub fn from_env() -> Self {
        let directory = env::var("DISK_CACHE_DIRECTORY")
            .ok()
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DIRECTORY));

        let default_expiration = match env::var("DISK_CACHE_DEFAULT_TTL")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(DEFAULT_EXPIRATION_SECS)
        {
            0 => Expiration::Never,
            seconds => Expiration::seconds(seconds),
        };

        let sweep_interval = env::var("DISK_CACHE_SWEEP_INTERVAL")
            .ok()
            .and_then(|v| v.parse::<u64>().ok())
            .filter(|&secs| secs > 0)
            .unwrap_or(DEFAULT_SWEEP_INTERVAL_SECS);

        Self {
            directory: Backend::mounted(directory).into(),
            default_expiration,
            sweep_interval: Duration::from_secs(sweep_interval),
        }
    }
}
