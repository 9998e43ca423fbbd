//! Values and expirations accepted by `set`.

use std::future::Future;
use std::time::Duration;

use futures::future::{BoxFuture, FutureExt};

use crate::cache::DEFAULT_EXPIRATION_SECS;
use crate::error::{CacheError, Result};

// == Cache Value ==
/// A value to cache, either known now or produced asynchronously.
///
/// `None` invalidates the key. A pending value is resolved exactly once,
/// before anything is written; if it fails, nothing is written.
pub enum CacheValue<'a> {
    Ready(Option<String>),
    Pending(BoxFuture<'a, anyhow::Result<Option<String>>>),
}

impl<'a> CacheValue<'a> {
    /// Wraps a fallible computation of the value.
    pub fn pending<F, E>(future: F) -> Self
    where
        F: Future<Output = std::result::Result<String, E>> + Send + 'a,
        E: Into<anyhow::Error> + 'a,
    {
        CacheValue::Pending(async move { future.await.map(Some).map_err(Into::into) }.boxed())
    }

    /// Awaits the value, mapping a failed computation to `ValueComputation`.
    pub async fn resolve(self) -> Result<Option<String>> {
        match self {
            CacheValue::Ready(value) => Ok(value),
            CacheValue::Pending(future) => future.await.map_err(CacheError::ValueComputation),
        }
    }
}

impl From<String> for CacheValue<'_> {
    fn from(value: String) -> Self {
        CacheValue::Ready(Some(value))
    }
}

impl From<&str> for CacheValue<'_> {
    fn from(value: &str) -> Self {
        CacheValue::Ready(Some(value.to_string()))
    }
}

impl From<Option<String>> for CacheValue<'_> {
    fn from(value: Option<String>) -> Self {
        CacheValue::Ready(value)
    }
}

impl From<Option<&str>> for CacheValue<'_> {
    fn from(value: Option<&str>) -> Self {
        CacheValue::Ready(value.map(str::to_string))
    }
}

// == Expiration ==
/// How long a value stays valid after it is set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expiration {
    After(Duration),
    Never,
}

impl Expiration {
    pub fn seconds(seconds: u64) -> Self {
        Expiration::After(Duration::from_secs(seconds))
    }

    /// Absolute expiry in Unix milliseconds; `None` never expires.
    pub fn expires_at_from(&self, now_ms: u64) -> Option<u64> {
        match self {
            Expiration::After(ttl) => {
                let ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
                Some(now_ms.saturating_add(ttl_ms))
            }
            Expiration::Never => None,
        }
    }
}

impl Default for Expiration {
    fn default() -> Self {
        Expiration::seconds(DEFAULT_EXPIRATION_SECS)
    }
}

// == Set Options ==
/// Per-call options for `set`. An unset expiration uses the cache default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SetOptions {
    pub expiration: Option<Expiration>,
}

impl SetOptions {
    pub fn expire_after(ttl: Duration) -> Self {
        Self {
            expiration: Some(Expiration::After(ttl)),
        }
    }

    pub fn never_expire() -> Self {
        Self {
            expiration: Some(Expiration::Never),
        }
    }
}
