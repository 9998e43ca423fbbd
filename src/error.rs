//! Error types for the disk cache
//!
//! Provides unified error handling using thiserror.
//!
//! Only caller-actionable failures live here. A record that fails to decode
//! is never surfaced: it is logged and read as a miss.

use thiserror::Error;

// == Backend Error ==
/// Failure reported by a storage backend, other than "not found".
#[derive(Error, Debug)]
pub enum BackendError {
    /// Mounted directory I/O failure
    #[error("filesystem error: {0}")]
    Io(#[from] std::io::Error),

    /// Object store client failure
    #[error("object store error: {0}")]
    ObjectStore(anyhow::Error),
}

// == Cache Error Enum ==
/// Unified error type for the disk cache.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Key contains characters outside `[A-Za-z0-9._-]`
    #[error("The on-disk cache key requested is invalid: '{0}'. Only alphanumeric characters and period, dash, and underscore are allowed.")]
    InvalidKey(String),

    /// Backend read or write failed
    #[error("Backend failure for key '{key}': {source}")]
    Backend {
        key: String,
        #[source]
        source: BackendError,
    },

    /// The caller's pending value resolved to an error; nothing was written
    #[error("Value computation failed: {0}")]
    ValueComputation(#[source] anyhow::Error),

    /// The deferred directory resolver failed
    #[error("Failed to resolve cache directory: {0}")]
    DirectoryResolution(#[source] anyhow::Error),

    /// An outgoing record could not be serialized
    #[error("Failed to encode cache record: {0}")]
    Encode(#[from] serde_json::Error),
}

impl CacheError {
    pub(crate) fn backend(key: &str, source: BackendError) -> Self {
        CacheError::Backend {
            key: key.to_string(),
            source,
        }
    }
}

// == Result Type Alias ==
/// Convenience Result type for the disk cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_key_message_names_the_key() {
        let err = CacheError::InvalidKey("bad/key".to_string());
        let message = err.to_string();
        assert!(message.contains("'bad/key'"));
        assert!(message.contains("period, dash, and underscore"));
    }

    #[test]
    fn test_backend_error_keeps_io_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = CacheError::backend("city", BackendError::from(io));

        match err {
            CacheError::Backend { key, source: BackendError::Io(io) } => {
                assert_eq!(key, "city");
                assert_eq!(io.kind(), std::io::ErrorKind::PermissionDenied);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_value_computation_error_can_be_downcast() {
        #[derive(Debug, thiserror::Error)]
        #[error("surprise!")]
        struct Surprise;

        let err = CacheError::ValueComputation(anyhow::Error::new(Surprise));
        match err {
            CacheError::ValueComputation(inner) => {
                assert!(inner.downcast_ref::<Surprise>().is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
