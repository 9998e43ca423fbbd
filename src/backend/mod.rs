//! Backend Module
//!
//! Raw read/write of serialized records by key. A backend is chosen once,
//! when the cache is built, and every call dispatches on that variant.
//!
//! Both adapters map their own "not found" condition to `Ok(None)` and
//! propagate every other failure unchanged.

mod mounted;
mod object_store;

use std::path::PathBuf;
use std::sync::Arc;

pub use mounted::MountedDirectory;
pub use object_store::{MemoryObjectStore, ObjectStoreBucket, ObjectStoreClient, ObjectStoreError};

use crate::error::BackendError;

// == Backend ==
/// Where cache records are persisted.
#[derive(Debug, Clone)]
pub enum Backend {
    /// A locally mounted directory
    Mounted(MountedDirectory),
    /// A bucket + prefix in an object store
    ObjectStore(ObjectStoreBucket),
}

impl Backend {
    /// Persists records as files under `path`.
    pub fn mounted(path: impl Into<PathBuf>) -> Self {
        Backend::Mounted(MountedDirectory::new(path))
    }

    /// Persists records as objects `{prefix}/{key}` in `bucket`.
    pub fn object_store(
        client: Arc<dyn ObjectStoreClient>,
        bucket: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Backend::ObjectStore(ObjectStoreBucket::new(client, bucket, prefix))
    }

    /// Reads the record stored under `key`, or `None` if there is none.
    pub async fn read(&self, key: &str) -> Result<Option<String>, BackendError> {
        match self {
            Backend::Mounted(dir) => dir.read(key).await,
            Backend::ObjectStore(bucket) => bucket.read(key).await,
        }
    }

    /// Replaces the record stored under `key`.
    pub async fn write(&self, key: &str, data: &str) -> Result<(), BackendError> {
        match self {
            Backend::Mounted(dir) => dir.write(key, data).await,
            Backend::ObjectStore(bucket) => bucket.write(key, data).await,
        }
    }

    /// Short description for log lines.
    pub fn describe(&self) -> String {
        match self {
            Backend::Mounted(dir) => format!("mounted:{}", dir.path().display()),
            Backend::ObjectStore(bucket) => {
                format!("object-store:{}/{}", bucket.bucket(), bucket.object_key(""))
            }
        }
    }
}
