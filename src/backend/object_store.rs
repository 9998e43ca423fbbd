//! Object store adapter
//!
//! The cache does not ship an SDK for any particular object store. Callers
//! plug one in by implementing [`ObjectStoreClient`]; [`MemoryObjectStore`]
//! is an in-process implementation for tests and local development.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::error::BackendError;

// == Object Store Error ==
#[derive(Error, Debug)]
pub enum ObjectStoreError {
    /// The object does not exist
    #[error("could not find object in bucket '{bucket}' with key '{key}'")]
    NotFound { bucket: String, key: String },

    /// Any other client failure (credentials, missing bucket, network...)
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// == Object Store Client ==
/// Minimal client surface the cache needs from an object store.
#[async_trait]
pub trait ObjectStoreClient: Send + Sync {
    /// Returns the object's body as UTF-8 text.
    ///
    /// Must return `ObjectStoreError::NotFound` when the object is missing.
    async fn get_object(&self, bucket: &str, key: &str) -> Result<String, ObjectStoreError>;

    /// Creates or replaces the object.
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: String,
    ) -> Result<(), ObjectStoreError>;
}

// == Object Store Bucket ==
/// Stores each record as the object `{prefix}/{key}` in `bucket`.
#[derive(Clone)]
pub struct ObjectStoreBucket {
    client: Arc<dyn ObjectStoreClient>,
    bucket: String,
    prefix: String,
}

impl ObjectStoreBucket {
    pub fn new(
        client: Arc<dyn ObjectStoreClient>,
        bucket: impl Into<String>,
        prefix: impl Into<String>,
    ) -> Self {
        Self {
            client,
            bucket: bucket.into(),
            prefix: prefix.into(),
        }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Full object key for a cache key; an empty prefix means no separator.
    pub fn object_key(&self, key: &str) -> String {
        if self.prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}/{}", self.prefix.trim_end_matches('/'), key)
        }
    }

    pub async fn read(&self, key: &str) -> Result<Option<String>, BackendError> {
        match self.client.get_object(&self.bucket, &self.object_key(key)).await {
            Ok(body) => Ok(Some(body)),
            Err(ObjectStoreError::NotFound { .. }) => Ok(None),
            Err(ObjectStoreError::Other(e)) => Err(BackendError::ObjectStore(e)),
        }
    }

    pub async fn write(&self, key: &str, data: &str) -> Result<(), BackendError> {
        self.client
            .put_object(&self.bucket, &self.object_key(key), data.to_string())
            .await
            .map_err(|e| match e {
                ObjectStoreError::Other(e) => BackendError::ObjectStore(e),
                not_found => BackendError::ObjectStore(not_found.into()),
            })
    }
}

impl fmt::Debug for ObjectStoreBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectStoreBucket")
            .field("bucket", &self.bucket)
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}

// == Memory Object Store ==
/// Object store kept in process memory, keyed by `(bucket, key)`.
#[derive(Debug, Default)]
pub struct MemoryObjectStore {
    objects: RwLock<HashMap<(String, String), String>>,
}

impl MemoryObjectStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes an object, returning whether it existed.
    pub async fn delete_object(&self, bucket: &str, key: &str) -> bool {
        self.objects
            .write()
            .await
            .remove(&(bucket.to_string(), key.to_string()))
            .is_some()
    }

    /// Keys of every object in `bucket`, sorted.
    pub async fn object_keys(&self, bucket: &str) -> Vec<String> {
        let objects = self.objects.read().await;
        let mut keys: Vec<String> = objects
            .keys()
            .filter(|(b, _)| b == bucket)
            .map(|(_, k)| k.clone())
            .collect();
        keys.sort();
        keys
    }
}

#[async_trait]
impl ObjectStoreClient for MemoryObjectStore {
    async fn get_object(&self, bucket: &str, key: &str) -> Result<String, ObjectStoreError> {
        self.objects
            .read()
            .await
            .get(&(bucket.to_string(), key.to_string()))
            .cloned()
            .ok_or_else(|| ObjectStoreError::NotFound {
                bucket: bucket.to_string(),
                key: key.to_string(),
            })
    }

    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        body: String,
    ) -> Result<(), ObjectStoreError> {
        self.objects
            .write()
            .await
            .insert((bucket.to_string(), key.to_string()), body);
        Ok(())
    }
}
