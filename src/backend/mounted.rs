//! Mounted directory adapter.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::BackendError;

/// Stores each record as the file `{path}/{key}`.
///
/// The directory must already exist; a missing directory surfaces as an
/// I/O error on write rather than being created silently.
#[derive(Debug, Clone)]
pub struct MountedDirectory {
    path: PathBuf,
}

impl MountedDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_path(&self, key: &str) -> PathBuf {
        self.path.join(key)
    }

    pub async fn read(&self, key: &str) -> Result<Option<String>, BackendError> {
        match fs::read_to_string(self.file_path(key)).await {
            Ok(contents) => Ok(Some(contents)),
            // never cached
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(BackendError::Io(e)),
        }
    }

    pub async fn write(&self, key: &str, data: &str) -> Result<(), BackendError> {
        fs::write(self.file_path(key), data).await?;
        Ok(())
    }
}
