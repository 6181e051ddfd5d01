//! Storage module for evidence files
//!
//! Provides a `FileStorage` port and a local-disk implementation whose
//! files are served back by the router under a public URL prefix.

mod local_storage;

pub use local_storage::LocalFileStorage;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Location of a stored file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    /// Storage-internal name, used for removal
    pub key: String,
    /// Relative URL under which the file is served
    pub url: String,
}

#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Persist `data` under a fresh name with the given extension
    async fn store(&self, data: &[u8], extension: &str) -> Result<StoredFile, StorageError>;

    async fn remove(&self, key: &str) -> Result<(), StorageError>;
}
