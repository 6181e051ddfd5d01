use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

use super::{FileStorage, StorageError, StoredFile};
use crate::core::config::StorageConfig;

/// File storage rooted at a local directory
pub struct LocalFileStorage {
    root: PathBuf,
    public_path: String,
}

impl LocalFileStorage {
    pub fn new(config: &StorageConfig) -> Self {
        Self {
            root: config.upload_dir.clone(),
            public_path: config.public_path.clone(),
        }
    }

    /// Create the upload directory if missing
    pub async fn ensure_root(&self) -> Result<(), StorageError> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|source| StorageError::Io {
                path: self.root.display().to_string(),
                source,
            })
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}", self.public_path, key)
    }
}

#[async_trait]
impl FileStorage for LocalFileStorage {
    async fn store(&self, data: &[u8], extension: &str) -> Result<StoredFile, StorageError> {
        let key = format!("evidencia-{}.{}", Uuid::new_v4(), extension);
        let path = self.root.join(&key);

        tokio::fs::write(&path, data)
            .await
            .map_err(|source| StorageError::Io {
                path: path.display().to_string(),
                source,
            })?;

        tracing::debug!("Stored {} bytes at {}", data.len(), path.display());

        Ok(StoredFile {
            url: self.public_url(&key),
            key,
        })
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        let path = self.root.join(key);
        tokio::fs::remove_file(&path)
            .await
            .map_err(|source| StorageError::Io {
                path: path.display().to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage(dir: &tempfile::TempDir) -> LocalFileStorage {
        LocalFileStorage::new(&StorageConfig {
            upload_dir: dir.path().to_path_buf(),
            public_path: "/uploads".to_string(),
        })
    }

    #[tokio::test]
    async fn test_store_writes_file_and_builds_url() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);

        let stored = storage.store(b"jpeg-bytes", "jpg").await.unwrap();

        assert!(stored.key.starts_with("evidencia-"));
        assert!(stored.key.ends_with(".jpg"));
        assert_eq!(stored.url, format!("/uploads/{}", stored.key));
        let written = std::fs::read(dir.path().join(&stored.key)).unwrap();
        assert_eq!(written, b"jpeg-bytes");
    }

    #[tokio::test]
    async fn test_remove_deletes_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = storage(&dir);

        let stored = storage.store(b"x", "png").await.unwrap();
        storage.remove(&stored.key).await.unwrap();

        assert!(!dir.path().join(&stored.key).exists());
        assert!(storage.remove(&stored.key).await.is_err());
    }

    #[tokio::test]
    async fn test_ensure_root_creates_nested_dir() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalFileStorage::new(&StorageConfig {
            upload_dir: dir.path().join("a/b"),
            public_path: "/uploads".to_string(),
        });

        storage.ensure_root().await.unwrap();
        assert!(dir.path().join("a/b").is_dir());
    }
}
