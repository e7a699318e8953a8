//! File storage for uploaded images.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// An uploaded file awaiting storage
#[derive(Debug, Clone)]
pub struct Upload {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Where a stored file can be fetched and how to delete it later
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFile {
    pub url: String,
    pub public_id: String,
}

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait FileStorage: Send + Sync {
    /// Store a file under `folder`, returning its public location
    async fn store(&self, folder: &str, upload: Upload) -> AppResult<StoredFile>;

    /// Remove a stored file; deleting a missing file succeeds
    async fn delete(&self, public_id: &str) -> AppResult<()>;
}

/// Stores files on the local filesystem and serves them under a base URL.
pub struct LocalStorage {
    root: PathBuf,
    base_url: String,
}

impl LocalStorage {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, public_id: &str) -> AppResult<PathBuf> {
        let relative = Path::new(public_id);
        let safe = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        if !safe || public_id.is_empty() {
            return Err(AppError::validation("Invalid file id"));
        }
        Ok(self.root.join(relative))
    }
}

fn extension_for(content_type: &str) -> &'static str {
    match content_type {
        "image/png" => "png",
        "image/webp" => "webp",
        "image/jpeg" | "image/jpg" => "jpg",
        _ => "bin",
    }
}

#[async_trait]
impl FileStorage for LocalStorage {
    async fn store(&self, folder: &str, upload: Upload) -> AppResult<StoredFile> {
        let public_id = format!(
            "{}/{}.{}",
            folder,
            Uuid::new_v4(),
            extension_for(&upload.content_type)
        );
        let path = self.resolve(&public_id)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::storage(format!("create {}: {}", parent.display(), e)))?;
        }
        tokio::fs::write(&path, &upload.bytes)
            .await
            .map_err(|e| AppError::storage(format!("write {}: {}", path.display(), e)))?;

        tracing::debug!(public_id = %public_id, bytes = upload.bytes.len(), "File stored");

        Ok(StoredFile {
            url: format!("{}/{}", self.base_url, public_id),
            public_id,
        })
    }

    async fn delete(&self, public_id: &str) -> AppResult<()> {
        let path = self.resolve(public_id)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::storage(format!("delete {}: {}", path.display(), e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn storage() -> LocalStorage {
        let root = std::env::temp_dir().join(format!("pg-nexus-storage-{}", Uuid::new_v4()));
        LocalStorage::new(root, "http://localhost:5000/uploads/")
    }

    #[tokio::test]
    async fn test_store_then_delete() {
        let storage = storage();
        let stored = storage
            .store(
                "properties",
                Upload {
                    content_type: "image/png".to_string(),
                    bytes: vec![1, 2, 3],
                },
            )
            .await
            .unwrap();

        assert!(stored.public_id.starts_with("properties/"));
        assert!(stored.public_id.ends_with(".png"));
        assert_eq!(
            stored.url,
            format!("http://localhost:5000/uploads/{}", stored.public_id)
        );
        assert!(storage.root().join(&stored.public_id).exists());

        storage.delete(&stored.public_id).await.unwrap();
        assert!(!storage.root().join(&stored.public_id).exists());
        // Deleting again is fine
        storage.delete(&stored.public_id).await.unwrap();
    }

    #[tokio::test]
    async fn test_rejects_path_traversal() {
        let err = storage().delete("../etc/passwd").await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
