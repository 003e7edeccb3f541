use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::info;
use url::Url;

use super::{unique_key, BlobStore, StorageError, StoredBlob};

/// Filesystem-backed blob store rooted at an injected directory. Keys are
/// paths relative to the root; public URLs point at the `/static` mount.
pub struct LocalBlobStore {
    root: PathBuf,
    public_base_url: Url,
}

impl LocalBlobStore {
    pub fn new(root: &Path, public_base_url: Url) -> std::io::Result<Self> {
        std::fs::create_dir_all(root)?;
        info!("✅ Local blob store ready at {}", root.display());
        Ok(Self {
            root: root.to_path_buf(),
            public_base_url,
        })
    }

    fn resolve(&self, storage_path: &str) -> Result<PathBuf, StorageError> {
        let relative = Path::new(storage_path);
        let traversal = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if traversal {
            return Err(StorageError::NotFound(storage_path.to_string()));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl BlobStore for LocalBlobStore {
    async fn store(&self, bytes: Bytes, suggested_name: &str) -> Result<StoredBlob, StorageError> {
        let key = unique_key(suggested_name);
        let path = self.root.join(&key);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &bytes).await?;

        let public_url = self
            .public_base_url
            .join(&format!("static/{key}"))
            .map_err(|e| StorageError::Backend(format!("invalid public URL for '{key}': {e}")))?;

        Ok(StoredBlob {
            storage_path: key,
            public_url: public_url.to_string(),
        })
    }

    async fn read(&self, storage_path: &str) -> Result<Bytes, StorageError> {
        let path = self.resolve(storage_path)?;
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes.into()),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                Err(StorageError::NotFound(storage_path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_at(dir: &Path) -> LocalBlobStore {
        LocalBlobStore::new(dir, Url::parse("http://localhost:8000").unwrap()).unwrap()
    }

    #[tokio::test]
    async fn store_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(dir.path());

        let blob = store
            .store(Bytes::from_static(b"frames"), "uploads/clip.mp4")
            .await
            .unwrap();

        assert!(blob.storage_path.starts_with("uploads/"));
        assert!(blob.public_url.starts_with("http://localhost:8000/static/uploads/"));
        assert_eq!(store.read(&blob.storage_path).await.unwrap(), Bytes::from_static(b"frames"));
    }

    #[tokio::test]
    async fn missing_key_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(dir.path());

        match store.read("uploads/nope.mp4").await {
            Err(StorageError::NotFound(path)) => assert_eq!(path, "uploads/nope.mp4"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn traversal_keys_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_at(dir.path());

        assert!(matches!(
            store.read("../outside").await,
            Err(StorageError::NotFound(_))
        ));
    }
}
