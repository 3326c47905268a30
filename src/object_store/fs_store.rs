//! Filesystem-backed object store: buckets are directories under a root.

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use walkdir::WalkDir;

use super::{ObjectStore, ObjectStoreError};

/// Object store rooted at a local directory. The first path component under
/// the root is the bucket, the rest is the key; keys containing `/` map to
/// nested directories.
pub struct FsObjectStore {
    root: PathBuf,
}

impl FsObjectStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn object_path(&self, bucket: &str, key: &str) -> PathBuf {
        self.root.join(bucket).join(key)
    }

    fn not_found(bucket: &str, key: &str) -> ObjectStoreError {
        ObjectStoreError::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        }
    }
}

#[async_trait]
impl ObjectStore for FsObjectStore {
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, ObjectStoreError> {
        match fs::read(self.object_path(bucket, key)).await {
            Ok(bytes) => Ok(bytes),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(Self::not_found(bucket, key))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: &[u8],
        _content_type: Option<&str>,
    ) -> Result<(), ObjectStoreError> {
        // Content type has no filesystem representation; the parameter is
        // honored by stores that track object metadata.
        let path = self.object_path(bucket, key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::File::create(&path).await?;
        file.write_all(body).await?;
        file.flush().await?;
        Ok(())
    }

    async fn copy(
        &self,
        source_bucket: &str,
        source_key: &str,
        dest_bucket: &str,
        dest_key: &str,
    ) -> Result<(), ObjectStoreError> {
        let body = self.get(source_bucket, source_key).await?;
        self.put(dest_bucket, dest_key, &body, None).await
    }

    async fn delete(&self, bucket: &str, key: &str) -> Result<(), ObjectStoreError> {
        match fs::remove_file(self.object_path(bucket, key)).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                Err(Self::not_found(bucket, key))
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, ObjectStoreError> {
        let bucket_dir = self.root.join(bucket);
        if !bucket_dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut keys = Vec::new();
        for entry in WalkDir::new(&bucket_dir) {
            let entry = entry.map_err(std::io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Ok(relative) = entry.path().strip_prefix(&bucket_dir) {
                let key = relative
                    .components()
                    .map(|c| c.as_os_str().to_string_lossy().into_owned())
                    .collect::<Vec<_>>()
                    .join("/");
                if key.starts_with(prefix) {
                    keys.push(key);
                }
            }
        }

        keys.sort();
        Ok(keys)
    }

    async fn exists(&self, bucket: &str, key: &str) -> Result<bool, ObjectStoreError> {
        Ok(self.object_path(bucket, key).is_file())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_store() -> (TempDir, FsObjectStore) {
        let temp_dir = TempDir::new().unwrap();
        let store = FsObjectStore::new(temp_dir.path());
        (temp_dir, store)
    }

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let (_dir, store) = make_store();
        store.put("uploads", "a.mp3", b"bytes", None).await.unwrap();
        assert_eq!(store.get("uploads", "a.mp3").await.unwrap(), b"bytes");
    }

    #[tokio::test]
    async fn test_put_creates_nested_key_dirs() {
        let (_dir, store) = make_store();
        store
            .put("uploads", "team/2024/a.mp3", b"bytes", None)
            .await
            .unwrap();
        assert!(store.exists("uploads", "team/2024/a.mp3").await.unwrap());
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let (_dir, store) = make_store();
        let err = store.get("uploads", "missing.mp3").await.unwrap_err();
        assert!(matches!(err, ObjectStoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_copy_then_delete_moves_object() {
        let (_dir, store) = make_store();
        store.put("uploads", "a.mp3", b"bytes", None).await.unwrap();

        store.copy("uploads", "a.mp3", "audio", "a.moved.mp3").await.unwrap();
        store.delete("uploads", "a.mp3").await.unwrap();

        assert!(!store.exists("uploads", "a.mp3").await.unwrap());
        assert_eq!(store.get("audio", "a.moved.mp3").await.unwrap(), b"bytes");
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let (_dir, store) = make_store();
        let err = store.delete("uploads", "missing.mp3").await.unwrap_err();
        assert!(matches!(err, ObjectStoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_list_is_sorted_and_recursive() {
        let (_dir, store) = make_store();
        store.put("b", "z.mp3", b"1", None).await.unwrap();
        store.put("b", "nested/a.mp3", b"2", None).await.unwrap();
        store.put("b", "a.mp3", b"3", None).await.unwrap();

        let keys = store.list("b", "").await.unwrap();
        assert_eq!(keys, vec!["a.mp3", "nested/a.mp3", "z.mp3"]);
    }

    #[tokio::test]
    async fn test_list_honors_prefix() {
        let (_dir, store) = make_store();
        store.put("b", "in/a.mp3", b"1", None).await.unwrap();
        store.put("b", "out/b.mp3", b"2", None).await.unwrap();

        let keys = store.list("b", "in/").await.unwrap();
        assert_eq!(keys, vec!["in/a.mp3"]);
    }

    #[tokio::test]
    async fn test_list_missing_bucket_is_empty() {
        let (_dir, store) = make_store();
        assert!(store.list("nope", "").await.unwrap().is_empty());
    }
}
