//! Storage capability used by the pipeline adapters.
//!
//! The pipeline only ever gets, puts, copies, deletes and lists objects;
//! everything else about the storage service stays behind this trait.

mod fs_store;

pub use fs_store::FsObjectStore;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObjectStoreError {
    /// The addressed object does not exist. Distinct from [`Io`] so callers
    /// can tell a permanently missing object from a transient storage
    /// failure.
    ///
    /// [`Io`]: ObjectStoreError::Io
    #[error("object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Minimal object-storage capability. Implementations decide what a bucket
/// is; keys may contain `/` and are treated as flat names.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Read an object's full contents.
    async fn get(&self, bucket: &str, key: &str) -> Result<Vec<u8>, ObjectStoreError>;

    /// Write an object, replacing any previous content under the key.
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: &[u8],
        content_type: Option<&str>,
    ) -> Result<(), ObjectStoreError>;

    /// Copy an object between buckets/keys without reading it at the caller.
    async fn copy(
        &self,
        source_bucket: &str,
        source_key: &str,
        dest_bucket: &str,
        dest_key: &str,
    ) -> Result<(), ObjectStoreError>;

    /// Remove an object. Deleting a missing object is a `NotFound` error.
    async fn delete(&self, bucket: &str, key: &str) -> Result<(), ObjectStoreError>;

    /// List keys in a bucket with the given prefix, in lexicographic order.
    /// A missing bucket lists as empty.
    async fn list(&self, bucket: &str, prefix: &str) -> Result<Vec<String>, ObjectStoreError>;

    /// Whether an object exists under the key.
    async fn exists(&self, bucket: &str, key: &str) -> Result<bool, ObjectStoreError>;
}
