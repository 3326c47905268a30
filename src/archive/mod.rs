//! Bucket archiver: bundles a bucket's contents into one zip object.

use std::io::{Cursor, Write};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::info;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::object_store::{ObjectStore, ObjectStoreError};

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error(transparent)]
    Store(#[from] ObjectStoreError),

    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("zip IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Key the archive is stored under for a given archival time.
pub fn zip_key_for(now: &DateTime<Utc>) -> String {
    format!("all_{}Z.zip", now.format("%Y-%m-%d_%H-%M-%S"))
}

/// List a bucket's keys, optionally leaving out zip archives so repeated
/// runs don't pack earlier archives into new ones.
pub async fn list_bucket(
    store: &dyn ObjectStore,
    bucket: &str,
    exclude_zips: bool,
) -> Result<Vec<String>, ObjectStoreError> {
    let mut keys = store.list(bucket, "").await?;
    if exclude_zips {
        keys.retain(|key| !key.to_lowercase().ends_with(".zip"));
    }
    Ok(keys)
}

/// Bundle every non-zip object in `bucket` into one deflate-compressed zip
/// and store it back into the same bucket. The archive key is derived from
/// `now`, which the caller supplies. Returns the archive key.
pub async fn zip_bucket(
    store: &dyn ObjectStore,
    bucket: &str,
    now: &DateTime<Utc>,
) -> Result<String, ArchiveError> {
    let keys = list_bucket(store, bucket, true).await?;

    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for key in &keys {
        info!(%key, "adding object to archive");
        let body = store.get(bucket, key).await?;
        writer.start_file(key.clone(), options)?;
        writer.write_all(&body)?;
    }

    let buffer = writer.finish()?.into_inner();

    let zip_key = zip_key_for(now);
    store
        .put(bucket, &zip_key, &buffer, Some("application/zip"))
        .await?;

    info!(%bucket, %zip_key, objects = keys.len(), "bucket archive stored");
    Ok(zip_key)
}
