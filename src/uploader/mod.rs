//! Manual uploader: pushes a local folder into the upload bucket, skipping
//! files the pipeline has already processed.
//!
//! Ingestion renames objects to `{sanitized_key}.uploaded-{timestamp}.{ext}`,
//! so "already processed" is decided by stripping that suffix from the keys
//! in the processed bucket and comparing against the sanitized key a local
//! file would upload under.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::object_store::{ObjectStore, ObjectStoreError};
use crate::pipeline::{file_extension, sanitize_path, SUPPORTED_FORMATS};

lazy_static! {
    // Captures the original sanitized key in front of the rename suffix.
    static ref UPLOAD_SUFFIX: Regex =
        Regex::new(r"^(.*?)\.uploaded-\d{4}-\d{2}-\d{2}_\d{2}-\d{2}-\d{2}").unwrap();
}

#[derive(Debug, Error)]
pub enum UploadError {
    #[error(transparent)]
    Store(#[from] ObjectStoreError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of one upload run.
#[derive(Debug, Default)]
pub struct UploadReport {
    /// Files visited under the local folder.
    pub processed: usize,
    /// Files actually written to the upload bucket.
    pub uploaded: usize,
    /// Files skipped because the processed bucket already holds them.
    pub already_uploaded: usize,
    /// Files skipped for an unsupported extension.
    pub skipped: Vec<PathBuf>,
    /// Files whose upload failed; the run continues past them.
    pub failed: Vec<PathBuf>,
}

/// Strip the ingestion rename suffix from a processed key, recovering the
/// sanitized key it was uploaded under. Keys without the suffix pass
/// through unchanged.
pub fn strip_upload_suffix(key: &str) -> &str {
    UPLOAD_SUFFIX
        .captures(key)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
        .unwrap_or(key)
}

/// Recursively upload `local_folder` into `upload_bucket`, preserving the
/// folder structure relative to the folder's parent (the folder name itself
/// becomes the top-level key segment).
///
/// Files whose sanitized key already exists in `processed_bucket` (after
/// suffix stripping) are skipped, as are unsupported formats. With
/// `dry_run` everything is reported but nothing is written. Individual
/// upload failures are recorded and do not abort the run.
pub async fn upload_folder(
    store: &dyn ObjectStore,
    local_folder: &Path,
    upload_bucket: &str,
    processed_bucket: &str,
    dry_run: bool,
) -> Result<UploadReport, UploadError> {
    let processed_keys: HashSet<String> = store
        .list(processed_bucket, "")
        .await?
        .iter()
        .map(|key| strip_upload_suffix(key).to_string())
        .collect();

    let base = local_folder.parent().unwrap_or_else(|| Path::new(""));
    let mut report = UploadReport::default();

    for entry in WalkDir::new(local_folder).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        report.processed += 1;

        let key = object_key_for(path, base);
        let sanitized_key = sanitize_path(&key);

        if processed_keys.contains(&sanitized_key) {
            info!(
                ?path,
                %sanitized_key,
                bucket = %processed_bucket,
                "skipping, already processed"
            );
            report.already_uploaded += 1;
            continue;
        }

        if !SUPPORTED_FORMATS.contains(&file_extension(&key).as_str()) {
            info!(?path, "skipping, unsupported file extension");
            report.skipped.push(path.to_path_buf());
            continue;
        }

        let size = entry.metadata().map_err(std::io::Error::from)?.len();
        info!(?path, size, bucket = %upload_bucket, %key, dry_run, "uploading");

        if dry_run {
            continue;
        }

        let body = tokio::fs::read(path).await?;
        match store.put(upload_bucket, &key, &body, None).await {
            Ok(()) => report.uploaded += 1,
            Err(err) => {
                warn!(?path, %err, "upload failed");
                report.failed.push(path.to_path_buf());
            }
        }
    }

    info!(
        processed = report.processed,
        uploaded = report.uploaded,
        already_uploaded = report.already_uploaded,
        skipped = report.skipped.len(),
        failed = report.failed.len(),
        "upload run complete"
    );

    Ok(report)
}

fn object_key_for(path: &Path, base: &Path) -> String {
    let relative = path.strip_prefix(base).unwrap_or(path);
    relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}
