//! Upload-notification payloads.

use serde::Deserialize;

/// Notification that an object landed in an upload bucket, following the
/// storage service's eventing envelope: the upload time at the top level,
/// bucket and key under `detail`. Every field is required; a payload missing
/// any of them is rejected as malformed before the pipeline runs.
#[derive(Debug, Clone, Deserialize)]
pub struct UploadEvent {
    /// ISO-8601 upload timestamp.
    pub time: String,
    pub detail: UploadDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UploadDetail {
    pub bucket: BucketRef,
    pub object: ObjectRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BucketRef {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObjectRef {
    pub key: String,
}
