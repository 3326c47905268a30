//! Moves uploaded media into the job-input bucket under its durable key and
//! emits the descriptor the transcription job is started from.

use std::sync::Arc;

use chrono::DateTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::object_store::{ObjectStore, ObjectStoreError};
use crate::pipeline::{build_job_identity, file_extension, sanitize_path, UnsupportedFormat};

use super::events::UploadEvent;

#[derive(Debug, Error)]
pub enum IngestError {
    /// Required field missing or unparsable in the upload event. Fatal for
    /// this invocation; retrying the same payload cannot succeed.
    #[error("malformed upload event: {0}")]
    MalformedEvent(String),

    #[error(transparent)]
    UnsupportedFormat(#[from] UnsupportedFormat),

    #[error(transparent)]
    Store(#[from] ObjectStoreError),
}

/// Descriptor handed to the external transcription service, field names
/// matching its start-job API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDescriptor {
    #[serde(rename = "TranscriptionJobName")]
    pub transcription_job_name: String,
    #[serde(rename = "Media")]
    pub media: MediaLocation,
    #[serde(rename = "MediaFormat")]
    pub media_format: String,
    #[serde(rename = "OutputKey")]
    pub output_key: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaLocation {
    #[serde(rename = "MediaFileUri")]
    pub media_file_uri: String,
}

/// Stateless per-event processor for upload notifications.
pub struct IngestionProcessor {
    store: Arc<dyn ObjectStore>,
    job_input_bucket: String,
    timezone: Tz,
}

impl IngestionProcessor {
    pub fn new(store: Arc<dyn ObjectStore>, job_input_bucket: impl Into<String>, timezone: Tz) -> Self {
        Self {
            store,
            job_input_bucket: job_input_bucket.into(),
            timezone,
        }
    }

    /// Parse an upload-event payload, rejecting anything with missing or
    /// malformed fields.
    pub fn parse_event(payload: &str) -> Result<UploadEvent, IngestError> {
        serde_json::from_str(payload).map_err(|err| IngestError::MalformedEvent(err.to_string()))
    }

    /// Process one upload: derive the durable names, move the object into
    /// the job-input bucket (copy, then delete the original) and return the
    /// job descriptor.
    ///
    /// The move is not transactional. A crash between copy and delete leaves
    /// the original behind; on redelivery the already-moved object is
    /// detected (source gone, destination present) and reported as processed
    /// with the same descriptor instead of failing.
    pub async fn handle(&self, event: &UploadEvent) -> Result<JobDescriptor, IngestError> {
        let upload_time = DateTime::parse_from_rfc3339(&event.time).map_err(|err| {
            IngestError::MalformedEvent(format!("bad event time {:?}: {err}", event.time))
        })?;

        let source_bucket = &event.detail.bucket.name;
        let source_key = &event.detail.object.key;

        let sanitized_key = sanitize_path(source_key);
        let extension = file_extension(&sanitized_key);

        info!(
            event_time = %event.time,
            %source_bucket,
            %source_key,
            %sanitized_key,
            %extension,
            "processing upload"
        );

        let identity = build_job_identity(&sanitized_key, &upload_time, &extension, self.timezone)?;

        let descriptor = JobDescriptor {
            transcription_job_name: identity.job_name.clone(),
            media: MediaLocation {
                media_file_uri: format!("s3://{}/{}", self.job_input_bucket, identity.media_key),
            },
            media_format: identity.media_format.clone(),
            output_key: identity.output_key.clone(),
        };

        if !self.store.exists(source_bucket, source_key).await?
            && self
                .store
                .exists(&self.job_input_bucket, &identity.media_key)
                .await?
        {
            info!(
                media_key = %identity.media_key,
                "source already moved, reporting as processed"
            );
            return Ok(descriptor);
        }

        self.store
            .copy(
                source_bucket,
                source_key,
                &self.job_input_bucket,
                &identity.media_key,
            )
            .await?;
        self.store.delete(source_bucket, source_key).await?;

        info!(
            job_name = %identity.job_name,
            media_key = %identity.media_key,
            "media object moved"
        );

        Ok(descriptor)
    }
}
