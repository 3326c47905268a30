//! Fetches a transcription result and stores the SRT rendition of it.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::object_store::{ObjectStore, ObjectStoreError};
use crate::pipeline::generate_srt;

use super::models::{JobStatusEvent, TranscriptDocument};

#[derive(Debug, Error)]
pub enum TranscriptError {
    /// Required field missing or unparsable in the job-status event.
    #[error("malformed job-status event: {0}")]
    MalformedEvent(String),

    /// The transcript document is not in the expected shape.
    #[error("malformed transcript document: {0}")]
    MalformedDocument(String),

    /// The transcript URI is in no form this adapter knows how to split
    /// into bucket and key.
    #[error("unrecognized transcript URI: {0}")]
    UnrecognizedUri(String),

    #[error(transparent)]
    Store(#[from] ObjectStoreError),
}

/// Stateless per-event processor for finished transcription jobs.
pub struct TranscriptProcessor {
    store: Arc<dyn ObjectStore>,
    destination_bucket: String,
}

impl TranscriptProcessor {
    pub fn new(store: Arc<dyn ObjectStore>, destination_bucket: impl Into<String>) -> Self {
        Self {
            store,
            destination_bucket: destination_bucket.into(),
        }
    }

    /// Parse a job-status payload, rejecting anything without a transcript
    /// location.
    pub fn parse_event(payload: &str) -> Result<JobStatusEvent, TranscriptError> {
        serde_json::from_str(payload).map_err(|err| TranscriptError::MalformedEvent(err.to_string()))
    }

    /// Fetch the transcript document named by the event, render it as SRT
    /// and store it in the destination bucket. Returns the subtitle key.
    ///
    /// The subtitle key is the transcript key with `.json` replaced by
    /// `.srt`, so results stay adjacent to the media keys that produced
    /// them.
    pub async fn handle(&self, event: &JobStatusEvent) -> Result<String, TranscriptError> {
        let uri = &event.job_status.transcription_job.transcript.transcript_file_uri;
        let (source_bucket, source_key) = parse_transcript_uri(uri)?;
        let destination_key = source_key.replace(".json", ".srt");

        info!(%uri, %source_bucket, %source_key, %destination_key, "converting transcript");

        let body = self.store.get(&source_bucket, &source_key).await?;
        let document: TranscriptDocument = serde_json::from_slice(&body)
            .map_err(|err| TranscriptError::MalformedDocument(err.to_string()))?;

        let srt = generate_srt(&document.segments());

        self.store
            .put(
                &self.destination_bucket,
                &destination_key,
                srt.as_bytes(),
                Some("text/srt"),
            )
            .await?;

        info!(
            cues = document.results.audio_segments.len(),
            destination_bucket = %self.destination_bucket,
            %destination_key,
            "subtitle document stored"
        );

        Ok(destination_key)
    }
}

/// Split a transcript URI into bucket and key.
///
/// Accepts the job runner's `s3://bucket/key` form and HTTPS object URLs
/// whose path after the service host is `bucket/key`.
pub fn parse_transcript_uri(uri: &str) -> Result<(String, String), TranscriptError> {
    let bucket_and_key = if let Some(rest) = uri.strip_prefix("s3://") {
        rest
    } else if let Some((_, rest)) = uri.split_once("amazonaws.com/") {
        rest
    } else {
        return Err(TranscriptError::UnrecognizedUri(uri.to_string()));
    };

    match bucket_and_key.split_once('/') {
        Some((bucket, key)) if !bucket.is_empty() && !key.is_empty() => {
            Ok((bucket.to_string(), key.to_string()))
        }
        _ => Err(TranscriptError::UnrecognizedUri(uri.to_string())),
    }
}
