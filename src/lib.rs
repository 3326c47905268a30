//! Media transcription pipeline library.
//!
//! Exposes the pure pipeline core (sanitization, job identity, subtitle
//! synthesis) and the storage-facing adapters for reuse and integration
//! testing.

pub mod archive;
pub mod config;
pub mod ingestion;
pub mod object_store;
pub mod pipeline;
pub mod transcript;
pub mod uploader;

// Re-export commonly used types for convenience
pub use ingestion::{IngestError, IngestionProcessor, JobDescriptor, UploadEvent};
pub use object_store::{FsObjectStore, ObjectStore, ObjectStoreError};
pub use pipeline::{
    build_job_identity, file_extension, format_time, generate_srt, hash8, sanitize_path,
    JobIdentity, TranscriptSegment, UnsupportedFormat, SUPPORTED_FORMATS,
};
pub use transcript::{JobStatusEvent, TranscriptError, TranscriptProcessor};
