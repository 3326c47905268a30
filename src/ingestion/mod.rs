//! Upload-event adapter: turns an upload notification into a moved media
//! object and a job descriptor for the external transcription service.

mod events;
mod processor;

pub use events::{BucketRef, ObjectRef, UploadDetail, UploadEvent};
pub use processor::{IngestError, IngestionProcessor, JobDescriptor, MediaLocation};
