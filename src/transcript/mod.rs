//! Transcript adapter: converts a finished transcription job's result
//! document into a stored SRT subtitle object.

mod models;
mod processor;

pub use models::{AudioSegment, JobStatusEvent, TranscriptDocument};
pub use processor::{parse_transcript_uri, TranscriptError, TranscriptProcessor};
