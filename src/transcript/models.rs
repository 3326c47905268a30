//! Transcription result documents and the job-status event that names them.

use serde::{Deserialize, Deserializer};

use crate::pipeline::TranscriptSegment;

/// Completed-job notification; only the transcript location is consumed
/// here, the rest of the job status belongs to the orchestrator.
#[derive(Debug, Clone, Deserialize)]
pub struct JobStatusEvent {
    #[serde(rename = "jobStatus")]
    pub job_status: JobStatus,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JobStatus {
    #[serde(rename = "TranscriptionJob")]
    pub transcription_job: TranscriptionJob,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionJob {
    #[serde(rename = "Transcript")]
    pub transcript: TranscriptRef,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptRef {
    #[serde(rename = "TranscriptFileUri")]
    pub transcript_file_uri: String,
}

/// Transcription service output, reduced to the parts the subtitle
/// formatter needs.
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptDocument {
    pub results: TranscriptResults,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptResults {
    pub audio_segments: Vec<AudioSegment>,
}

/// One timed segment of the result. The service is inconsistent about
/// numeric types: segment times arrive as numbers or as numeric strings
/// depending on the producer, and both must parse.
#[derive(Debug, Clone, Deserialize)]
pub struct AudioSegment {
    #[serde(deserialize_with = "seconds_from_number_or_string")]
    pub start_time: f64,
    #[serde(deserialize_with = "seconds_from_number_or_string")]
    pub end_time: f64,
    pub transcript: String,
}

impl TranscriptDocument {
    /// The document's segments in their stored order, ready for the
    /// formatter.
    pub fn segments(&self) -> Vec<TranscriptSegment> {
        self.results
            .audio_segments
            .iter()
            .map(|segment| TranscriptSegment {
                start_time: segment.start_time,
                end_time: segment.end_time,
                transcript: segment.transcript.clone(),
            })
            .collect()
    }
}

fn seconds_from_number_or_string<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(f64),
        Text(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(value) => Ok(value),
        NumberOrString::Text(text) => text.trim().parse::<f64>().map_err(serde::de::Error::custom),
    }
}
