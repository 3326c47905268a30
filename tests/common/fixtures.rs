//! Test fixture creation for the filesystem-backed object store and the
//! JSON payloads the adapters consume.

use std::sync::Arc;

use tempfile::TempDir;
use transcriber_pipeline::{FsObjectStore, ObjectStore};

/// Temp-dir-backed object store living for the duration of one test.
pub struct TestStore {
    // Held so the directory outlives the store.
    _temp_dir: TempDir,
    pub store: Arc<FsObjectStore>,
}

impl TestStore {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let store = Arc::new(FsObjectStore::new(temp_dir.path()));
        Self {
            _temp_dir: temp_dir,
            store,
        }
    }

    /// The store as the trait object the processors take.
    pub fn store(&self) -> Arc<dyn ObjectStore> {
        self.store.clone()
    }
}

/// Upload-notification payload in the storage service's envelope.
pub fn upload_event(bucket: &str, key: &str, time: &str) -> String {
    serde_json::json!({
        "time": time,
        "detail": {
            "bucket": {"name": bucket},
            "object": {"key": key}
        }
    })
    .to_string()
}

/// Job-status payload pointing at a finished transcript document.
pub fn job_status_event(transcript_uri: &str) -> String {
    serde_json::json!({
        "jobStatus": {
            "TranscriptionJob": {
                "Transcript": {"TranscriptFileUri": transcript_uri}
            }
        }
    })
    .to_string()
}

/// Transcript document with the given `(start, end, text)` segments.
pub fn transcript_document(segments: &[(f64, f64, &str)]) -> String {
    let audio_segments: Vec<serde_json::Value> = segments
        .iter()
        .map(|(start_time, end_time, transcript)| {
            serde_json::json!({
                "start_time": start_time,
                "end_time": end_time,
                "transcript": transcript
            })
        })
        .collect();

    serde_json::json!({"results": {"audio_segments": audio_segments}}).to_string()
}
