//! Deterministic naming for media objects and their transcription jobs.

use chrono::{DateTime, FixedOffset};
use chrono_tz::Tz;
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Media formats the downstream transcription service accepts.
// TODO aac
pub const SUPPORTED_FORMATS: &[&str] = &["mp3", "mp4", "wav", "flac", "ogg", "amr", "webm", "m4a"];

/// Job names in the downstream service cannot contain `/`.
const FOLDER_SEPARATOR: &str = "__";

/// Maximum number of significant characters in a job name; longer names are
/// truncated here and tagged with a hash of the full name.
const MAX_JOB_NAME_LEN: usize = 180;

/// The uploaded object's extension is not one the transcription service can
/// ingest. This is a permanent failure for the invocation, not a transient
/// one: retrying the same object can never succeed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported media format {extension:?}, supported formats: {}", SUPPORTED_FORMATS.join(", "))]
pub struct UnsupportedFormat {
    pub extension: String,
}

/// Durable names derived from one upload: the re-keyed media object, the
/// transcription job registered for it, and the key its result will land
/// under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobIdentity {
    /// Storage key the media object is moved to.
    pub media_key: String,
    /// Name the transcription job is registered under.
    pub job_name: String,
    /// Declared media format, the lowercased extension.
    pub media_format: String,
    /// Key the transcription result document should be written to.
    pub output_key: String,
}

/// Lowercased extension of a key: `"wav"` for `"talks/intro.WAV"`, empty
/// when the key has none.
pub fn file_extension(key: &str) -> String {
    std::path::Path::new(key)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default()
}

/// Derive the durable names for one upload.
///
/// The media key is `{sanitized_key}.uploaded-{timestamp}.{extension}` with
/// the timestamp rendered in `timezone` as `YYYY-MM-DD_HH-MM-SS`, so keys
/// sort by upload time and remain searchable. The job name substitutes `__`
/// for `/` and, when it exceeds 180 characters, is truncated and tagged with
/// [`hash8`] of the full untruncated name — a pure function of the name, so
/// concurrent invocations never need coordination to agree on it.
pub fn build_job_identity(
    sanitized_key: &str,
    upload_time: &DateTime<FixedOffset>,
    extension: &str,
    timezone: Tz,
) -> Result<JobIdentity, UnsupportedFormat> {
    if !SUPPORTED_FORMATS.contains(&extension) {
        return Err(UnsupportedFormat {
            extension: extension.to_string(),
        });
    }

    let datetime_suffix = upload_time
        .with_timezone(&timezone)
        .format("%Y-%m-%d_%H-%M-%S")
        .to_string();
    let media_key = format!("{sanitized_key}.uploaded-{datetime_suffix}.{extension}");

    let mut job_name = media_key.replace('/', FOLDER_SEPARATOR);
    if job_name.chars().count() > MAX_JOB_NAME_LEN {
        let truncated: String = job_name.chars().take(MAX_JOB_NAME_LEN).collect();
        job_name = format!("{truncated}-{}", hash8(&job_name));
    }

    let output_key = format!("{media_key}.transcription.json");

    Ok(JobIdentity {
        media_key,
        job_name,
        media_format: extension.to_string(),
        output_key,
    })
}

/// Deterministic decimal tag with 10^8 buckets: the SHA-256 digest of `s`
/// taken as a big-endian integer, reduced modulo 10^8. Rendered without
/// leading zeros, so the tag is at most eight digits but not always exactly
/// eight.
pub fn hash8(s: &str) -> String {
    let digest = Sha256::digest(s.as_bytes());
    let tag = digest
        .iter()
        .fold(0u64, |acc, &byte| ((acc << 8) | u64::from(byte)) % 100_000_000);
    tag.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upload_time(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension("talks/intro.WAV"), "wav");
        assert_eq!(file_extension("a/b.tar.gz"), "gz");
        assert_eq!(file_extension("noext"), "");
        assert_eq!(file_extension(""), "");
    }

    #[test]
    fn test_build_identity_golden() {
        let identity = build_job_identity(
            "Reunion_Final.WAV",
            &upload_time("2024-03-02T10:15:30+00:00"),
            "wav",
            chrono_tz::UTC,
        )
        .unwrap();

        assert_eq!(
            identity.media_key,
            "Reunion_Final.WAV.uploaded-2024-03-02_10-15-30.wav"
        );
        assert_eq!(
            identity.job_name,
            "Reunion_Final.WAV.uploaded-2024-03-02_10-15-30.wav"
        );
        assert_eq!(identity.media_format, "wav");
        assert_eq!(
            identity.output_key,
            "Reunion_Final.WAV.uploaded-2024-03-02_10-15-30.wav.transcription.json"
        );
    }

    #[test]
    fn test_job_name_replaces_separators() {
        let identity = build_job_identity(
            "inbox/2024/call.mp3",
            &upload_time("2024-03-02T10:15:30+00:00"),
            "mp3",
            chrono_tz::UTC,
        )
        .unwrap();

        assert!(!identity.job_name.contains('/'));
        assert_eq!(
            identity.job_name,
            "inbox__2024__call.mp3.uploaded-2024-03-02_10-15-30.mp3"
        );
        // The media key keeps its folder structure.
        assert_eq!(
            identity.media_key,
            "inbox/2024/call.mp3.uploaded-2024-03-02_10-15-30.mp3"
        );
    }

    #[test]
    fn test_timezone_shifts_suffix() {
        let identity = build_job_identity(
            "call.mp3",
            &upload_time("2024-03-02T10:15:30+00:00"),
            "mp3",
            chrono_tz::Europe::Budapest,
        )
        .unwrap();

        // Budapest is UTC+1 in March.
        assert_eq!(identity.media_key, "call.mp3.uploaded-2024-03-02_11-15-30.mp3");
    }

    #[test]
    fn test_long_job_name_truncated_and_tagged() {
        let long_key = "a".repeat(400);
        let identity = build_job_identity(
            &long_key,
            &upload_time("2024-03-02T10:15:30+00:00"),
            "mp3",
            chrono_tz::UTC,
        )
        .unwrap();

        let (prefix, tag) = identity.job_name.split_at(MAX_JOB_NAME_LEN);
        assert_eq!(prefix, &long_key[..MAX_JOB_NAME_LEN]);
        assert!(tag.starts_with('-'));
        let digits = &tag[1..];
        assert!(!digits.is_empty() && digits.len() <= 8);
        assert!(digits.parse::<u64>().unwrap() < 100_000_000);

        // At most 180 significant characters plus the tag.
        assert!(identity.job_name.chars().count() <= MAX_JOB_NAME_LEN + 1 + 8);
        // The media key is never truncated.
        assert!(identity.media_key.starts_with(&long_key));
    }

    #[test]
    fn test_truncation_is_deterministic() {
        let long_key = format!("meetings/{}", "x".repeat(300));
        let time = upload_time("2024-03-02T10:15:30+00:00");
        let first = build_job_identity(&long_key, &time, "mp3", chrono_tz::UTC).unwrap();
        let second = build_job_identity(&long_key, &time, "mp3", chrono_tz::UTC).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_distinct_long_names_get_distinct_tags() {
        let time = upload_time("2024-03-02T10:15:30+00:00");
        let base = "y".repeat(200);
        let first = build_job_identity(&format!("{base}1"), &time, "mp3", chrono_tz::UTC).unwrap();
        let second = build_job_identity(&format!("{base}2"), &time, "mp3", chrono_tz::UTC).unwrap();
        // Both truncate to the same 180-character prefix, so only the hash
        // tags keep the job names apart.
        assert_eq!(first.job_name[..180], second.job_name[..180]);
        assert_ne!(first.job_name, second.job_name);
    }

    #[test]
    fn test_unsupported_format_rejected() {
        let err = build_job_identity(
            "notes.aac",
            &upload_time("2024-03-02T10:15:30+00:00"),
            "aac",
            chrono_tz::UTC,
        )
        .unwrap_err();
        assert_eq!(err.extension, "aac");
        assert!(err.to_string().contains("mp3"));
    }

    #[test]
    fn test_empty_extension_rejected() {
        let err = build_job_identity(
            "noext",
            &upload_time("2024-03-02T10:15:30+00:00"),
            "",
            chrono_tz::UTC,
        )
        .unwrap_err();
        assert_eq!(err.extension, "");
    }

    #[test]
    fn test_hash8_is_stable() {
        let first = hash8("some-very-long-job-name");
        let second = hash8("some-very-long-job-name");
        assert_eq!(first, second);
        assert!(first.parse::<u64>().unwrap() < 100_000_000);
        assert_ne!(hash8("a"), hash8("b"));
    }
}
