//! SRT subtitle synthesis from timed transcript segments.

/// One timed piece of transcript, in seconds from the start of the media.
#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptSegment {
    pub start_time: f64,
    pub end_time: f64,
    pub transcript: String,
}

/// Render a second count as an SRT timestamp, `H:MM:SS,mmm`.
///
/// Hours are unpadded, minutes and seconds zero-padded to two digits,
/// milliseconds to three. Sub-millisecond precision is truncated toward
/// zero, never rounded; existing subtitle files depend on the exact digits.
pub fn format_time(seconds: f64) -> String {
    let whole = seconds as u64;
    let millis = ((seconds - whole as f64) * 1000.0) as u64;

    let hours = whole / 3600;
    let minutes = (whole % 3600) / 60;
    let secs = whole % 60;

    format!("{hours}:{minutes:02}:{secs:02},{millis:03}")
}

/// Generate an SRT document from segments in caller order.
///
/// Cue indices are positional and 1-based; the caller's order is trusted as
/// given and never re-sorted or validated. Every cue, including the last,
/// ends with the blank-line separator. An empty segment list produces an
/// empty document.
pub fn generate_srt(segments: &[TranscriptSegment]) -> String {
    let mut srt = String::new();

    for (index, segment) in segments.iter().enumerate() {
        srt.push_str(&(index + 1).to_string());
        srt.push('\n');
        srt.push_str(&format_time(segment.start_time));
        srt.push_str(" --> ");
        srt.push_str(&format_time(segment.end_time));
        srt.push('\n');
        srt.push_str(&segment.transcript);
        srt.push_str("\n\n");
    }

    srt
}
