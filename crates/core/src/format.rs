use std::fmt::Write;

use crate::types::SubtitleEntry;

/// Format seconds as an SRT timestamp (`HH:MM:SS,mmm`).
///
/// `seconds` must be non-negative; callers get that for free from
/// [`reflow_segments`](crate::reflow::reflow_segments), which rejects segments
/// starting before zero. Milliseconds are truncated, never rounded, so
/// `59.9995` formats as `00:00:59,999` rather than carrying into the next
/// second. Hours widen past two digits after 99 hours.
pub fn format_srt_timestamp(seconds: f64) -> String {
    debug_assert!(seconds >= 0.0, "negative timestamp: {seconds}");

    let hours = (seconds / 3600.0) as u64;
    let minutes = ((seconds % 3600.0) / 60.0) as u64;
    let secs = seconds % 60.0;
    let millis = (secs.fract() * 1000.0) as u64;
    format!(
        "{:02}:{:02}:{:02},{:03}",
        hours, minutes, secs as u64, millis
    )
}

/// Render subtitle entries as an SRT document, in the order given
pub fn to_srt(entries: &[SubtitleEntry]) -> String {
    let mut output = String::new();
    for entry in entries {
        // Writing into a String cannot fail
        let _ = write!(
            output,
            "{}\n{} --> {}\n{}\n\n",
            entry.index,
            format_srt_timestamp(entry.start),
            format_srt_timestamp(entry.end),
            entry.text
        );
    }
    output
}

/// Format a wall-clock duration for progress output
pub fn format_elapsed(d: std::time::Duration) -> String {
    let secs = d.as_secs_f64();
    if secs < 60.0 {
        format!("{:.1}s", secs)
    } else {
        format!("{:.0}m {:.0}s", (secs / 60.0).floor(), secs % 60.0)
    }
}
