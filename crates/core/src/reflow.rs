//! Reflow transcript segments into word-limited subtitle entries.
//!
//! Segments within the word limit pass through unchanged. Longer segments are
//! cut into `ceil(words / max_words)` groups that share the segment's time
//! span equally. Group ends are computed as `group_start + group_duration`
//! and never clamped, so the last group of a split segment may differ from
//! the segment's `end` by floating-point drift.

use std::num::NonZeroUsize;

use tracing::debug;

use crate::{
    error::{Result, SubburnError},
    types::{Segment, SubtitleEntry},
};

/// Check a max-words setting before any work is done with it
pub fn validate_max_words(max_words: usize) -> Result<NonZeroUsize> {
    NonZeroUsize::new(max_words).ok_or(SubburnError::InvalidMaxWords { max_words })
}

/// Split segments into subtitle entries of at most `max_words` words each.
///
/// Entries are numbered from 1 across the whole output. Fails with
/// [`SubburnError::InvalidMaxWords`] for `max_words == 0` and with
/// [`SubburnError::MalformedSegment`] for a segment that starts before zero,
/// has non-finite times, or ends before it starts. Both checks run before
/// any entry is produced.
///
/// A segment whose text is blank still yields one entry with empty text.
pub fn reflow_segments(segments: &[Segment], max_words: usize) -> Result<Vec<SubtitleEntry>> {
    let max_words = validate_max_words(max_words)?.get();
    validate_segments(segments)?;

    let mut entries = Vec::with_capacity(segments.len());
    for segment in segments {
        let words: Vec<&str> = segment.text.split_whitespace().collect();

        if words.len() <= max_words {
            push_entry(&mut entries, segment.start, segment.end, &words);
            continue;
        }

        let n_groups = words.len().div_ceil(max_words);
        let group_duration = (segment.end - segment.start) / n_groups as f64;
        debug!(
            words = words.len(),
            groups = n_groups,
            start = segment.start,
            end = segment.end,
            "splitting segment"
        );

        for (i, group) in words.chunks(max_words).enumerate() {
            let group_start = segment.start + i as f64 * group_duration;
            let group_end = group_start + group_duration;
            push_entry(&mut entries, group_start, group_end, group);
        }
    }

    Ok(entries)
}

fn validate_segments(segments: &[Segment]) -> Result<()> {
    for (position, segment) in segments.iter().enumerate() {
        let ok = segment.start.is_finite()
            && segment.end.is_finite()
            && segment.start >= 0.0
            && segment.end >= segment.start;
        if !ok {
            return Err(SubburnError::MalformedSegment {
                position,
                start: segment.start,
                end: segment.end,
            });
        }
    }
    Ok(())
}

fn push_entry(entries: &mut Vec<SubtitleEntry>, start: f64, end: f64, words: &[&str]) {
    entries.push(SubtitleEntry {
        index: entries.len() + 1,
        start,
        end,
        text: words.join(" "),
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seg(start: f64, end: f64, text: &str) -> Segment {
        Segment {
            start,
            end,
            text: text.to_string(),
        }
    }

    #[test]
    fn short_segment_passes_through() {
        let entries = reflow_segments(&[seg(1.0, 3.5, "  hello   there  ")], 10).unwrap();
        assert_eq!(
            entries,
            vec![SubtitleEntry {
                index: 1,
                start: 1.0,
                end: 3.5,
                text: "hello there".into(),
            }]
        );
    }

    #[test]
    fn exactly_max_words_is_not_split() {
        let entries = reflow_segments(&[seg(0.0, 2.0, "a b c")], 3).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].start, 0.0);
        assert_eq!(entries[0].end, 2.0);
        assert_eq!(entries[0].text, "a b c");
    }

    #[test]
    fn eleven_words_split_in_two() {
        let text = "one two three four five six seven eight nine ten eleven";
        let entries = reflow_segments(&[seg(0.0, 4.0, text)], 10).unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].text, "one two three four five six seven eight nine ten");
        assert_eq!((entries[0].start, entries[0].end), (0.0, 2.0));
        assert_eq!(entries[1].text, "eleven");
        assert_eq!((entries[1].start, entries[1].end), (2.0, 4.0));
    }

    #[test]
    fn groups_share_duration_equally() {
        let text = (1..=7).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        let entries = reflow_segments(&[seg(10.0, 13.0, &text)], 2).unwrap();

        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].start, 10.0);
        for entry in &entries {
            assert!((entry.end - entry.start - 0.75).abs() < 1e-9);
        }
        for pair in entries.windows(2) {
            assert!((pair[1].start - pair[0].end).abs() < 1e-9);
        }
        assert_eq!(entries[3].text, "w7");
    }

    #[test]
    fn indices_are_contiguous_across_segments() {
        let segments = vec![
            seg(0.0, 1.0, "a b c d e"),
            seg(1.0, 2.0, "f"),
            seg(2.0, 4.0, "g h i"),
        ];
        let entries = reflow_segments(&segments, 2).unwrap();
        let indices: Vec<usize> = entries.iter().map(|e| e.index).collect();
        assert_eq!(indices, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn blank_text_yields_empty_entry() {
        let entries = reflow_segments(&[seg(0.0, 1.0, "   ")], 5).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].text, "");
    }

    #[test]
    fn zero_duration_split_collapses_timestamps() {
        let entries = reflow_segments(&[seg(5.0, 5.0, "a b c d")], 1).unwrap();
        assert_eq!(entries.len(), 4);
        assert!(entries.iter().all(|e| e.start == 5.0 && e.end == 5.0));
    }

    #[test]
    fn zero_max_words_is_rejected() {
        let err = reflow_segments(&[seg(0.0, 1.0, "a")], 0).unwrap_err();
        assert!(matches!(err, SubburnError::InvalidMaxWords { max_words: 0 }));
    }

    #[test]
    fn backwards_segment_is_rejected() {
        let segments = vec![seg(0.0, 1.0, "fine"), seg(3.0, 2.0, "broken")];
        let err = reflow_segments(&segments, 10).unwrap_err();
        assert!(matches!(err, SubburnError::MalformedSegment { position: 1, .. }));
    }

    #[test]
    fn negative_or_nan_start_is_rejected() {
        assert!(reflow_segments(&[seg(-0.5, 1.0, "x")], 10).is_err());
        assert!(reflow_segments(&[seg(f64::NAN, 1.0, "x")], 10).is_err());
    }

    #[test]
    fn empty_input_yields_no_entries() {
        assert!(reflow_segments(&[], 10).unwrap().is_empty());
    }
}
