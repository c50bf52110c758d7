//! Subburn Core Library
//!
//! Transcribes a video with Whisper, reflows the transcript into subtitle
//! entries of bounded length, and burns them into the video with ffmpeg.

pub mod cache;
pub mod color;
pub mod error;
pub mod format;
pub mod model;
pub mod pipeline;
pub mod reflow;
pub mod style;
pub mod types;

// Re-export commonly used items at crate root
pub use cache::{get_input_cache_dir, get_model_dir, get_root_cache_dir, get_transcript_path};
pub use color::hex_to_ffmpeg_color;
pub use error::{Result, SubburnError};
pub use format::{format_elapsed, format_srt_timestamp, to_srt};
pub use model::ModelSize;
pub use pipeline::{
    burn_subtitles, ensure_model, extract_audio, load_transcript, save_transcript,
    transcribe_audio, write_srt,
};
pub use reflow::{reflow_segments, validate_max_words};
pub use style::SubtitleStyle;
pub use types::{Segment, SubtitleEntry, Transcript};
