use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubburnError {
    #[error("Invalid max words per subtitle: {max_words} (must be at least 1)")]
    InvalidMaxWords { max_words: usize },

    #[error("Invalid subtitle style: {reason}")]
    InvalidStyle { reason: String },

    #[error("Malformed transcript segment #{position}: start={start}, end={end}")]
    MalformedSegment { position: usize, start: f64, end: f64 },

    #[error("Model download failed for {url}: {reason}")]
    ModelDownloadFailed { url: String, reason: String },

    #[error("Audio extraction failed for {video_path}: {reason}")]
    AudioExtractionFailed { video_path: PathBuf, reason: String },

    #[error("Transcription failed for {audio_path}: {reason}")]
    TranscriptFailed { audio_path: PathBuf, reason: String },

    #[error("Burning subtitles into {video_path} failed: {reason}")]
    RenderFailed { video_path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON parse error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    ApiError(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, SubburnError>;
