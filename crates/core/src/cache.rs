use std::{
    hash::{DefaultHasher, Hash, Hasher},
    path::{Path, PathBuf},
    time::UNIX_EPOCH,
};

use crate::{error::Result, model::ModelSize};

pub fn get_root_cache_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("/tmp"))
        .join("subburn")
}

pub fn get_model_dir(cache_dir: &Path) -> PathBuf {
    cache_dir.join("models")
}

/// Get the cache directory for an input video.
///
/// Keyed by canonical path, size and modification time, so editing or
/// replacing the video invalidates its cached transcript.
pub fn get_input_cache_dir(cache_dir: &Path, input: &Path) -> Result<PathBuf> {
    let canonical = input.canonicalize()?;
    let metadata = std::fs::metadata(&canonical)?;
    let modified = metadata
        .modified()
        .ok()
        .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
        .map(|d| d.as_nanos())
        .unwrap_or(0);

    let mut hasher = DefaultHasher::new();
    canonical.hash(&mut hasher);
    metadata.len().hash(&mut hasher);
    modified.hash(&mut hasher);

    Ok(cache_dir.join(hasher.finish().to_string()))
}

/// Get the path for a cached transcript (model aware)
pub fn get_transcript_path(input_cache_dir: &Path, model: ModelSize) -> PathBuf {
    input_cache_dir.join(format!("transcript_{}.json", model.name()))
}
