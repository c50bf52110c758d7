use std::path::{Path, PathBuf};

use tokio::{fs, io::AsyncWriteExt, process::Command};
use tracing::{debug, info, warn};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::{
    cache::get_model_dir,
    error::{Result, SubburnError},
    format::to_srt,
    model::ModelSize,
    style::SubtitleStyle,
    types::{Segment, SubtitleEntry, Transcript},
};

/// Make sure the GGML model for `model` is in the cache, downloading it if needed
pub async fn ensure_model(cache_dir: &Path, model: ModelSize) -> Result<PathBuf> {
    let model_dir = get_model_dir(cache_dir);
    if !model_dir.exists() {
        fs::create_dir_all(&model_dir).await?;
    }

    let model_path = model_dir.join(model.file_name());
    if model_path.exists() {
        debug!(path = %model_path.display(), "model already cached");
        return Ok(model_path);
    }

    let url = model.download_url();
    info!(%url, "downloading whisper model");
    download_file(&reqwest::Client::new(), &url, &model_path).await?;

    Ok(model_path)
}

/// Stream `url` to `dest` through a `.part` file, renamed into place when complete.
///
/// The partial file is removed if the download fails, so an interrupted
/// download is never mistaken for a finished one.
pub(crate) async fn download_file(
    client: &reqwest::Client,
    url: &str,
    dest: &Path,
) -> Result<()> {
    let mut partial_name = dest.as_os_str().to_os_string();
    partial_name.push(".part");
    let partial_path = PathBuf::from(partial_name);

    if let Err(e) = stream_to_file(client, url, &partial_path).await {
        if let Err(remove_err) = fs::remove_file(&partial_path).await
            && remove_err.kind() != std::io::ErrorKind::NotFound
        {
            warn!(path = %partial_path.display(), "failed to remove partial download: {}", remove_err);
        }
        return Err(e);
    }

    fs::rename(&partial_path, dest).await?;
    Ok(())
}

async fn stream_to_file(client: &reqwest::Client, url: &str, path: &Path) -> Result<()> {
    let mut response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(SubburnError::ModelDownloadFailed {
            url: url.to_string(),
            reason: format!("server answered {}", response.status()),
        });
    }

    let mut file = fs::File::create(path).await?;
    let mut written: u64 = 0;
    while let Some(chunk) = response.chunk().await? {
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    debug!(bytes = written, path = %path.display(), "download complete");

    Ok(())
}

/// Extract 16 kHz mono PCM audio from video using ffmpeg
pub async fn extract_audio(video_path: &Path, audio_path: &Path) -> Result<()> {
    debug!(video = %video_path.display(), audio = %audio_path.display(), "extracting audio");
    let output = Command::new("ffmpeg")
        .arg("-y")
        .arg("-i")
        .arg(video_path)
        .arg("-vn")
        .arg("-acodec")
        .arg("pcm_s16le")
        .arg("-ar")
        .arg("16000")
        .arg("-ac")
        .arg("1")
        .arg(audio_path)
        .output()
        .await?;

    if !output.status.success() {
        return Err(SubburnError::AudioExtractionFailed {
            video_path: video_path.to_path_buf(),
            reason: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    Ok(())
}

/// Transcribe a 16 kHz mono WAV with the given whisper model.
///
/// Blocking. The model is loaded for this call only and freed on return.
pub fn transcribe_audio(audio_path: &Path, model_path: &Path) -> Result<Transcript> {
    let failed = |reason: String| SubburnError::TranscriptFailed {
        audio_path: audio_path.to_path_buf(),
        reason,
    };

    let mut reader = hound::WavReader::open(audio_path).map_err(|e| failed(e.to_string()))?;
    let samples: Vec<f32> = reader
        .samples::<i16>()
        .map(|s| s.map(|s| s as f32 / i16::MAX as f32))
        .collect::<std::result::Result<_, _>>()
        .map_err(|e| failed(e.to_string()))?;
    debug!(
        samples = samples.len(),
        seconds = samples.len() as f64 / 16000.0,
        "loaded audio"
    );

    let model_path_str = model_path
        .to_str()
        .ok_or_else(|| failed(format!("model path is not UTF-8: {}", model_path.display())))?;
    let ctx_params = WhisperContextParameters {
        use_gpu: cfg!(feature = "cuda"),
        ..Default::default()
    };
    let ctx = WhisperContext::new_with_params(model_path_str, ctx_params)
        .map_err(|e| failed(format!("failed to load model: {e}")))?;

    let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 5 });
    params.set_print_progress(false);
    params.set_print_realtime(false);
    params.set_print_special(false);
    params.set_print_timestamps(false);

    let mut state = ctx
        .create_state()
        .map_err(|e| failed(format!("failed to create state: {e}")))?;
    state
        .full(params, &samples)
        .map_err(|e| failed(format!("failed to run model: {e}")))?;

    let mut text = String::new();
    let mut segments: Vec<Segment> = Vec::new();

    for segment in state.as_iter() {
        // Multibyte characters split across segments decode lossily instead
        // of dropping the whole caption
        let seg_text = match segment.to_str_lossy() {
            Ok(s) => s,
            Err(e) => {
                warn!(
                    start = segment.start_timestamp(),
                    end = segment.end_timestamp(),
                    "skipping unreadable segment: {}",
                    e
                );
                continue;
            }
        };
        let seg = segment_from_centiseconds(
            segment.start_timestamp(),
            segment.end_timestamp(),
            &seg_text,
        );
        text.push_str(&seg.text);
        segments.push(seg);
    }

    let language_index = state.full_lang_id_from_state();
    let language = whisper_rs::get_lang_str(language_index).unwrap_or("unknown");

    info!(segments = segments.len(), language, "transcription complete");

    Ok(Transcript {
        language: language.to_string(),
        segments,
        text,
    })
}

/// Build a segment from whisper's centisecond timestamps
fn segment_from_centiseconds(start: i64, end: i64, text: &str) -> Segment {
    Segment {
        start: start as f64 / 100.0,
        end: end as f64 / 100.0,
        text: text.to_string(),
    }
}

/// Load a transcript from a cached file
pub async fn load_transcript(path: &Path) -> Result<Transcript> {
    let json_content = fs::read_to_string(path).await?;
    let transcript: Transcript = serde_json::from_str(&json_content)?;
    Ok(transcript)
}

/// Save a transcript to a file, creating parent directories
pub async fn save_transcript(transcript: &Transcript, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let pretty_json = serde_json::to_string_pretty(transcript)?;
    fs::write(path, &pretty_json).await?;
    Ok(())
}

/// Serialize entries as SRT and write them (UTF-8) to `path`
pub async fn write_srt(entries: &[SubtitleEntry], path: &Path) -> Result<()> {
    fs::write(path, to_srt(entries)).await?;
    debug!(path = %path.display(), entries = entries.len(), "wrote subtitles");
    Ok(())
}

/// Burn subtitles into the video frames using ffmpeg, copying audio unchanged
pub async fn burn_subtitles(
    input_video: &Path,
    srt_path: &Path,
    output_video: &Path,
    style: &SubtitleStyle,
) -> Result<()> {
    let filter = style.subtitles_filter(srt_path);
    debug!(%filter, "burning subtitles");

    let output = Command::new("ffmpeg")
        .arg("-y")
        .arg("-i")
        .arg(input_video)
        .arg("-vf")
        .arg(&filter)
        .arg("-c:a")
        .arg("copy")
        .arg(output_video)
        .output()
        .await?;

    if !output.status.success() {
        return Err(SubburnError::RenderFailed {
            video_path: output_video.to_path_buf(),
            reason: String::from_utf8_lossy(&output.stderr).to_string(),
        });
    }

    Ok(())
}
