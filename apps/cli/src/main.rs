use std::{
    ffi::{CStr, c_char, c_void},
    path::{Path, PathBuf},
    time::{Duration, Instant},
};

use anyhow::{Result, bail};
use clap::{Parser, ValueEnum};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use subburn_core::{
    ModelSize, SubtitleEntry, SubtitleStyle, burn_subtitles, ensure_model, extract_audio,
    format_elapsed, get_input_cache_dir, get_root_cache_dir, get_transcript_path,
    load_transcript, reflow_segments, save_transcript, transcribe_audio, validate_max_words,
    write_srt,
};

/// CLI wrapper for ModelSize (needed for clap ValueEnum)
#[derive(Clone, Copy, Default, ValueEnum)]
enum CliModelSize {
    Tiny,
    #[default]
    Base,
    Small,
    Medium,
    Large,
}

impl From<CliModelSize> for ModelSize {
    fn from(cli: CliModelSize) -> Self {
        match cli {
            CliModelSize::Tiny => ModelSize::Tiny,
            CliModelSize::Base => ModelSize::Base,
            CliModelSize::Small => ModelSize::Small,
            CliModelSize::Medium => ModelSize::Medium,
            CliModelSize::Large => ModelSize::Large,
        }
    }
}

#[derive(Parser)]
#[command(name = "subburn", version)]
#[command(about = "Transcribe a video with Whisper and burn time-synced subtitles into it")]
struct Cli {
    /// Input video
    #[arg(short, long)]
    input: PathBuf,

    /// Output video
    #[arg(short, long)]
    output: PathBuf,

    /// Maximum number of words per subtitle entry
    #[arg(long, alias = "max_words", default_value_t = 10)]
    max_words: usize,

    /// Font colour as hex (e.g. "#FFFFFF")
    #[arg(long, alias = "font_color", default_value = "#FFFFFF")]
    font_color: String,

    /// Font size
    #[arg(long, alias = "font_size", default_value_t = 24)]
    font_size: u32,

    /// Font name
    #[arg(long, alias = "font_name", default_value = "Arial")]
    font_name: String,

    /// Outline thickness
    #[arg(long, default_value_t = 1)]
    outline: u32,

    /// Outline colour as hex (e.g. "#000000")
    #[arg(long, alias = "outline_color", default_value = "#000000")]
    outline_color: String,

    /// Whisper model size
    #[arg(short, long, alias = "model_size", default_value = "base")]
    model_size: CliModelSize,

    /// Where models and cached transcripts are kept
    #[arg(long, env = "SUBBURN_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// Also save the generated SRT file here
    #[arg(long)]
    keep_srt: Option<PathBuf>,

    /// Re-transcribe even if a cached transcript exists
    #[arg(short, long)]
    force: bool,

    /// Replace the output video if it already exists
    #[arg(long)]
    overwrite: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn subtitle_style(&self) -> SubtitleStyle {
        SubtitleStyle {
            font_name: self.font_name.clone(),
            font_size: self.font_size,
            primary_color: self.font_color.clone(),
            outline: self.outline,
            outline_color: self.outline_color.clone(),
        }
    }
}

fn create_spinner(msg: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
            .template("{spinner:.cyan} {msg}")?,
    );
    pb.set_message(msg.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    Ok(pb)
}

fn elapsed_tag(start: Instant) -> String {
    style(format!("[{}]", format_elapsed(start.elapsed())))
        .dim()
        .to_string()
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

extern "C" fn whisper_log_callback(
    _level: u32,
    message: *const c_char,
    _user_data: *mut c_void,
) {
    if message.is_null() {
        return;
    }
    // SAFETY: whisper.cpp hands us a NUL-terminated string valid for this call
    let message = unsafe { CStr::from_ptr(message) }.to_string_lossy();
    tracing::trace!(target: "whisper", "{}", message.trim_end());
}

/// Write `entries` to a temporary SRT in `temp_dir` and burn it into the video.
///
/// The temporary file is removed whether or not rendering succeeds.
async fn burn_with_temp_srt(
    entries: &[SubtitleEntry],
    temp_dir: &Path,
    input: &Path,
    output: &Path,
    subtitle_style: &SubtitleStyle,
    keep_srt: Option<&Path>,
) -> Result<()> {
    let srt_file = tempfile::Builder::new()
        .prefix("subburn-")
        .suffix(".srt")
        .tempfile_in(temp_dir)?;
    write_srt(entries, srt_file.path()).await?;
    if let Some(keep_srt) = keep_srt {
        tokio::fs::copy(srt_file.path(), keep_srt).await?;
    }

    burn_subtitles(input, srt_file.path(), output, subtitle_style).await?;

    if let Err(e) = srt_file.close() {
        warn!("Failed to remove temporary subtitle file: {}", e);
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    // Reject bad configuration before any slow step starts
    let max_words = validate_max_words(cli.max_words)?;
    let subtitle_style = cli.subtitle_style();
    subtitle_style.validate()?;

    if !cli.input.is_file() {
        bail!("Input video not found: {}", cli.input.display());
    }
    if cli.output.exists() && !cli.overwrite {
        bail!(
            "{} already exists (pass --overwrite to replace it)",
            cli.output.display()
        );
    }

    let model: ModelSize = cli.model_size.into();
    let cache_dir = cli.cache_dir.clone().unwrap_or_else(get_root_cache_dir);

    println!(
        "\n{}  {}\n",
        style("subburn").cyan().bold(),
        style("Subtitle Burner").dim()
    );

    let total_start = Instant::now();

    // Step 1: Transcribe (check cache)
    let input_cache_dir = get_input_cache_dir(&cache_dir, &cli.input)?;
    let transcript_path = get_transcript_path(&input_cache_dir, model);
    let transcript = if !cli.force && transcript_path.exists() {
        let transcript = load_transcript(&transcript_path).await?;
        println!(
            "{} Transcribed: {:.1} min, {} {}",
            style("✓").green().bold(),
            transcript.duration() / 60.0,
            style(&transcript.language).yellow(),
            style("(cached)").dim()
        );
        transcript
    } else {
        let step_start = Instant::now();
        let spinner = create_spinner(&format!("Preparing {} model...", model))?;
        let model_path = ensure_model(&cache_dir, model).await?;
        spinner.finish_with_message(format!(
            "{} Model ready: {} {}",
            style("✓").green().bold(),
            style(model.file_name()).dim(),
            elapsed_tag(step_start)
        ));

        // Removed together with the WAV when this block ends
        let audio_dir = tempfile::tempdir()?;
        let audio_path = audio_dir.path().join("audio.wav");

        let step_start = Instant::now();
        let spinner = create_spinner("Extracting audio...")?;
        extract_audio(&cli.input, &audio_path).await?;
        spinner.finish_with_message(format!(
            "{} Audio extracted {}",
            style("✓").green().bold(),
            elapsed_tag(step_start)
        ));

        let step_start = Instant::now();
        let spinner = create_spinner("Transcribing with Whisper...")?;
        let transcript =
            tokio::task::spawn_blocking(move || transcribe_audio(&audio_path, &model_path))
                .await??;
        save_transcript(&transcript, &transcript_path).await?;
        spinner.finish_with_message(format!(
            "{} Transcribed: {:.1} min, {} {}",
            style("✓").green().bold(),
            transcript.duration() / 60.0,
            style(&transcript.language).yellow(),
            elapsed_tag(step_start)
        ));

        if let Err(e) = audio_dir.close() {
            warn!("Failed to remove temporary audio: {}", e);
        }
        transcript
    };

    // Step 2: Reflow into subtitle entries
    let entries = reflow_segments(&transcript.segments, max_words.get())?;
    println!(
        "{} Subtitles: {} entries, max {} words",
        style("✓").green().bold(),
        entries.len(),
        max_words
    );

    // Step 3: Burn in
    let step_start = Instant::now();
    let spinner = create_spinner("Burning subtitles into video...")?;
    burn_with_temp_srt(
        &entries,
        &std::env::temp_dir(),
        &cli.input,
        &cli.output,
        &subtitle_style,
        cli.keep_srt.as_deref(),
    )
    .await?;
    spinner.finish_with_message(format!(
        "{} Subtitles burned in {}",
        style("✓").green().bold(),
        elapsed_tag(step_start)
    ));

    println!(
        "\n{} {}",
        style("Total time:").dim(),
        style(format_elapsed(total_start.elapsed())).cyan().bold()
    );
    println!(
        "{} {}\n",
        style("Saved:").dim(),
        style(cli.output.display()).cyan()
    );

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    unsafe {
        whisper_rs::set_log_callback(Some(whisper_log_callback), std::ptr::null_mut());
    }

    // Temporary files are dropped inside `run`, before the process exits
    if let Err(e) = run(cli).await {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}
