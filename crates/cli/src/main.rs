use std::path::{Path, PathBuf};
use std::process;

use clap::Parser;

use framebatch_core::pipeline::extract_frames_use_case::ExtractFramesUseCase;
use framebatch_core::pipeline::pipeline_logger::StdoutPipelineLogger;
use framebatch_core::pipeline::write_batches_use_case::WriteBatchesUseCase;
use framebatch_core::shared::config::{default_workers, BatchConfig, ExtractionConfig};
use framebatch_core::shared::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_INTERVAL_SECS, DEFAULT_OUTPUT_SIZE,
};
use framebatch_core::video::infrastructure::ffmpeg_reader::FfmpegReader;
use framebatch_core::video::infrastructure::image_file_writer::ImageFileWriter;

/// Sample frames from a video and pack them into normalized `.npy` batches.
#[derive(Parser)]
#[command(name = "framebatch")]
struct Cli {
    /// Input video file.
    input: PathBuf,

    /// Directory for the sampled frame images.
    #[arg(long, default_value = "extracted_frames")]
    frames_dir: PathBuf,

    /// Directory for the batch files and manifest.
    #[arg(long, default_value = "preprocessed_batches")]
    batches_dir: PathBuf,

    /// Seconds of video between two sampled frames.
    #[arg(long, default_value_t = DEFAULT_INTERVAL_SECS)]
    interval: f64,

    /// Width of every preprocessed frame.
    #[arg(long, default_value_t = DEFAULT_OUTPUT_SIZE.0)]
    width: u32,

    /// Height of every preprocessed frame.
    #[arg(long, default_value_t = DEFAULT_OUTPUT_SIZE.1)]
    height: u32,

    /// Frames per batch file.
    #[arg(long, default_value_t = DEFAULT_BATCH_SIZE)]
    batch_size: usize,

    /// Worker threads used to preprocess a batch (default: all cores).
    #[arg(long)]
    workers: Option<usize>,

    /// Stop after writing the frame images.
    #[arg(long)]
    extract_only: bool,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let (extraction, batching) = build_configs(&cli);
    validate(&cli, &extraction, &batching)?;

    let frames = run_extraction(&cli.input, &cli.frames_dir, extraction)?;
    if cli.extract_only {
        return Ok(());
    }

    run_batching(&frames, &cli.batches_dir, &batching)?;
    Ok(())
}

fn run_extraction(
    input: &Path,
    frames_dir: &Path,
    config: ExtractionConfig,
) -> Result<Vec<PathBuf>, Box<dyn std::error::Error>> {
    let mut use_case = ExtractFramesUseCase::new(
        Box::new(FfmpegReader::new()),
        Box::new(ImageFileWriter::new()),
        config,
        Some(Box::new(StdoutPipelineLogger::default())),
    )?;
    let frames = use_case.execute(input, frames_dir)?;
    use_case.logger().summary();

    if frames.is_empty() {
        log::warn!("No frames decoded from {}", input.display());
    }
    Ok(frames)
}

fn run_batching(
    frames: &[PathBuf],
    batches_dir: &Path,
    config: &BatchConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut use_case =
        WriteBatchesUseCase::from_config(config, Some(Box::new(StdoutPipelineLogger::new(1))))?;
    let written = use_case.execute(frames, batches_dir)?;
    use_case.logger().summary();

    log::info!(
        "{} batch file(s) written to {}",
        written.len(),
        batches_dir.display()
    );
    Ok(())
}

fn build_configs(cli: &Cli) -> (ExtractionConfig, BatchConfig) {
    let extraction = ExtractionConfig {
        interval_secs: cli.interval,
    };
    let batching = BatchConfig {
        batch_size: cli.batch_size,
        output_size: (cli.width, cli.height),
        workers: cli.workers.unwrap_or_else(default_workers),
    };
    (extraction, batching)
}

fn validate(
    cli: &Cli,
    extraction: &ExtractionConfig,
    batching: &BatchConfig,
) -> Result<(), Box<dyn std::error::Error>> {
    if !cli.input.exists() {
        return Err(format!("Input file not found: {}", cli.input.display()).into());
    }
    if cli.frames_dir.is_file() {
        return Err(format!(
            "Frames directory is an existing file: {}",
            cli.frames_dir.display()
        )
        .into());
    }
    if !cli.extract_only && cli.batches_dir.is_file() {
        return Err(format!(
            "Batches directory is an existing file: {}",
            cli.batches_dir.display()
        )
        .into());
    }
    extraction.validate()?;
    batching.validate()?;
    Ok(())
}
