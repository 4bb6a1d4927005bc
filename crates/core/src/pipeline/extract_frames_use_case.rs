use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::extraction::domain::open_stream::OpenStream;
use crate::extraction::domain::sampling_policy::{frame_path, SamplingPolicy};
use crate::pipeline::pipeline_logger::{NullPipelineLogger, PipelineLogger};
use crate::shared::config::ExtractionConfig;
use crate::shared::error::PipelineError;
use crate::video::domain::image_writer::ImageWriter;
use crate::video::domain::video_reader::VideoReader;
use crate::video::infrastructure::ffmpeg_reader::FfmpegReader;
use crate::video::infrastructure::image_file_writer::ImageFileWriter;

/// Samples frames from a video and writes each one as an image file.
///
/// Decoding is sequential on the calling thread. The reader is closed when
/// `execute` returns, whatever the outcome, and may be reused for another
/// video afterwards.
pub struct ExtractFramesUseCase {
    reader: Box<dyn VideoReader>,
    image_writer: Box<dyn ImageWriter>,
    config: ExtractionConfig,
    logger: Box<dyn PipelineLogger>,
}

impl ExtractFramesUseCase {
    pub fn new(
        reader: Box<dyn VideoReader>,
        image_writer: Box<dyn ImageWriter>,
        config: ExtractionConfig,
        logger: Option<Box<dyn PipelineLogger>>,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self {
            reader,
            image_writer,
            config,
            logger: logger.unwrap_or_else(|| Box::new(NullPipelineLogger)),
        })
    }

    /// Returns the written frame paths in increasing frame-index order.
    ///
    /// The output directory (and parents) is created once the video has
    /// opened. An empty stream yields an empty list.
    pub fn execute(
        &mut self,
        video_path: &Path,
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, PipelineError> {
        let mut stream = OpenStream::open(self.reader.as_mut(), video_path)?;
        fs::create_dir_all(output_dir).map_err(|e| PipelineError::write(output_dir, e))?;

        let metadata = stream.metadata().clone();
        let policy = SamplingPolicy::from_rate(metadata.fps, self.config.interval_secs);
        if metadata.fps <= 0.0 {
            log::warn!(
                "{} reports no frame rate; sampling every frame",
                video_path.display()
            );
        }
        self.logger.info(&format!(
            "Sampling {} every {} frame(s) ({:.3} fps, {}s interval)",
            video_path.display(),
            policy.stride(),
            metadata.fps,
            self.config.interval_secs
        ));

        let mut saved = Vec::new();
        let mut decode_start = Instant::now();

        for (frame_index, frame_result) in stream.frames().enumerate() {
            let frame = frame_result.map_err(|e| PipelineError::decode(video_path, e))?;
            self.logger.timing("decode", elapsed_ms(decode_start));
            self.logger
                .progress("frames", frame_index + 1, metadata.total_frames);

            if policy.should_sample(frame_index) {
                let path = frame_path(output_dir, frame_index);
                let write_start = Instant::now();
                self.image_writer
                    .write(&path, &frame)
                    .map_err(|e| PipelineError::write(&path, e))?;
                self.logger.timing("write_frame", elapsed_ms(write_start));
                saved.push(path);
            }

            decode_start = Instant::now();
        }

        self.logger.info(&format!(
            "Saved {} frame(s) to {}",
            saved.len(),
            output_dir.display()
        ));
        Ok(saved)
    }

    pub fn logger(&self) -> &dyn PipelineLogger {
        self.logger.as_ref()
    }
}

/// Extracts frames from `video_path` into `output_dir` with the ffmpeg
/// reader and JPEG writer, sampling one frame every `interval_secs`.
pub fn extract_frames(
    video_path: &Path,
    output_dir: &Path,
    interval_secs: f64,
) -> Result<Vec<PathBuf>, PipelineError> {
    let mut use_case = ExtractFramesUseCase::new(
        Box::new(FfmpegReader::new()),
        Box::new(ImageFileWriter::new()),
        ExtractionConfig { interval_secs },
        None,
    )?;
    use_case.execute(video_path, output_dir)
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
