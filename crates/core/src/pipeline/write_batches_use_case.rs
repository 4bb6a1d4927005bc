use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use crate::batching::domain::batch_layout::{batch_path, partition, stack_frames};
use crate::batching::domain::batch_manifest::BatchManifest;
use crate::batching::domain::batch_writer::BatchWriter;
use crate::batching::infrastructure::npy_batch_writer::NpyBatchWriter;
use crate::pipeline::infrastructure::threaded_preprocess_executor::ThreadedPreprocessExecutor;
use crate::pipeline::pipeline_logger::{NullPipelineLogger, PipelineLogger};
use crate::pipeline::preprocess_executor::PreprocessExecutor;
use crate::preprocessing::domain::frame_preprocessor::FramePreprocessor;
use crate::preprocessing::infrastructure::resize_normalize_preprocessor::ResizeNormalizePreprocessor;
use crate::shared::config::BatchConfig;
use crate::shared::constants::MANIFEST_FILE_NAME;
use crate::shared::error::PipelineError;

/// Preprocesses sampled frames in fixed-size groups and persists each group
/// as one stacked array file, followed by a manifest.
///
/// Groups are handled one after another; frames within a group go through
/// the executor. A group with any failing frame writes nothing and stops
/// the run with [`PipelineError::Batch`].
pub struct WriteBatchesUseCase {
    preprocessor: Box<dyn FramePreprocessor>,
    executor: Box<dyn PreprocessExecutor>,
    batch_writer: Box<dyn BatchWriter>,
    batch_size: usize,
    logger: Box<dyn PipelineLogger>,
}

impl WriteBatchesUseCase {
    pub fn new(
        preprocessor: Box<dyn FramePreprocessor>,
        executor: Box<dyn PreprocessExecutor>,
        batch_writer: Box<dyn BatchWriter>,
        batch_size: usize,
        logger: Option<Box<dyn PipelineLogger>>,
    ) -> Result<Self, PipelineError> {
        if batch_size == 0 {
            return Err(PipelineError::Config("batch size must be >= 1".into()));
        }
        Ok(Self {
            preprocessor,
            executor,
            batch_writer,
            batch_size,
            logger: logger.unwrap_or_else(|| Box::new(NullPipelineLogger)),
        })
    }

    /// Builds the resize/normalize → threaded → `.npy` stack from `config`.
    pub fn from_config(
        config: &BatchConfig,
        logger: Option<Box<dyn PipelineLogger>>,
    ) -> Result<Self, PipelineError> {
        config.validate()?;
        Self::new(
            Box::new(ResizeNormalizePreprocessor::new(config.output_size)?),
            Box::new(ThreadedPreprocessExecutor::new(config.workers)?),
            Box::new(NpyBatchWriter::new()),
            config.batch_size,
            logger,
        )
    }

    /// Returns the written batch files in batch-index order.
    pub fn execute(
        &mut self,
        frame_paths: &[PathBuf],
        output_dir: &Path,
    ) -> Result<Vec<PathBuf>, PipelineError> {
        fs::create_dir_all(output_dir).map_err(|e| PipelineError::write(output_dir, e))?;

        let (height, width, channels) = self.preprocessor.output_shape();
        let mut manifest =
            BatchManifest::new(self.batch_size, (width as u32, height as u32), channels);
        let total_batches = frame_paths.len().div_ceil(self.batch_size);
        let mut written = Vec::with_capacity(total_batches);

        for (batch_index, group) in partition(frame_paths, self.batch_size) {
            let path = self
                .write_batch(batch_index, group, output_dir)
                .map_err(|e| PipelineError::Batch {
                    batch_index,
                    source: Box::new(e),
                })?;
            manifest.record(batch_index, &path, group);
            written.push(path);
            self.logger.progress("batches", batch_index + 1, total_batches);
        }

        let manifest_path = output_dir.join(MANIFEST_FILE_NAME);
        manifest
            .save(&manifest_path)
            .map_err(|e| PipelineError::write(&manifest_path, e))?;

        self.logger.info(&format!(
            "Wrote {} batch(es) of up to {} frame(s) to {}",
            written.len(),
            self.batch_size,
            output_dir.display()
        ));
        Ok(written)
    }

    pub fn logger(&self) -> &dyn PipelineLogger {
        self.logger.as_ref()
    }

    fn write_batch(
        &mut self,
        batch_index: usize,
        group: &[PathBuf],
        output_dir: &Path,
    ) -> Result<PathBuf, PipelineError> {
        let path = batch_path(output_dir, batch_index);

        let start = Instant::now();
        let frames = self.executor.run(group, self.preprocessor.as_ref())?;
        self.logger.timing("preprocess", elapsed_ms(start));

        let expected = self.preprocessor.output_shape();
        let misshapen = frames.iter().zip(group).find(|(f, _)| f.dim() != expected);
        if let Some((frame, frame_path)) = misshapen {
            return Err(PipelineError::decode(
                frame_path,
                format!(
                    "preprocessed to shape {:?}, expected {expected:?}",
                    frame.dim()
                ),
            ));
        }
        // Shapes agree, so stacking only fails on an empty group.
        let batch = stack_frames(&frames).map_err(|e| PipelineError::decode(&path, e))?;

        let start = Instant::now();
        self.batch_writer
            .write(&path, &batch)
            .map_err(|e| PipelineError::write(&path, e))?;
        self.logger.timing("save_batch", elapsed_ms(start));
        self.logger.metric("batch_frames", group.len() as f64);

        log::debug!(
            "Wrote {} ({} frame(s), shape {:?})",
            path.display(),
            group.len(),
            batch.shape()
        );
        Ok(path)
    }
}

/// Preprocesses `frame_paths` into `output_dir` with the default
/// resize/normalize, threaded and `.npy` components.
pub fn write_batches(
    frame_paths: &[PathBuf],
    output_dir: &Path,
    config: &BatchConfig,
) -> Result<Vec<PathBuf>, PipelineError> {
    WriteBatchesUseCase::from_config(config, None)?.execute(frame_paths, output_dir)
}

fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}
