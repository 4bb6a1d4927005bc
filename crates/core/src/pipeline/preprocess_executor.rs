use std::path::PathBuf;

use crate::preprocessing::domain::frame_preprocessor::{FramePreprocessor, PreprocessedFrame};
use crate::shared::error::PipelineError;

/// Runs a [`FramePreprocessor`] over one batch of paths.
///
/// Implementations may preprocess in any order or in parallel, but the
/// returned frames must line up index-for-index with `paths`. If any path
/// fails, the whole call fails and no frames are returned.
pub trait PreprocessExecutor: Send + Sync {
    fn run(
        &self,
        paths: &[PathBuf],
        preprocessor: &dyn FramePreprocessor,
    ) -> Result<Vec<PreprocessedFrame>, PipelineError>;
}

/// Preprocesses on the calling thread, in order, stopping at the first error.
pub struct SequentialPreprocessExecutor;

impl PreprocessExecutor for SequentialPreprocessExecutor {
    fn run(
        &self,
        paths: &[PathBuf],
        preprocessor: &dyn FramePreprocessor,
    ) -> Result<Vec<PreprocessedFrame>, PipelineError> {
        paths.iter().map(|p| preprocessor.preprocess(p)).collect()
    }
}
