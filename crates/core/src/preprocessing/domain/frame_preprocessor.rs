use std::path::Path;

use ndarray::Array3;

use crate::shared::error::PipelineError;

/// A frame ready for batching: `(height, width, channels)`, values in `[0, 1]`.
pub type PreprocessedFrame = Array3<f32>;

/// Turns one sampled image file into a fixed-shape normalized array.
///
/// Implementations are shared across worker threads and must not keep
/// per-call state.
pub trait FramePreprocessor: Send + Sync {
    /// Loads and transforms the image at `path`.
    ///
    /// Unreadable or undecodable files yield [`PipelineError::Decode`].
    fn preprocess(&self, path: &Path) -> Result<PreprocessedFrame, PipelineError>;

    /// Shape of every array returned by [`Self::preprocess`].
    fn output_shape(&self) -> (usize, usize, usize);
}
