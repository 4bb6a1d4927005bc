use std::path::Path;

use ndarray::Array4;

use crate::shared::error::BoxError;

/// Stacked frames: `(batch_len, height, width, channels)`.
pub type Batch = Array4<f32>;

/// Persists one stacked batch as a single array file.
pub trait BatchWriter: Send + Sync {
    /// Writes `batch` to `path`. On error nothing may be left at `path`.
    fn write(&self, path: &Path, batch: &Batch) -> Result<(), BoxError>;
}
