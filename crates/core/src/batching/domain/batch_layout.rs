use std::path::{Path, PathBuf};

use ndarray::{ArrayView3, Axis};

use crate::batching::domain::batch_writer::Batch;
use crate::preprocessing::domain::frame_preprocessor::PreprocessedFrame;
use crate::shared::constants::{BATCH_FILE_EXTENSION, BATCH_FILE_PREFIX};
use crate::shared::error::BoxError;

/// `<dir>/batch_<index>.npy`
pub fn batch_path(dir: &Path, batch_index: usize) -> PathBuf {
    dir.join(format!("{BATCH_FILE_PREFIX}{batch_index}.{BATCH_FILE_EXTENSION}"))
}

/// Consecutive groups of at most `batch_size` paths, tagged with their
/// zero-based batch index. The last group may be shorter.
pub fn partition(
    paths: &[PathBuf],
    batch_size: usize,
) -> impl Iterator<Item = (usize, &[PathBuf])> {
    paths.chunks(batch_size.max(1)).enumerate()
}

/// Stacks frames along a new leading axis, keeping their order.
pub fn stack_frames(frames: &[PreprocessedFrame]) -> Result<Batch, BoxError> {
    if frames.is_empty() {
        return Err("cannot stack an empty batch".into());
    }
    let views: Vec<ArrayView3<'_, f32>> = frames.iter().map(|f| f.view()).collect();
    Ok(ndarray::stack(Axis(0), &views)?)
}
