use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use crate::batching::domain::batch_writer::{Batch, BatchWriter};
use crate::shared::constants::PARTIAL_FILE_SUFFIX;
use crate::shared::error::BoxError;

/// Writes batches as NumPy `.npy` files (little-endian `f32`, C order).
///
/// Data goes to `<path>.partial` first and is renamed over `path` only
/// once fully written, so a failed write never leaves a truncated batch
/// under the final name.
pub struct NpyBatchWriter;

impl NpyBatchWriter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NpyBatchWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl BatchWriter for NpyBatchWriter {
    fn write(&self, path: &Path, batch: &Batch) -> Result<(), BoxError> {
        let partial = partial_path(path);

        if let Err(e) = ndarray_npy::write_npy(&partial, batch) {
            let _ = fs::remove_file(&partial);
            return Err(e.into());
        }

        if let Err(e) = fs::rename(&partial, path) {
            let _ = fs::remove_file(&partial);
            return Err(e.into());
        }
        Ok(())
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(OsString::from(format!(".{PARTIAL_FILE_SUFFIX}")));
    PathBuf::from(name)
}
