use std::path::{Path, PathBuf};

use crate::shared::constants::{FRAME_FILE_EXTENSION, FRAME_FILE_PREFIX};

/// Decides which decoded frames are kept.
///
/// The stride is fixed at construction so the cadence cannot drift if a
/// decoder reports a different rate mid-stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SamplingPolicy {
    stride: usize,
}

impl SamplingPolicy {
    /// `round(fps * interval_secs)`, clamped to at least 1.
    ///
    /// An unknown (0, negative or non-finite) frame rate samples every frame.
    pub fn from_rate(fps: f64, interval_secs: f64) -> Self {
        let raw = (fps * interval_secs).round();
        let stride = if raw.is_finite() && raw >= 1.0 {
            raw as usize
        } else {
            1
        };
        Self { stride }
    }

    pub fn stride(&self) -> usize {
        self.stride
    }

    pub fn should_sample(&self, frame_index: usize) -> bool {
        frame_index % self.stride == 0
    }

    /// Number of frames kept out of a stream of `total_frames`.
    pub fn expected_samples(&self, total_frames: usize) -> usize {
        total_frames.div_ceil(self.stride)
    }
}

/// `<dir>/frame_<index>.jpg`
pub fn frame_path(dir: &Path, frame_index: usize) -> PathBuf {
    dir.join(format!("{FRAME_FILE_PREFIX}{frame_index}.{FRAME_FILE_EXTENSION}"))
}

/// Recovers the frame index embedded in a path built by [`frame_path`].
pub fn frame_index_of(path: &Path) -> Option<usize> {
    path.file_stem()?
        .to_str()?
        .strip_prefix(FRAME_FILE_PREFIX)?
        .parse()
        .ok()
}
