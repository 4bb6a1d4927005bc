use std::path::Path;

use crate::shared::error::BoxError;
use crate::shared::frame::Frame;

/// Writes a single frame to an image file.
///
/// The encoding is chosen from the path's extension.
pub trait ImageWriter: Send {
    fn write(&self, path: &Path, frame: &Frame) -> Result<(), BoxError>;
}
