use std::path::Path;

use image::imageops::FilterType;

use crate::preprocessing::domain::frame_preprocessor::{FramePreprocessor, PreprocessedFrame};
use crate::shared::constants::OUTPUT_CHANNELS;
use crate::shared::error::PipelineError;
use crate::shared::frame::Frame;

/// Decodes an image with the `image` crate, converts it to RGB, resizes it
/// to a fixed size with bilinear filtering and scales samples into `[0, 1]`.
///
/// Aspect ratio is not preserved: every output has the configured shape.
pub struct ResizeNormalizePreprocessor {
    width: u32,
    height: u32,
}

impl ResizeNormalizePreprocessor {
    /// `output_size` is `(width, height)`.
    pub fn new(output_size: (u32, u32)) -> Result<Self, PipelineError> {
        let (width, height) = output_size;
        if width == 0 || height == 0 {
            return Err(PipelineError::Config(format!(
                "output size must be non-zero, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }
}

impl FramePreprocessor for ResizeNormalizePreprocessor {
    fn preprocess(&self, path: &Path) -> Result<PreprocessedFrame, PipelineError> {
        let rgb = image::open(path)
            .map_err(|e| PipelineError::decode(path, e))?
            .to_rgb8();

        let resized = if rgb.dimensions() == (self.width, self.height) {
            rgb
        } else {
            image::imageops::resize(&rgb, self.width, self.height, FilterType::Triangle)
        };

        let frame = Frame::new(
            resized.into_raw(),
            self.width,
            self.height,
            OUTPUT_CHANNELS as u8,
            0,
        );
        Ok(frame.normalized())
    }

    fn output_shape(&self) -> (usize, usize, usize) {
        (self.height as usize, self.width as usize, OUTPUT_CHANNELS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;
    use std::path::PathBuf;

    fn write_test_image(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
        let path = dir.join(name);
        let mut img = image::RgbImage::new(width, height);
        for pixel in img.pixels_mut() {
            *pixel = image::Rgb([51, 102, 255]);
        }
        img.save(&path).unwrap();
        path
    }

    #[rstest]
    #[case::larger(640, 480)]
    #[case::smaller(32, 16)]
    #[case::portrait(90, 300)]
    #[case::exact(224, 224)]
    #[case::single_pixel(1, 1)]
    fn test_output_shape_is_fixed(#[case] width: u32, #[case] height: u32) {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_image(dir.path(), "frame_0.png", width, height);
        let pre = ResizeNormalizePreprocessor::new((224, 224)).unwrap();

        let arr = pre.preprocess(&path).unwrap();
        assert_eq!(arr.shape(), &[224, 224, 3]);
        assert!(arr.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_non_square_target_is_height_by_width() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_image(dir.path(), "frame_0.png", 100, 100);
        let pre = ResizeNormalizePreprocessor::new((64, 32)).unwrap();

        let arr = pre.preprocess(&path).unwrap();
        assert_eq!(arr.shape(), &[32, 64, 3]);
        assert_eq!(pre.output_shape(), (32, 64, 3));
    }

    #[test]
    fn test_uniform_colour_normalized() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_image(dir.path(), "frame_0.png", 40, 30);
        let pre = ResizeNormalizePreprocessor::new((20, 20)).unwrap();

        let arr = pre.preprocess(&path).unwrap();
        assert_relative_eq!(arr[[0, 0, 0]], 0.2);
        assert_relative_eq!(arr[[10, 10, 1]], 0.4);
        assert_relative_eq!(arr[[19, 19, 2]], 1.0);
    }

    #[test]
    fn test_greyscale_input_becomes_rgb() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame_0.png");
        image::GrayImage::from_pixel(10, 10, image::Luma([255])).save(&path).unwrap();
        let pre = ResizeNormalizePreprocessor::new((8, 8)).unwrap();

        let arr = pre.preprocess(&path).unwrap();
        assert_eq!(arr.shape(), &[8, 8, 3]);
        assert!(arr.iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_jpeg_input() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_test_image(dir.path(), "frame_30.jpg", 320, 240);
        let pre = ResizeNormalizePreprocessor::new((224, 224)).unwrap();

        let arr = pre.preprocess(&path).unwrap();
        assert_eq!(arr.shape(), &[224, 224, 3]);
        assert!(arr.iter().all(|v| (0.0..=1.0).contains(v)));
    }

    #[test]
    fn test_corrupted_file_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("frame_3.jpg");
        std::fs::write(&path, b"\xFF\xD8 not really a jpeg").unwrap();
        let pre = ResizeNormalizePreprocessor::new((224, 224)).unwrap();

        match pre.preprocess(&path) {
            Err(PipelineError::Decode { path: failed, .. }) => assert_eq!(failed, path),
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_file_is_decode_error() {
        let pre = ResizeNormalizePreprocessor::new((224, 224)).unwrap();
        let result = pre.preprocess(Path::new("/nonexistent/frame_0.jpg"));
        assert!(matches!(result, Err(PipelineError::Decode { .. })));
    }

    #[rstest]
    #[case((0, 224))]
    #[case((224, 0))]
    fn test_zero_size_rejected(#[case] size: (u32, u32)) {
        assert!(matches!(
            ResizeNormalizePreprocessor::new(size),
            Err(PipelineError::Config(_))
        ));
    }
}
