use std::num::NonZeroUsize;

use crate::shared::constants::{DEFAULT_BATCH_SIZE, DEFAULT_INTERVAL_SECS, DEFAULT_OUTPUT_SIZE};
use crate::shared::error::PipelineError;

/// Settings for sampling frames out of a video.
#[derive(Clone, Debug, PartialEq)]
pub struct ExtractionConfig {
    /// Seconds of video between two sampled frames.
    pub interval_secs: f64,
}

impl ExtractionConfig {
    pub fn validate(&self) -> Result<(), PipelineError> {
        if !self.interval_secs.is_finite() || self.interval_secs <= 0.0 {
            return Err(PipelineError::Config(format!(
                "sampling interval must be a positive number of seconds, got {}",
                self.interval_secs
            )));
        }
        Ok(())
    }
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            interval_secs: DEFAULT_INTERVAL_SECS,
        }
    }
}

/// Settings for preprocessing sampled frames into batches.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchConfig {
    pub batch_size: usize,
    /// Target `(width, height)` of every preprocessed frame.
    pub output_size: (u32, u32),
    /// Worker threads used to preprocess one batch.
    pub workers: usize,
}

impl BatchConfig {
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.batch_size == 0 {
            return Err(PipelineError::Config("batch size must be >= 1".into()));
        }
        let (width, height) = self.output_size;
        if width == 0 || height == 0 {
            return Err(PipelineError::Config(format!(
                "output size must be non-zero, got {width}x{height}"
            )));
        }
        if self.workers == 0 {
            return Err(PipelineError::Config("worker count must be >= 1".into()));
        }
        Ok(())
    }
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            output_size: DEFAULT_OUTPUT_SIZE,
            workers: default_workers(),
        }
    }
}

/// Available parallelism, or 1 when it cannot be queried.
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let extraction = ExtractionConfig::default();
        assert_eq!(extraction.interval_secs, 1.0);

        let batch = BatchConfig::default();
        assert_eq!(batch.batch_size, 32);
        assert_eq!(batch.output_size, (224, 224));
        assert!(batch.workers >= 1);
    }

    #[test]
    fn test_defaults_are_valid() {
        assert!(ExtractionConfig::default().validate().is_ok());
        assert!(BatchConfig::default().validate().is_ok());
    }

    #[rstest]
    #[case::zero(0.0)]
    #[case::negative(-1.0)]
    #[case::nan(f64::NAN)]
    #[case::infinite(f64::INFINITY)]
    fn test_invalid_interval_rejected(#[case] interval_secs: f64) {
        let config = ExtractionConfig { interval_secs };
        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));
    }

    #[test]
    fn test_fractional_interval_accepted() {
        let config = ExtractionConfig { interval_secs: 0.25 };
        assert!(config.validate().is_ok());
    }

    #[rstest]
    #[case::zero_batch(0, (224, 224), 4)]
    #[case::zero_width(8, (0, 224), 4)]
    #[case::zero_height(8, (224, 0), 4)]
    #[case::zero_workers(8, (224, 224), 0)]
    fn test_invalid_batch_config_rejected(
        #[case] batch_size: usize,
        #[case] output_size: (u32, u32),
        #[case] workers: usize,
    ) {
        let config = BatchConfig {
            batch_size,
            output_size,
            workers,
        };
        assert!(matches!(config.validate(), Err(PipelineError::Config(_))));
    }
}
