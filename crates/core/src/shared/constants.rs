pub const DEFAULT_INTERVAL_SECS: f64 = 1.0;
pub const DEFAULT_OUTPUT_SIZE: (u32, u32) = (224, 224);
pub const DEFAULT_BATCH_SIZE: usize = 32;

pub const FRAME_FILE_PREFIX: &str = "frame_";
pub const FRAME_FILE_EXTENSION: &str = "jpg";

pub const BATCH_FILE_PREFIX: &str = "batch_";
pub const BATCH_FILE_EXTENSION: &str = "npy";
pub const PARTIAL_FILE_SUFFIX: &str = "partial";
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// Largest value an 8-bit channel can hold; divisor for normalization.
pub const MAX_SAMPLE_VALUE: f32 = 255.0;

/// Channels per preprocessed pixel (RGB).
pub const OUTPUT_CHANNELS: usize = 3;
