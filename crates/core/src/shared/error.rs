use std::path::PathBuf;

use thiserror::Error;

/// Boxed error returned by adapter traits (readers, writers, codecs).
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("failed to open video stream {path}: {source}")]
    StreamOpen {
        path: PathBuf,
        #[source]
        source: BoxError,
    },
    #[error("failed to decode {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: BoxError,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: BoxError,
    },
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("batch {batch_index} failed: {source}")]
    Batch {
        batch_index: usize,
        #[source]
        source: Box<PipelineError>,
    },
}

impl PipelineError {
    pub fn write(path: impl Into<PathBuf>, source: impl Into<BoxError>) -> Self {
        Self::Write {
            path: path.into(),
            source: source.into(),
        }
    }

    pub fn decode(path: impl Into<PathBuf>, source: impl Into<BoxError>) -> Self {
        Self::Decode {
            path: path.into(),
            source: source.into(),
        }
    }

    /// Path of the file the error is about, looking through batch wrappers.
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            Self::StreamOpen { path, .. }
            | Self::Decode { path, .. }
            | Self::Write { path, .. } => Some(path),
            Self::Config(_) => None,
            Self::Batch { source, .. } => source.path(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;
    use std::path::Path;

    #[test]
    fn test_decode_message_names_path() {
        let err = PipelineError::decode("/tmp/frame_30.jpg", "bad header");
        assert_eq!(err.to_string(), "failed to decode /tmp/frame_30.jpg: bad header");
    }

    #[test]
    fn test_batch_wraps_source() {
        let inner = PipelineError::decode("/tmp/frame_0.jpg", "truncated");
        let err = PipelineError::Batch {
            batch_index: 2,
            source: Box::new(inner),
        };
        assert!(err.to_string().starts_with("batch 2 failed"));
        assert!(err.source().is_some());
        assert_eq!(err.path(), Some(Path::new("/tmp/frame_0.jpg")));
    }

    #[test]
    fn test_config_has_no_path() {
        let err = PipelineError::Config("batch size must be >= 1".into());
        assert!(err.path().is_none());
        assert_eq!(
            err.to_string(),
            "invalid configuration: batch size must be >= 1"
        );
    }

    #[test]
    fn test_write_preserves_io_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = PipelineError::write("/ro/batch_0.npy", io);
        let source = err.source().unwrap();
        assert_eq!(source.to_string(), "denied");
    }
}
