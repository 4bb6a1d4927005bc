use std::path::Path;

use crate::shared::error::{BoxError, PipelineError};
use crate::shared::frame::Frame;
use crate::shared::video_metadata::VideoMetadata;
use crate::video::domain::video_reader::VideoReader;

/// An opened video stream that closes its reader when dropped.
///
/// Every exit from extraction (exhaustion, early return, panic unwind)
/// releases the decoder through `Drop`.
pub struct OpenStream<'a> {
    reader: &'a mut dyn VideoReader,
    metadata: VideoMetadata,
}

impl<'a> OpenStream<'a> {
    pub fn open(reader: &'a mut dyn VideoReader, path: &Path) -> Result<Self, PipelineError> {
        match reader.open(path) {
            Ok(metadata) => Ok(Self { reader, metadata }),
            Err(source) => {
                reader.close();
                Err(PipelineError::StreamOpen {
                    path: path.to_path_buf(),
                    source,
                })
            }
        }
    }

    pub fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    pub fn frames(&mut self) -> Box<dyn Iterator<Item = Result<Frame, BoxError>> + '_> {
        self.reader.frames()
    }
}

impl Drop for OpenStream<'_> {
    fn drop(&mut self) {
        self.reader.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct StubReader {
        fail_open: bool,
        frames: Vec<Frame>,
        close_calls: Arc<Mutex<usize>>,
    }

    impl StubReader {
        fn new(fail_open: bool, count: usize) -> Self {
            Self {
                fail_open,
                frames: (0..count)
                    .map(|i| Frame::new(vec![0; 12], 2, 2, 3, i))
                    .collect(),
                close_calls: Arc::new(Mutex::new(0)),
            }
        }
    }

    impl VideoReader for StubReader {
        fn open(&mut self, _path: &Path) -> Result<VideoMetadata, BoxError> {
            if self.fail_open {
                return Err("cannot open".into());
            }
            Ok(VideoMetadata {
                width: 2,
                height: 2,
                fps: 30.0,
                total_frames: self.frames.len(),
                codec: String::new(),
                source_path: None,
            })
        }

        fn frames(&mut self) -> Box<dyn Iterator<Item = Result<Frame, BoxError>> + '_> {
            Box::new(self.frames.drain(..).map(Ok))
        }

        fn close(&mut self) {
            *self.close_calls.lock().unwrap() += 1;
        }
    }

    #[test]
    fn test_drop_closes_reader() {
        let mut reader = StubReader::new(false, 3);
        let closes = reader.close_calls.clone();
        {
            let mut stream = OpenStream::open(&mut reader, Path::new("in.mp4")).unwrap();
            assert_eq!(stream.metadata().total_frames, 3);
            assert_eq!(stream.frames().count(), 3);
            assert_eq!(*closes.lock().unwrap(), 0);
        }
        assert_eq!(*closes.lock().unwrap(), 1);
    }

    #[test]
    fn test_early_drop_closes_reader() {
        let mut reader = StubReader::new(false, 10);
        let closes = reader.close_calls.clone();
        {
            let mut stream = OpenStream::open(&mut reader, Path::new("in.mp4")).unwrap();
            let _first = stream.frames().next();
        }
        assert_eq!(*closes.lock().unwrap(), 1);
    }

    #[test]
    fn test_open_failure_is_stream_open_error() {
        let mut reader = StubReader::new(true, 0);
        let closes = reader.close_calls.clone();
        let result = OpenStream::open(&mut reader, Path::new("missing.mp4"));
        match result {
            Err(PipelineError::StreamOpen { path, .. }) => {
                assert_eq!(path, Path::new("missing.mp4"));
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("expected open to fail"),
        }
        assert_eq!(*closes.lock().unwrap(), 1);
    }
}
