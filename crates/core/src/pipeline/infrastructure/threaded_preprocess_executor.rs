use std::path::{Path, PathBuf};

use crate::pipeline::preprocess_executor::PreprocessExecutor;
use crate::preprocessing::domain::frame_preprocessor::{FramePreprocessor, PreprocessedFrame};
use crate::shared::config::default_workers;
use crate::shared::error::PipelineError;

const DEFAULT_CHANNEL_CAPACITY: usize = 8;

type Outcome = (usize, Result<PreprocessedFrame, PipelineError>);

/// Preprocesses a batch on a bounded pool of scoped worker threads.
///
/// Layout: `main [enumerate paths] → jobs → workers → results → main [slot by position]`
///
/// Workers live only for the duration of one `run` call, so each batch
/// blocks until all of its frames are done. Results are placed by their
/// input position, never by completion order.
pub struct ThreadedPreprocessExecutor {
    workers: usize,
    channel_capacity: usize,
}

impl ThreadedPreprocessExecutor {
    pub fn new(workers: usize) -> Result<Self, PipelineError> {
        if workers == 0 {
            return Err(PipelineError::Config("worker count must be >= 1".into()));
        }
        Ok(Self {
            workers,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        })
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl Default for ThreadedPreprocessExecutor {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

impl PreprocessExecutor for ThreadedPreprocessExecutor {
    fn run(
        &self,
        paths: &[PathBuf],
        preprocessor: &dyn FramePreprocessor,
    ) -> Result<Vec<PreprocessedFrame>, PipelineError> {
        if paths.is_empty() {
            return Ok(Vec::new());
        }

        let workers = self.workers.min(paths.len());
        let (job_tx, job_rx) = crossbeam_channel::bounded::<(usize, &Path)>(self.channel_capacity);
        let (result_tx, result_rx) = crossbeam_channel::unbounded::<Outcome>();

        std::thread::scope(|scope| {
            for _ in 0..workers {
                let jobs = job_rx.clone();
                let results = result_tx.clone();
                scope.spawn(move || {
                    for (position, path) in jobs {
                        let outcome = preprocessor.preprocess(path);
                        if results.send((position, outcome)).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(job_rx);
            drop(result_tx);

            for job in paths.iter().map(PathBuf::as_path).enumerate() {
                if job_tx.send(job).is_err() {
                    break;
                }
            }
            drop(job_tx);

            collect_in_order(result_rx, paths)
        })
    }
}

/// Drains worker results into position-indexed slots.
///
/// When several frames fail, the one earliest in `paths` is reported so the
/// error does not depend on thread scheduling.
fn collect_in_order(
    results: crossbeam_channel::Receiver<Outcome>,
    paths: &[PathBuf],
) -> Result<Vec<PreprocessedFrame>, PipelineError> {
    let mut slots: Vec<Option<PreprocessedFrame>> = vec![None; paths.len()];
    let mut first_error: Option<(usize, PipelineError)> = None;

    for (position, outcome) in results {
        match outcome {
            Ok(frame) => slots[position] = Some(frame),
            Err(e) => {
                if first_error.as_ref().map_or(true, |(p, _)| position < *p) {
                    first_error = Some((position, e));
                }
            }
        }
    }

    if let Some((_, e)) = first_error {
        return Err(e);
    }

    slots
        .into_iter()
        .zip(paths)
        .map(|(slot, path)| {
            slot.ok_or_else(|| PipelineError::decode(path, "worker exited without a result"))
        })
        .collect()
}
