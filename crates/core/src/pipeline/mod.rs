pub mod extract_frames_use_case;
pub mod infrastructure;
pub mod pipeline_logger;
pub mod preprocess_executor;
pub mod write_batches_use_case;
