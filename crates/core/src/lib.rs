//! Samples frames from a video at a fixed interval, writes them as images,
//! and packs resized, normalized copies into `.npy` batches.

pub mod batching;
pub mod extraction;
pub mod pipeline;
pub mod preprocessing;
pub mod shared;
pub mod video;
