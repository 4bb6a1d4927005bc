pub mod batch_layout;
pub mod batch_manifest;
pub mod batch_writer;
