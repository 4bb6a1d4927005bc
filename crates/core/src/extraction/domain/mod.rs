pub mod open_stream;
pub mod sampling_policy;
