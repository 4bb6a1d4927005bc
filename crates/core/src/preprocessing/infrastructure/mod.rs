pub mod resize_normalize_preprocessor;
