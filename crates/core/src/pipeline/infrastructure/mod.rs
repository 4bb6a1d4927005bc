pub mod threaded_preprocess_executor;
