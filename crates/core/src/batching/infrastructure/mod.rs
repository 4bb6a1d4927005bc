pub mod npy_batch_writer;
