//! File-backed dataset and result storage

mod json_dataset;
mod json_results;

pub use json_dataset::JsonDatasetLoader;
pub use json_results::JsonResultStore;
