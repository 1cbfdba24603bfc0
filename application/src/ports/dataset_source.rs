//! Dataset source port
//!
//! Loads the question items of one dataset file.

use probe_domain::QuestionItem;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors loading a dataset; each aborts the configuration that needs it
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("Cannot read dataset {path}: {message}")]
    Io { path: PathBuf, message: String },

    #[error("Dataset {path} is not valid JSON: {message}")]
    Json { path: PathBuf, message: String },

    #[error("Dataset {path}, entry {index}: {message}")]
    Format {
        path: PathBuf,
        index: usize,
        message: String,
    },
}

pub trait DatasetSource: Send + Sync {
    /// Load every item of the dataset, in file order
    fn load(&self, path: &Path) -> Result<Vec<QuestionItem>, DatasetError>;
}
