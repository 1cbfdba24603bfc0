//! Result store port
//!
//! Persists the result records of one experiment and reads result files back
//! for reporting.

use probe_domain::ResultRecord;
use serde_json::Value;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Cannot write results to {path}: {message}")]
    Write { path: PathBuf, message: String },

    #[error("Cannot read results from {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Results file {path} is not a JSON array of records: {message}")]
    Format { path: PathBuf, message: String },
}

pub trait ResultStore: Send + Sync {
    /// Write all records of experiment `name`, returning the file written
    fn save(&self, name: &str, records: &[ResultRecord]) -> Result<PathBuf, StoreError>;

    /// Read a results file as loosely-typed records
    ///
    /// Records are not validated here so a single malformed record can be
    /// reported instead of failing the whole file.
    fn load_raw(&self, path: &Path) -> Result<Vec<Value>, StoreError>;
}
