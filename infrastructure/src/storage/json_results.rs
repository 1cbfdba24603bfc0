//! JSON result store
//!
//! Writes `output_<name>.json` under the output directory as a 4-space
//! indented array of records. Non-ASCII text is written as-is.

use probe_application::ports::result_store::{ResultStore, StoreError};
use probe_domain::ResultRecord;
use serde::Serialize;
use serde_json::Value;
use serde_json::ser::PrettyFormatter;
use std::path::{Path, PathBuf};

pub struct JsonResultStore {
    output_dir: PathBuf,
}

impl JsonResultStore {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// File that `save(name, ..)` writes
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.output_dir.join(format!("output_{name}.json"))
    }
}

fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> serde_json::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;
    Ok(buf)
}

impl ResultStore for JsonResultStore {
    fn save(&self, name: &str, records: &[ResultRecord]) -> Result<PathBuf, StoreError> {
        let path = self.path_for(name);
        let write_error = |message: String| StoreError::Write {
            path: path.clone(),
            message,
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| write_error(e.to_string()))?;
        }
        let bytes = to_pretty_json(records).map_err(|e| write_error(e.to_string()))?;

        // Write to a sibling temp file then rename, so a crash mid-write
        // never leaves a truncated artifact behind.
        let tmp_path = path.with_extension("json.tmp");
        std::fs::write(&tmp_path, bytes).map_err(|e| write_error(e.to_string()))?;
        std::fs::rename(&tmp_path, &path).map_err(|e| write_error(e.to_string()))?;

        Ok(path)
    }

    fn load_raw(&self, path: &Path) -> Result<Vec<Value>, StoreError> {
        let content = std::fs::read_to_string(path).map_err(|e| StoreError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        serde_json::from_str(&content).map_err(|e| StoreError::Format {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
