//! JSON dataset loader
//!
//! A dataset is a JSON array of objects, each holding a `questions` array of
//! 2 or 4 strings. Other fields are ignored.

use probe_application::ports::dataset_source::{DatasetError, DatasetSource};
use probe_domain::QuestionItem;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

pub struct JsonDatasetLoader;

impl JsonDatasetLoader {
    fn parse_entry(path: &Path, index: usize, entry: &Value) -> Result<QuestionItem, DatasetError> {
        let format_error = |message: String| DatasetError::Format {
            path: path.to_path_buf(),
            index,
            message,
        };

        let questions = entry
            .get("questions")
            .and_then(Value::as_array)
            .ok_or_else(|| format_error("missing 'questions' array".to_string()))?;

        let questions = questions
            .iter()
            .enumerate()
            .map(|(slot, q)| {
                q.as_str()
                    .map(str::to_string)
                    .ok_or_else(|| format_error(format!("question {slot} is not a string")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        QuestionItem::new(index, questions).map_err(|e| format_error(e.to_string()))
    }
}

impl DatasetSource for JsonDatasetLoader {
    fn load(&self, path: &Path) -> Result<Vec<QuestionItem>, DatasetError> {
        let content = std::fs::read_to_string(path).map_err(|e| DatasetError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let value: Value = serde_json::from_str(&content).map_err(|e| DatasetError::Json {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let Value::Array(entries) = value else {
            return Err(DatasetError::Json {
                path: path.to_path_buf(),
                message: "expected a top-level array".to_string(),
            });
        };

        let items = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| Self::parse_entry(path, index, entry))
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Loaded {} items from {}", items.len(), path.display());
        Ok(items)
    }
}
