//! Problem sets: built-in tables and dataset files on disk.
//!
//! Dataset files come either as line-delimited JSON (one record per line)
//! or as a single JSON array. [`load_records`] accepts both. Records that
//! parse but lack a required field are skipped with a warning by the
//! task-specific loaders; a line that is not JSON fails the whole file.

pub mod agentbench;
pub mod bfcl;
pub mod builtin;

use std::path::Path;

use serde_json::Value;

use crate::error::DatasetError;

pub use agentbench::{load_knowledge_graph_problems, load_sql_problems};
pub use bfcl::{
    load_bfcl_answers, load_bfcl_problems, BfclCategory, BFCL_CATEGORIES, LIVE_CATEGORIES,
    NON_LIVE_CATEGORIES,
};
pub use builtin::{math_problems, multiple_choice_problems, os_problems};

/// Reads every record of a dataset file.
///
/// # Errors
///
/// Returns `DatasetError::NotFound` if the file does not exist, and
/// `DatasetError::MalformedRecord` for a line that is not valid JSON.
pub fn load_records(path: &Path) -> Result<Vec<Value>, DatasetError> {
    load_records_limited(path, None)
}

/// Reads at most `limit` records of a dataset file.
///
/// Lines after the limit are not parsed.
pub fn load_records_limited(path: &Path, limit: Option<usize>) -> Result<Vec<Value>, DatasetError> {
    if !path.exists() {
        return Err(DatasetError::NotFound(path.to_path_buf()));
    }
    let content = std::fs::read_to_string(path)?;
    let limit = limit.unwrap_or(usize::MAX);

    if content.trim_start().starts_with('[') {
        let records: Vec<Value> =
            serde_json::from_str(&content).map_err(|e| DatasetError::MalformedRecord {
                path: path.to_path_buf(),
                line: e.line(),
                reason: e.to_string(),
            })?;
        return Ok(records.into_iter().take(limit).collect());
    }

    let mut records = Vec::new();
    for (idx, line) in content.lines().enumerate() {
        if records.len() >= limit {
            break;
        }
        if line.trim().is_empty() {
            continue;
        }
        let record = serde_json::from_str(line).map_err(|e| DatasetError::MalformedRecord {
            path: path.to_path_buf(),
            line: idx + 1,
            reason: e.to_string(),
        })?;
        records.push(record);
    }
    Ok(records)
}

/// String field of a record, if present.
pub(crate) fn str_field<'a>(record: &'a Value, key: &str) -> Option<&'a str> {
    record.get(key).and_then(Value::as_str)
}

/// Renders a scalar as plain text; strings are not quoted.
pub(crate) fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_jsonl() {
        let file = write_temp("{\"id\": 1}\n\n{\"id\": 2}\n{\"id\": 3}\n");
        let records = load_records(file.path()).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1]["id"], 2);
    }

    #[test]
    fn test_load_json_array() {
        let file = write_temp("[\n  {\"id\": 1},\n  {\"id\": 2}\n]\n");
        let records = load_records(file.path()).unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn test_limit_stops_early() {
        // The broken third line is never parsed.
        let file = write_temp("{\"id\": 1}\n{\"id\": 2}\nnot json\n");
        let records = load_records_limited(file.path(), Some(2)).unwrap();
        assert_eq!(records.len(), 2);

        let array = write_temp("[{\"id\": 1}, {\"id\": 2}, {\"id\": 3}]");
        assert_eq!(load_records_limited(array.path(), Some(1)).unwrap().len(), 1);
    }

    #[test]
    fn test_missing_file() {
        let err = load_records(Path::new("/nonexistent/dev.jsonl")).unwrap_err();
        assert!(matches!(err, DatasetError::NotFound(_)));
    }

    #[test]
    fn test_malformed_line_reports_line_number() {
        let file = write_temp("{\"id\": 1}\n{oops\n");
        let err = load_records(file.path()).unwrap_err();
        assert!(matches!(err, DatasetError::MalformedRecord { line: 2, .. }));
    }
}
