//! File I/O utilities
//!
//! Collections are rewritten whole on every save; writing to a temp file and
//! renaming it over the target keeps a crash from leaving a half-written
//! collection behind. Append-only logs use JSON Lines.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::AdminError;

/// Read JSON from a file, returning a default value if the file doesn't exist
pub fn read_json<T, P>(path: P) -> Result<T, AdminError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path)
        .map_err(|e| AdminError::Storage(format!("Failed to open {}: {}", path.display(), e)))?;

    serde_json::from_reader(BufReader::new(file))
        .map_err(|e| AdminError::Storage(format!("Failed to parse {}: {}", path.display(), e)))
}

/// Write JSON to a file atomically (write to temp, sync, then rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), AdminError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            AdminError::Storage(format!(
                "Failed to create directory {}: {}",
                parent.display(),
                e
            ))
        })?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = path.with_extension("json.tmp");

    let file = File::create(&temp_path)
        .map_err(|e| AdminError::Storage(format!("Failed to create temp file: {}", e)))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| AdminError::Storage(format!("Failed to serialize data: {}", e)))?;

    writer
        .flush()
        .map_err(|e| AdminError::Storage(format!("Failed to flush data: {}", e)))?;

    writer
        .get_ref()
        .sync_all()
        .map_err(|e| AdminError::Storage(format!("Failed to sync data: {}", e)))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        AdminError::Storage(format!("Failed to rename temp file: {}", e))
    })?;

    Ok(())
}

/// Append one record as a single JSON line and flush it
pub fn append_json_line<T, P>(path: P, record: &T) -> Result<(), AdminError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    let line = serde_json::to_string(record)
        .map_err(|e| AdminError::Json(format!("Failed to serialize record: {}", e)))?;

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| AdminError::Io(format!("Failed to open {}: {}", path.display(), e)))?;

    writeln!(file, "{}", line)
        .map_err(|e| AdminError::Io(format!("Failed to append to {}: {}", path.display(), e)))?;

    file.flush()
        .map_err(|e| AdminError::Io(format!("Failed to flush {}: {}", path.display(), e)))
}

/// Read every record from a JSON Lines file, oldest first
///
/// A missing file reads as empty. Blank lines are skipped.
pub fn read_json_lines<T, P>(path: P) -> Result<Vec<T>, AdminError>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if !path.exists() {
        return Ok(Vec::new());
    }

    let file = File::open(path)
        .map_err(|e| AdminError::Io(format!("Failed to open {}: {}", path.display(), e)))?;

    let mut records = Vec::new();
    for (idx, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| {
            AdminError::Io(format!("Failed to read {} line {}: {}", path.display(), idx + 1, e))
        })?;

        if line.trim().is_empty() {
            continue;
        }

        let record = serde_json::from_str(&line).map_err(|e| {
            AdminError::Json(format!(
                "Failed to parse {} line {}: {}",
                path.display(),
                idx + 1,
                e
            ))
        })?;
        records.push(record);
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
    struct TestData {
        name: String,
        value: i32,
    }

    fn sample(value: i32) -> TestData {
        TestData {
            name: "rig".to_string(),
            value,
        }
    }

    #[test]
    fn test_read_nonexistent_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let data: TestData = read_json(temp_dir.path().join("missing.json")).unwrap();
        assert_eq!(data, TestData::default());
    }

    #[test]
    fn test_atomic_write_round_trip_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("data.json");

        write_json_atomic(&path, &sample(42)).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
        let loaded: TestData = read_json(&path).unwrap();
        assert_eq!(loaded, sample(42));
    }

    #[test]
    fn test_read_corrupt_file_is_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        fs::write(&path, "not json at all").unwrap();

        let result: Result<TestData, _> = read_json(&path);
        assert!(matches!(result, Err(AdminError::Storage(_))));
    }

    #[test]
    fn test_append_and_read_lines_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("log.jsonl");

        for i in 0..3 {
            append_json_line(&path, &sample(i)).unwrap();
        }

        let records: Vec<TestData> = read_json_lines(&path).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].value, 0);
        assert_eq!(records[2].value, 2);
    }

    #[test]
    fn test_read_lines_skips_blank_and_reports_bad_line() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("log.jsonl");
        fs::write(&path, "{\"name\":\"a\",\"value\":1}\n\n{oops}\n").unwrap();

        let err = read_json_lines::<TestData, _>(&path).unwrap_err();
        assert!(err.to_string().contains("line 3"));
    }

    #[test]
    fn test_read_lines_missing_file_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let records: Vec<TestData> = read_json_lines(temp_dir.path().join("none.jsonl")).unwrap();
        assert!(records.is_empty());
    }
}
