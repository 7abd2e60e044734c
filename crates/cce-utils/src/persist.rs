//! Atomic JSON/JSONL persistence for run artifacts
//!
//! Every artifact is written via temp file + persist so a failed stage
//! never leaves a half-written file behind; a stage either completes
//! fully or its previous artifact (if any) survives untouched.

use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

use crate::error::EngineError;

/// Atomically write `content` to `path`, creating parent directories.
///
/// # Errors
///
/// Returns `EngineError::Io` if the temp file cannot be created, written,
/// or renamed into place.
pub fn write_text_atomic(path: &Path, content: &str) -> Result<(), EngineError> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    fs::create_dir_all(parent)?;

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(content.as_bytes())?;
    temp.as_file().sync_all()?;
    temp.persist(path).map_err(|e| EngineError::Io(e.error))?;
    Ok(())
}

/// Serialize `value` as pretty-printed JSON and write it atomically.
///
/// # Errors
///
/// Returns `EngineError::Malformed` if serialization fails, `EngineError::Io`
/// on write failure.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), EngineError> {
    let body = serde_json::to_string_pretty(value).map_err(|e| EngineError::Malformed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    write_text_atomic(path, &body)
}

/// Read and deserialize a JSON document.
///
/// # Errors
///
/// Returns `EngineError::Io` if the file cannot be read and
/// `EngineError::Malformed` (naming the path) if it does not decode.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, EngineError> {
    let body = fs::read_to_string(path)?;
    serde_json::from_str(&body).map_err(|e| EngineError::Malformed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Write one JSON record per line, atomically.
///
/// # Errors
///
/// Returns `EngineError::Malformed` if any record fails to serialize,
/// `EngineError::Io` on write failure.
pub fn write_jsonl<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), EngineError> {
    let mut body = String::new();
    for row in rows {
        let line = serde_json::to_string(row).map_err(|e| EngineError::Malformed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        body.push_str(&line);
        body.push('\n');
    }
    write_text_atomic(path, &body)
}

/// Read newline-delimited JSON records, skipping blank lines.
///
/// # Errors
///
/// Returns `EngineError::Io` if the file cannot be read and
/// `EngineError::Malformed` if any non-blank line fails to decode.
pub fn read_jsonl<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, EngineError> {
    let body = fs::read_to_string(path)?;
    let mut rows = Vec::new();
    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let row = serde_json::from_str(line).map_err(|e| EngineError::Malformed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        rows.push(row);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Row {
        id: String,
        n: u32,
    }

    #[test]
    fn jsonl_round_trips_and_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.jsonl");

        let rows = vec![
            Row {
                id: "a".to_string(),
                n: 1,
            },
            Row {
                id: "b".to_string(),
                n: 2,
            },
        ];
        write_jsonl(&path, &rows).unwrap();

        // Append a blank line; readers must tolerate it.
        let mut body = fs::read_to_string(&path).unwrap();
        body.push('\n');
        fs::write(&path, body).unwrap();

        let back: Vec<Row> = read_jsonl(&path).unwrap();
        assert_eq!(back, rows);
    }

    #[test]
    fn write_json_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("runs").join("2025-06").join("plan.json");

        write_json(
            &path,
            &Row {
                id: "x".to_string(),
                n: 9,
            },
        )
        .unwrap();

        let back: Row = read_json(&path).unwrap();
        assert_eq!(back.n, 9);
    }

    #[test]
    fn malformed_json_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{not json").unwrap();

        let err = read_json::<Row>(&path).unwrap_err();
        assert!(err.to_string().contains("bad.json"));
    }
}
