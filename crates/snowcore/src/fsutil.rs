//! Small filesystem helpers shared by the JSON stores.

use std::io::Write;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ModError, Result};

/// Serialize `value` as pretty JSON and replace `path` atomically.
///
/// The data goes to a temp file in the same directory first and is then
/// renamed over the target, so a crash mid-write leaves the previous file
/// intact.
pub fn write_json_atomic<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).map_err(ModError::io("create directory", parent))?;

    let mut raw = serde_json::to_string_pretty(value).map_err(|source| ModError::ConfigParse {
        path: path.to_path_buf(),
        source,
    })?;
    raw.push('\n');

    let mut tmp = tempfile::NamedTempFile::new_in(parent)
        .map_err(ModError::io("create temp file in", parent))?;
    tmp.write_all(raw.as_bytes())
        .map_err(ModError::io("write", tmp.path()))?;
    tmp.as_file()
        .sync_all()
        .map_err(ModError::io("sync", tmp.path()))?;
    tmp.persist(path)
        .map_err(|e| ModError::io("replace", path)(e.error))?;
    Ok(())
}

/// Read and parse a JSON file. `Ok(None)` if the file does not exist.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(ModError::io("read", path)(e)),
    };
    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| ModError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
}
