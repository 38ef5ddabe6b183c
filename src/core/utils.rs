use crate::error::{Error, Result};

use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

pub fn read_file_as_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::ReadFailure {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes pretty JSON next to `path` first and moves it into place, so a
/// failed write never leaves a truncated file behind.
pub fn write_json_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let content = serde_json::to_string_pretty(value)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;

    Ok(())
}
