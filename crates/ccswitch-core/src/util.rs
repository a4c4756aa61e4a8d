//! Small file helpers shared across modules

use std::fs;
use std::path::Path;

use crate::error::{CoreError, CoreResult};

/// Write file contents as a single atomic replace
///
/// The content is written to a temporary sibling first and renamed into
/// place, so a reader never observes a partial write.
///
/// # Errors
/// Returns an error if the directory cannot be created or the write fails.
pub fn write_atomic(path: &Path, contents: &str) -> CoreResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| CoreError::io(parent, &e))?;
    }

    // Append rather than swap the extension so `profiles.json` and
    // `profiles.toml` never share a temp name, and no user file is hit.
    let file_name = path
        .file_name()
        .map_or_else(|| "config".to_string(), |n| n.to_string_lossy().to_string());
    let tmp = path.with_file_name(format!(".{file_name}.tmp"));
    fs::write(&tmp, contents).map_err(|e| CoreError::io(&tmp, &e))?;
    fs::rename(&tmp, path).map_err(|e| CoreError::io(path, &e))?;
    Ok(())
}

/// Read and parse a JSON file, tagging parse errors with the path
///
/// # Errors
/// Returns an error if the file cannot be read or parsed.
pub fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> CoreResult<T> {
    let content = fs::read_to_string(path).map_err(|e| CoreError::io(path, &e))?;
    serde_json::from_str(&content).map_err(|e| CoreError::JsonParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}
