//! Pre-write file backups
//!
//! Before any mutating write, the current file is copied to a timestamped
//! sibling. Backups are never overwritten: on a name collision a numeric
//! suffix is appended until a free name is found.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};

/// Copy `path` to a timestamped sibling and return the backup path
///
/// Returns `Ok(None)` if the source file does not exist (nothing to back up).
///
/// # Errors
/// Returns an error if the copy fails. Callers treat this as best-effort and
/// log instead of aborting the underlying write.
pub fn create_file_backup(path: &Path) -> CoreResult<Option<PathBuf>> {
    if !path.exists() {
        return Ok(None);
    }

    let timestamp = chrono::Local::now().format("%Y%m%d-%H%M%S");
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "config".to_string());

    let mut candidate = sibling(path, &format!("{file_name}.bak.{timestamp}"));
    let mut counter = 2;
    while candidate.exists() {
        candidate = sibling(path, &format!("{file_name}.bak.{timestamp}.{counter}"));
        counter += 1;
    }

    fs::copy(path, &candidate).map_err(|e| CoreError::io(path, &e))?;
    Ok(Some(candidate))
}

/// Back up best-effort: a failed backup is logged, never fatal
pub fn backup_best_effort(path: &Path) -> Option<PathBuf> {
    match create_file_backup(path) {
        Ok(backup) => backup,
        Err(err) => {
            log::warn!("backup of {} failed: {err}", path.display());
            None
        }
    }
}

fn sibling(path: &Path, name: &str) -> PathBuf {
    path.parent()
        .map_or_else(|| PathBuf::from(name), |p| p.join(name))
}
