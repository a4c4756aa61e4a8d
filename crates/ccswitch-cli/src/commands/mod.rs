//! CLI command implementations

pub mod claude;
pub mod codex;
pub mod profile;

use std::path::Path;

/// Render the backup note every mutating command prints
pub fn print_backup(backup_path: Option<&Path>) {
    if let Some(path) = backup_path {
        println!("Backup: {}", path.display());
    }
}
