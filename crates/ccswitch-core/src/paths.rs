//! Default on-disk locations
//!
//! Every component also accepts explicit paths, so these helpers are only
//! used when the CLI runs against the real home directory.

use std::path::PathBuf;

use crate::error::{CoreError, CoreResult};

fn home_dir() -> CoreResult<PathBuf> {
    dirs::home_dir().ok_or_else(|| CoreError::Io {
        path: PathBuf::new(),
        message: "home directory not found".to_string(),
    })
}

/// Base directory for ccswitch state (`~/.ccswitch`)
pub fn ccswitch_dir() -> CoreResult<PathBuf> {
    Ok(home_dir()?.join(".ccswitch"))
}

/// Current-format profile store (`~/.ccswitch/profiles.json`)
pub fn profile_store_path() -> CoreResult<PathBuf> {
    Ok(ccswitch_dir()?.join("profiles.json"))
}

/// Legacy single-file store left behind by earlier releases
pub fn legacy_store_path() -> CoreResult<PathBuf> {
    Ok(home_dir()?.join(".claude").join("profiles.json"))
}

/// Claude Code live settings (`~/.claude/settings.json`)
pub fn claude_settings_path() -> CoreResult<PathBuf> {
    Ok(home_dir()?.join(".claude").join("settings.json"))
}

/// Claude Code state file holding onboarding flags (`~/.claude.json`)
pub fn claude_state_path() -> CoreResult<PathBuf> {
    Ok(home_dir()?.join(".claude.json"))
}

/// Codex configuration (`~/.codex/config.toml`)
pub fn codex_config_path() -> CoreResult<PathBuf> {
    Ok(home_dir()?.join(".codex").join("config.toml"))
}

/// claude-code-router proxy configuration
pub fn proxy_config_path() -> CoreResult<PathBuf> {
    Ok(home_dir()?.join(".claude-code-router").join("config.json"))
}
