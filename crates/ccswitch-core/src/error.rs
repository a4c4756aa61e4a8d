//! Error types for core operations

use std::path::PathBuf;
use thiserror::Error;

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur during profile and config operations
#[derive(Debug, Error)]
pub enum CoreError {
    /// Bad input shape: empty name, bad URL, missing credential, bad auth type
    #[error("Validation error: {0}")]
    Validation(String),

    /// Duplicate profile id or display name
    #[error("Profile '{name}' conflicts with existing entry '{existing}'")]
    Conflict { name: String, existing: String },

    /// Referenced id absent
    #[error("'{0}' not found")]
    NotFound(String),

    /// Would remove the only remaining profile
    #[error("Cannot delete the last remaining profile")]
    LastProfile,

    /// File I/O error
    #[error("I/O error for {path}: {message}")]
    Io { path: PathBuf, message: String },

    /// JSON parse error
    #[error("JSON parse error in {path}: {message}")]
    JsonParse { path: PathBuf, message: String },

    /// TOML parse error inside a provider or service section
    #[error("TOML parse error in section '{section}': {message}")]
    TomlParse { section: String, message: String },
}

impl CoreError {
    /// Get the error code for CLI/API responses
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Conflict { .. } => "CONFLICT",
            Self::NotFound(_) => "NOT_FOUND",
            Self::LastProfile => "LAST_PROFILE",
            Self::Io { .. } => "IO_ERROR",
            Self::JsonParse { .. } | Self::TomlParse { .. } => "PARSE_ERROR",
        }
    }

    /// Wrap an I/O error with the path it happened on
    pub fn io(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: PathBuf::new(),
            message: err.to_string(),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonParse {
            path: PathBuf::new(),
            message: err.to_string(),
        }
    }
}
