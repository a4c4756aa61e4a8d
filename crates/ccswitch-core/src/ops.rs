//! Result objects returned across the public mutation boundary

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::CoreError;

/// Result of an executed mutation
///
/// Every store or settings mutation reports through this shape so the CLI
/// can render success, the error message, and where the pre-write backup
/// landed. A missing `backup_path` on success means backup was skipped
/// (no source file) or failed best-effort.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationOutcome {
    /// Whether the operation succeeded
    pub success: bool,

    /// Error message (if failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Machine-readable error code (if failed)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,

    /// Backup written before the mutation, when one was taken
    #[serde(skip_serializing_if = "Option::is_none")]
    pub backup_path: Option<PathBuf>,
}

impl OperationOutcome {
    /// Create a success outcome
    #[must_use]
    pub fn success(backup_path: Option<PathBuf>) -> Self {
        Self {
            success: true,
            error: None,
            code: None,
            backup_path,
        }
    }

    /// Create a failure outcome from a core error
    #[must_use]
    pub fn failure(err: &CoreError) -> Self {
        Self {
            success: false,
            error: Some(err.to_string()),
            code: Some(err.code().to_string()),
            backup_path: None,
        }
    }
}

impl From<Result<Option<PathBuf>, CoreError>> for OperationOutcome {
    fn from(result: Result<Option<PathBuf>, CoreError>) -> Self {
        match result {
            Ok(backup_path) => Self::success(backup_path),
            Err(err) => Self::failure(&err),
        }
    }
}
