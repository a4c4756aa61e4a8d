//! Profile types and store document shape

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::{CoreError, CoreResult};

/// How a profile authenticates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthType {
    /// Long-lived API key (`ANTHROPIC_API_KEY`)
    ApiKey,
    /// Session auth token (`ANTHROPIC_AUTH_TOKEN`)
    AuthToken,
    /// Local proxy; endpoint and key come from the proxy's own config
    Proxy,
}

impl AuthType {
    /// Whether this auth type requires a stored credential
    #[must_use]
    pub fn requires_credential(self) -> bool {
        matches!(self, Self::ApiKey | Self::AuthToken)
    }
}

impl std::fmt::Display for AuthType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey => write!(f, "api_key"),
            Self::AuthToken => write!(f, "auth_token"),
            Self::Proxy => write!(f, "proxy"),
        }
    }
}

/// One saved credential set
///
/// The id is the map key in [`StoreData`], derived from `name` unless pinned
/// (the reserved proxy profile).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Display name, unique case-insensitively within the store
    pub name: String,
    /// Authentication mode
    pub auth_type: AuthType,
    /// Opaque secret; required for credentialed auth types
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
    /// Optional base-URL override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl Profile {
    /// Validate shape: non-empty name, credential for credentialed types,
    /// well-formed endpoint URL
    ///
    /// # Errors
    /// Returns a validation error describing the first violated rule.
    pub fn validate(&self) -> CoreResult<()> {
        if self.name.trim().is_empty() {
            return Err(CoreError::Validation("profile name is empty".to_string()));
        }
        if self.auth_type.requires_credential()
            && self.credential.as_deref().map_or(true, str::is_empty)
        {
            return Err(CoreError::Validation(format!(
                "auth type '{}' requires a credential",
                self.auth_type
            )));
        }
        if let Some(endpoint) = &self.endpoint {
            validate_url(endpoint)?;
        }
        Ok(())
    }
}

fn validate_url(url: &str) -> CoreResult<()> {
    let rest = url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"));
    match rest {
        Some(host) if !host.is_empty() && !host.starts_with('/') => Ok(()),
        _ => Err(CoreError::Validation(format!("invalid endpoint URL: {url}"))),
    }
}

/// Partial update for an existing profile
///
/// Unset fields are left untouched. `clear_endpoint` removes the override;
/// the id itself is never caller-settable and only changes via a rename.
#[derive(Debug, Clone, Default)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub auth_type: Option<AuthType>,
    pub credential: Option<String>,
    pub endpoint: Option<String>,
    pub clear_endpoint: bool,
}

/// The persisted store aggregate
///
/// `profiles` is a `BTreeMap` so iteration order is lexicographic by id;
/// that makes the current-pointer repair after deleting the current profile
/// deterministic (smallest remaining id).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreData {
    /// Empty string means no profile selected (official mode)
    #[serde(default)]
    pub current_profile_id: String,
    /// id -> profile, keys unique by construction
    #[serde(default)]
    pub profiles: BTreeMap<String, Profile>,
}
