//! Local proxy (claude-code-router) configuration
//!
//! The proxy keeps its own config file; ccswitch only reads it to derive the
//! endpoint and API key for the reserved proxy profile and for credential
//! application in proxy mode.

use serde::Deserialize;
use std::path::Path;

use crate::error::CoreResult;
use crate::util::read_json;

/// Reserved profile id for the proxy integration; never renamed
pub const PROXY_PROFILE_ID: &str = "ccr-proxy";

/// Display name for the reserved proxy profile
pub const PROXY_PROFILE_NAME: &str = "Claude Code Router";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3456;
const DEFAULT_API_KEY: &str = "sk-ccswitch-proxy";

/// Parsed proxy configuration (all fields optional in the file)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProxyConfig {
    #[serde(rename = "HOST")]
    pub host: Option<String>,
    #[serde(rename = "PORT")]
    pub port: Option<u16>,
    #[serde(rename = "APIKEY")]
    pub api_key: Option<String>,
}

impl ProxyConfig {
    /// Load the proxy config; `Ok(None)` when the file does not exist
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be read or parsed.
    pub fn load(path: &Path) -> CoreResult<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(read_json(path)?))
    }

    /// Base URL the proxy listens on, with defaults applied
    #[must_use]
    pub fn endpoint(&self) -> String {
        let host = self.host.as_deref().unwrap_or(DEFAULT_HOST);
        let port = self.port.unwrap_or(DEFAULT_PORT);
        format!("http://{host}:{port}")
    }

    /// API key the proxy expects, with the fixed default applied
    #[must_use]
    pub fn key(&self) -> &str {
        self.api_key.as_deref().unwrap_or(DEFAULT_API_KEY)
    }
}
