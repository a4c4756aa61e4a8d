//! Claude Code live-settings merge and credential application
//!
//! The live settings file is treated as an opaque JSON tree; only `env` and
//! `permissions.allow` are contractually touched, everything else passes
//! through a merge unchanged.

pub mod apply;
pub mod merge;
pub mod permissions;

/// Env var carrying the API key
pub const API_KEY_ENV: &str = "ANTHROPIC_API_KEY";
/// Env var carrying the session auth token
pub const AUTH_TOKEN_ENV: &str = "ANTHROPIC_AUTH_TOKEN";
/// Env var carrying the base-URL override
pub const BASE_URL_ENV: &str = "ANTHROPIC_BASE_URL";
