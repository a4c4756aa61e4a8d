//! Credential application and live-settings writes
//!
//! Runs after the merge: sets or strips the owned env keys for the selected
//! profile, then writes the fully computed settings object behind a backup.
//! A write failure surfaces as `Io` and leaves the existing file untouched.

use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

use crate::backup::backup_best_effort;
use crate::error::{CoreError, CoreResult};
use crate::profile::{AuthType, Profile};
use crate::proxy::ProxyConfig;
use crate::util::{read_json, write_atomic};

use super::merge::merge;
use super::{API_KEY_ENV, AUTH_TOKEN_ENV, BASE_URL_ENV};

/// Apply a profile's credentials to a merged settings object
///
/// `api_key` sets the API key var and removes the auth-token var;
/// `auth_token` is the inverse; `proxy` points the base URL at the local
/// proxy (defaults applied) and sets the proxy key. An explicit profile
/// endpoint overrides the base URL for non-proxy types; without one the
/// base-URL var is removed. With no profile (official mode) all three owned
/// vars are stripped.
pub fn apply_credential(settings: &mut Value, profile: Option<&Profile>, proxy: &ProxyConfig) {
    let Some(env) = env_map(settings) else {
        return;
    };

    let Some(profile) = profile else {
        env.remove(API_KEY_ENV);
        env.remove(AUTH_TOKEN_ENV);
        env.remove(BASE_URL_ENV);
        return;
    };

    match profile.auth_type {
        AuthType::ApiKey => {
            set(env, API_KEY_ENV, profile.credential.as_deref());
            env.remove(AUTH_TOKEN_ENV);
            set(env, BASE_URL_ENV, profile.endpoint.as_deref());
        }
        AuthType::AuthToken => {
            set(env, AUTH_TOKEN_ENV, profile.credential.as_deref());
            env.remove(API_KEY_ENV);
            set(env, BASE_URL_ENV, profile.endpoint.as_deref());
        }
        AuthType::Proxy => {
            env.insert(
                BASE_URL_ENV.to_string(),
                Value::String(proxy.endpoint()),
            );
            env.insert(
                API_KEY_ENV.to_string(),
                Value::String(proxy.key().to_string()),
            );
            env.remove(AUTH_TOKEN_ENV);
        }
    }
}

fn set(env: &mut Map<String, Value>, key: &str, value: Option<&str>) {
    match value {
        Some(value) => {
            env.insert(key.to_string(), Value::String(value.to_string()));
        }
        None => {
            env.remove(key);
        }
    }
}

fn env_map(settings: &mut Value) -> Option<&mut Map<String, Value>> {
    if !settings.is_object() {
        *settings = Value::Object(Map::new());
    }
    let root = settings.as_object_mut()?;
    // A non-object env would shadow the owned keys; replace it.
    if !root.get("env").is_some_and(Value::is_object) {
        root.insert("env".to_string(), Value::Object(Map::new()));
    }
    root.get_mut("env").and_then(Value::as_object_mut)
}

/// Merge template with the live settings file and apply a profile
///
/// The whole object is computed in memory first; the file is then replaced
/// atomically behind a best-effort backup. If the existing file cannot be
/// parsed nothing is written (existing content is preserved); the template
/// serves as fallback only when there is no existing file at all.
///
/// # Errors
/// `JsonParse` for an unreadable existing file, `Io` for write failures.
pub fn apply_to_settings_file(
    settings_path: &Path,
    template: &Value,
    profile: Option<&Profile>,
    proxy: &ProxyConfig,
) -> CoreResult<Option<PathBuf>> {
    let existing: Option<Value> = if settings_path.exists() {
        Some(read_json(settings_path)?)
    } else {
        None
    };

    let mut merged = merge(template, existing.as_ref());
    apply_credential(&mut merged, profile, proxy);

    let backup_path = backup_best_effort(settings_path);
    let json = serde_json::to_string_pretty(&merged)?;
    write_atomic(settings_path, &json)?;
    Ok(backup_path)
}

/// Clear the onboarding-completion flag in the tool's state file
///
/// Called when switching to official mode so the tool re-runs its own
/// login flow. Missing state file is a no-op; all other keys pass through.
///
/// # Errors
/// `JsonParse` for an unreadable state file, `Io` for write failures.
pub fn clear_onboarding_flag(state_path: &Path) -> CoreResult<Option<PathBuf>> {
    if !state_path.exists() {
        return Ok(None);
    }

    let mut state: Value = read_json(state_path)?;
    let Some(obj) = state.as_object_mut() else {
        return Err(CoreError::JsonParse {
            path: state_path.to_path_buf(),
            message: "state file is not a JSON object".to_string(),
        });
    };
    obj.insert("hasCompletedOnboarding".to_string(), Value::Bool(false));

    let backup_path = backup_best_effort(state_path);
    let json = serde_json::to_string_pretty(&state)?;
    write_atomic(state_path, &json)?;
    Ok(backup_path)
}
