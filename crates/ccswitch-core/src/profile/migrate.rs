//! One-shot migration from the legacy single-file store
//!
//! Earlier releases kept profiles in `~/.claude/profiles.json` as a flat
//! list keyed by display name. On first open, if the current-format store is
//! absent or empty and a legacy file exists, its entries are re-keyed by
//! derived slug and written out in the current format. The legacy file is
//! never modified.

use serde::Deserialize;
use std::path::Path;

use crate::error::CoreResult;
use crate::slug;
use crate::util::{read_json, write_atomic};

use super::types::{AuthType, Profile, StoreData};

/// Legacy store shape: `{"current": name, "profiles": [{name, type, key, url}]}`
#[derive(Debug, Deserialize)]
struct LegacyStore {
    #[serde(default)]
    current: Option<String>,
    #[serde(default)]
    profiles: Vec<LegacyProfile>,
}

#[derive(Debug, Deserialize)]
struct LegacyProfile {
    name: String,
    #[serde(rename = "type")]
    auth_type: String,
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

/// Load the current store, migrating from the legacy file when needed
///
/// Idempotent: once the migrated store has been written, subsequent calls
/// read only the current format.
///
/// # Errors
/// Returns an error if either file exists but cannot be read or parsed, or
/// if writing the migrated store fails.
pub fn load_or_migrate(path: &Path, legacy_path: &Path) -> CoreResult<StoreData> {
    if path.exists() {
        let data: StoreData = read_json(path)?;
        if !data.profiles.is_empty() {
            return Ok(data);
        }
    }

    if legacy_path.as_os_str().is_empty() || !legacy_path.exists() {
        return Ok(StoreData::default());
    }

    let legacy: LegacyStore = read_json(legacy_path)?;
    let data = convert(&legacy);
    if data.profiles.is_empty() {
        return Ok(data);
    }

    let json = serde_json::to_string_pretty(&data)?;
    write_atomic(path, &json)?;
    log::debug!(
        "migrated {} legacy profile(s) from {}",
        data.profiles.len(),
        legacy_path.display()
    );
    Ok(data)
}

fn convert(legacy: &LegacyStore) -> StoreData {
    let mut data = StoreData::default();

    for entry in &legacy.profiles {
        let auth_type = match entry.auth_type.as_str() {
            "auth_token" => AuthType::AuthToken,
            // Everything else was an API key in the legacy format.
            _ => AuthType::ApiKey,
        };
        let profile = Profile {
            name: entry.name.clone(),
            auth_type,
            credential: entry.key.clone(),
            endpoint: entry.url.clone(),
        };
        if profile.validate().is_err() {
            log::warn!("skipping invalid legacy profile '{}'", entry.name);
            continue;
        }
        let id = slug::unique(&entry.name, |candidate| {
            data.profiles.contains_key(candidate)
        });
        data.profiles.insert(id, profile);
    }

    // Best-effort current mapping: derived id first, then display name,
    // then first available.
    if let Some(current_name) = &legacy.current {
        let derived = slug::generate(current_name);
        if data.profiles.contains_key(&derived) {
            data.current_profile_id = derived;
        } else if let Some((id, _)) = data
            .profiles
            .iter()
            .find(|(_, p)| p.name.eq_ignore_ascii_case(current_name))
        {
            data.current_profile_id = id.clone();
        }
    }
    if data.current_profile_id.is_empty() {
        if let Some(id) = data.profiles.keys().next() {
            data.current_profile_id.clone_from(id);
        }
    }

    data
}
