//! Profile CRUD commands
//!
//! Handles: ccswitch profile list/add/update/delete

use anyhow::bail;
use clap::Subcommand;
use std::path::PathBuf;

use ccswitch_core::paths;
use ccswitch_core::profile::{AuthType, Profile, ProfileStore, ProfileUpdate};
use ccswitch_core::{CoreError, OperationOutcome};

use super::print_backup;

/// Profile store commands
#[derive(Subcommand)]
pub enum ProfileCommands {
    /// List all profiles
    List,
    /// Add a new profile
    Add {
        /// Display name (the id is derived from it)
        name: String,

        /// Auth type (api_key, auth_token)
        #[arg(long = "type", value_name = "TYPE", default_value = "api_key")]
        auth_type: String,

        /// Credential value
        #[arg(long)]
        key: String,

        /// Optional base-URL override
        #[arg(long)]
        url: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Update an existing profile
    Update {
        /// Profile id or name
        profile: String,

        /// New display name (renames the id)
        #[arg(long)]
        name: Option<String>,

        /// New auth type (api_key, auth_token)
        #[arg(long = "type", value_name = "TYPE")]
        auth_type: Option<String>,

        /// New credential value
        #[arg(long)]
        key: Option<String>,

        /// New base-URL override
        #[arg(long, conflicts_with = "clear_url")]
        url: Option<String>,

        /// Remove the base-URL override
        #[arg(long)]
        clear_url: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Delete one or more profiles
    Delete {
        /// Profile ids or names
        #[arg(required = true)]
        profiles: Vec<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

fn parse_auth_type(s: &str) -> anyhow::Result<AuthType> {
    match s {
        "api_key" => Ok(AuthType::ApiKey),
        "auth_token" => Ok(AuthType::AuthToken),
        other => bail!("Invalid auth type: {other} (expected api_key or auth_token)"),
    }
}

fn open_store() -> anyhow::Result<ProfileStore> {
    Ok(ProfileStore::open(
        &paths::profile_store_path()?,
        &paths::legacy_store_path()?,
    )?)
}

fn resolve(store: &ProfileStore, target: &str) -> Result<String, CoreError> {
    store
        .resolve(target)
        .ok_or_else(|| CoreError::NotFound(target.to_string()))
}

/// Render a mutation result: JSON outcome or human text plus the backup note
fn emit(
    json: bool,
    result: Result<(String, Option<PathBuf>), CoreError>,
) -> anyhow::Result<()> {
    match result {
        Ok((message, backup_path)) => {
            if json {
                let outcome = OperationOutcome::success(backup_path);
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                println!("{message}");
                print_backup(backup_path.as_deref());
            }
            Ok(())
        }
        Err(err) => {
            if json {
                let outcome = OperationOutcome::failure(&err);
                println!("{}", serde_json::to_string_pretty(&outcome)?);
                std::process::exit(1);
            }
            Err(err.into())
        }
    }
}

pub fn execute(action: ProfileCommands) -> anyhow::Result<()> {
    let mut store = open_store()?;

    match action {
        ProfileCommands::List => {
            let profiles = store.list();
            if profiles.is_empty() {
                println!("No profiles found.");
            } else {
                println!("Profiles:");
                for (id, profile) in profiles {
                    let marker = if store.current_id() == Some(id) { "*" } else { " " };
                    println!("{marker} {id} - {} [{}]", profile.name, profile.auth_type);
                }
            }
            Ok(())
        }
        ProfileCommands::Add {
            name,
            auth_type,
            key,
            url,
            json,
        } => {
            let profile = Profile {
                name,
                auth_type: parse_auth_type(&auth_type)?,
                credential: Some(key),
                endpoint: url,
            };
            let result = store
                .add(profile)
                .map(|m| (format!("Created profile: {}", m.id), m.backup_path));
            emit(json, result)
        }
        ProfileCommands::Update {
            profile,
            name,
            auth_type,
            key,
            url,
            clear_url,
            json,
        } => {
            let update = ProfileUpdate {
                name,
                auth_type: auth_type.as_deref().map(parse_auth_type).transpose()?,
                credential: key,
                endpoint: url,
                clear_endpoint: clear_url,
            };
            let result = resolve(&store, &profile)
                .and_then(|id| store.update(&id, update))
                .map(|m| (format!("Updated profile: {}", m.id), m.backup_path));
            emit(json, result)
        }
        ProfileCommands::Delete { profiles, json } => {
            let result = profiles
                .iter()
                .map(|p| resolve(&store, p))
                .collect::<Result<Vec<_>, _>>()
                .and_then(|ids| {
                    let backup = store.delete_many(&ids)?;
                    Ok((format!("Deleted {} profile(s).", ids.len()), backup))
                });
            emit(json, result)
        }
    }
}
