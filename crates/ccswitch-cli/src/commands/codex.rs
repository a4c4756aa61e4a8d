//! Codex switching and provider-table commands
//!
//! Handles: ccswitch codex [--list] [TARGET] and ccswitch provider add/remove

use anyhow::anyhow;
use clap::Subcommand;

use ccswitch_core::codex::{CodexConfig, ProviderEntry};
use ccswitch_core::paths;

use super::claude::OFFICIAL_TARGET;
use super::print_backup;

/// Provider-table maintenance commands
#[derive(Subcommand)]
pub enum ProviderCommands {
    /// List configured providers
    List,
    /// Add or replace a provider entry
    Add {
        /// Provider id (section key)
        id: String,

        /// Display name (defaults to the id)
        #[arg(long)]
        name: Option<String>,

        /// Endpoint base URL
        #[arg(long)]
        base_url: String,

        /// Wire protocol (`responses` or `chat`)
        #[arg(long, default_value = "chat")]
        wire_api: String,

        /// Env var carrying the provider's API key
        #[arg(long)]
        env_key: String,
    },
    /// Remove a provider entry
    Remove {
        /// Provider id
        id: String,
    },
}

fn open_config() -> anyhow::Result<CodexConfig> {
    Ok(CodexConfig::open(&paths::codex_config_path()?)?)
}

pub fn execute(target: Option<&str>, list: bool) -> anyhow::Result<()> {
    let mut config = open_config()?;

    if list {
        print_providers(&config)?;
        return Ok(());
    }

    let Some(target) = target else {
        match config.active_provider_id() {
            Some(id) => println!("Current provider: {id}"),
            None => println!("Current provider: official login"),
        }
        return Ok(());
    };

    if target == OFFICIAL_TARGET {
        let backup = config.switch_to_official()?;
        println!("Switched Codex to official login.");
        print_backup(backup.as_deref());
        return Ok(());
    }

    let id = resolve_provider(&config, target)?;
    let backup = config.switch_provider(&id)?;
    println!("Switched Codex to provider '{id}'.");
    print_backup(backup.as_deref());
    Ok(())
}

pub fn execute_provider(action: ProviderCommands) -> anyhow::Result<()> {
    let mut config = open_config()?;

    match action {
        ProviderCommands::List => print_providers(&config)?,
        ProviderCommands::Add {
            id,
            name,
            base_url,
            wire_api,
            env_key,
        } => {
            let entry = ProviderEntry {
                display_name: name.unwrap_or_else(|| id.clone()),
                id,
                base_url,
                wire_protocol: wire_api,
                credential_env_var: env_key,
                requires_special_auth: false,
            };
            let backup = config.upsert_provider(&entry)?;
            println!("Saved provider '{}'.", entry.id);
            print_backup(backup.as_deref());
        }
        ProviderCommands::Remove { id } => {
            let backup = config.remove_provider(&id)?;
            println!("Removed provider '{id}'.");
            print_backup(backup.as_deref());
        }
    }
    Ok(())
}

/// Match a target against provider ids first, then display names
/// (case-insensitive)
fn resolve_provider(config: &CodexConfig, target: &str) -> anyhow::Result<String> {
    let providers = config.list_providers()?;
    if providers.iter().any(|p| p.id == target) {
        return Ok(target.to_string());
    }
    providers
        .iter()
        .find(|p| p.display_name.eq_ignore_ascii_case(target))
        .map(|p| p.id.clone())
        .ok_or_else(|| anyhow!("Provider not found: {target}"))
}

fn print_providers(config: &CodexConfig) -> anyhow::Result<()> {
    let providers = config.list_providers()?;
    if providers.is_empty() {
        println!("No providers found.");
        return Ok(());
    }
    let active = config.active_provider_id();
    println!("Providers:");
    for p in providers {
        let marker = if active.as_deref() == Some(p.id.as_str()) {
            "*"
        } else {
            " "
        };
        println!(
            "{marker} {} - {} [{}] ({})",
            p.id, p.display_name, p.wire_protocol, p.base_url
        );
    }
    Ok(())
}
