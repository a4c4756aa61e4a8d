//! Claude Code switching commands
//!
//! Handles: ccswitch claude [--list] [TARGET]

use anyhow::{anyhow, bail, Context};

use ccswitch_core::paths;
use ccswitch_core::profile::ProfileStore;
use ccswitch_core::proxy::{ProxyConfig, PROXY_PROFILE_ID};
use ccswitch_core::settings::apply::{apply_to_settings_file, clear_onboarding_flag};

use super::print_backup;

/// Packaged settings template merged into the live file on every switch
const SETTINGS_TEMPLATE: &str = include_str!("../../assets/settings-template.json");

/// Keyword switching back to the built-in login
pub const OFFICIAL_TARGET: &str = "official";

/// Keyword switching to the local proxy
pub const PROXY_TARGET: &str = "ccr";

fn template() -> anyhow::Result<serde_json::Value> {
    serde_json::from_str(SETTINGS_TEMPLATE).context("packaged settings template is invalid")
}

fn open_store() -> anyhow::Result<(ProfileStore, Option<ProxyConfig>)> {
    let mut store = ProfileStore::open(&paths::profile_store_path()?, &paths::legacy_store_path()?)?;
    let proxy = ProxyConfig::load(&paths::proxy_config_path()?)?;
    store.sync_proxy_profile(proxy.as_ref())?;
    Ok((store, proxy))
}

pub fn execute(target: Option<&str>, list: bool) -> anyhow::Result<()> {
    let (mut store, proxy) = open_store()?;

    if list {
        print_profiles(&store);
        return Ok(());
    }

    let Some(target) = target else {
        match store.current() {
            Some(profile) => println!("Current profile: {} ({})", profile.name, profile.auth_type),
            None => println!("Current profile: official login"),
        }
        return Ok(());
    };

    let settings_path = paths::claude_settings_path()?;
    let proxy_or_default = proxy.clone().unwrap_or_default();

    match target {
        OFFICIAL_TARGET => {
            store.switch_to_default()?;
            let backup = apply_to_settings_file(&settings_path, &template()?, None, &proxy_or_default)?;
            clear_onboarding_flag(&paths::claude_state_path()?)?;
            println!("Switched Claude Code to official login.");
            print_backup(backup.as_deref());
        }
        PROXY_TARGET => {
            if proxy.is_none() {
                bail!(
                    "Proxy config not found: {}",
                    paths::proxy_config_path()?.display()
                );
            }
            store.switch(PROXY_PROFILE_ID)?;
            let profile = store
                .get(PROXY_PROFILE_ID)
                .cloned()
                .ok_or_else(|| anyhow!("reserved proxy profile missing after sync"))?;
            let backup = apply_to_settings_file(
                &settings_path,
                &template()?,
                Some(&profile),
                &proxy_or_default,
            )?;
            println!("Switched Claude Code to the local proxy.");
            print_backup(backup.as_deref());
        }
        other => {
            let id = store
                .resolve(other)
                .ok_or_else(|| anyhow!("Profile not found: {other}"))?;
            store.switch(&id)?;
            let profile = store
                .get(&id)
                .cloned()
                .ok_or_else(|| anyhow!("Profile not found: {other}"))?;
            let backup = apply_to_settings_file(
                &settings_path,
                &template()?,
                Some(&profile),
                &proxy_or_default,
            )?;
            println!("Switched Claude Code to profile '{}'.", profile.name);
            print_backup(backup.as_deref());
        }
    }

    Ok(())
}

fn print_profiles(store: &ProfileStore) {
    let profiles = store.list();
    if profiles.is_empty() {
        println!("No profiles found.");
        return;
    }
    println!("Profiles:");
    for (id, profile) in profiles {
        let marker = if store.current_id() == Some(id) { "*" } else { " " };
        let endpoint = profile.endpoint.as_deref().unwrap_or("default endpoint");
        println!("{marker} {id} - {} [{}] ({endpoint})", profile.name, profile.auth_type);
    }
}
