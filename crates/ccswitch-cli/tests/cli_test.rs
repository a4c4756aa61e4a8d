//! CLI integration tests using assert_cmd
//!
//! Every test redirects HOME to a temp directory so no real configuration
//! is touched.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get a command instance for the ccswitch binary
fn ccswitch_cmd(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("ccswitch").expect("Failed to find ccswitch binary");
    cmd.env("HOME", home.path());
    cmd
}

fn add_profile(home: &TempDir, name: &str, key: &str) {
    ccswitch_cmd(home)
        .args(["profile", "add", name, "--key", key])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created profile"));
}

#[test]
fn test_help_command() {
    let home = TempDir::new().expect("Failed to create temp dir");
    ccswitch_cmd(&home)
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "connection profile manager for Claude Code and Codex",
        ));
}

#[test]
fn test_version_command() {
    let home = TempDir::new().expect("Failed to create temp dir");
    ccswitch_cmd(&home)
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("ccswitch"));
}

#[test]
fn test_unknown_subcommand_fails() {
    let home = TempDir::new().expect("Failed to create temp dir");
    ccswitch_cmd(&home)
        .arg("unknown-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_profile_list_empty() {
    let home = TempDir::new().expect("Failed to create temp dir");
    ccswitch_cmd(&home)
        .args(["profile", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No profiles found"));
}

#[test]
fn test_profile_add_and_list() {
    let home = TempDir::new().expect("Failed to create temp dir");
    add_profile(&home, "Work Account", "sk-work");

    ccswitch_cmd(&home)
        .args(["profile", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* work-account - Work Account [api_key]"));
}

#[test]
fn test_profile_add_duplicate_fails() {
    let home = TempDir::new().expect("Failed to create temp dir");
    add_profile(&home, "Work", "sk-work");

    ccswitch_cmd(&home)
        .args(["profile", "add", "work", "--key", "sk-other"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_profile_update_renames() {
    let home = TempDir::new().expect("Failed to create temp dir");
    add_profile(&home, "Work", "sk-work");

    ccswitch_cmd(&home)
        .args(["profile", "update", "work", "--name", "Work EU"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated profile: work-eu"));
}

#[test]
fn test_profile_delete_last_fails() {
    let home = TempDir::new().expect("Failed to create temp dir");
    add_profile(&home, "Work", "sk-work");

    ccswitch_cmd(&home)
        .args(["profile", "delete", "work"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

#[test]
fn test_profile_add_json_outcome() {
    let home = TempDir::new().expect("Failed to create temp dir");
    ccswitch_cmd(&home)
        .args(["profile", "add", "Work", "--key", "sk-work", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"success\": true"));
}

#[test]
fn test_profile_delete_json_failure_outcome() {
    let home = TempDir::new().expect("Failed to create temp dir");
    add_profile(&home, "Work", "sk-work");

    ccswitch_cmd(&home)
        .args(["profile", "delete", "work", "--json"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("\"success\": false"))
        .stdout(predicate::str::contains("LAST_PROFILE"));
}

#[test]
fn test_claude_switch_writes_settings() {
    let home = TempDir::new().expect("Failed to create temp dir");
    add_profile(&home, "Work", "sk-work");

    ccswitch_cmd(&home)
        .args(["claude", "work"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Switched Claude Code to profile 'Work'"));

    let settings = fs::read_to_string(home.path().join(".claude/settings.json"))
        .expect("settings written");
    assert!(settings.contains("\"ANTHROPIC_API_KEY\": \"sk-work\""));
}

#[test]
fn test_claude_official_strips_credentials() {
    let home = TempDir::new().expect("Failed to create temp dir");
    add_profile(&home, "Work", "sk-work");

    ccswitch_cmd(&home)
        .args(["claude", "work"])
        .assert()
        .success();

    ccswitch_cmd(&home)
        .args(["claude", "official"])
        .assert()
        .success()
        .stdout(predicate::str::contains("official login"));

    let settings = fs::read_to_string(home.path().join(".claude/settings.json"))
        .expect("settings written");
    assert!(!settings.contains("ANTHROPIC_API_KEY"));
}

#[test]
fn test_claude_unknown_profile_fails() {
    let home = TempDir::new().expect("Failed to create temp dir");
    add_profile(&home, "Work", "sk-work");

    ccswitch_cmd(&home)
        .args(["claude", "nonexistent"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Profile not found"));
}

#[test]
fn test_claude_current_without_target() {
    let home = TempDir::new().expect("Failed to create temp dir");
    ccswitch_cmd(&home)
        .arg("claude")
        .assert()
        .success()
        .stdout(predicate::str::contains("official login"));
}

#[test]
fn test_codex_list_empty() {
    let home = TempDir::new().expect("Failed to create temp dir");
    ccswitch_cmd(&home)
        .args(["codex", "--list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No providers found"));
}

#[test]
fn test_provider_add_and_codex_switch() {
    let home = TempDir::new().expect("Failed to create temp dir");

    ccswitch_cmd(&home)
        .args([
            "provider",
            "add",
            "openrouter",
            "--name",
            "OpenRouter",
            "--base-url",
            "https://openrouter.ai/api/v1",
            "--env-key",
            "OPENROUTER_API_KEY",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Saved provider 'openrouter'"));

    ccswitch_cmd(&home)
        .args(["codex", "openrouter"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Switched Codex to provider 'openrouter'"));

    let config = fs::read_to_string(home.path().join(".codex/config.toml"))
        .expect("config written");
    assert!(config.contains("model_provider = \"openrouter\""));
    assert!(config.contains("[model_providers.openrouter]"));
}

#[test]
fn test_codex_unknown_provider_fails() {
    let home = TempDir::new().expect("Failed to create temp dir");
    ccswitch_cmd(&home)
        .args(["codex", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Provider not found"));
}
