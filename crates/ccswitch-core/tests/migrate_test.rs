//! Legacy store migration tests

use std::fs;
use std::path::PathBuf;

use serde_json::json;

use ccswitch_core::profile::{AuthType, ProfileStore};

fn paths(dir: &tempfile::TempDir) -> (PathBuf, PathBuf) {
    (
        dir.path().join("profiles.json"),
        dir.path().join("legacy-profiles.json"),
    )
}

fn seed_legacy(path: &PathBuf, value: serde_json::Value) {
    fs::write(path, serde_json::to_string_pretty(&value).expect("json")).expect("seed legacy");
}

#[test]
fn legacy_entries_are_rekeyed_by_slug() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (path, legacy) = paths(&dir);
    seed_legacy(
        &legacy,
        json!({
            "current": "Work Account",
            "profiles": [
                {"name": "Work Account", "type": "api_key", "key": "sk-work"},
                {"name": "Gateway", "type": "auth_token", "key": "tok-1", "url": "https://gw.example.com"}
            ]
        }),
    );

    let store = ProfileStore::open(&path, &legacy).expect("open");
    assert_eq!(store.len(), 2);
    assert_eq!(store.current_id(), Some("work-account"));

    let work = store.get("work-account").expect("entry");
    assert_eq!(work.auth_type, AuthType::ApiKey);
    assert_eq!(work.credential.as_deref(), Some("sk-work"));

    let gateway = store.get("gateway").expect("entry");
    assert_eq!(gateway.auth_type, AuthType::AuthToken);
    assert_eq!(gateway.endpoint.as_deref(), Some("https://gw.example.com"));

    // Migration wrote the current-format store to disk.
    assert!(path.exists());
}

#[test]
fn colliding_legacy_names_get_suffixed_ids() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (path, legacy) = paths(&dir);
    seed_legacy(
        &legacy,
        json!({
            "profiles": [
                {"name": "My Team", "type": "api_key", "key": "sk-a"},
                {"name": "my team!", "type": "api_key", "key": "sk-b"}
            ]
        }),
    );

    let store = ProfileStore::open(&path, &legacy).expect("open");
    assert_eq!(store.len(), 2);
    assert_eq!(store.get("my-team").expect("first").credential.as_deref(), Some("sk-a"));
    assert_eq!(store.get("my-team-2").expect("second").credential.as_deref(), Some("sk-b"));
}

#[test]
fn unknown_current_falls_back_to_first_id() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (path, legacy) = paths(&dir);
    seed_legacy(
        &legacy,
        json!({
            "current": "Deleted Long Ago",
            "profiles": [
                {"name": "Zeta", "type": "api_key", "key": "sk-z"},
                {"name": "Alpha", "type": "api_key", "key": "sk-a"}
            ]
        }),
    );

    let store = ProfileStore::open(&path, &legacy).expect("open");
    assert_eq!(store.current_id(), Some("alpha"));
}

#[test]
fn invalid_legacy_entries_are_skipped() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (path, legacy) = paths(&dir);
    seed_legacy(
        &legacy,
        json!({
            "profiles": [
                {"name": "Keyless", "type": "api_key"},
                {"name": "Good", "type": "api_key", "key": "sk-g"}
            ]
        }),
    );

    let store = ProfileStore::open(&path, &legacy).expect("open");
    assert_eq!(store.len(), 1);
    assert_eq!(store.current_id(), Some("good"));
}

#[test]
fn migration_runs_once_and_leaves_the_legacy_file_alone() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (path, legacy) = paths(&dir);
    seed_legacy(
        &legacy,
        json!({
            "current": "Work",
            "profiles": [{"name": "Work", "type": "api_key", "key": "sk-work"}]
        }),
    );
    let legacy_before = fs::read_to_string(&legacy).expect("read legacy");

    let mut store = ProfileStore::open(&path, &legacy).expect("first open");
    store.switch_to_default().expect("deselect");

    // The migrated store wins on reopen even though it no longer matches
    // the legacy file.
    let reopened = ProfileStore::open(&path, &legacy).expect("second open");
    assert_eq!(reopened.current_id(), None);
    assert_eq!(reopened.len(), 1);

    assert_eq!(fs::read_to_string(&legacy).expect("read legacy"), legacy_before);
}

#[test]
fn missing_legacy_file_yields_an_empty_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    let (path, legacy) = paths(&dir);

    let store = ProfileStore::open(&path, &legacy).expect("open");
    assert!(store.is_empty());
    assert_eq!(store.current_id(), None);
    // Nothing to migrate, nothing written.
    assert!(!path.exists());
}
