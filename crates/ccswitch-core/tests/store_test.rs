//! Profile store CRUD tests

use std::path::PathBuf;

use ccswitch_core::error::CoreError;
use ccswitch_core::profile::{AuthType, Profile, ProfileStore, ProfileUpdate};
use ccswitch_core::proxy::{ProxyConfig, PROXY_PROFILE_ID};

fn store_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join("profiles.json")
}

fn open(dir: &tempfile::TempDir) -> ProfileStore {
    ProfileStore::open_current_only(&store_path(dir)).expect("open store")
}

fn profile(name: &str) -> Profile {
    Profile {
        name: name.to_string(),
        auth_type: AuthType::ApiKey,
        credential: Some(format!("sk-{name}")),
        endpoint: None,
    }
}

#[test]
fn first_added_profile_becomes_current() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open(&dir);

    let mutation = store.add(profile("Work")).expect("add");
    assert_eq!(mutation.id, "work");
    assert_eq!(store.current_id(), Some("work"));

    store.add(profile("Personal")).expect("add second");
    assert_eq!(store.current_id(), Some("work"));
    assert_eq!(store.len(), 2);
}

#[test]
fn adding_same_name_twice_conflicts() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open(&dir);

    store.add(profile("Work")).expect("add");
    let err = store.add(profile("Work")).expect_err("duplicate");
    assert_eq!(err.code(), "CONFLICT");
}

#[test]
fn name_uniqueness_is_case_insensitive() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open(&dir);

    store.add(profile("Work")).expect("add");
    let err = store.add(profile("WORK")).expect_err("case conflict");
    assert!(matches!(err, CoreError::Conflict { .. }));
}

#[test]
fn colliding_derived_ids_conflict() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open(&dir);

    store.add(profile("My Team")).expect("add");
    // Different display name, same slug.
    let err = store.add(profile("my team!")).expect_err("slug conflict");
    assert!(matches!(err, CoreError::Conflict { .. }));
}

#[test]
fn add_validates_shape() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open(&dir);

    let mut missing_credential = profile("Work");
    missing_credential.credential = None;
    assert_eq!(
        store.add(missing_credential).expect_err("no cred").code(),
        "VALIDATION_ERROR"
    );

    let mut bad_url = profile("Work");
    bad_url.endpoint = Some("ftp://nope".to_string());
    assert_eq!(
        store.add(bad_url).expect_err("bad url").code(),
        "VALIDATION_ERROR"
    );
    assert!(store.is_empty());
}

#[test]
fn deleting_the_last_profile_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open(&dir);

    store.add(profile("Work")).expect("add");
    let err = store.delete("work").expect_err("last profile");
    assert!(matches!(err, CoreError::LastProfile));
    assert_eq!(store.len(), 1);
}

#[test]
fn deleting_current_repoints_to_smallest_remaining_id() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open(&dir);

    store.add(profile("Work")).expect("add work");
    store.add(profile("Personal")).expect("add personal");
    assert_eq!(store.current_id(), Some("work"));

    store.delete("work").expect("delete current");
    assert_eq!(store.current_id(), Some("personal"));
    assert_eq!(store.len(), 1);
}

#[test]
fn delete_unknown_id_is_not_found() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open(&dir);
    store.add(profile("Work")).expect("add");

    let err = store.delete("nope").expect_err("unknown");
    assert_eq!(err.code(), "NOT_FOUND");
}

#[test]
fn delete_many_is_atomic() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open(&dir);
    store.add(profile("Work")).expect("add");
    store.add(profile("Personal")).expect("add");
    store.add(profile("Team")).expect("add");

    // One missing id: nothing is deleted.
    let err = store
        .delete_many(&["work".to_string(), "ghost".to_string()])
        .expect_err("missing id");
    assert_eq!(err.code(), "NOT_FOUND");
    assert_eq!(store.len(), 3);

    // Removing everything: nothing is deleted.
    let all = vec![
        "work".to_string(),
        "personal".to_string(),
        "team".to_string(),
    ];
    let err = store.delete_many(&all).expect_err("would empty store");
    assert!(matches!(err, CoreError::LastProfile));
    assert_eq!(store.len(), 3);

    store
        .delete_many(&["work".to_string(), "team".to_string()])
        .expect("valid batch");
    assert_eq!(store.len(), 1);
    assert_eq!(store.current_id(), Some("personal"));
}

#[test]
fn delete_many_keeps_official_mode_deselected() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open(&dir);
    store.add(profile("Work")).expect("add");
    store.add(profile("Personal")).expect("add");
    store.switch_to_default().expect("deselect");

    store
        .delete_many(&["personal".to_string()])
        .expect("delete");
    assert_eq!(store.current_id(), None);
    assert_eq!(store.len(), 1);
}

#[test]
fn rename_moves_id_and_repoints_current() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open(&dir);
    store.add(profile("Work")).expect("add");

    let mutation = store
        .update(
            "work",
            ProfileUpdate {
                name: Some("Work EU".to_string()),
                ..ProfileUpdate::default()
            },
        )
        .expect("rename");
    assert_eq!(mutation.id, "work-eu");
    assert!(store.get("work").is_none());
    assert_eq!(store.current_id(), Some("work-eu"));
    assert_eq!(store.get("work-eu").expect("entry").name, "Work EU");
}

#[test]
fn rename_onto_existing_id_conflicts() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open(&dir);
    store.add(profile("Work")).expect("add");
    store.add(profile("Personal")).expect("add");

    let err = store
        .update(
            "personal",
            ProfileUpdate {
                name: Some("work".to_string()),
                ..ProfileUpdate::default()
            },
        )
        .expect_err("conflict");
    assert!(matches!(err, CoreError::Conflict { .. }));
    assert!(store.get("personal").is_some());
}

#[test]
fn update_clears_endpoint_on_request() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open(&dir);
    let mut p = profile("Work");
    p.endpoint = Some("https://gateway.internal".to_string());
    store.add(p).expect("add");

    store
        .update(
            "work",
            ProfileUpdate {
                clear_endpoint: true,
                ..ProfileUpdate::default()
            },
        )
        .expect("clear endpoint");
    assert!(store.get("work").expect("entry").endpoint.is_none());
}

#[test]
fn switch_is_a_noop_when_already_current() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open(&dir);
    store.add(profile("Work")).expect("add");

    let mutation = store.switch("work").expect("switch");
    assert!(mutation.backup_path.is_none());
    assert_eq!(store.current_id(), Some("work"));

    assert_eq!(store.switch("ghost").expect_err("unknown").code(), "NOT_FOUND");
}

#[test]
fn switch_to_default_clears_selection() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open(&dir);
    store.add(profile("Work")).expect("add");

    store.switch_to_default().expect("to default");
    assert_eq!(store.current_id(), None);

    // Already default: no write, still success.
    let backup = store.switch_to_default().expect("again");
    assert!(backup.is_none());
}

#[test]
fn store_round_trips_through_disk() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open(&dir);
    let mut p = profile("Work");
    p.endpoint = Some("https://gateway.internal".to_string());
    store.add(p).expect("add");
    store.add(profile("Personal")).expect("add");
    store.switch("personal").expect("switch");

    let reopened = open(&dir);
    assert_eq!(reopened.data(), store.data());
}

#[test]
fn resolve_matches_id_then_name() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open(&dir);
    store.add(profile("Work")).expect("add");

    assert_eq!(store.resolve("work").as_deref(), Some("work"));
    assert_eq!(store.resolve("WORK").as_deref(), Some("work"));
    assert_eq!(store.resolve("ghost"), None);
}

#[test]
fn proxy_profile_tracks_external_config() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open(&dir);
    store.add(profile("Work")).expect("add");

    let proxy = ProxyConfig {
        host: None,
        port: Some(4000),
        api_key: Some("sk-router".to_string()),
    };
    store.sync_proxy_profile(Some(&proxy)).expect("sync in");

    let reserved = store.get(PROXY_PROFILE_ID).expect("reserved entry");
    assert_eq!(reserved.endpoint.as_deref(), Some("http://127.0.0.1:4000"));
    assert_eq!(reserved.credential.as_deref(), Some("sk-router"));

    // Re-sync with identical config writes nothing.
    let backup = store.sync_proxy_profile(Some(&proxy)).expect("sync same");
    assert!(backup.is_none());

    // Proxy config gone: reserved entry is removed, pointer repaired.
    store.switch(PROXY_PROFILE_ID).expect("switch to proxy");
    store.sync_proxy_profile(None).expect("sync out");
    assert!(store.get(PROXY_PROFILE_ID).is_none());
    assert_eq!(store.current_id(), Some("work"));
}

#[test]
fn mutations_back_up_the_existing_store_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let mut store = open(&dir);

    // First write has nothing to back up.
    let first = store.add(profile("Work")).expect("add");
    assert!(first.backup_path.is_none());

    let second = store.add(profile("Personal")).expect("add");
    let backup = second.backup_path.expect("backup taken");
    assert!(backup.exists());
}
