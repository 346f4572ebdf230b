use chrono::{TimeZone, Utc};
use marathon_dash::settings::{InMemorySettingsStore, JsonFileSettingsStore, SettingsRepository};
use marathon_dash::types::settings::{StravaTokens, UserSettings};

fn runner(name: &str) -> UserSettings {
    UserSettings {
        display_name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        start_date: Some("2024-01-01".to_string()),
        plan_id: Some("pfitz-18-55".to_string()),
        goal_time: Some("3:30:00".to_string()),
        google_connected: true,
        ..UserSettings::default()
    }
}

#[test]
fn file_store_round_trips_settings_with_tokens() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileSettingsStore::new(dir.path().join("settings.json"));

    let mut settings = runner("Ada");
    settings.strava_connected = true;
    settings.strava_tokens = Some(StravaTokens {
        access_token: "access".to_string(),
        refresh_token: "refresh".to_string(),
        expires_at: Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap(),
        athlete_id: Some(42),
    });

    store.put("google:1", &settings).expect("put");
    assert_eq!(store.get("google:1").expect("get"), Some(settings));
}

#[test]
fn file_store_survives_reopening() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("settings.json");

    JsonFileSettingsStore::new(&path)
        .put("google:1", &runner("Ada"))
        .expect("put");

    let reopened = JsonFileSettingsStore::new(&path);
    assert_eq!(
        reopened.get("google:1").expect("get").map(|s| s.display_name),
        Some("Ada".to_string())
    );
}

#[test]
fn file_store_keeps_users_apart() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileSettingsStore::new(dir.path().join("settings.json"));

    store.put("google:1", &runner("Ada")).expect("put ada");
    store.put("google:2", &runner("Grace")).expect("put grace");

    let mut ada = runner("Ada");
    ada.goal_time = Some("3:15:00".to_string());
    store.put("google:1", &ada).expect("update ada");

    assert_eq!(store.get("google:1").expect("get"), Some(ada));
    assert_eq!(store.get("google:2").expect("get"), Some(runner("Grace")));
    assert_eq!(store.get("google:3").expect("get"), None);
}

#[test]
fn missing_or_empty_file_means_no_users() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("settings.json");
    let store = JsonFileSettingsStore::new(&path);
    assert_eq!(store.get("google:1").expect("missing file"), None);

    std::fs::write(&path, "").expect("write");
    assert_eq!(store.get("google:1").expect("empty file"), None);
}

#[test]
fn corrupt_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("settings.json");
    std::fs::write(&path, "{not json").expect("write");

    let store = JsonFileSettingsStore::new(&path);
    assert!(store.get("google:1").is_err());
}

#[cfg(unix)]
#[test]
fn file_store_is_private_to_the_owner() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileSettingsStore::new(dir.path().join("settings.json"));
    store.put("google:1", &runner("Ada")).expect("put");

    let mode = std::fs::metadata(store.path()).expect("metadata").permissions().mode();
    assert_eq!(mode & 0o777, 0o600);
}

#[test]
fn in_memory_store_replaces_whole_settings() {
    let store = InMemorySettingsStore::new();
    assert_eq!(store.get("demo").expect("get"), None);

    store.put("demo", &runner("Ada")).expect("put");
    let replacement = UserSettings {
        display_name: "Demo Runner".to_string(),
        demo: true,
        ..UserSettings::default()
    };
    store.put("demo", &replacement).expect("replace");

    assert_eq!(store.get("demo").expect("get"), Some(replacement));
}

#[test]
fn settings_missing_fields_load_with_defaults() {
    let settings: UserSettings =
        serde_json::from_str(r#"{"display_name":"Ada"}"#).expect("parse");
    assert_eq!(settings.display_name, "Ada");
    assert_eq!(settings.start_date, None);
    assert!(!settings.strava_connected);
    assert!(settings.strava_tokens.is_none());
}

#[test]
fn tokens_refresh_five_minutes_before_expiry() {
    let tokens = StravaTokens {
        access_token: "a".to_string(),
        refresh_token: "r".to_string(),
        expires_at: Utc.with_ymd_and_hms(2024, 1, 10, 12, 0, 0).unwrap(),
        athlete_id: None,
    };
    assert!(!tokens.needs_refresh(Utc.with_ymd_and_hms(2024, 1, 10, 11, 54, 0).unwrap()));
    assert!(tokens.needs_refresh(Utc.with_ymd_and_hms(2024, 1, 10, 11, 55, 0).unwrap()));
    assert!(tokens.needs_refresh(Utc.with_ymd_and_hms(2024, 1, 10, 13, 0, 0).unwrap()));
}
