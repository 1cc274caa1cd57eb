use chrono::DateTime;
use dz_controls::{CoordinatorMemory, HvacMode, VentState, ZoneSnapshot, ZoneStateStore};
use dz_core::ZoneId;
use dz_state::*;

fn fresh_path(name: &str) -> std::path::PathBuf {
    let dir = std::env::temp_dir().join(name);
    let _ = std::fs::remove_dir_all(&dir);
    dir.join("state.json")
}

#[test]
fn missing_file_starts_empty() {
    let path = fresh_path("dz_state_missing");
    let store = JsonStateStore::open(&path).unwrap();
    assert!(store.load_zone_state(&ZoneId::new("study")).is_none());
    assert!(store.generation().is_none());
    assert!(!path.exists());
}

#[test]
fn saved_zone_survives_reopen() {
    let path = fresh_path("dz_state_reopen");
    let at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
    let snapshot = ZoneSnapshot {
        vent: VentState::Open,
        last_transition: at,
        mode: Some(HvacMode::Heat),
        target: Some(21.5),
        fan_mode: Some("low".to_string()),
    };

    {
        let mut store = JsonStateStore::open(&path).unwrap();
        store
            .save_zone_state(&ZoneId::new("living_room"), &snapshot)
            .unwrap();
        store
            .save_coordinator_memory(&CoordinatorMemory {
                fan_mode: Some("low".to_string()),
            })
            .unwrap();
        store.set_generation("abc123").unwrap();
    }

    let store = JsonStateStore::open(&path).unwrap();
    assert_eq!(
        store.load_zone_state(&ZoneId::new("living_room")),
        Some(snapshot)
    );
    assert_eq!(
        store.load_coordinator_memory().and_then(|m| m.fan_mode),
        Some("low".to_string())
    );
    assert_eq!(store.generation(), Some("abc123"));
    assert!(store.state().saved_at.is_some());

    // No temp file left behind
    let tmp = path.with_file_name("state.json.tmp");
    assert!(!tmp.exists());
}

#[test]
fn file_layout_is_keyed_by_zone_id() {
    let path = fresh_path("dz_state_layout");
    let at = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
    let mut store = JsonStateStore::open(&path).unwrap();
    store
        .save_zone_state(&ZoneId::new("study"), &ZoneSnapshot::vent_only(VentState::Closed, at))
        .unwrap();

    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["version"], 1);
    assert_eq!(json["zones"]["study"]["vent"], "closed");
}

#[test]
fn corrupt_file_is_an_error() {
    let path = fresh_path("dz_state_corrupt");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{ not json").unwrap();
    assert!(matches!(JsonStateStore::open(&path), Err(StateError::Json(_))));
}

#[test]
fn newer_version_is_rejected() {
    let path = fresh_path("dz_state_version");
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, r#"{"version": 99}"#).unwrap();
    assert!(matches!(
        JsonStateStore::open(&path),
        Err(StateError::UnsupportedVersion { version: 99 })
    ));
}
