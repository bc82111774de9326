use chrono::{TimeZone, Utc};
use tempfile::TempDir;

use super::*;

fn sample_snapshot(tracking_number: &str) -> Snapshot {
    Snapshot {
        tracking_number: tracking_number.to_owned(),
        status: "IN TRANSIT".to_owned(),
        checkpoints: vec![Checkpoint {
            date: "29-Jan-2026".to_owned(),
            time: "11:26 AM".to_owned(),
            activity: "IN Anjani Courier".to_owned(),
            location: "BANDRA-EAST".to_owned(),
        }],
        url: format!("https://trackcourier.io/track-and-trace/anjani-courier/{tracking_number}"),
        fetched_at: Utc.with_ymd_and_hms(2026, 1, 29, 9, 0, 0).unwrap(),
    }
}

#[test]
fn load_missing_file_is_a_read_error() {
    let dir = TempDir::new().unwrap();
    let err = StateStore::load(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, StoreError::Read { .. }), "got: {err:?}");
}

#[test]
fn load_corrupt_file_is_fatal() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, "{not json").unwrap();
    let err = StateStore::load(&path).unwrap_err();
    assert!(matches!(err, StoreError::Corrupt { .. }), "got: {err:?}");
}

#[test]
fn empty_object_entry_is_tracked_without_state() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, r#"{"1566745519": {}}"#).unwrap();

    let store = StateStore::load(&path).unwrap();
    assert_eq!(store.tracked_ids(), vec!["1566745519"]);
    assert!(store.last_known("1566745519").is_none());
}

#[test]
fn record_then_flush_round_trips() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");

    let mut store = StateStore::empty(&path);
    store.record(&sample_snapshot("1566745519"));
    store.flush().unwrap();

    let reloaded = StateStore::load(&path).unwrap();
    let snapshot = reloaded.last_known("1566745519").unwrap();
    assert_eq!(snapshot, sample_snapshot("1566745519"));
}

#[test]
fn flush_replaces_file_and_leaves_no_temp_behind() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, r#"{"1566745519": {}}"#).unwrap();

    let mut store = StateStore::load(&path).unwrap();
    store.record(&sample_snapshot("1566745519"));
    store.flush().unwrap();

    assert!(path.exists());
    assert!(!path.with_extension("json.tmp").exists());
}

#[test]
fn stored_shape_is_flat_and_omits_absent_fields() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");

    let mut store = StateStore::empty(&path);
    store.ensure_tracked("1234567890");
    store.record(&sample_snapshot("1566745519"));
    store.flush().unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();

    // Never-scraped entry stays the `{}` convention.
    assert_eq!(value["1234567890"], serde_json::json!({}));

    // Recorded entry is the flat snapshot shape.
    let entry = &value["1566745519"];
    assert_eq!(entry["status"], "IN TRANSIT");
    assert_eq!(entry["checkpoints"][0]["date"], "29-Jan-2026");
    assert!(entry.get("label").is_none());
    assert!(entry.get("fetched_at").is_some());
}

#[test]
fn record_preserves_label() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    std::fs::write(&path, r#"{"1566745519": {"label": "Birthday present"}}"#).unwrap();

    let mut store = StateStore::load(&path).unwrap();
    assert_eq!(store.label("1566745519"), Some("Birthday present"));

    store.record(&sample_snapshot("1566745519"));
    store.flush().unwrap();

    let reloaded = StateStore::load(&path).unwrap();
    assert_eq!(reloaded.label("1566745519"), Some("Birthday present"));
    assert!(reloaded.last_known("1566745519").is_some());
}

#[test]
fn ensure_tracked_does_not_clobber_existing_state() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");

    let mut store = StateStore::empty(&path);
    store.record(&sample_snapshot("1566745519"));
    store.ensure_tracked("1566745519");
    assert!(store.last_known("1566745519").is_some());
}

#[test]
fn write_template_creates_empty_object() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("state.json");
    StateStore::write_template(&path).unwrap();

    let store = StateStore::load(&path).unwrap();
    assert!(store.is_empty());
}
