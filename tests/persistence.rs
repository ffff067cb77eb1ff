//! Log file mirroring in each supported format.

use serde_json::{json, Value as JsonValue};
use statesight::builder::TrackerBuilder;
use statesight::core::{DynamicObject, NumericArray, Value};
use statesight::persist::{PersistError, CSV_HEADER};
use statesight::TrackError;
use std::fs;
use tempfile::tempdir;

fn point() -> DynamicObject {
    DynamicObject::new("Point").with("x", 0).with("y", 0)
}

#[test]
fn json_file_mirrors_log() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("log.json");

    let mut tracker = TrackerBuilder::new()
        .buffer_size(20)
        .log_file(&path)
        .build(point())
        .unwrap();
    tracker.set_attribute("x", 1).unwrap();
    tracker.set_attribute("x", 2).unwrap();

    let parsed: JsonValue = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let entries = parsed.as_array().unwrap();
    assert_eq!(entries.len(), tracker.get_log().len());

    for entry in entries {
        let keys: Vec<&String> = entry.as_object().unwrap().keys().collect();
        assert_eq!(keys, vec!["Timestamp", "Changed Attribute", "Change", "State"]);
    }
    assert_eq!(entries[0]["Change"], "Initial State");
    assert_eq!(entries[0]["Changed Attribute"], "");
    assert_eq!(entries[2]["Change"], json!({"previous": 1, "current": 2}));
    assert_eq!(entries[2]["State"], json!({"x": 2, "y": 0}));
}

#[test]
fn file_is_written_at_construction() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("log.json");

    let _tracker = TrackerBuilder::new()
        .log_file(&path)
        .construct(point(), |t| t.set_attribute("z", 1))
        .unwrap();

    let parsed: JsonValue = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(parsed.as_array().unwrap().len(), 1);
    assert_eq!(parsed[0]["State"], json!({"x": 0, "y": 0, "z": 1}));
}

#[test]
fn file_follows_eviction() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("log.json");

    let mut tracker = TrackerBuilder::new()
        .buffer_size(2)
        .log_file(&path)
        .build(point())
        .unwrap();
    for i in 1..=4 {
        tracker.set_attribute("y", i).unwrap();
    }

    let parsed: JsonValue = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let currents: Vec<&JsonValue> = parsed
        .as_array()
        .unwrap()
        .iter()
        .map(|e| &e["Change"]["current"])
        .collect();
    assert_eq!(currents, vec![&json!(3), &json!(4)]);
}

#[test]
fn csv_file_has_header_and_json_columns() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("log.csv");

    let mut tracker = TrackerBuilder::new()
        .log_file(&path)
        .build(point().with("tags", vec!["a".to_string(), "b, c".to_string()]))
        .unwrap();
    tracker.set_attribute("x", 7).unwrap();

    let mut reader = csv::Reader::from_path(&path).unwrap();
    let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
    assert_eq!(headers, CSV_HEADER);

    let rows: Vec<csv::StringRecord> = reader.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(&rows[1][1], "x");

    let change: JsonValue = serde_json::from_str(&rows[1][2]).unwrap();
    assert_eq!(change, json!({"previous": 0, "current": 7}));
    let state: JsonValue = serde_json::from_str(&rows[1][3]).unwrap();
    assert_eq!(state, json!({"x": 7, "y": 0, "tags": "<list object>"}));
}

#[test]
fn other_extensions_write_brace_stripped_lines() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("log.TXT");

    let mut tracker = TrackerBuilder::new().log_file(&path).build(point()).unwrap();
    tracker.set_attribute("x", 3).unwrap();

    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with("\"Timestamp\":"));

    let restored: JsonValue = serde_json::from_str(&format!("{{{}}}", lines[1])).unwrap();
    assert_eq!(restored["Changed Attribute"], "x");
    assert_eq!(restored["Change"], json!({"previous": 0, "current": 3}));
}

#[test]
fn arrays_serialize_as_nested_lists_when_enabled() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("arrays.json");
    let grid = NumericArray::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();

    let _tracker = TrackerBuilder::new()
        .log_numpy_arrays(true)
        .log_file(&path)
        .build(DynamicObject::new("Grid").with("cells", grid))
        .unwrap();

    let parsed: JsonValue = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(parsed[0]["State"]["cells"], json!([[1.0, 2.0], [3.0, 4.0]]));
}

#[test]
fn failed_flush_keeps_write_and_entry() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("log.json");

    let mut tracker = TrackerBuilder::new().log_file(&path).build(point()).unwrap();

    // Replacing the target with a non-empty directory makes the rename fail.
    fs::remove_file(&path).unwrap();
    fs::create_dir(&path).unwrap();
    fs::write(path.join("occupied"), "x").unwrap();

    let result = tracker.set_attribute("x", 1);
    assert!(matches!(
        result,
        Err(TrackError::Persist(PersistError::Replace { .. }))
    ));
    assert_eq!(tracker.get_log().len(), 2);
    assert_eq!(tracker.get("x"), Some(Value::Int(1)));
}

#[test]
fn flush_to_writes_an_extra_copy() {
    let dir = tempdir().unwrap();
    let copy = dir.path().join("copy.csv");

    let mut tracker = TrackerBuilder::new().build(point()).unwrap();
    tracker.set_attribute("x", 1).unwrap();
    tracker.flush_to(&copy).unwrap();

    let mut reader = csv::Reader::from_path(&copy).unwrap();
    assert_eq!(reader.records().count(), 2);
}

#[test]
fn invalid_directory_fails_construction() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("no-such-dir").join("log.json");

    let result = TrackerBuilder::new().log_file(&path).build(point());
    assert!(matches!(result, Err(TrackError::Persist(PersistError::Io(_)))));
}
