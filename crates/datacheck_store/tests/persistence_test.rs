//! File round-trips for constraint sets, and a full profile, save, load and
//! verify cycle.

use datacheck_core::{ConstraintKind, ConstraintRecord, ConstraintSet, ConstraintValue, Value};
use datacheck_store::{DatasetOptions, StoreError, load, read_dataset, save};
use datacheck_validator::{CheckOutcome, Profiler, Verifier};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

const REFERENCE: &str = "\
id,city,temp,note
1,Oslo,-3.5,it's cold
2,Rome,18,
3,,21.25,mild
4,Oslo,7,
";

const INCOMING: &str = "\
id,city,temp,note
1,Oslo,-3.5,fine
1,Paris,40,
";

fn write(dir: &TempDir, name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, content).unwrap();
    path
}

fn options() -> DatasetOptions {
    DatasetOptions::new().with_categorical(["city", "note"])
}

#[test]
fn test_json_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let frame = read_dataset(&write(&dir, "ref.csv", REFERENCE), &options()).unwrap();
    let mut profiler = Profiler::new();
    let original = profiler.generate(&frame).unwrap().clone();

    let path = dir.path().join("constraints.json");
    save(&original, &path).unwrap();
    let loaded = load(&path).unwrap();

    assert_eq!(loaded, original);
    let names: Vec<_> = loaded.column_names().collect();
    assert_eq!(names, vec!["id", "city", "temp", "note"]);
}

#[test]
fn test_csv_file_round_trip_keeps_value_sets() {
    let dir = TempDir::new().unwrap();
    let frame = read_dataset(&write(&dir, "ref.csv", REFERENCE), &options()).unwrap();
    let mut profiler = Profiler::new();
    let original = profiler.generate(&frame).unwrap().clone();

    let path = dir.path().join("constraints.csv");
    save(&original, &path).unwrap();
    let loaded = load(&path).unwrap();

    assert_eq!(loaded, original);
    assert_eq!(
        loaded.get("note").unwrap().get(ConstraintKind::ValueRange),
        Some(&ConstraintValue::values(vec![
            Value::from("it's cold"),
            Value::Null,
            Value::from("mild"),
        ]))
    );
}

#[test]
fn test_upper_case_extension_is_accepted() {
    let dir = TempDir::new().unwrap();
    let mut constraints = ConstraintSet::new();
    constraints.insert(
        "x",
        ConstraintRecord::new().with(ConstraintKind::Nullable, false),
    );

    let path = dir.path().join("constraints.JSON");
    save(&constraints, &path).unwrap();
    assert_eq!(load(&path).unwrap(), constraints);
}

#[test]
fn test_unsupported_format_creates_no_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("constraints.xlsx");

    let err = save(&ConstraintSet::new(), &path).unwrap_err();
    assert!(matches!(err, StoreError::UnsupportedFormat(ext) if ext == "xlsx"));
    assert!(!path.exists());

    fs::write(&path, "{}").unwrap();
    assert!(matches!(
        load(&path).unwrap_err(),
        StoreError::UnsupportedFormat(_)
    ));
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = load(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, StoreError::Io(_)));
}

#[test]
fn test_profile_save_load_verify() {
    let dir = TempDir::new().unwrap();
    let reference = read_dataset(&write(&dir, "ref.csv", REFERENCE), &options()).unwrap();
    let incoming = read_dataset(&write(&dir, "new.csv", INCOMING), &options()).unwrap();

    let mut profiler = Profiler::new();
    profiler.generate(&reference).unwrap();
    profiler
        .modify(
            "id",
            ConstraintRecord::new().with(ConstraintKind::Nullable, false),
        )
        .unwrap();

    let json = dir.path().join("constraints.json");
    let csv = dir.path().join("constraints.csv");
    save(profiler.constraints(), &json).unwrap();
    save(profiler.constraints(), &csv).unwrap();

    let from_json = Verifier::new(&incoming, &load(&json).unwrap()).unwrap();
    let from_csv = Verifier::new(&incoming, &load(&csv).unwrap()).unwrap();
    assert_eq!(from_json.summary(), from_csv.summary());

    let summary = from_json.summary();
    assert_eq!(
        summary.get("temp", ConstraintKind::MaxValue),
        Some(CheckOutcome::Breaks(1))
    );
    assert_eq!(
        summary.get("city", ConstraintKind::ValueRange),
        Some(CheckOutcome::Breaks(1))
    );
    assert_eq!(
        summary.get("note", ConstraintKind::ValueRange),
        Some(CheckOutcome::Breaks(1))
    );
    assert_eq!(
        summary.get("id", ConstraintKind::Nullable),
        Some(CheckOutcome::Breaks(0))
    );
    assert!(!from_json.passed());
}
