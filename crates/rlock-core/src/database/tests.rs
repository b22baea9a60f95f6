use super::*;
use crate::lock::is_locked;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tempfile::TempDir;

fn quick() -> LockOptions {
    LockOptions::with_timeout(Duration::from_millis(500)).poll_interval(Duration::from_millis(10))
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
struct Energy {
    structure: String,
    energy_ev: f64,
}

#[test]
fn test_append_mode_creates_database() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("results.json");

    let db = open_database(&path, DbMode::Append, &quick()).unwrap();
    assert!(path.exists(), "database file should be created on open");
    assert_eq!(db.tables().count(), 0);
    db.close().unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let document: Document = serde_json::from_str(&content).unwrap();
    assert_eq!(document.schema_version, SCHEMA_VERSION);
}

#[test]
fn test_records_persist_across_opens() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("results.json");

    let mut db = open_database(&path, DbMode::Append, &quick()).unwrap();
    db.set_title("adsorption energies").unwrap();
    db.append(
        "energies",
        &Energy {
            structure: "Cu111".to_string(),
            energy_ev: -3.52,
        },
    )
    .unwrap();
    assert!(db.is_dirty());
    db.close().unwrap();

    let db = open_database(&path, DbMode::Read, &quick()).unwrap();
    assert_eq!(db.title(), Some("adsorption energies"));
    let energies: Vec<Energy> = db.records("energies").unwrap();
    assert_eq!(energies.len(), 1);
    assert_eq!(energies[0].structure, "Cu111");
}

#[test]
fn test_read_mode_rejects_mutation() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("ro.json");
    open_database(&path, DbMode::Write, &quick())
        .unwrap()
        .close()
        .unwrap();

    let mut db = open_database(&path, DbMode::Read, &quick()).unwrap();
    let err = db.append("t", &json!({"x": 1})).unwrap_err();
    assert!(matches!(err, GuardError::ReadOnly { .. }), "got {:?}", err);
    assert!(matches!(
        db.set_title("nope"),
        Err(GuardError::ReadOnly { .. })
    ));
    assert!(!db.is_dirty());
}

#[test]
fn test_read_missing_database_releases_lock() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("missing.json");

    let err = open_database(&path, DbMode::ReadWrite, &quick()).unwrap_err();

    assert!(
        matches!(err, GuardError::ResourceOpen { mode: "r+", .. }),
        "got {:?}",
        err
    );
    assert!(!is_locked(&path).unwrap());
}

#[test]
fn test_corrupt_database_is_format_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("corrupt.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = open_database(&path, DbMode::Read, &quick()).unwrap_err();

    assert!(matches!(err, GuardError::Format { .. }), "got {:?}", err);
    assert!(!is_locked(&path).unwrap());
}

#[test]
fn test_unknown_schema_version_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("future.json");
    std::fs::write(&path, r#"{"schema_version": "9.0", "tables": {}}"#).unwrap();

    let err = open_database(&path, DbMode::Append, &quick()).unwrap_err();
    assert!(err.to_string().contains("9.0"), "got {}", err);
}

#[test]
fn test_write_mode_discards_existing_content() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("reset.json");

    with_database(&path, DbMode::Append, &quick(), |db| {
        db.append("runs", &json!({"id": 1}))
    })
    .unwrap();

    let db = open_database(&path, DbMode::Write, &quick()).unwrap();
    assert!(db.table("runs").is_none());
}

#[test]
fn test_with_database_error_discards_changes() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("rollback.json");

    let result: Result<(), GuardError> = with_database(&path, DbMode::Append, &quick(), |db| {
        db.append("runs", &json!({"id": 1}))?;
        Err(GuardError::ReadOnly {
            path: db.path().to_path_buf(),
        })
    });

    assert!(result.is_err());
    assert!(!is_locked(&path).unwrap());
    let db = open_database(&path, DbMode::Read, &quick()).unwrap();
    assert!(db.table("runs").is_none(), "failed section must not persist");
}

#[test]
fn test_drop_flushes_pending_changes() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("dropped.json");

    {
        let mut db = open_database(&path, DbMode::Append, &quick()).unwrap();
        db.append("runs", &json!({"id": 7})).unwrap();
    }

    assert!(!is_locked(&path).unwrap());
    let db = open_database(&path, DbMode::Read, &quick()).unwrap();
    assert_eq!(db.table("runs").unwrap().len(), 1);
}

#[test]
fn test_replace_and_remove_tables() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("tables.json");

    let mut db = open_database(&path, DbMode::Append, &quick()).unwrap();
    db.replace_table("a", vec![json!(1), json!(2)]).unwrap();
    db.replace_table("b", vec![]).unwrap();
    assert_eq!(db.tables().collect::<Vec<_>>(), vec!["a", "b"]);

    assert_eq!(db.remove_table("b").unwrap(), Some(vec![]));
    assert_eq!(db.remove_table("b").unwrap(), None);
    db.flush().unwrap();
    assert!(!db.is_dirty());
    assert!(is_locked(&path).unwrap(), "flush keeps the lock");
    db.close().unwrap();

    let db = open_database(&path, DbMode::Read, &quick()).unwrap();
    assert_eq!(db.tables().collect::<Vec<_>>(), vec!["a"]);
}

#[test]
fn test_missing_table_reads_as_empty() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("empty.json");

    let db = open_database(&path, DbMode::Append, &quick()).unwrap();
    let records: Vec<Energy> = db.records("nothing").unwrap();
    assert!(records.is_empty());
}

#[test]
fn test_db_mode_from_str() {
    assert_eq!("r".parse::<DbMode>().unwrap(), DbMode::Read);
    assert_eq!("w".parse::<DbMode>().unwrap(), DbMode::Write);
    assert_eq!("a".parse::<DbMode>().unwrap(), DbMode::Append);
    assert_eq!("r+".parse::<DbMode>().unwrap(), DbMode::ReadWrite);
    assert!("a+".parse::<DbMode>().is_err());
}
