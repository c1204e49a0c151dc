use askdb_core::model::StudentRecord;
use askdb_core::storage::StudentsDb;
use tempfile::tempdir;

fn record(name: &str, cgpa: f64) -> StudentRecord {
    StudentRecord {
        name: Some(name.to_string()),
        cgpa: Some(cgpa),
        ..Default::default()
    }
}

#[test]
fn load_is_full_replace() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let db = StudentsDb::new(dir.path().join("students.db"));
    db.init_schema()?;

    let first = db.replace_all(&[record("Asha", 9.1), record("Ravi", 8.0)])?;
    assert_eq!(first.inserted, 2);
    assert_eq!(first.skipped, 0);
    assert_eq!(db.count()?, 2);

    // A second load replaces, never appends.
    let second = db.replace_all(&[record("Meera", 7.5)])?;
    assert_eq!(second.inserted, 1);
    assert_eq!(db.count()?, 1);
    Ok(())
}

#[test]
fn sparse_records_load_with_nulls() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let db = StudentsDb::new(dir.path().join("students.db"));

    let records: Vec<StudentRecord> =
        serde_json::from_str(r#"[{"name": "Asha"}, {"cgpa": 6.5, "location": "Pune"}]"#)?;
    let report = db.replace_all(&records)?;
    assert_eq!(report.inserted, 2);

    // Free-text specialization outside the prompt vocabulary is tolerated.
    let odd: Vec<StudentRecord> =
        serde_json::from_str(r#"[{"name": "X", "specialization": "Underwater Basketry"}]"#)?;
    assert_eq!(db.replace_all(&odd)?.inserted, 1);
    Ok(())
}
