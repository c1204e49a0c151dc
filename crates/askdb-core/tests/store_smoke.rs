use askdb_core::storage::ExampleStore;
use tempfile::tempdir;

#[test]
fn store_lifecycle_and_idempotent_save() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let db_path = dir.path().join("examples.db");

    let store = ExampleStore::open(&db_path)?;
    store.init_schema()?;
    assert_eq!(store.count()?, 0);

    let q = "students from bangalore";
    let sql = "SELECT * FROM students WHERE LOWER(location) LIKE '%bangalore%';";

    store.save_example(q, sql)?;
    store.save_example(q, sql)?;
    assert_eq!(store.count()?, 1, "duplicate save must be a no-op");

    // Same question, different query is a distinct example.
    store.save_example(q, "SELECT name FROM students;")?;
    assert_eq!(store.count()?, 2);

    let listed = store.list()?;
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].question, q);
    assert_eq!(listed[0].query, sql);
    assert!(listed[0].id < listed[1].id, "list must keep insertion order");

    assert!(store.contains(q, sql)?);
    assert!(!store.contains("unseen", sql)?);

    // Re-open from disk: data persisted.
    drop(store);
    let reopened = ExampleStore::open(&db_path)?;
    assert_eq!(reopened.count()?, 2);

    Ok(())
}

#[test]
fn schema_init_is_repeatable() -> anyhow::Result<()> {
    let store = ExampleStore::memory()?;
    store.init_schema()?;
    store.init_schema()?;
    store.save_example("q", "SELECT 1;")?;
    assert_eq!(store.count()?, 1);
    Ok(())
}
