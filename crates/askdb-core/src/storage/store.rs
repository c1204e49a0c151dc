use crate::errors::StoreError;
use crate::model::{Example, LoadReport, StudentRecord};
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Persistent store of accepted (question, query) pairs.
///
/// The feedback loop is the only mutation path; the retriever only reads.
#[derive(Clone)]
pub struct ExampleStore {
    conn: Arc<Mutex<Connection>>,
}

impl ExampleStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path)
            .map_err(|e| StoreError(format!("failed to open {}: {}", path.display(), e)))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| StoreError(format!("failed to open in-memory db: {}", e)))?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn init_schema(&self) -> Result<(), StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(crate::storage::schema::EXAMPLES_DDL)
            .map_err(|e| StoreError(format!("failed to init schema: {}", e)))?;
        Ok(())
    }

    /// All stored examples in insertion order. Insertion order is the
    /// tie-breaker for similarity ranking, so the ORDER BY matters.
    pub fn list(&self) -> Result<Vec<Example>, StoreError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare("SELECT id, question, query FROM examples ORDER BY id ASC")
            .map_err(|e| StoreError(e.to_string()))?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Example {
                    id: row.get(0)?,
                    question: row.get(1)?,
                    query: row.get(2)?,
                })
            })
            .map_err(|e| StoreError(e.to_string()))?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r.map_err(|e| StoreError(e.to_string()))?);
        }
        Ok(out)
    }

    pub fn contains(&self, question: &str, query: &str) -> Result<bool, StoreError> {
        let conn = self.conn.lock().unwrap();
        let n: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM examples WHERE question = ?1 AND query = ?2",
                params![question, query],
                |r| r.get(0),
            )
            .map_err(|e| StoreError(e.to_string()))?;
        Ok(n > 0)
    }

    /// Idempotent feedback-loop insert: an identical (question, query) pair
    /// that already exists is a no-op.
    pub fn save_example(&self, question: &str, query: &str) -> Result<(), StoreError> {
        if self.contains(question, query)? {
            return Ok(());
        }
        let conn = self.conn.lock().unwrap();
        let created_at = chrono::Utc::now().to_rfc3339();
        conn.execute(
            "INSERT INTO examples(question, query, created_at) VALUES (?1, ?2, ?3)",
            params![question, query, created_at],
        )
        .map_err(|e| StoreError(e.to_string()))?;
        Ok(())
    }

    pub fn count(&self) -> Result<i64, StoreError> {
        let conn = self.conn.lock().unwrap();
        conn.query_row("SELECT COUNT(*) FROM examples", [], |r| r.get(0))
            .map_err(|e| StoreError(e.to_string()))
    }
}

/// Schema and full-replace loading for the students table.
///
/// Query execution deliberately does not go through this type: the gateway
/// opens its own per-statement connection (see `gateway.rs`).
pub struct StudentsDb {
    path: PathBuf,
}

impl StudentsDb {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn init_schema(&self) -> anyhow::Result<()> {
        let conn = Connection::open(&self.path)?;
        conn.execute_batch(crate::storage::schema::STUDENTS_DDL)?;
        Ok(())
    }

    /// Full-replace load: delete everything, then bulk-insert. A row that
    /// fails to insert is skipped and counted, not fatal.
    pub fn replace_all(&self, records: &[StudentRecord]) -> anyhow::Result<LoadReport> {
        let mut conn = Connection::open(&self.path)?;
        conn.execute_batch(crate::storage::schema::STUDENTS_DDL)?;

        let tx = conn.transaction()?;
        tx.execute("DELETE FROM students", [])?;

        let mut inserted = 0usize;
        let mut skipped = 0usize;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO students
                   (name, cgpa, location, email, phone_number, preferred_work_location, specialization)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for (idx, r) in records.iter().enumerate() {
                let res = stmt.execute(params![
                    r.name,
                    r.cgpa,
                    r.location,
                    r.email,
                    r.phone_number,
                    r.preferred_work_location,
                    r.specialization,
                ]);
                match res {
                    Ok(_) => inserted += 1,
                    Err(e) => {
                        tracing::warn!("skipped student row {}: {}", idx + 1, e);
                        skipped += 1;
                    }
                }
            }
        }
        tx.commit()?;

        Ok(LoadReport { inserted, skipped })
    }

    pub fn count(&self) -> anyhow::Result<i64> {
        let conn = Connection::open(&self.path)?;
        let n: i64 = conn.query_row("SELECT COUNT(*) FROM students", [], |r| r.get(0))?;
        Ok(n)
    }
}
