use crate::errors::ExecutionError;
use crate::model::QueryResult;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Runs synthesized statements against the students database.
///
/// Each call owns its connection for exactly one statement: open, execute,
/// close. `Connection` closes on drop on every exit path, so there is no
/// held connection across requests.
pub struct ExecutionGateway {
    db_path: PathBuf,
    admin_secret: Option<String>,
}

impl ExecutionGateway {
    pub fn new(db_path: impl Into<PathBuf>, admin_secret: Option<String>) -> Self {
        Self {
            db_path: db_path.into(),
            admin_secret,
        }
    }

    pub fn db_path(&self) -> &Path {
        &self.db_path
    }

    pub fn execute(
        &self,
        sql: &str,
        requires_secret: bool,
        provided_secret: Option<&str>,
    ) -> Result<QueryResult, ExecutionError> {
        if requires_secret {
            // On mismatch the statement never reaches the database, and the
            // error says nothing about whether it would have been valid.
            let expected = self.admin_secret.as_deref();
            if expected.is_none() || provided_secret != expected {
                return Err(ExecutionError::Unauthorized);
            }
        }

        let sql = sql.trim();
        if sql.is_empty() {
            return Err(ExecutionError::InvalidStatement("empty statement".into()));
        }

        let conn = Connection::open(&self.db_path)
            .map_err(|e| ExecutionError::Database(e.to_string()))?;

        validate_plan(&conn, sql)?;
        run_statement(&conn, sql)
    }
}

/// Pre-validation via SQLite's query planner: a statement the planner cannot
/// explain is rejected without running it.
fn validate_plan(conn: &Connection, sql: &str) -> Result<(), ExecutionError> {
    conn.prepare(&format!("EXPLAIN QUERY PLAN {}", sql))
        .map_err(|e| ExecutionError::InvalidStatement(e.to_string()))?;
    Ok(())
}

fn run_statement(conn: &Connection, sql: &str) -> Result<QueryResult, ExecutionError> {
    let mut stmt = conn
        .prepare(sql)
        .map_err(|e| ExecutionError::Database(e.to_string()))?;

    let columns: Vec<String> = stmt.column_names().iter().map(|s| s.to_string()).collect();

    if columns.is_empty() {
        // No result descriptor: a mutation or DDL statement.
        stmt.execute([])
            .map_err(|e| ExecutionError::Database(e.to_string()))?;
        return Ok(QueryResult {
            columns,
            rows: Vec::new(),
        });
    }

    let ncols = columns.len();
    let mut rows = Vec::new();
    let mut raw = stmt
        .query([])
        .map_err(|e| ExecutionError::Database(e.to_string()))?;
    while let Some(row) = raw.next().map_err(|e| ExecutionError::Database(e.to_string()))? {
        let mut out = Vec::with_capacity(ncols);
        for i in 0..ncols {
            let v = row
                .get_ref(i)
                .map_err(|e| ExecutionError::Database(e.to_string()))?;
            out.push(render_value(v));
        }
        rows.push(out);
    }

    Ok(QueryResult { columns, rows })
}

fn render_value(v: rusqlite::types::ValueRef<'_>) -> String {
    use rusqlite::types::ValueRef::*;
    match v {
        Null => String::new(),
        Integer(i) => i.to_string(),
        Real(r) => r.to_string(),
        Text(t) => String::from_utf8_lossy(t).into_owned(),
        Blob(b) => format!("<{} bytes>", b.len()),
    }
}
