use serde::{Deserialize, Serialize};

/// An accepted (question, query) pair used as an in-context example.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Example {
    pub id: i64,
    pub question: String,
    pub query: String,
}

/// One row of the students table, as loaded from a dataset file.
///
/// Every field is optional: the loader tolerates sparse source rows and the
/// prompt-level specialization vocabulary is not a database constraint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudentRecord {
    pub name: Option<String>,
    pub cgpa: Option<f64>,
    pub location: Option<String>,
    pub email: Option<String>,
    pub phone_number: Option<String>,
    pub preferred_work_location: Option<String>,
    pub specialization: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryClass {
    Read,
    Write,
}

/// Outcome of one synthesis call, scoped to a single user question.
/// Not persisted unless promoted to an `Example` by the feedback loop.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynthesizedQuery {
    pub raw_model_output: String,
    pub normalized_sql: String,
    pub classification: QueryClass,
}

/// Fully materialized result of one executed statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl QueryResult {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Counts reported by the full-replace dataset loader.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadReport {
    pub inserted: usize,
    pub skipped: usize,
}
