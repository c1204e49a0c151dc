use std::fmt;

/// Failure while turning a natural-language question into SQL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesisError {
    /// Completion service unreachable or returned a non-2xx status.
    Transport(String),
    /// Model output contained no recognizable SQL statement.
    NoStatementFound,
}

impl fmt::Display for SynthesisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthesisError::Transport(detail) => {
                write!(f, "completion service error: {}", detail)
            }
            SynthesisError::NoStatementFound => {
                write!(f, "no SQL statement found in model output")
            }
        }
    }
}

impl std::error::Error for SynthesisError {}

/// Failure while executing a statement against the students database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    /// Admin secret mismatch. The message deliberately says nothing about
    /// whether the statement itself was valid.
    Unauthorized,
    /// Query-plan validation rejected the statement before execution.
    InvalidStatement(String),
    /// Execution-time database failure (malformed SQL, constraint, type).
    Database(String),
}

impl fmt::Display for ExecutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionError::Unauthorized => write!(f, "unauthorized: admin secret mismatch"),
            ExecutionError::InvalidStatement(detail) => {
                write!(f, "invalid statement: {}", detail)
            }
            ExecutionError::Database(detail) => write!(f, "database error: {}", detail),
        }
    }
}

impl std::error::Error for ExecutionError {}

/// Failure while persisting or reading accepted examples.
#[derive(Debug, Clone)]
pub struct StoreError(pub String);

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "example store error: {}", self.0)
    }
}

impl std::error::Error for StoreError {}

#[derive(Debug, Clone)]
pub struct ConfigError(pub String);

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}", self.0)
    }
}

impl std::error::Error for ConfigError {}
