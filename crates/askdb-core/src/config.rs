use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const ADMIN_SECRET_ENV: &str = "ASKDB_ADMIN_SECRET";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_students_db")]
    pub students_db: PathBuf,
    #[serde(default = "default_examples_db")]
    pub examples_db: PathBuf,
    #[serde(default = "default_retrieve_k")]
    pub retrieve_k: usize,
    #[serde(default)]
    pub admin_secret: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            base_url: default_base_url(),
            students_db: default_students_db(),
            examples_db: default_examples_db(),
            retrieve_k: default_retrieve_k(),
            admin_secret: None,
        }
    }
}

fn default_model() -> String {
    "deepseek-coder-v2:latest".to_string()
}

fn default_base_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_students_db() -> PathBuf {
    PathBuf::from("data/students.db")
}

fn default_examples_db() -> PathBuf {
    PathBuf::from("data/examples.db")
}

fn default_retrieve_k() -> usize {
    crate::retrieval::DEFAULT_K
}

/// Loads the YAML config, falling back to defaults when the file is absent.
/// `ASKDB_ADMIN_SECRET` overrides the file-supplied secret either way.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let mut cfg = if path.exists() {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ConfigError(format!("failed to read config {}: {}", path.display(), e)))?;
        serde_yaml::from_str(&raw)
            .map_err(|e| ConfigError(format!("failed to parse YAML: {}", e)))?
    } else {
        AppConfig::default()
    };

    if let Ok(secret) = std::env::var(ADMIN_SECRET_ENV) {
        if !secret.is_empty() {
            cfg.admin_secret = Some(secret);
        }
    }

    if cfg.retrieve_k == 0 {
        return Err(ConfigError("retrieve_k must be positive".into()));
    }

    Ok(cfg)
}

pub fn write_sample_config(path: &Path) -> Result<(), ConfigError> {
    let sample = r#"# askdb configuration
model: "deepseek-coder-v2:latest"
base_url: "http://localhost:11434"
students_db: "data/students.db"
examples_db: "data/examples.db"
retrieve_k: 3
# admin_secret: "change-me"   # or set ASKDB_ADMIN_SECRET
"#;
    std::fs::write(path, sample)
        .map_err(|e| ConfigError(format!("failed to write sample config: {}", e)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let cfg = load_config(Path::new("does/not/exist.yaml")).unwrap();
        assert_eq!(cfg.model, "deepseek-coder-v2:latest");
        assert_eq!(cfg.retrieve_k, 3);
        assert!(cfg.students_db.ends_with("students.db"));
    }

    #[test]
    fn partial_yaml_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("askdb.yaml");
        std::fs::write(&p, "model: \"llama3\"\nretrieve_k: 5\n").unwrap();
        let cfg = load_config(&p).unwrap();
        assert_eq!(cfg.model, "llama3");
        assert_eq!(cfg.retrieve_k, 5);
        assert_eq!(cfg.base_url, "http://localhost:11434");
    }

    #[test]
    fn zero_k_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let p = dir.path().join("askdb.yaml");
        std::fs::write(&p, "retrieve_k: 0\n").unwrap();
        assert!(load_config(&p).is_err());
    }
}
