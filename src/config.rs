//! Configuration for the refresh batch.
//!
//! Everything the pipeline needs is passed in explicitly at
//! construction; there are no module-level endpoint constants. Values
//! come from a TOML file, with per-field defaults so a partial (or
//! absent) file still yields a working local setup.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{RefreshError, Result};

/// Top-level configuration, usually loaded from a TOML file.
///
/// ```toml
/// [generation]
/// endpoint = "http://localhost:11434"
/// model = "gemma2:2b"
///
/// [database]
/// path = "properties.db"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefreshConfig {
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Where and what to generate with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Base URL of the Ollama server (the `/api/generate` suffix is
    /// appended by the backend).
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Model id to request.
    #[serde(default = "default_model")]
    pub model: String,
}

/// Where property records live.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_db_path")]
    pub path: PathBuf,
}

fn default_endpoint() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "gemma2:2b".to_string()
}

fn default_db_path() -> PathBuf {
    PathBuf::from("properties.db")
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// Load configuration from a TOML file.
///
/// The file must exist and parse; missing sections and fields fall back
/// to their defaults.
pub fn load_config(path: &Path) -> Result<RefreshConfig> {
    let raw = std::fs::read_to_string(path).map_err(|e| {
        RefreshError::InvalidConfig(format!("could not read {}: {e}", path.display()))
    })?;
    toml::from_str(&raw).map_err(|e| {
        RefreshError::InvalidConfig(format!("could not parse {}: {e}", path.display()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RefreshConfig::default();
        assert_eq!(config.generation.endpoint, "http://localhost:11434");
        assert_eq!(config.generation.model, "gemma2:2b");
        assert_eq!(config.database.path, PathBuf::from("properties.db"));
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let config: RefreshConfig = toml::from_str(
            r#"
            [generation]
            model = "llama3.2"
            "#,
        )
        .unwrap();
        assert_eq!(config.generation.model, "llama3.2");
        assert_eq!(config.generation.endpoint, "http://localhost:11434");
        assert_eq!(config.database.path, PathBuf::from("properties.db"));
    }

    #[test]
    fn test_roundtrip() {
        let mut config = RefreshConfig::default();
        config.generation.endpoint = "http://ollama.internal:11434".to_string();
        config.database.path = PathBuf::from("/var/lib/refresh/properties.db");

        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: RefreshConfig = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.generation.endpoint, config.generation.endpoint);
        assert_eq!(parsed.database.path, config.database.path);
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config(Path::new("/nonexistent/refresh.toml")).unwrap_err();
        assert!(matches!(err, RefreshError::InvalidConfig(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("refresh.toml");
        std::fs::write(&path, "[database]\npath = \"here.db\"\n").unwrap();

        let config = load_config(&path).unwrap();
        assert_eq!(config.database.path, PathBuf::from("here.db"));
        assert_eq!(config.generation.model, "gemma2:2b");
    }
}
