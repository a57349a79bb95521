//! Configuration file
//!
//! ```json
//! {
//!   "data_dir": "./data",
//!   "storage": "file",
//!   "strict_references": false,
//!   "log_filter": "info",
//!   "http": { "host": "0.0.0.0", "port": 4000, "path": "/graphql", "cors_origins": [] }
//! }
//! ```
//!
//! Only `data_dir` is required.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::http_server::HttpServerConfig;
use crate::schema::SchemaOptions;
use crate::storage::{FileStore, MemoryStore, Store, STORAGE_FILE};

use super::errors::{CliError, CliResult};

/// Storage backend selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageKind {
    /// Append-only log under `data_dir`
    #[default]
    File,
    /// Process-lifetime only
    Memory,
}

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Data directory (required)
    pub data_dir: String,

    /// Storage backend (default "file")
    #[serde(default)]
    pub storage: StorageKind,

    /// Reject hobbies and posts whose owner does not exist (default false)
    #[serde(default)]
    pub strict_references: bool,

    /// Log filter used when RUST_LOG is unset (default "info")
    #[serde(default = "default_log_filter")]
    pub log_filter: String,

    /// HTTP server settings
    #[serde(default)]
    pub http: HttpServerConfig,
}

fn default_log_filter() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        Self::parse(&content)
    }

    /// Parse and validate configuration JSON
    pub fn parse(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.data_dir.trim().is_empty() {
            return Err(CliError::config_error("data_dir must not be empty"));
        }

        if !self.http.path.starts_with('/') {
            return Err(CliError::config_error(format!(
                "Invalid http.path: '{}'. It must start with '/'.",
                self.http.path
            )));
        }

        if self.http.path == "/health" {
            return Err(CliError::config_error(
                "http.path must not shadow the /health endpoint",
            ));
        }

        Ok(())
    }

    /// Get data directory as Path
    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }

    /// Whether `init` has created the storage file
    pub fn is_initialized(&self) -> bool {
        self.data_path().join("data").join(STORAGE_FILE).exists()
    }

    pub fn schema_options(&self) -> SchemaOptions {
        SchemaOptions {
            strict_references: self.strict_references,
        }
    }

    /// Opens the configured store, replaying the log for file storage
    pub fn open_store(&self) -> CliResult<Arc<dyn Store>> {
        match self.storage {
            StorageKind::File => {
                if !self.is_initialized() {
                    return Err(CliError::not_initialized());
                }
                Ok(Arc::new(FileStore::open(self.data_path())?))
            }
            StorageKind::Memory => Ok(Arc::new(MemoryStore::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CliErrorCode;

    #[test]
    fn test_defaults() {
        let config = Config::parse(r#"{"data_dir": "/tmp/hg"}"#).unwrap();
        assert_eq!(config.storage, StorageKind::File);
        assert!(!config.strict_references);
        assert_eq!(config.log_filter, "info");
        assert_eq!(config.http, HttpServerConfig::default());
    }

    #[test]
    fn test_full_config() {
        let config = Config::parse(
            r#"{
                "data_dir": "/tmp/hg",
                "storage": "memory",
                "strict_references": true,
                "http": {"port": 9000, "path": "/api/graphql"}
            }"#,
        )
        .unwrap();
        assert_eq!(config.storage, StorageKind::Memory);
        assert!(config.schema_options().strict_references);
        assert_eq!(config.http.port, 9000);
        assert_eq!(config.http.path, "/api/graphql");
    }

    #[test]
    fn test_invalid_configs() {
        for content in [
            r#"{}"#,
            r#"{"data_dir": ""}"#,
            r#"{"data_dir": "/tmp", "storage": "s3"}"#,
            r#"{"data_dir": "/tmp", "http": {"path": "graphql"}}"#,
            r#"{"data_dir": "/tmp", "http": {"path": "/health"}}"#,
        ] {
            let err = Config::parse(content).unwrap_err();
            assert_eq!(err.code(), &CliErrorCode::ConfigError, "{}", content);
        }
    }

    #[test]
    fn test_file_store_requires_init() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            data_dir: dir.path().to_string_lossy().into_owned(),
            storage: StorageKind::File,
            strict_references: false,
            log_filter: default_log_filter(),
            http: HttpServerConfig::default(),
        };
        let err = config.open_store().err().unwrap();
        assert_eq!(err.code(), &CliErrorCode::NotInitialized);
    }
}
