//! CLI command implementations
//!
//! Every command loads the configuration first; `schema` needs none.

use std::fs;
use std::path::Path;

use serde_json::json;
use tracing::{info, warn};

use crate::api::ApiHandler;
use crate::http_server::HttpServer;
use crate::observability::init_logging;
use crate::schema::{print_schema, Schema, SchemaOptions};
use crate::storage::StorageWriter;

use super::args::{Cli, Command};
use super::config::{Config, StorageKind};
use super::errors::{CliError, CliResult};
use super::io::{read_request, write_json, write_text};

/// Parse arguments and run the selected command
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Serve { config, port } => serve(&config, port),
        Command::Query { config } => query(&config),
        Command::Schema => schema(),
    }
}

/// Initialize a new data directory
///
/// Creates `<data_dir>/data/documents.dat`. Memory storage needs no
/// initialization.
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    start_logging(&config);

    if config.storage == StorageKind::Memory {
        write_json(&json!({"initialized": false, "storage": "memory"}))?;
        return Ok(());
    }

    if config.is_initialized() {
        return Err(CliError::already_initialized());
    }

    let dir = config.data_path().join("data");
    fs::create_dir_all(&dir).map_err(|e| {
        CliError::config_error(format!("Failed to create directory {:?}: {}", dir, e))
    })?;
    let writer = StorageWriter::open(config.data_path())?;
    info!(path = %writer.path().display(), "initialized data directory");

    write_json(&json!({"initialized": true}))?;

    Ok(())
}

/// Start the HTTP server
///
/// Opens storage (replaying the log), assembles the schema and serves until
/// Ctrl-C.
pub fn serve(config_path: &Path, port: Option<u16>) -> CliResult<()> {
    let mut config = Config::load(config_path)?;
    start_logging(&config);

    if let Some(port) = port {
        config.http.port = port;
    }

    let handler = boot(&config)?;
    let server = HttpServer::new(config.http.clone(), handler);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| CliError::boot_failed(format!("Failed to create tokio runtime: {}", e)))?;

    rt.block_on(async {
        server
            .start()
            .await
            .map_err(|e| CliError::boot_failed(format!("HTTP server failed: {}", e)))
    })?;

    Ok(())
}

/// Execute one request read from stdin and print the response envelope
pub fn query(config_path: &Path) -> CliResult<()> {
    let config = Config::load(config_path)?;
    start_logging(&config);

    let handler = boot(&config)?;
    let body = read_request()?;

    let result = handler.handle(body.as_bytes());
    write_json(&result)?;

    Ok(())
}

/// Print the schema in SDL form
pub fn schema() -> CliResult<()> {
    let schema = Schema::build(SchemaOptions::default())?;
    write_text(&print_schema(&schema))
}

/// Open storage and assemble the schema
fn boot(config: &Config) -> CliResult<ApiHandler> {
    let store = config.open_store()?;
    let schema = Schema::build(config.schema_options())?;
    info!(
        storage = ?config.storage,
        strict_references = config.strict_references,
        "boot complete"
    );
    Ok(ApiHandler::new(schema, store))
}

fn start_logging(config: &Config) {
    if let Err(e) = init_logging(&config.log_filter) {
        eprintln!("{}", e);
    } else if config.storage == StorageKind::Memory {
        warn!("memory storage selected; data is lost on exit");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CliErrorCode;

    fn write_config(dir: &Path, storage: &str) -> std::path::PathBuf {
        let path = dir.join("hobbygraph.json");
        let config = json!({
            "data_dir": dir.join("db").to_string_lossy(),
            "storage": storage,
        });
        fs::write(&path, config.to_string()).unwrap();
        path
    }

    #[test]
    fn test_init_creates_storage_file() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = write_config(dir.path(), "file");

        init(&config_path).unwrap();
        assert!(dir.path().join("db").join("data").join("documents.dat").exists());

        let err = init(&config_path).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::AlreadyInitialized);
    }

    #[test]
    fn test_boot_after_init() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = write_config(dir.path(), "file");
        let config = Config::load(&config_path).unwrap();

        assert!(boot(&config).is_err());
        init(&config_path).unwrap();

        let handler = boot(&config).unwrap();
        let result = handler.handle(br#"{"query": "{ users { id } }"}"#);
        assert_eq!(result.data, json!({"users": []}));
    }

    #[test]
    fn test_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        let err = init(&dir.path().join("absent.json")).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }
}
