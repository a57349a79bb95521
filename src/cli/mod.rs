//! CLI module for hobbygraph
//!
//! Provides command-line interface for:
//! - init: Create the data directory
//! - serve: Boot storage and schema, serve HTTP
//! - query: One-shot request execution over stdin/stdout
//! - schema: Print the SDL

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{init, query, run, run_command, schema, serve};
pub use config::{Config, StorageKind};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_request, write_json, write_text};
