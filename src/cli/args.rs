//! CLI argument definitions using clap
//!
//! Commands:
//! - hobbygraph init --config <path>
//! - hobbygraph serve --config <path> [--port <port>]
//! - hobbygraph query --config <path>
//! - hobbygraph schema

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// hobbygraph - a GraphQL API over users, hobbies and posts
#[derive(Parser, Debug)]
#[command(name = "hobbygraph")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize a new data directory
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./hobbygraph.json")]
        config: PathBuf,
    },

    /// Start the HTTP server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./hobbygraph.json")]
        config: PathBuf,

        /// Port to listen on, overriding the configuration
        #[arg(long)]
        port: Option<u16>,
    },

    /// Execute one request read from stdin and exit
    Query {
        /// Path to configuration file
        #[arg(long, default_value = "./hobbygraph.json")]
        config: PathBuf,
    },

    /// Print the schema in SDL form
    Schema,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
