//! CLI argument definitions using clap
//!
//! Commands:
//! - timberdb ingest --config <path>
//! - timberdb geocode --config <path>
//! - timberdb serve --config <path>
//! - timberdb query --config <path>

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// timberdb - A searchable directory of forestry contractors
#[derive(Parser, Debug)]
#[command(name = "timberdb")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Process the contractor spreadsheet export into the records file
    Ingest {
        /// Path to configuration file
        #[arg(long, default_value = "./timberdb.json")]
        config: PathBuf,
    },

    /// Fill in missing coordinates for ingested records
    Geocode {
        /// Path to configuration file
        #[arg(long, default_value = "./timberdb.json")]
        config: PathBuf,
    },

    /// Start the HTTP query server
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./timberdb.json")]
        config: PathBuf,
    },

    /// Execute a single query from stdin and exit
    Query {
        /// Path to configuration file
        #[arg(long, default_value = "./timberdb.json")]
        config: PathBuf,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
