//! CLI module for timberdb
//!
//! Provides the command-line interface for:
//! - ingest: process the spreadsheet export into the records file
//! - geocode: fill in missing coordinates, sequentially and cached
//! - serve: load records and start the HTTP query server
//! - query: one-shot query execution over stdin/stdout

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::run;
pub use errors::{CliError, CliResult};
pub use io::{read_query, write_error, write_result};
