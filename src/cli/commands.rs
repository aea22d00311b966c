//! CLI command implementations
//!
//! Each command loads configuration first, then builds exactly the
//! subsystems it needs. The record store is fully loaded before the engine
//! or server exists; nothing initializes lazily on first use.

use std::path::Path;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::dataset::{RecordStore, Schema};
use crate::geo::Geocoder;
use crate::http_server::{AppState, HttpServer};
use crate::ingest;
use crate::observability::{log_event, log_event_with_fields, Event};
use crate::query::QueryEngine;

use super::args::{Cli, Command};
use super::errors::CliResult;
use super::io::{read_query, write_error, write_result};

/// Parse arguments and dispatch to the selected command.
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    match cli.command {
        Command::Ingest { config } => run_ingest(&config),
        Command::Geocode { config } => run_geocode(&config),
        Command::Serve { config } => run_serve(&config),
        Command::Query { config } => run_query(&config),
    }
}

fn load_config(path: &Path) -> CliResult<AppConfig> {
    let config = AppConfig::load_or_default(path)?;
    log_event_with_fields(Event::ConfigLoaded, &[("path", &path.display().to_string())]);
    Ok(config)
}

/// Loads the processed records file into a store under the configured id.
fn load_store(config: &AppConfig) -> CliResult<RecordStore> {
    let records = ingest::load_json(Path::new(&config.records_path))?;
    let mut store = RecordStore::new();
    store.add(config.dataset_id.clone(), Schema::contractors(), records);
    let rows = store
        .get(&config.dataset_id)
        .map(|d| d.records().len())
        .unwrap_or(0);
    log_event_with_fields(
        Event::DatasetLoaded,
        &[
            ("dataset", config.dataset_id.as_str()),
            ("rows", &rows.to_string()),
        ],
    );
    Ok(store)
}

/// `ingest`: CSV export to processed records file.
fn run_ingest(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let records = ingest::load_csv(Path::new(&config.data_path))?;
    ingest::save_json(Path::new(&config.records_path), &records)?;
    log_event_with_fields(
        Event::DatasetLoaded,
        &[
            ("dataset", config.dataset_id.as_str()),
            ("rows", &records.len().to_string()),
        ],
    );
    Ok(())
}

/// `geocode`: resolve missing coordinates and persist the enriched records.
fn run_geocode(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let mut records = ingest::load_json(Path::new(&config.records_path))?;

    let runtime = tokio::runtime::Runtime::new()?;
    let resolved = runtime.block_on(async {
        let geocoder = Geocoder::new(config.geocode.clone())?;
        geocoder.geocode_records(&mut records).await
    })?;

    ingest::save_json(Path::new(&config.records_path), &records)?;
    write_result(&serde_json::json!({"resolved": resolved}))?;
    Ok(())
}

/// `serve`: load the store and run the HTTP server until stopped.
fn run_serve(config_path: &Path) -> CliResult<()> {
    log_event(Event::BootStart);
    let config = load_config(config_path)?;
    let store = load_store(&config)?;

    let engine = QueryEngine::with_max_results(Arc::new(store), config.max_results);
    let state = Arc::new(AppState::new(engine));
    let server = HttpServer::new(config.http.clone(), state);
    log_event(Event::BootComplete);

    let runtime = tokio::runtime::Runtime::new()?;
    runtime
        .block_on(server.start())
        .map_err(|e| super::errors::CliError::server_failed(e.to_string()))
}

/// `query`: one query document from stdin, one response line to stdout.
fn run_query(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let store = load_store(&config)?;
    let engine = QueryEngine::with_max_results(Arc::new(store), config.max_results);

    let raw = read_query()?;
    match engine.run(&raw) {
        Ok(rows) => write_result(&rows),
        Err(err) => write_error(err.code().code(), err.message()),
    }
}
