//! Ingestion-To-Query Tests
//!
//! Loads a spreadsheet export through the ingest pipeline, stores it, and
//! queries it end-to-end: spreadsheet column mapping, list splitting, the
//! JSON round-trip, and a query over the freshly loaded dataset.

use serde_json::json;
use std::io::Write;
use std::sync::Arc;

use tempfile::NamedTempFile;
use timberdb::dataset::{RecordStore, Schema};
use timberdb::ingest::{load_csv, load_json, save_json};
use timberdb::query::QueryEngine;

const EXPORT: &str = "\
Contractors name,Type of operations,Equipment,Models,City,Region,Website,Telephone,Address,lat,lon
Acme Logging,\"Thinning, Final harvesting\",\"Harvester, Forwarder\",H415,Houston,Northwest,acme.example,555-0101,1 Mill Rd,54.4,-126.6
Beta Forestry,Hauling,Lowbed,,Prince George,Cariboo,beta.example,555-0102,2 Bark St,53.9,-122.7
,,,,Smithers,Northwest,,,,,
Cedar Contracting,Thinning,,,Prince Rupert,Northwest,,555-0103,3 Coast Ave,54.3,-130.3
";

fn write_export() -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(EXPORT.as_bytes()).unwrap();
    file
}

#[test]
fn test_csv_to_engine_end_to_end() {
    let csv = write_export();
    let records = load_csv(csv.path()).unwrap();
    assert_eq!(records.len(), 3);

    let mut store = RecordStore::new();
    store.add("contractors", Schema::contractors(), records);
    let engine = QueryEngine::new(Arc::new(store));

    let out = engine
        .run(&json!({
            "WHERE": {"IS": {"contractors_region": "Northwest"}},
            "OPTIONS": {
                "COLUMNS": ["contractors_companyName", "contractors_operations"],
                "ORDER": "contractors_companyName"
            }
        }))
        .unwrap();

    assert_eq!(out.len(), 2);
    assert_eq!(out[0].get("companyName"), Some(&json!("Acme Logging")));
    assert_eq!(
        out[0].get("operations"),
        Some(&json!(["Thinning", "Final harvesting"]))
    );
    assert_eq!(out[1].get("companyName"), Some(&json!("Cedar Contracting")));
}

#[test]
fn test_processed_records_round_trip() {
    let csv = write_export();
    let records = load_csv(csv.path()).unwrap();

    let cache = NamedTempFile::new().unwrap();
    save_json(cache.path(), &records).unwrap();
    let reloaded = load_json(cache.path()).unwrap();

    assert_eq!(records, reloaded);
}

#[test]
fn test_numeric_query_over_ingested_coordinates() {
    let csv = write_export();
    let records = load_csv(csv.path()).unwrap();

    let mut store = RecordStore::new();
    store.add("contractors", Schema::contractors(), records);
    let engine = QueryEngine::new(Arc::new(store));

    let out = engine
        .run(&json!({
            "WHERE": {"GT": {"contractors_lat": 54.0}},
            "OPTIONS": {"COLUMNS": ["contractors_city"]}
        }))
        .unwrap();

    let cities: Vec<&str> = out
        .iter()
        .map(|row| row.get("city").unwrap().as_str().unwrap())
        .collect();
    assert_eq!(cities, vec!["Houston", "Prince Rupert"]);
}
