//! Contractor spreadsheet loading
//!
//! The export uses the column headers of the source spreadsheet
//! ("Contractors name", "Type of operations", ...); rows are mapped to
//! record objects with the engine's field names. Rows without a company name
//! are skipped, comma-separated cells become string lists, and records get a
//! sequential numeric id.

use serde_json::{json, Map, Value};
use std::fs;
use std::path::Path;

use super::errors::{IngestError, IngestResult};

/// Spreadsheet header to record field, for plain string columns.
const TEXT_COLUMNS: [(&str, &str); 5] = [
    ("City", "city"),
    ("Region", "region"),
    ("Website", "website"),
    ("Telephone", "phone"),
    ("Address", "address"),
];

/// Spreadsheet header to record field, for comma-separated list columns.
const LIST_COLUMNS: [(&str, &str); 3] = [
    ("Type of operations", "operations"),
    ("Equipment", "equipment"),
    ("Models", "models"),
];

/// Loads contractor records from a CSV export.
pub fn load_csv(path: &Path) -> IngestResult<Vec<Value>> {
    let mut reader = csv::Reader::from_path(path).map_err(|source| IngestError::Csv {
        path: path.display().to_string(),
        source,
    })?;
    let headers = reader
        .headers()
        .map_err(|source| IngestError::Csv {
            path: path.display().to_string(),
            source,
        })?
        .clone();

    let mut records = Vec::new();
    let mut next_id = 1i64;
    for row in reader.records() {
        let row = row.map_err(|source| IngestError::Csv {
            path: path.display().to_string(),
            source,
        })?;
        let cell = |header: &str| -> &str {
            headers
                .iter()
                .position(|h| h == header)
                .and_then(|i| row.get(i))
                .unwrap_or("")
                .trim()
        };

        let company_name = cell("Contractors name");
        if company_name.is_empty() {
            continue;
        }

        let mut record = Map::new();
        record.insert("id".to_string(), json!(next_id));
        record.insert("companyName".to_string(), json!(company_name));
        for (header, field) in TEXT_COLUMNS {
            record.insert(field.to_string(), json!(cell(header)));
        }
        for (header, field) in LIST_COLUMNS {
            record.insert(field.to_string(), json!(split_list(cell(header))));
        }
        record.insert(
            "province".to_string(),
            json!(non_empty_or(cell("Province"), "BC")),
        );
        record.insert("lat".to_string(), json!(parse_coord(cell("lat"))));
        record.insert("lon".to_string(), json!(parse_coord(cell("lon"))));

        records.push(Value::Object(record));
        next_id += 1;
    }

    if records.is_empty() {
        return Err(IngestError::Empty);
    }
    Ok(records)
}

/// Loads previously processed records from a JSON file.
pub fn load_json(path: &Path) -> IngestResult<Vec<Value>> {
    let content = fs::read_to_string(path).map_err(|source| IngestError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let records: Vec<Value> =
        serde_json::from_str(&content).map_err(|source| IngestError::Json {
            path: path.display().to_string(),
            source,
        })?;
    Ok(records)
}

/// Persists processed records as pretty-printed JSON.
pub fn save_json(path: &Path, records: &[Value]) -> IngestResult<()> {
    let content =
        serde_json::to_string_pretty(records).map_err(|source| IngestError::Json {
            path: path.display().to_string(),
            source,
        })?;
    fs::write(path, content).map_err(|source| IngestError::Io {
        path: path.display().to_string(),
        source,
    })
}

/// Splits a comma-separated cell into trimmed entries; empty cells yield an
/// empty list.
fn split_list(cell: &str) -> Vec<String> {
    if cell.is_empty() {
        return Vec::new();
    }
    cell.split(',')
        .map(|entry| entry.trim().to_string())
        .filter(|entry| !entry.is_empty())
        .collect()
}

fn non_empty_or<'a>(cell: &'a str, default: &'a str) -> &'a str {
    if cell.is_empty() {
        default
    } else {
        cell
    }
}

/// Missing or unparsable coordinates load as 0; the geocoder treats 0 as
/// "not yet resolved".
fn parse_coord(cell: &str) -> f64 {
    cell.parse().unwrap_or(0.0)
}
