//! Result projection
//!
//! Projects each result row down to the requested COLUMNS. Base-schema
//! references render under their bare field name; apply keys render verbatim.
//! Output rows contain nothing outside COLUMNS.

use serde_json::{Map, Value};

use super::ast::Column;

/// Projects result rows to the requested output columns.
pub struct QueryRenderer;

impl QueryRenderer {
    /// Produces one flat output object per input row.
    pub fn render(rows: &[Map<String, Value>], columns: &[Column]) -> Vec<Map<String, Value>> {
        rows.iter()
            .map(|row| {
                let mut out = Map::new();
                for column in columns {
                    let name = column.output_name();
                    let value = row.get(name).cloned().unwrap_or(Value::Null);
                    out.insert(name.to_string(), value);
                }
                out
            })
            .collect()
    }
}
