//! In-memory record store
//!
//! Holds every loaded dataset for the lifetime of the process. Datasets are
//! immutable once added; concurrent queries share the store behind an `Arc`
//! without locking.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use super::schema::Schema;

/// Registry view of the store used by query validation.
pub trait DatasetRegistry {
    /// Resolves a dataset id to its schema, if loaded.
    fn schema_of(&self, dataset_id: &str) -> Option<&Schema>;
}

/// One loaded dataset: schema plus record snapshot.
#[derive(Debug)]
pub struct Dataset {
    id: String,
    schema: Schema,
    records: Vec<Value>,
    loaded_at: DateTime<Utc>,
}

impl Dataset {
    /// Returns the dataset id
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the dataset schema
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Returns the record snapshot
    pub fn records(&self) -> &[Value] {
        &self.records
    }

    /// Returns the load timestamp
    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }
}

/// Summary row for dataset listings.
#[derive(Debug, Clone, Serialize)]
pub struct DatasetInfo {
    pub id: String,
    pub kind: String,
    pub num_rows: usize,
    pub loaded_at: DateTime<Utc>,
}

/// All loaded datasets, keyed by id.
#[derive(Debug, Default)]
pub struct RecordStore {
    datasets: HashMap<String, Dataset>,
}

impl RecordStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self {
            datasets: HashMap::new(),
        }
    }

    /// Adds a dataset snapshot. Replaces any dataset with the same id.
    ///
    /// Records that are not JSON objects are dropped here; the query engine
    /// assumes every stored record is an object.
    pub fn add(&mut self, id: impl Into<String>, schema: Schema, records: Vec<Value>) {
        let id = id.into();
        let records = records.into_iter().filter(|r| r.is_object()).collect();
        self.datasets.insert(
            id.clone(),
            Dataset {
                id,
                schema,
                records,
                loaded_at: Utc::now(),
            },
        );
    }

    /// Looks up a dataset by id
    pub fn get(&self, id: &str) -> Option<&Dataset> {
        self.datasets.get(id)
    }

    /// Lists loaded datasets, sorted by id.
    pub fn list(&self) -> Vec<DatasetInfo> {
        let mut infos: Vec<DatasetInfo> = self
            .datasets
            .values()
            .map(|d| DatasetInfo {
                id: d.id.clone(),
                kind: d.schema.kind().to_string(),
                num_rows: d.records.len(),
                loaded_at: d.loaded_at,
            })
            .collect();
        infos.sort_by(|a, b| a.id.cmp(&b.id));
        infos
    }

    /// Number of loaded datasets
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    /// True if no datasets are loaded
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

impl DatasetRegistry for RecordStore {
    fn schema_of(&self, dataset_id: &str) -> Option<&Schema> {
        self.datasets.get(dataset_id).map(|d| d.schema())
    }
}
