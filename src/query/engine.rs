//! Query engine
//!
//! Orchestrates one pipeline invocation: validate, filter, aggregate when
//! TRANSFORMATIONS is present, order when ORDER is present, render, then
//! enforce the result cap. Each stage consumes the previous stage's output;
//! no cross-request state exists beyond the read-only record store.

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::dataset::RecordStore;

use super::aggregator::QueryAggregator;
use super::errors::{QueryError, QueryResult};
use super::filterer::QueryFilterer;
use super::orderer::QueryOrderer;
use super::renderer::QueryRenderer;
use super::validator::QueryValidator;

/// Default cap on rendered result rows.
pub const DEFAULT_MAX_RESULTS: usize = 5000;

/// The query pipeline over a shared record store.
///
/// Constructed explicitly by whoever owns the request boundary; the store is
/// loaded before the engine exists, so there is no lazy initialization.
#[derive(Debug, Clone)]
pub struct QueryEngine {
    store: Arc<RecordStore>,
    max_results: usize,
}

impl QueryEngine {
    /// Creates an engine with the default result cap.
    pub fn new(store: Arc<RecordStore>) -> Self {
        Self::with_max_results(store, DEFAULT_MAX_RESULTS)
    }

    /// Creates an engine with a custom result cap.
    pub fn with_max_results(store: Arc<RecordStore>, max_results: usize) -> Self {
        Self { store, max_results }
    }

    /// The record store this engine queries.
    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    /// Runs one query document through the full pipeline.
    ///
    /// # Errors
    ///
    /// Any stage error propagates unmodified: `TIMBER_QUERY_INVALID`,
    /// `TIMBER_UNKNOWN_DATASET`, `TIMBER_TYPE_MISMATCH`, or
    /// `TIMBER_RESULT_TOO_LARGE` when the rendered output exceeds the cap
    /// (the whole query fails; nothing is truncated).
    pub fn run(&self, raw: &Value) -> QueryResult<Vec<Map<String, Value>>> {
        let query = QueryValidator::new(self.store.as_ref()).validate(raw)?;

        let dataset = self
            .store
            .get(&query.dataset_id)
            .ok_or_else(|| QueryError::unknown_dataset(&query.dataset_id))?;

        let matched = QueryFilterer::new(dataset.records()).filter(&query.filter)?;
        let mut rows: Vec<Map<String, Value>> = matched
            .into_iter()
            .filter_map(|idx| dataset.records()[idx].as_object().cloned())
            .collect();

        if let Some(transformations) = &query.transformations {
            rows = QueryAggregator::aggregate(rows, transformations)?;
        }

        if let Some(order) = &query.order {
            QueryOrderer::sort(&mut rows, order);
        }

        let output = QueryRenderer::render(&rows, &query.columns);
        if output.len() > self.max_results {
            return Err(QueryError::result_too_large(output.len(), self.max_results));
        }
        Ok(output)
    }
}
