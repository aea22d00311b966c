//! Boolean filter evaluation
//!
//! Evaluates a validated filter tree over a dataset snapshot. Records are
//! identified by their index into the snapshot, so OR-deduplication and NOT
//! set difference work on record identity, never on value equality, and the
//! result is always a stable subset of the snapshot order.

use serde_json::Value;
use std::collections::HashSet;

use super::ast::{Filter, StringPattern};
use super::errors::{QueryError, QueryResult};

/// Evaluates filters against one dataset snapshot.
pub struct QueryFilterer<'a> {
    records: &'a [Value],
}

impl<'a> QueryFilterer<'a> {
    /// Creates a filterer over a snapshot.
    pub fn new(records: &'a [Value]) -> Self {
        Self { records }
    }

    /// Returns the indices of all matching records, in snapshot order.
    ///
    /// # Errors
    ///
    /// Returns `TIMBER_TYPE_MISMATCH` when a compared field does not hold the
    /// type the operator requires on some candidate record. The pass aborts;
    /// no record is silently skipped.
    pub fn filter(&self, filter: &Filter) -> QueryResult<Vec<usize>> {
        let all: Vec<usize> = (0..self.records.len()).collect();
        self.eval(filter, &all)
    }

    fn eval(&self, filter: &Filter, input: &[usize]) -> QueryResult<Vec<usize>> {
        match filter {
            Filter::MatchAll => Ok(input.to_vec()),
            Filter::Gt(field, literal) => self.narrow_numeric(input, field, |v| v > *literal),
            Filter::Lt(field, literal) => self.narrow_numeric(input, field, |v| v < *literal),
            Filter::Eq(field, literal) => self.narrow_numeric(input, field, |v| v == *literal),
            Filter::Is(field, pattern) => self.narrow_text(input, field, pattern),
            Filter::And(subs) => {
                // Progressive narrowing: each sub-filter sees the survivors
                // of the previous one.
                let mut current = input.to_vec();
                for sub in subs {
                    current = self.eval(sub, &current)?;
                }
                Ok(current)
            }
            Filter::Or(subs) => {
                // Each sub-filter runs against this node's input; the union
                // is deduplicated by index and restored to snapshot order.
                let mut matched = HashSet::new();
                for sub in subs {
                    matched.extend(self.eval(sub, input)?);
                }
                Ok(input
                    .iter()
                    .copied()
                    .filter(|idx| matched.contains(idx))
                    .collect())
            }
            Filter::Not(sub) => {
                let excluded: HashSet<usize> = self.eval(sub, input)?.into_iter().collect();
                Ok(input
                    .iter()
                    .copied()
                    .filter(|idx| !excluded.contains(idx))
                    .collect())
            }
        }
    }

    fn narrow_numeric<F>(&self, input: &[usize], field: &str, pred: F) -> QueryResult<Vec<usize>>
    where
        F: Fn(f64) -> bool,
    {
        let mut out = Vec::new();
        for &idx in input {
            let value = self.records[idx]
                .get(field)
                .and_then(Value::as_f64)
                .ok_or_else(|| QueryError::type_mismatch(field, "numeric"))?;
            if pred(value) {
                out.push(idx);
            }
        }
        Ok(out)
    }

    fn narrow_text(
        &self,
        input: &[usize],
        field: &str,
        pattern: &StringPattern,
    ) -> QueryResult<Vec<usize>> {
        let mut out = Vec::new();
        for &idx in input {
            let value = self.records[idx]
                .get(field)
                .and_then(Value::as_str)
                .ok_or_else(|| QueryError::type_mismatch(field, "a string"))?;
            if pattern.matches(value) {
                out.push(idx);
            }
        }
        Ok(out)
    }
}
