//! Result ordering
//!
//! Stable multi-key sort over the (possibly aggregated) result rows. Keys are
//! evaluated left-to-right, advancing to the next key only on a tie, with one
//! direction applied uniformly. Comparison is type-aware: numeric fields and
//! apply keys compare numerically, string fields lexicographically. The
//! validator resolves every key, so there is no unrecognized-key case here.

use serde_json::{Map, Value};
use std::cmp::Ordering;

use super::ast::{OrderSpec, SortKey, SortKeyKind};

/// Sorts result rows in place.
pub struct QueryOrderer;

impl QueryOrderer {
    /// Applies the ORDER clause. The underlying sort is stable, so rows that
    /// tie on every key keep their prior relative order.
    pub fn sort(rows: &mut [Map<String, Value>], order: &OrderSpec) {
        let descending = order.direction.factor() < 0;
        rows.sort_by(|a, b| {
            let ordering = compare_rows(a, b, &order.keys);
            if descending {
                ordering.reverse()
            } else {
                ordering
            }
        });
    }
}

fn compare_rows(a: &Map<String, Value>, b: &Map<String, Value>, keys: &[SortKey]) -> Ordering {
    for key in keys {
        let ordering = match key.kind {
            SortKeyKind::Numeric => {
                let a_val = a.get(&key.name).and_then(Value::as_f64).unwrap_or(0.0);
                let b_val = b.get(&key.name).and_then(Value::as_f64).unwrap_or(0.0);
                a_val.partial_cmp(&b_val).unwrap_or(Ordering::Equal)
            }
            SortKeyKind::Text => {
                let a_val = a.get(&key.name).and_then(Value::as_str).unwrap_or("");
                let b_val = b.get(&key.name).and_then(Value::as_str).unwrap_or("");
                a_val.cmp(b_val)
            }
        };
        if ordering != Ordering::Equal {
            return ordering;
        }
    }
    Ordering::Equal
}
