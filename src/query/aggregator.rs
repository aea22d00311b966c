//! Grouping and aggregation
//!
//! Partitions filtered rows by the GROUP fields and computes one output row
//! per group: the group-field values verbatim from the group's first member,
//! plus one entry per APPLY rule.
//!
//! Groups are keyed by the stringified tuple of group-field values and emitted
//! in first-seen order. SUM and AVG accumulate in fixed point and round to two
//! decimal places once at the end; COUNT is distinct-value cardinality, not
//! row count.

use serde_json::{Map, Number, Value};
use std::collections::{HashMap, HashSet};

use super::ast::{ApplyOp, ApplyRule, Transformations};
use super::decimal::DecimalSum;
use super::errors::{QueryError, QueryResult};

/// Applies a TRANSFORMATIONS clause to filtered rows.
pub struct QueryAggregator;

impl QueryAggregator {
    /// Groups rows and evaluates every APPLY rule per group.
    ///
    /// # Errors
    ///
    /// Returns `TIMBER_TYPE_MISMATCH` when a numeric aggregation target holds
    /// a non-numeric, non-empty value on some group member.
    pub fn aggregate(
        rows: Vec<Map<String, Value>>,
        transformations: &Transformations,
    ) -> QueryResult<Vec<Map<String, Value>>> {
        let groups = partition(rows, &transformations.group);

        let mut out = Vec::with_capacity(groups.len());
        for group in groups {
            let mut entry = Map::new();
            for field in &transformations.group {
                let value = group[0].get(field).cloned().unwrap_or(Value::Null);
                entry.insert(field.clone(), value);
            }
            for rule in &transformations.apply {
                entry.insert(rule.key.clone(), apply_rule(&group, rule)?);
            }
            out.push(entry);
        }
        Ok(out)
    }
}

/// Splits rows into groups in first-seen order. Two rows share a group iff
/// every group field stringifies identically.
fn partition(rows: Vec<Map<String, Value>>, fields: &[String]) -> Vec<Vec<Map<String, Value>>> {
    let mut index: HashMap<Vec<String>, usize> = HashMap::new();
    let mut groups: Vec<Vec<Map<String, Value>>> = Vec::new();

    for row in rows {
        let key: Vec<String> = fields
            .iter()
            .map(|f| stringify(row.get(f).unwrap_or(&Value::Null)))
            .collect();
        match index.get(&key) {
            Some(&slot) => groups[slot].push(row),
            None => {
                index.insert(key, groups.len());
                groups.push(vec![row]);
            }
        }
    }
    groups
}

/// Stringifies a group-key component: strings verbatim, lists comma-joined.
fn stringify(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(stringify)
            .collect::<Vec<String>>()
            .join(","),
        other => other.to_string(),
    }
}

fn apply_rule(group: &[Map<String, Value>], rule: &ApplyRule) -> QueryResult<Value> {
    match rule.op {
        ApplyOp::Max => numeric_fold(group, &rule.field, f64::max),
        ApplyOp::Min => numeric_fold(group, &rule.field, f64::min),
        ApplyOp::Sum => {
            let (sum, _) = decimal_sum(group, &rule.field)?;
            Ok(number(sum.round2()))
        }
        ApplyOp::Avg => {
            let (sum, valid_count) = decimal_sum(group, &rule.field)?;
            if valid_count == 0 {
                return Ok(number(0.0));
            }
            let avg = sum.value() / valid_count as f64;
            Ok(number((avg * 100.0).round() / 100.0))
        }
        ApplyOp::Count => {
            let distinct: HashSet<String> = group
                .iter()
                .map(|row| row.get(&rule.field).unwrap_or(&Value::Null).to_string())
                .collect();
            Ok(Value::Number(Number::from(distinct.len())))
        }
    }
}

fn numeric_fold(
    group: &[Map<String, Value>],
    field: &str,
    fold: fn(f64, f64) -> f64,
) -> QueryResult<Value> {
    let mut acc: Option<f64> = None;
    for row in group {
        let v = row
            .get(field)
            .and_then(Value::as_f64)
            .ok_or_else(|| QueryError::type_mismatch(field, "numeric"))?;
        acc = Some(match acc {
            Some(current) => fold(current, v),
            None => v,
        });
    }
    // Groups always have at least one member.
    Ok(number(acc.unwrap_or(0.0)))
}

/// Fixed-point sum over a group. Null and empty-string values count as zero
/// and do not contribute to the valid-value count.
fn decimal_sum(group: &[Map<String, Value>], field: &str) -> QueryResult<(DecimalSum, usize)> {
    let mut sum = DecimalSum::new();
    let mut valid_count = 0;
    for row in group {
        match row.get(field) {
            None | Some(Value::Null) => {}
            Some(Value::String(s)) if s.is_empty() => {}
            Some(Value::Number(n)) => {
                sum.add(n);
                valid_count += 1;
            }
            Some(_) => return Err(QueryError::type_mismatch(field, "numeric")),
        }
    }
    Ok((sum, valid_count))
}

fn number(v: f64) -> Value {
    Number::from_f64(v)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}
