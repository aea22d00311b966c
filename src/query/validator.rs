//! Query document validation
//!
//! Turns an untyped JSON query document into the typed [`Query`] AST, or
//! rejects it before any filtering runs. The dataset id referenced by the
//! query is resolved against the record store and the registered schema
//! supplies the field whitelists; field vocabulary never decides the kind.
//!
//! Validation rules are listed in QUERY.md.

use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::dataset::{DatasetRegistry, FieldKind, Schema};

use super::ast::{
    ApplyOp, ApplyRule, Column, Direction, Filter, OrderSpec, Query, SortKey, SortKeyKind,
    StringPattern, Transformations,
};
use super::errors::{QueryError, QueryResult};

/// Validates raw query documents against the schemas of loaded datasets.
pub struct QueryValidator<'a, R: DatasetRegistry> {
    registry: &'a R,
}

impl<'a, R: DatasetRegistry> QueryValidator<'a, R> {
    /// Creates a validator backed by the given dataset registry.
    pub fn new(registry: &'a R) -> Self {
        Self { registry }
    }

    /// Validates a raw query document.
    ///
    /// # Errors
    ///
    /// Returns `TIMBER_QUERY_INVALID` for any structural or field-reference
    /// violation, and `TIMBER_UNKNOWN_DATASET` when the referenced dataset id
    /// is not loaded.
    pub fn validate(&self, raw: &Value) -> QueryResult<Query> {
        let top = raw
            .as_object()
            .ok_or_else(|| QueryError::invalid("Query must be a JSON object"))?;

        let where_raw = top
            .get("WHERE")
            .ok_or_else(|| QueryError::invalid("Query is missing WHERE"))?;
        let options_raw = top
            .get("OPTIONS")
            .ok_or_else(|| QueryError::invalid("Query is missing OPTIONS"))?;
        let transformations_raw = top.get("TRANSFORMATIONS");

        let dataset_id = find_dataset_id(where_raw, transformations_raw, options_raw)?;
        let schema = self
            .registry
            .schema_of(&dataset_id)
            .ok_or_else(|| QueryError::unknown_dataset(&dataset_id))?;

        let ctx = Context {
            dataset_id: &dataset_id,
            schema,
        };

        let filter = parse_filter(where_raw, &ctx)?;
        let transformations = transformations_raw
            .map(|t| parse_transformations(t, &ctx))
            .transpose()?;

        let options = options_raw
            .as_object()
            .ok_or_else(|| QueryError::invalid("OPTIONS must be an object"))?;
        let columns_raw = options
            .get("COLUMNS")
            .ok_or_else(|| QueryError::invalid("OPTIONS is missing COLUMNS"))?;
        let (raw_columns, columns) =
            parse_columns(columns_raw, &ctx, transformations.as_ref())?;

        let order = options
            .get("ORDER")
            .map(|o| parse_order(o, &ctx, &raw_columns, transformations.as_ref()))
            .transpose()?;

        Ok(Query {
            dataset_id,
            filter,
            transformations,
            columns,
            order,
        })
    }
}

/// Validation context: the dataset id every reference must use, and the
/// schema its fields must belong to.
struct Context<'a> {
    dataset_id: &'a str,
    schema: &'a Schema,
}

impl Context<'_> {
    /// Splits a `datasetid_field` reference into its bare field name.
    fn parse_field_ref(&self, key: &str) -> QueryResult<String> {
        let (dataset, field) = split_field_ref(key)
            .ok_or_else(|| QueryError::invalid(format!("Invalid field reference '{}'", key)))?;
        if dataset != self.dataset_id {
            return Err(QueryError::invalid(format!(
                "Query references datasets '{}' and '{}'",
                self.dataset_id, dataset
            )));
        }
        if !self.schema.contains(field) {
            return Err(QueryError::invalid(format!(
                "Unknown field '{}' for dataset kind '{}'",
                field,
                self.schema.kind()
            )));
        }
        Ok(field.to_string())
    }

    /// As `parse_field_ref`, additionally requiring a field kind.
    fn parse_typed_field_ref(&self, key: &str, kind: FieldKind) -> QueryResult<String> {
        let field = self.parse_field_ref(key)?;
        if !self.schema.is_kind(&field, kind) {
            return Err(QueryError::invalid(format!(
                "Field '{}' is not a {} field",
                field,
                kind.kind_name()
            )));
        }
        Ok(field)
    }
}

/// Splits `datasetid_field` into two non-empty, space-free segments.
fn split_field_ref(key: &str) -> Option<(&str, &str)> {
    if key.contains(' ') {
        return None;
    }
    let mut parts = key.split('_');
    let dataset = parts.next()?;
    let field = parts.next()?;
    if parts.next().is_some() || dataset.is_empty() || field.is_empty() {
        return None;
    }
    Some((dataset, field))
}

/// Finds the dataset id from the first field reference in the document:
/// comparison and string operators are walked first, then APPLY targets,
/// GROUP keys, and COLUMNS entries.
fn find_dataset_id(
    where_raw: &Value,
    transformations_raw: Option<&Value>,
    options_raw: &Value,
) -> QueryResult<String> {
    if let Some(id) = first_ref_in_filter(where_raw) {
        return Ok(id);
    }
    if let Some(t) = transformations_raw.and_then(Value::as_object) {
        if let Some(apply) = t.get("APPLY").and_then(Value::as_array) {
            for rule in apply {
                let target = rule
                    .as_object()
                    .and_then(|r| r.values().next())
                    .and_then(Value::as_object)
                    .and_then(|op| op.values().next())
                    .and_then(Value::as_str);
                if let Some(id) = target.and_then(ref_dataset) {
                    return Ok(id);
                }
            }
        }
        if let Some(group) = t.get("GROUP").and_then(Value::as_array) {
            for key in group {
                if let Some(id) = key.as_str().and_then(ref_dataset) {
                    return Ok(id);
                }
            }
        }
    }
    if let Some(columns) = options_raw
        .as_object()
        .and_then(|o| o.get("COLUMNS"))
        .and_then(Value::as_array)
    {
        for col in columns {
            if let Some(id) = col.as_str().and_then(ref_dataset) {
                return Ok(id);
            }
        }
    }
    Err(QueryError::invalid(
        "Query does not reference any dataset field",
    ))
}

fn ref_dataset(key: &str) -> Option<String> {
    split_field_ref(key).map(|(dataset, _)| dataset.to_string())
}

fn first_ref_in_filter(v: &Value) -> Option<String> {
    let obj = v.as_object()?;
    let (op, body) = obj.iter().next()?;
    match op.as_str() {
        "GT" | "LT" | "EQ" | "IS" => body
            .as_object()
            .and_then(|b| b.keys().next())
            .and_then(|k| ref_dataset(k)),
        "AND" | "OR" => body
            .as_array()?
            .iter()
            .find_map(first_ref_in_filter),
        "NOT" => first_ref_in_filter(body),
        _ => None,
    }
}

fn parse_filter(v: &Value, ctx: &Context<'_>) -> QueryResult<Filter> {
    let obj = v
        .as_object()
        .ok_or_else(|| QueryError::invalid("Filter must be an object"))?;
    if obj.is_empty() {
        return Ok(Filter::MatchAll);
    }
    if obj.len() != 1 {
        return Err(QueryError::invalid(
            "Filter must contain exactly one operator",
        ));
    }
    let (op, body) = obj.iter().next().expect("len checked");
    match op.as_str() {
        "GT" | "LT" | "EQ" => parse_comparison(op, body, ctx),
        "IS" => parse_string_match(body, ctx),
        "AND" | "OR" => parse_logic(op, body, ctx),
        "NOT" => Ok(Filter::Not(Box::new(parse_filter(body, ctx)?))),
        _ => Err(QueryError::invalid(format!(
            "Unknown filter operator '{}'",
            op
        ))),
    }
}

fn single_entry<'v>(body: &'v Value, op: &str) -> QueryResult<(&'v String, &'v Value)> {
    let obj = body
        .as_object()
        .ok_or_else(|| QueryError::invalid(format!("{} expects an object", op)))?;
    if obj.len() != 1 {
        return Err(QueryError::invalid(format!(
            "{} expects exactly one field",
            op
        )));
    }
    Ok(obj.iter().next().expect("len checked"))
}

fn parse_comparison(op: &str, body: &Value, ctx: &Context<'_>) -> QueryResult<Filter> {
    let (key, value) = single_entry(body, op)?;
    let field = ctx.parse_typed_field_ref(key, FieldKind::Numeric)?;
    let literal = value
        .as_f64()
        .ok_or_else(|| QueryError::invalid(format!("{} expects a numeric literal", op)))?;
    Ok(match op {
        "GT" => Filter::Gt(field, literal),
        "LT" => Filter::Lt(field, literal),
        _ => Filter::Eq(field, literal),
    })
}

fn parse_string_match(body: &Value, ctx: &Context<'_>) -> QueryResult<Filter> {
    let (key, value) = single_entry(body, "IS")?;
    let field = ctx.parse_typed_field_ref(key, FieldKind::Text)?;
    let raw = value
        .as_str()
        .ok_or_else(|| QueryError::invalid("IS expects a string literal"))?;
    Ok(Filter::Is(field, parse_pattern(raw)?))
}

/// Parses a wildcard pattern. `*` may appear only as the first and/or last
/// character; an interior asterisk is a malformed query.
fn parse_pattern(raw: &str) -> QueryResult<StringPattern> {
    let prefix_star = raw.starts_with('*');
    let suffix_star = raw.len() > 1 && raw.ends_with('*');
    let inner = &raw[usize::from(prefix_star)..raw.len() - usize::from(suffix_star)];
    if inner.contains('*') {
        return Err(QueryError::invalid(format!(
            "Asterisk may only mark a prefix or suffix: '{}'",
            raw
        )));
    }
    let inner = inner.to_string();
    Ok(match (prefix_star, suffix_star) {
        (false, false) => StringPattern::Exact(inner),
        (true, false) => StringPattern::Suffix(inner),
        (false, true) => StringPattern::Prefix(inner),
        (true, true) => StringPattern::Contains(inner),
    })
}

fn parse_logic(op: &str, body: &Value, ctx: &Context<'_>) -> QueryResult<Filter> {
    let subs = body
        .as_array()
        .ok_or_else(|| QueryError::invalid(format!("{} expects an array", op)))?;
    if subs.len() < 2 {
        return Err(QueryError::invalid(format!(
            "{} requires at least two sub-filters",
            op
        )));
    }
    let parsed = subs
        .iter()
        .map(|s| parse_filter(s, ctx))
        .collect::<QueryResult<Vec<Filter>>>()?;
    Ok(if op == "AND" {
        Filter::And(parsed)
    } else {
        Filter::Or(parsed)
    })
}

fn parse_transformations(v: &Value, ctx: &Context<'_>) -> QueryResult<Transformations> {
    let obj = v
        .as_object()
        .ok_or_else(|| QueryError::invalid("TRANSFORMATIONS must be an object"))?;
    let group_raw = obj
        .get("GROUP")
        .ok_or_else(|| QueryError::invalid("TRANSFORMATIONS is missing GROUP"))?;
    let apply_raw = obj
        .get("APPLY")
        .ok_or_else(|| QueryError::invalid("TRANSFORMATIONS is missing APPLY"))?;

    let group_keys = group_raw
        .as_array()
        .ok_or_else(|| QueryError::invalid("GROUP must be an array"))?;
    if group_keys.is_empty() {
        return Err(QueryError::invalid("GROUP must not be empty"));
    }
    let group = group_keys
        .iter()
        .map(|k| {
            let key = k
                .as_str()
                .ok_or_else(|| QueryError::invalid("GROUP entries must be strings"))?;
            ctx.parse_field_ref(key)
        })
        .collect::<QueryResult<Vec<String>>>()?;

    let apply_rules = apply_raw
        .as_array()
        .ok_or_else(|| QueryError::invalid("APPLY must be an array"))?;
    let mut seen_keys = HashSet::new();
    let mut apply = Vec::with_capacity(apply_rules.len());
    for rule in apply_rules {
        apply.push(parse_apply_rule(rule, ctx, &mut seen_keys)?);
    }

    Ok(Transformations { group, apply })
}

fn parse_apply_rule(
    rule: &Value,
    ctx: &Context<'_>,
    seen_keys: &mut HashSet<String>,
) -> QueryResult<ApplyRule> {
    let (key, body) = single_entry(rule, "APPLY rule")?;
    if key.is_empty() || key.contains('_') {
        return Err(QueryError::invalid(format!(
            "Invalid apply key '{}': must be non-empty and contain no underscore",
            key
        )));
    }
    if !seen_keys.insert(key.clone()) {
        return Err(QueryError::invalid(format!("Duplicate apply key '{}'", key)));
    }
    let (op_name, target) = single_entry(body, "APPLY operation")?;
    let op = ApplyOp::parse(op_name).ok_or_else(|| {
        QueryError::invalid(format!("Unknown aggregation operator '{}'", op_name))
    })?;
    let target_key = target
        .as_str()
        .ok_or_else(|| QueryError::invalid("Aggregation target must be a field reference"))?;
    let field = if op.requires_numeric() {
        ctx.parse_typed_field_ref(target_key, FieldKind::Numeric)?
    } else {
        ctx.parse_field_ref(target_key)?
    };
    Ok(ApplyRule {
        key: key.clone(),
        op,
        field,
    })
}

fn parse_columns(
    v: &Value,
    ctx: &Context<'_>,
    transformations: Option<&Transformations>,
) -> QueryResult<(Vec<String>, Vec<Column>)> {
    let entries = v
        .as_array()
        .ok_or_else(|| QueryError::invalid("COLUMNS must be an array"))?;
    if entries.is_empty() {
        return Err(QueryError::invalid("COLUMNS must not be empty"));
    }

    let apply_keys: HashSet<&str> = transformations
        .map(|t| t.apply.iter().map(|r| r.key.as_str()).collect())
        .unwrap_or_default();

    let mut raw_columns = Vec::with_capacity(entries.len());
    let mut columns = Vec::with_capacity(entries.len());
    for entry in entries {
        let raw = entry
            .as_str()
            .ok_or_else(|| QueryError::invalid("COLUMNS entries must be strings"))?;
        if apply_keys.contains(raw) {
            columns.push(Column::Apply(raw.to_string()));
        } else {
            let field = ctx.parse_field_ref(raw)?;
            if let Some(t) = transformations {
                if !t.group.contains(&field) {
                    return Err(QueryError::invalid(format!(
                        "Column '{}' must be a grouped field or an apply key",
                        raw
                    )));
                }
            }
            columns.push(Column::Field(field));
        }
        raw_columns.push(raw.to_string());
    }
    Ok((raw_columns, columns))
}

fn parse_order(
    v: &Value,
    ctx: &Context<'_>,
    raw_columns: &[String],
    transformations: Option<&Transformations>,
) -> QueryResult<OrderSpec> {
    match v {
        Value::String(key) => {
            let sort_key = resolve_sort_key(key, ctx, raw_columns, transformations)?;
            Ok(OrderSpec {
                direction: Direction::Up,
                keys: vec![sort_key],
            })
        }
        Value::Object(obj) => parse_order_object(obj, ctx, raw_columns, transformations),
        _ => Err(QueryError::invalid(
            "ORDER must be a column name or a {dir, keys} object",
        )),
    }
}

fn parse_order_object(
    obj: &Map<String, Value>,
    ctx: &Context<'_>,
    raw_columns: &[String],
    transformations: Option<&Transformations>,
) -> QueryResult<OrderSpec> {
    if obj.len() != 2 || !obj.contains_key("dir") || !obj.contains_key("keys") {
        return Err(QueryError::invalid(
            "ORDER object must contain exactly dir and keys",
        ));
    }
    let direction = match obj.get("dir").and_then(Value::as_str) {
        Some("UP") => Direction::Up,
        Some("DOWN") => Direction::Down,
        _ => return Err(QueryError::invalid("ORDER dir must be \"UP\" or \"DOWN\"")),
    };
    let keys_raw = obj
        .get("keys")
        .and_then(Value::as_array)
        .ok_or_else(|| QueryError::invalid("ORDER keys must be an array"))?;
    if keys_raw.is_empty() {
        return Err(QueryError::invalid("ORDER keys must not be empty"));
    }
    let keys = keys_raw
        .iter()
        .map(|k| {
            let key = k
                .as_str()
                .ok_or_else(|| QueryError::invalid("ORDER keys must be strings"))?;
            resolve_sort_key(key, ctx, raw_columns, transformations)
        })
        .collect::<QueryResult<Vec<SortKey>>>()?;
    Ok(OrderSpec { direction, keys })
}

/// Resolves an ORDER entry to a typed sort key. The entry must appear in
/// COLUMNS and must compare as either a number or a string; list fields are
/// not orderable.
fn resolve_sort_key(
    key: &str,
    ctx: &Context<'_>,
    raw_columns: &[String],
    transformations: Option<&Transformations>,
) -> QueryResult<SortKey> {
    if !raw_columns.iter().any(|c| c == key) {
        return Err(QueryError::invalid(format!(
            "ORDER key '{}' is not in COLUMNS",
            key
        )));
    }
    let is_apply_key = transformations
        .map(|t| t.apply.iter().any(|r| r.key == key))
        .unwrap_or(false);
    if is_apply_key {
        // Every aggregation produces a number.
        return Ok(SortKey {
            name: key.to_string(),
            kind: SortKeyKind::Numeric,
        });
    }
    let field = ctx.parse_field_ref(key)?;
    let kind = match ctx.schema.field_kind(&field) {
        Some(FieldKind::Numeric) => SortKeyKind::Numeric,
        Some(FieldKind::Text) => SortKeyKind::Text,
        _ => {
            return Err(QueryError::invalid(format!(
                "ORDER key '{}' does not resolve to an orderable field",
                key
            )))
        }
    };
    Ok(SortKey {
        name: field,
        kind,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{RecordStore, Schema};
    use crate::query::errors::QueryErrorCode;
    use serde_json::json;

    fn store() -> RecordStore {
        let mut store = RecordStore::new();
        store.add("contractors", Schema::contractors(), vec![]);
        store
    }

    fn validate(raw: Value) -> QueryResult<Query> {
        let store = store();
        QueryValidator::new(&store).validate(&raw)
    }

    #[test]
    fn test_minimal_query() {
        let query = validate(json!({
            "WHERE": {},
            "OPTIONS": {"COLUMNS": ["contractors_city"]}
        }))
        .unwrap();
        assert_eq!(query.dataset_id, "contractors");
        assert_eq!(query.filter, Filter::MatchAll);
        assert_eq!(query.columns, vec![Column::Field("city".into())]);
        assert!(query.order.is_none());
        assert!(query.transformations.is_none());
    }

    #[test]
    fn test_missing_where_rejected() {
        let err = validate(json!({"OPTIONS": {"COLUMNS": ["contractors_city"]}})).unwrap_err();
        assert_eq!(err.code(), QueryErrorCode::TimberQueryInvalid);
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(validate(json!([1, 2])).is_err());
        assert!(validate(json!("WHERE")).is_err());
    }

    #[test]
    fn test_unknown_dataset() {
        let err = validate(json!({
            "WHERE": {"GT": {"rooms_lat": 3}},
            "OPTIONS": {"COLUMNS": ["rooms_lat"]}
        }))
        .unwrap_err();
        assert_eq!(err.code(), QueryErrorCode::TimberUnknownDataset);
    }

    #[test]
    fn test_inconsistent_dataset_ids() {
        let err = validate(json!({
            "WHERE": {"GT": {"contractors_lat": 3}},
            "OPTIONS": {"COLUMNS": ["other_city"]}
        }))
        .unwrap_err();
        assert_eq!(err.code(), QueryErrorCode::TimberQueryInvalid);
    }

    #[test]
    fn test_unknown_operator() {
        let err = validate(json!({
            "WHERE": {"XOR": [{"GT": {"contractors_lat": 1}}, {"LT": {"contractors_lat": 2}}]},
            "OPTIONS": {"COLUMNS": ["contractors_city"]}
        }))
        .unwrap_err();
        assert!(err.message().contains("XOR"));
    }

    #[test]
    fn test_comparison_requires_numeric_field() {
        let err = validate(json!({
            "WHERE": {"GT": {"contractors_city": 5}},
            "OPTIONS": {"COLUMNS": ["contractors_city"]}
        }))
        .unwrap_err();
        assert!(err.message().contains("numeric"));
    }

    #[test]
    fn test_is_requires_string_field() {
        assert!(validate(json!({
            "WHERE": {"IS": {"contractors_lat": "x"}},
            "OPTIONS": {"COLUMNS": ["contractors_city"]}
        }))
        .is_err());
    }

    #[test]
    fn test_is_rejects_non_string_literal() {
        assert!(validate(json!({
            "WHERE": {"IS": {"contractors_city": 5}},
            "OPTIONS": {"COLUMNS": ["contractors_city"]}
        }))
        .is_err());
    }

    #[test]
    fn test_wildcard_parsing() {
        assert_eq!(
            parse_pattern("Foo*").unwrap(),
            StringPattern::Prefix("Foo".into())
        );
        assert_eq!(
            parse_pattern("*bar").unwrap(),
            StringPattern::Suffix("bar".into())
        );
        assert_eq!(
            parse_pattern("*oo*").unwrap(),
            StringPattern::Contains("oo".into())
        );
        assert_eq!(
            parse_pattern("Foobar").unwrap(),
            StringPattern::Exact("Foobar".into())
        );
        assert!(parse_pattern("Fo*o").is_err());
        // A lone star is a match-anything prefix of the empty string.
        assert_eq!(parse_pattern("*").unwrap(), StringPattern::Suffix("".into()));
    }

    #[test]
    fn test_logic_arity() {
        let err = validate(json!({
            "WHERE": {"AND": [{"GT": {"contractors_lat": 1}}]},
            "OPTIONS": {"COLUMNS": ["contractors_city"]}
        }))
        .unwrap_err();
        assert!(err.message().contains("two"));
    }

    #[test]
    fn test_nested_filters_validate() {
        let query = validate(json!({
            "WHERE": {"OR": [
                {"NOT": {"IS": {"contractors_city": "*George*"}}},
                {"AND": [
                    {"GT": {"contractors_lat": 48.0}},
                    {"LT": {"contractors_lon": -120.0}}
                ]}
            ]},
            "OPTIONS": {"COLUMNS": ["contractors_companyName"]}
        }))
        .unwrap();
        assert!(matches!(query.filter, Filter::Or(ref subs) if subs.len() == 2));
    }

    #[test]
    fn test_transformations_validated() {
        let query = validate(json!({
            "WHERE": {},
            "TRANSFORMATIONS": {
                "GROUP": ["contractors_region"],
                "APPLY": [{"maxLat": {"MAX": "contractors_lat"}}]
            },
            "OPTIONS": {"COLUMNS": ["contractors_region", "maxLat"]}
        }))
        .unwrap();
        let t = query.transformations.unwrap();
        assert_eq!(t.group, vec!["region"]);
        assert_eq!(t.apply.len(), 1);
        assert_eq!(t.apply[0].op, ApplyOp::Max);
        assert_eq!(query.columns[1], Column::Apply("maxLat".into()));
    }

    #[test]
    fn test_apply_key_with_underscore_rejected() {
        assert!(validate(json!({
            "WHERE": {},
            "TRANSFORMATIONS": {
                "GROUP": ["contractors_region"],
                "APPLY": [{"max_lat": {"MAX": "contractors_lat"}}]
            },
            "OPTIONS": {"COLUMNS": ["contractors_region"]}
        }))
        .is_err());
    }

    #[test]
    fn test_duplicate_apply_keys_rejected() {
        assert!(validate(json!({
            "WHERE": {},
            "TRANSFORMATIONS": {
                "GROUP": ["contractors_region"],
                "APPLY": [
                    {"agg": {"MAX": "contractors_lat"}},
                    {"agg": {"MIN": "contractors_lat"}}
                ]
            },
            "OPTIONS": {"COLUMNS": ["contractors_region"]}
        }))
        .is_err());
    }

    #[test]
    fn test_numeric_aggregation_rejects_string_field() {
        assert!(validate(json!({
            "WHERE": {},
            "TRANSFORMATIONS": {
                "GROUP": ["contractors_region"],
                "APPLY": [{"total": {"SUM": "contractors_city"}}]
            },
            "OPTIONS": {"COLUMNS": ["contractors_region"]}
        }))
        .is_err());
    }

    #[test]
    fn test_count_accepts_any_field() {
        assert!(validate(json!({
            "WHERE": {},
            "TRANSFORMATIONS": {
                "GROUP": ["contractors_region"],
                "APPLY": [{"cities": {"COUNT": "contractors_city"}}]
            },
            "OPTIONS": {"COLUMNS": ["contractors_region", "cities"]}
        }))
        .is_ok());
    }

    #[test]
    fn test_grouped_columns_constraint() {
        let err = validate(json!({
            "WHERE": {},
            "TRANSFORMATIONS": {
                "GROUP": ["contractors_region"],
                "APPLY": []
            },
            "OPTIONS": {"COLUMNS": ["contractors_city"]}
        }))
        .unwrap_err();
        assert!(err.message().contains("grouped"));
    }

    #[test]
    fn test_order_must_be_in_columns() {
        let err = validate(json!({
            "WHERE": {},
            "OPTIONS": {
                "COLUMNS": ["contractors_city"],
                "ORDER": "contractors_lat"
            }
        }))
        .unwrap_err();
        assert!(err.message().contains("COLUMNS"));
    }

    #[test]
    fn test_multi_key_order_resolved() {
        let query = validate(json!({
            "WHERE": {},
            "OPTIONS": {
                "COLUMNS": ["contractors_city", "contractors_companyName", "contractors_lat"],
                "ORDER": {"dir": "DOWN", "keys": ["contractors_city", "contractors_lat"]}
            }
        }))
        .unwrap();
        let order = query.order.unwrap();
        assert_eq!(order.direction, Direction::Down);
        assert_eq!(order.keys.len(), 2);
        assert_eq!(order.keys[0].kind, SortKeyKind::Text);
        assert_eq!(order.keys[1].kind, SortKeyKind::Numeric);
    }

    #[test]
    fn test_order_on_list_field_rejected() {
        let err = validate(json!({
            "WHERE": {},
            "OPTIONS": {
                "COLUMNS": ["contractors_operations"],
                "ORDER": "contractors_operations"
            }
        }))
        .unwrap_err();
        assert!(err.message().contains("orderable"));
    }

    #[test]
    fn test_order_bad_direction() {
        assert!(validate(json!({
            "WHERE": {},
            "OPTIONS": {
                "COLUMNS": ["contractors_city"],
                "ORDER": {"dir": "SIDEWAYS", "keys": ["contractors_city"]}
            }
        }))
        .is_err());
    }

    #[test]
    fn test_dataset_id_found_in_transformations_only() {
        // WHERE is empty, so the id comes from APPLY/GROUP.
        let query = validate(json!({
            "WHERE": {},
            "TRANSFORMATIONS": {
                "GROUP": ["contractors_region"],
                "APPLY": [{"n": {"COUNT": "contractors_companyName"}}]
            },
            "OPTIONS": {"COLUMNS": ["contractors_region", "n"]}
        }))
        .unwrap();
        assert_eq!(query.dataset_id, "contractors");
    }
}
