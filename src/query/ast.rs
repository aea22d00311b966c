//! Typed query representation
//!
//! The validator turns a raw JSON query document into these structures.
//! Every field reference is resolved against the dataset schema during
//! validation, so the evaluation stages never see an unknown field, a
//! malformed wildcard, or an untyped sort key.

/// Glob-style string pattern for IS matching.
///
/// `*` is only meaningful as a prefix and/or suffix marker; any other
/// placement is rejected during validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StringPattern {
    /// No wildcard: exact equality
    Exact(String),
    /// `x*`: value starts with x
    Prefix(String),
    /// `*x`: value ends with x
    Suffix(String),
    /// `*x*`: value contains x
    Contains(String),
}

impl StringPattern {
    /// Tests a candidate value against the pattern.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            StringPattern::Exact(p) => value == p,
            StringPattern::Prefix(p) => value.starts_with(p.as_str()),
            StringPattern::Suffix(p) => value.ends_with(p.as_str()),
            StringPattern::Contains(p) => value.contains(p.as_str()),
        }
    }
}

/// Boolean filter tree evaluated by the filterer.
///
/// Field names are bare (dataset prefix already stripped and checked).
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Empty WHERE: matches every record
    MatchAll,
    /// Numeric strictly-greater comparison
    Gt(String, f64),
    /// Numeric strictly-less comparison
    Lt(String, f64),
    /// Numeric equality comparison
    Eq(String, f64),
    /// String wildcard match
    Is(String, StringPattern),
    /// All sub-filters match (two or more)
    And(Vec<Filter>),
    /// Any sub-filter matches (two or more)
    Or(Vec<Filter>),
    /// Sub-filter does not match
    Not(Box<Filter>),
}

/// Aggregation operator for APPLY rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOp {
    Max,
    Min,
    Avg,
    Sum,
    Count,
}

impl ApplyOp {
    /// Returns the operator name as it appears in query documents
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplyOp::Max => "MAX",
            ApplyOp::Min => "MIN",
            ApplyOp::Avg => "AVG",
            ApplyOp::Sum => "SUM",
            ApplyOp::Count => "COUNT",
        }
    }

    /// Parses an operator name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "MAX" => Some(ApplyOp::Max),
            "MIN" => Some(ApplyOp::Min),
            "AVG" => Some(ApplyOp::Avg),
            "SUM" => Some(ApplyOp::Sum),
            "COUNT" => Some(ApplyOp::Count),
            _ => None,
        }
    }

    /// COUNT accepts any field; the other operators are numeric-only.
    pub fn requires_numeric(&self) -> bool {
        !matches!(self, ApplyOp::Count)
    }
}

/// One APPLY rule: `{ applyKey: { OP: field } }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyRule {
    /// User-chosen output key, unique per query, no `_`
    pub key: String,
    /// Aggregation operator
    pub op: ApplyOp,
    /// Bare target field name
    pub field: String,
}

/// TRANSFORMATIONS clause: grouping plus aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformations {
    /// Bare group field names (non-empty)
    pub group: Vec<String>,
    /// Apply rules (may be empty)
    pub apply: Vec<ApplyRule>,
}

/// One requested output column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    /// Base-schema field; rendered under its bare name
    Field(String),
    /// Declared APPLY key; rendered verbatim
    Apply(String),
}

impl Column {
    /// The key this column renders under.
    pub fn output_name(&self) -> &str {
        match self {
            Column::Field(name) | Column::Apply(name) => name,
        }
    }
}

/// Sort direction: `"UP"` ascending, `"DOWN"` descending.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// Comparison factor: +1 ascending, -1 descending
    pub fn factor(&self) -> i32 {
        match self {
            Direction::Up => 1,
            Direction::Down => -1,
        }
    }
}

/// How a sort key compares its values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKeyKind {
    /// Numeric comparison (numeric fields and APPLY keys)
    Numeric,
    /// Lexicographic comparison
    Text,
}

/// One resolved sort key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    /// Bare field name or APPLY key
    pub name: String,
    /// Comparison kind
    pub kind: SortKeyKind,
}

/// Resolved ORDER clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderSpec {
    /// Applied uniformly to all keys
    pub direction: Direction,
    /// Evaluated left-to-right, advancing on ties
    pub keys: Vec<SortKey>,
}

/// Fully validated query, ready for the pipeline.
#[derive(Debug, Clone)]
pub struct Query {
    /// Dataset the query runs against
    pub dataset_id: String,
    /// WHERE clause
    pub filter: Filter,
    /// Optional TRANSFORMATIONS clause
    pub transformations: Option<Transformations>,
    /// OPTIONS.COLUMNS projection
    pub columns: Vec<Column>,
    /// Optional OPTIONS.ORDER clause
    pub order: Option<OrderSpec>,
}
