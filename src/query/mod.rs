//! Boolean query engine for timberdb
//!
//! A query document is a JSON tree with a WHERE filter (AND/OR/NOT,
//! GT/LT/EQ comparisons, IS wildcard matching), an optional TRANSFORMATIONS
//! clause (GROUP plus MAX/MIN/AVG/SUM/COUNT aggregation), and an OPTIONS
//! clause (COLUMNS projection, optional ORDER). The language is documented
//! in QUERY.md.
//!
//! Pipeline (strict order): validate, filter, aggregate, order, render,
//! enforce the result cap. Stages are pure transformations over in-memory
//! rows; a query either fully succeeds or fully fails.

mod aggregator;
mod ast;
mod decimal;
mod engine;
mod errors;
mod filterer;
mod orderer;
mod renderer;
mod validator;

pub use ast::{
    ApplyOp, ApplyRule, Column, Direction, Filter, OrderSpec, Query, SortKey, SortKeyKind,
    StringPattern, Transformations,
};
pub use engine::{QueryEngine, DEFAULT_MAX_RESULTS};
pub use errors::{QueryError, QueryErrorCode, QueryResult};
pub use filterer::QueryFilterer;
pub use validator::QueryValidator;
