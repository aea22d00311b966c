//! Query pipeline error types
//!
//! Error codes:
//! - TIMBER_QUERY_INVALID (REJECT)
//! - TIMBER_UNKNOWN_DATASET (REJECT)
//! - TIMBER_TYPE_MISMATCH (REJECT)
//! - TIMBER_RESULT_TOO_LARGE (REJECT)
//!
//! Every stage raises these synchronously and they propagate unmodified to
//! the engine; only the outer boundary decides the externally visible
//! category. A query either fully succeeds or fully fails.

use std::fmt;

/// Query error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryErrorCode {
    /// Malformed query document
    TimberQueryInvalid,
    /// Query references a dataset that is not loaded
    TimberUnknownDataset,
    /// A record value did not have the type the query requires
    TimberTypeMismatch,
    /// Rendered result exceeds the configured cap
    TimberResultTooLarge,
}

impl QueryErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            QueryErrorCode::TimberQueryInvalid => "TIMBER_QUERY_INVALID",
            QueryErrorCode::TimberUnknownDataset => "TIMBER_UNKNOWN_DATASET",
            QueryErrorCode::TimberTypeMismatch => "TIMBER_TYPE_MISMATCH",
            QueryErrorCode::TimberResultTooLarge => "TIMBER_RESULT_TOO_LARGE",
        }
    }
}

impl fmt::Display for QueryErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Query error with a human-readable message
#[derive(Debug, Clone)]
pub struct QueryError {
    code: QueryErrorCode,
    message: String,
}

impl QueryError {
    /// Create a malformed-query error
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            code: QueryErrorCode::TimberQueryInvalid,
            message: reason.into(),
        }
    }

    /// Create an unknown-dataset error
    pub fn unknown_dataset(id: impl Into<String>) -> Self {
        Self {
            code: QueryErrorCode::TimberUnknownDataset,
            message: format!("Dataset '{}' is not loaded", id.into()),
        }
    }

    /// Create a type-mismatch error
    pub fn type_mismatch(field: &str, expected: &str) -> Self {
        Self {
            code: QueryErrorCode::TimberTypeMismatch,
            message: format!("Field '{}' is not {} on every record", field, expected),
        }
    }

    /// Create a result-too-large error
    pub fn result_too_large(count: usize, cap: usize) -> Self {
        Self {
            code: QueryErrorCode::TimberResultTooLarge,
            message: format!("Result has {} rows, cap is {}", count, cap),
        }
    }

    /// Returns the error code
    pub fn code(&self) -> QueryErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for QueryError {}

/// Result type for query pipeline operations
pub type QueryResult<T> = Result<T, QueryError>;
