//! CLI-specific error types
//!
//! CLI errors terminate the process with a non-zero exit code.

use std::fmt;
use std::io;

use crate::config::ConfigError;
use crate::geo::GeoError;
use crate::ingest::IngestError;
use crate::query::QueryError;

/// CLI error codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CliErrorCode {
    /// Configuration file error
    ConfigError,
    /// I/O error (stdin/stdout/files)
    IoError,
    /// Ingestion failed
    IngestFailed,
    /// Geocoding failed
    GeocodeFailed,
    /// Query failed
    QueryFailed,
    /// Server failed to start or crashed
    ServerFailed,
}

impl CliErrorCode {
    /// Get the error code string
    pub fn code(&self) -> &'static str {
        match self {
            Self::ConfigError => "TIMBER_CLI_CONFIG_ERROR",
            Self::IoError => "TIMBER_CLI_IO_ERROR",
            Self::IngestFailed => "TIMBER_CLI_INGEST_FAILED",
            Self::GeocodeFailed => "TIMBER_CLI_GEOCODE_FAILED",
            Self::QueryFailed => "TIMBER_CLI_QUERY_FAILED",
            Self::ServerFailed => "TIMBER_CLI_SERVER_FAILED",
        }
    }
}

/// CLI error
#[derive(Debug)]
pub struct CliError {
    code: CliErrorCode,
    message: String,
}

impl CliError {
    /// Create a new CLI error
    pub fn new(code: CliErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// I/O error
    pub fn io_error(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::IoError, msg)
    }

    /// Server error
    pub fn server_failed(msg: impl Into<String>) -> Self {
        Self::new(CliErrorCode::ServerFailed, msg)
    }

    /// Get the error code
    pub fn code(&self) -> &CliErrorCode {
        &self.code
    }

    /// Get the error code string
    pub fn code_str(&self) -> &'static str {
        self.code.code()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.code(), self.message)
    }
}

impl std::error::Error for CliError {}

impl From<io::Error> for CliError {
    fn from(e: io::Error) -> Self {
        Self::io_error(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::io_error(format!("JSON error: {}", e))
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(CliErrorCode::ConfigError, e.to_string())
    }
}

impl From<IngestError> for CliError {
    fn from(e: IngestError) -> Self {
        Self::new(CliErrorCode::IngestFailed, e.to_string())
    }
}

impl From<GeoError> for CliError {
    fn from(e: GeoError) -> Self {
        Self::new(CliErrorCode::GeocodeFailed, e.to_string())
    }
}

impl From<QueryError> for CliError {
    fn from(e: QueryError) -> Self {
        Self::new(CliErrorCode::QueryFailed, e.to_string())
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_strings() {
        assert_eq!(CliErrorCode::ConfigError.code(), "TIMBER_CLI_CONFIG_ERROR");
        assert_eq!(CliErrorCode::QueryFailed.code(), "TIMBER_CLI_QUERY_FAILED");
    }

    #[test]
    fn test_display_includes_code() {
        let err = CliError::io_error("stdin closed");
        let display = format!("{}", err);
        assert!(display.contains("TIMBER_CLI_IO_ERROR"));
        assert!(display.contains("stdin closed"));
    }

    #[test]
    fn test_query_error_conversion() {
        let err: CliError = QueryError::invalid("missing WHERE").into();
        assert_eq!(*err.code(), CliErrorCode::QueryFailed);
        assert!(err.message().contains("missing WHERE"));
    }
}
