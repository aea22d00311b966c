//! # Geocoding Errors

use thiserror::Error;

/// Result type for geocoding operations
pub type GeoResult<T> = Result<T, GeoError>;

/// Geocoding errors
#[derive(Debug, Clone, Error)]
pub enum GeoError {
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    #[error("Geocoding request failed: {0}")]
    Request(String),

    #[error("Geocoding service returned status {0}")]
    Status(u16),

    #[error("Unexpected geocoding response: {0}")]
    InvalidResponse(String),
}
