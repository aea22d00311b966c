//! Application configuration
//!
//! Loaded from a JSON file (`timberdb.json` by default); every field has a
//! serde default so a partial file works.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::geo::GeocodeConfig;
use crate::http_server::HttpServerConfig;
use crate::query::DEFAULT_MAX_RESULTS;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Contractor spreadsheet export (CSV)
    #[serde(default = "default_data_path")]
    pub data_path: String,

    /// Processed records file; also the geocode cache
    #[serde(default = "default_records_path")]
    pub records_path: String,

    /// Dataset id the records are served under
    #[serde(default = "default_dataset_id")]
    pub dataset_id: String,

    /// Cap on rendered query result rows
    #[serde(default = "default_max_results")]
    pub max_results: usize,

    /// HTTP server settings
    #[serde(default)]
    pub http: HttpServerConfig,

    /// Geocoding settings
    #[serde(default)]
    pub geocode: GeocodeConfig,
}

fn default_data_path() -> String {
    "./data/contractors.csv".to_string()
}

fn default_records_path() -> String {
    "./data/contractors.json".to_string()
}

fn default_dataset_id() -> String {
    "contractors".to_string()
}

fn default_max_results() -> usize {
    DEFAULT_MAX_RESULTS
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: default_data_path(),
            records_path: default_records_path(),
            dataset_id: default_dataset_id(),
            max_results: default_max_results(),
            http: HttpServerConfig::default(),
            geocode: GeocodeConfig::default(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Json {
            path: path.display().to_string(),
            source,
        })
    }

    /// Loads configuration, falling back to defaults when the file is absent.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.dataset_id, "contractors");
        assert_eq!(config.max_results, 5000);
        assert_eq!(config.geocode.delay_ms, 1000);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(br#"{"max_results": 100}"#).unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.max_results, 100);
        assert_eq!(config.dataset_id, "contractors");
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = AppConfig::load_or_default(Path::new("/nonexistent/timberdb.json")).unwrap();
        assert_eq!(config.max_results, 5000);
    }

    #[test]
    fn test_invalid_file_is_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"not json").unwrap();
        assert!(AppConfig::load(file.path()).is_err());
    }
}
