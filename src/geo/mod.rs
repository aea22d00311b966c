//! Address geocoding
//!
//! Resolves contractor addresses to coordinates against a Nominatim-style
//! endpoint. Lookups run sequentially with an enforced minimum delay between
//! requests to respect the service's rate limit, and results are written onto
//! the records so an address is never geocoded twice (the caller persists the
//! enriched records).

mod errors;

pub use errors::{GeoError, GeoResult};

use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;

use crate::observability::{log_event_with_fields, Event};

/// Geocoding configuration.
#[derive(Debug, Clone, serde::Serialize, Deserialize)]
pub struct GeocodeConfig {
    /// Search endpoint URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// User-Agent header sent with every lookup
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Minimum delay between lookups, in milliseconds
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

fn default_endpoint() -> String {
    "https://nominatim.openstreetmap.org/search".to_string()
}

fn default_user_agent() -> String {
    "timberdb".to_string()
}

fn default_delay_ms() -> u64 {
    1000
}

impl Default for GeocodeConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            user_agent: default_user_agent(),
            delay_ms: default_delay_ms(),
        }
    }
}

/// One result row from the search endpoint. Coordinates arrive as strings.
#[derive(Debug, Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
}

/// Sequential, cached geocoding client.
pub struct Geocoder {
    client: reqwest::Client,
    config: GeocodeConfig,
}

impl Geocoder {
    /// Creates a geocoder from configuration.
    pub fn new(config: GeocodeConfig) -> GeoResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| GeoError::Client(e.to_string()))?;
        Ok(Self { client, config })
    }

    /// Fills in `lat`/`lon` for every record that has an address but no
    /// coordinates yet. Returns the number of records resolved.
    ///
    /// Records with cached coordinates or without an address are skipped;
    /// a lookup with no hits leaves the record untouched.
    pub async fn geocode_records(&self, records: &mut [Value]) -> GeoResult<usize> {
        let mut resolved = 0;
        for record in records.iter_mut() {
            let Some(obj) = record.as_object() else {
                continue;
            };
            if has_coordinates(obj) {
                log_event_with_fields(
                    Event::GeocodeCached,
                    &[("company", text_field(obj, "companyName"))],
                );
                continue;
            }
            let address = text_field(obj, "address");
            if address.is_empty() {
                continue;
            }

            let hit = self.lookup(address).await?;
            log_event_with_fields(
                Event::GeocodeLookup,
                &[
                    ("address", address),
                    ("found", if hit.is_some() { "true" } else { "false" }),
                ],
            );
            if let Some((lat, lon)) = hit {
                let obj = record.as_object_mut().expect("checked above");
                obj.insert("lat".to_string(), json!(lat));
                obj.insert("lon".to_string(), json!(lon));
                resolved += 1;
            }

            // One request at a time, spaced by the configured delay.
            tokio::time::sleep(Duration::from_millis(self.config.delay_ms)).await;
        }
        Ok(resolved)
    }

    /// Issues one search request and returns the first hit, if any.
    async fn lookup(&self, address: &str) -> GeoResult<Option<(f64, f64)>> {
        let response = self
            .client
            .get(&self.config.endpoint)
            .query(&[("q", address), ("format", "json"), ("limit", "1")])
            .send()
            .await
            .map_err(|e| GeoError::Request(e.to_string()))?;
        if !response.status().is_success() {
            return Err(GeoError::Status(response.status().as_u16()));
        }

        let hits: Vec<SearchHit> = response
            .json()
            .await
            .map_err(|e| GeoError::InvalidResponse(e.to_string()))?;
        let Some(hit) = hits.into_iter().next() else {
            return Ok(None);
        };
        let lat = hit
            .lat
            .parse()
            .map_err(|_| GeoError::InvalidResponse(format!("bad latitude '{}'", hit.lat)))?;
        let lon = hit
            .lon
            .parse()
            .map_err(|_| GeoError::InvalidResponse(format!("bad longitude '{}'", hit.lon)))?;
        Ok(Some((lat, lon)))
    }
}

/// A record counts as geocoded once both coordinates are non-zero.
fn has_coordinates(obj: &serde_json::Map<String, Value>) -> bool {
    let coord = |field: &str| obj.get(field).and_then(Value::as_f64).unwrap_or(0.0);
    coord("lat") != 0.0 && coord("lon") != 0.0
}

fn text_field<'a>(obj: &'a serde_json::Map<String, Value>, field: &str) -> &'a str {
    obj.get(field).and_then(Value::as_str).unwrap_or("")
}
