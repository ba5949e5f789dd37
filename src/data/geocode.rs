//! Open-Meteo geocoding API client
//!
//! Resolves a free-text place name to coordinates and a display label.

use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;

use super::weather::error_reason;
use super::Place;

/// Base URL for the Open-Meteo geocoding API
const GEOCODING_BASE_URL: &str = "https://geocoding-api.open-meteo.com";

/// Errors that can occur when resolving a place name
#[derive(Debug, Error)]
pub enum GeocodeError {
    /// The API knows no place by this name
    #[error("No match for city '{0}'.")]
    NoMatch(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("geocoding API returned {status}: {reason}")]
    Status { status: u16, reason: String },

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Response from the geocoding search endpoint
///
/// `results` is omitted entirely when nothing matches.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<SearchResult>,
}

/// A single match from the search endpoint
#[derive(Debug, Deserialize)]
struct SearchResult {
    latitude: f64,
    longitude: f64,
    name: String,
    /// First-level administrative area (state, province)
    #[serde(default)]
    admin1: Option<String>,
    #[serde(default)]
    country_code: Option<String>,
}

impl SearchResult {
    /// Builds the "Name, Admin1 CC" label used in reports
    fn display_name(&self) -> String {
        let region: Vec<&str> = [self.admin1.as_deref(), self.country_code.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect();

        if region.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, region.join(" "))
        }
    }

    fn into_place(self) -> Place {
        Place {
            name: self.display_name(),
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

/// Client for the Open-Meteo geocoding API
#[derive(Debug, Clone)]
pub struct GeocodingClient {
    client: Client,
    base_url: String,
}

impl Default for GeocodingClient {
    fn default() -> Self {
        Self::new()
    }
}

impl GeocodingClient {
    /// Create a new GeocodingClient with default settings
    pub fn new() -> Self {
        Self::with_base_url(GEOCODING_BASE_URL)
    }

    /// Create a client that talks to a different host (used by tests)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Looks up the best match for `name`
    ///
    /// # Returns
    /// * `Ok(Place)` - Coordinates and label of the top result
    /// * `Err(GeocodeError::NoMatch)` - If the API returned no results
    /// * `Err(GeocodeError)` - If the request or parsing fails
    pub async fn search(&self, name: &str) -> Result<Place, GeocodeError> {
        let url = format!("{}/v1/search", self.base_url);
        tracing::debug!(name, "requesting geocode");

        let response = self
            .client
            .get(&url)
            .query(&[("name", name), ("count", "1")])
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(GeocodeError::Status {
                status: status.as_u16(),
                reason: error_reason(&text),
            });
        }

        let body: SearchResponse = serde_json::from_str(&text)?;
        body.results
            .into_iter()
            .next()
            .map(SearchResult::into_place)
            .ok_or_else(|| GeocodeError::NoMatch(name.to_string()))
    }
}
