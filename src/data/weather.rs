//! Open-Meteo forecast API client
//!
//! This module fetches daily forecasts plus current conditions from the
//! Open-Meteo API. The response body is handed back as decoded JSON,
//! untouched, so it can be cached verbatim.

use reqwest::Client;
use serde_json::Value;
use thiserror::Error;

use super::Units;

/// Base URL for the Open-Meteo forecast API
const OPEN_METEO_BASE_URL: &str = "https://api.open-meteo.com";

/// Daily aggregates requested for every forecast
const DAILY_FIELDS: &str = "temperature_2m_max,temperature_2m_min,precipitation_sum,windspeed_10m_max";

/// Errors that can occur when fetching forecast data
#[derive(Debug, Error)]
pub enum WeatherError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// The API answered with a non-success status
    #[error("forecast API returned {status}: {reason}")]
    Status { status: u16, reason: String },

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Client for fetching forecasts from the Open-Meteo API
#[derive(Debug, Clone)]
pub struct ForecastClient {
    client: Client,
    base_url: String,
}

impl Default for ForecastClient {
    fn default() -> Self {
        Self::new()
    }
}

impl ForecastClient {
    /// Create a new ForecastClient with default settings
    pub fn new() -> Self {
        Self::with_base_url(OPEN_METEO_BASE_URL)
    }

    /// Create a client that talks to a different host (used by tests)
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn query(latitude: f64, longitude: f64, days: u8, units: Units) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("daily", DAILY_FIELDS.to_string()),
            ("current_weather", "true".to_string()),
            ("timezone", "auto".to_string()),
            ("forecast_days", days.to_string()),
            ("temperature_unit", units.temperature_param().to_string()),
            ("windspeed_unit", units.windspeed_param().to_string()),
            ("precipitation_unit", units.precipitation_param().to_string()),
        ]
    }

    /// Fetch the forecast document for the given coordinates
    ///
    /// # Arguments
    /// * `latitude` / `longitude` - Location to forecast
    /// * `days` - Number of forecast days
    /// * `units` - Unit system for temperatures, wind and precipitation
    ///
    /// # Returns
    /// * `Ok(Value)` - The decoded response body
    /// * `Err(WeatherError)` - If the request fails or the API reports an error
    pub async fn fetch(
        &self,
        latitude: f64,
        longitude: f64,
        days: u8,
        units: Units,
    ) -> Result<Value, WeatherError> {
        let url = format!("{}/v1/forecast", self.base_url);
        tracing::debug!(latitude, longitude, days, ?units, "requesting forecast");

        let response = self
            .client
            .get(&url)
            .query(&Self::query(latitude, longitude, days, units))
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(WeatherError::Status {
                status: status.as_u16(),
                reason: error_reason(&text),
            });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

/// Pulls the `reason` out of an Open-Meteo error body, falling back to the raw text
pub(crate) fn error_reason(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("reason").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}
