//! Cache-first lookups against Open-Meteo
//!
//! The service owns a cache handle and the two API clients. Every lookup
//! builds its cache key, tries the store with the TTL for that kind of data,
//! and only goes to the network on a miss. A broken cache is logged and
//! bypassed rather than failing the lookup.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::cache::KvStore;
use crate::data::{
    Forecast, ForecastClient, GeocodeError, GeocodingClient, Place, Units, WeatherError,
};
use crate::keys::{forecast_key, geocode_key};

/// Smallest forecast length the API accepts
pub const MIN_DAYS: i64 = 1;

/// Largest forecast length the API accepts
pub const MAX_DAYS: i64 = 16;

/// Errors returned by lookups
#[derive(Debug, Error)]
pub enum LookupError {
    /// Requested forecast length is outside the accepted range
    #[error("--days must be 1..16, got {0}")]
    InvalidDays(i64),

    #[error(transparent)]
    Geocode(#[from] GeocodeError),

    #[error(transparent)]
    Forecast(#[from] WeatherError),
}

/// Freshness limits applied when reading from the cache
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheTtls {
    /// Place names rarely move
    pub geocode: Duration,
    /// Forecasts are refreshed upstream every hour or so
    pub forecast: Duration,
}

impl Default for CacheTtls {
    fn default() -> Self {
        Self {
            geocode: Duration::from_secs(30 * 24 * 3600), // 30 days
            forecast: Duration::from_secs(2 * 3600),      // 2 hours
        }
    }
}

/// Everything needed to render a report for one query
#[derive(Debug, Clone)]
pub struct Report {
    pub place: Place,
    pub units: Units,
    pub forecast: Forecast,
}

/// Checks a requested day count and narrows it for the API
pub fn validate_days(days: i64) -> Result<u8, LookupError> {
    if (MIN_DAYS..=MAX_DAYS).contains(&days) {
        u8::try_from(days).map_err(|_| LookupError::InvalidDays(days))
    } else {
        Err(LookupError::InvalidDays(days))
    }
}

/// Geocoding and forecast lookups backed by the local cache
#[derive(Debug, Clone)]
pub struct WeatherService {
    store: KvStore,
    geocoder: GeocodingClient,
    forecaster: ForecastClient,
    ttls: CacheTtls,
}

impl WeatherService {
    /// Creates a service with custom API clients
    pub fn with_clients(store: KvStore, geocoder: GeocodingClient, forecaster: ForecastClient) -> Self {
        Self {
            store,
            geocoder,
            forecaster,
            ttls: CacheTtls::default(),
        }
    }

    /// Overrides the cache freshness limits
    pub fn with_ttls(mut self, ttls: CacheTtls) -> Self {
        self.ttls = ttls;
        self
    }

    /// Reads a fresh value, treating a broken cache as a miss after logging it
    fn cached<T: DeserializeOwned>(&self, key: &str, ttl: Duration) -> Option<T> {
        match self.store.get(key, ttl) {
            Ok(Some(value)) => {
                tracing::debug!(key, "cache hit");
                Some(value)
            }
            Ok(None) => {
                tracing::debug!(key, "cache miss");
                None
            }
            Err(e) => {
                tracing::warn!(key, error = %e, "cache read failed, fetching from network");
                None
            }
        }
    }

    fn remember<T: Serialize + ?Sized>(&self, key: &str, value: &T) {
        if let Err(e) = self.store.set(key, value) {
            tracing::warn!(key, error = %e, "cache write failed");
        }
    }

    /// Resolves a place name, using the cache when possible
    pub async fn geocode(&self, city: &str) -> Result<Place, LookupError> {
        let key = geocode_key(city);
        if let Some(place) = self.cached::<Place>(&key, self.ttls.geocode) {
            return Ok(place);
        }

        let place = self.geocoder.search(city).await?;
        self.remember(&key, &place);
        Ok(place)
    }

    /// Fetches the raw forecast document for a place, using the cache when possible
    pub async fn forecast(&self, place: &Place, days: u8, units: Units) -> Result<Value, LookupError> {
        validate_days(i64::from(days))?;

        let key = forecast_key(place.latitude, place.longitude, days, units);
        if let Some(document) = self.cached::<Value>(&key, self.ttls.forecast) {
            return Ok(document);
        }

        let document = self
            .forecaster
            .fetch(place.latitude, place.longitude, days, units)
            .await?;
        self.remember(&key, &document);
        Ok(document)
    }

    /// Runs a full query: validate, geocode, forecast and decode for display
    pub async fn report(&self, city: &str, days: i64, units: Units) -> Result<Report, LookupError> {
        let days = validate_days(days)?;
        let place = self.geocode(city).await?;
        let document = self.forecast(&place, days, units).await?;
        let forecast = Forecast::from_value(&document)?;

        Ok(Report {
            place,
            units,
            forecast,
        })
    }
}
