//! Core data models for wxcache
//!
//! This module contains the types shared by the Open-Meteo clients, the
//! lookup service and the report: resolved places, unit systems and a typed
//! view over the forecast document.

pub mod geocode;
pub mod weather;

pub use geocode::{GeocodeError, GeocodingClient};
pub use weather::{ForecastClient, WeatherError};

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// A place resolved by the geocoding API
///
/// Serialized as `{"lat", "lon", "name"}`, which is the shape stored under
/// geocode cache keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Latitude coordinate
    #[serde(rename = "lat")]
    pub latitude: f64,
    /// Longitude coordinate
    #[serde(rename = "lon")]
    pub longitude: f64,
    /// Display label, e.g. "Minneapolis, Minnesota US"
    pub name: String,
}

/// Unit system for forecast values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Units {
    /// Celsius, km/h, millimetres
    #[default]
    Metric,
    /// Fahrenheit, mph, inches
    Imperial,
}

impl Units {
    /// Short tag used in forecast cache keys
    pub fn cache_tag(self) -> &'static str {
        match self {
            Units::Metric => "si",
            Units::Imperial => "us",
        }
    }

    /// Value of the `temperature_unit` query parameter
    pub fn temperature_param(self) -> &'static str {
        match self {
            Units::Metric => "celsius",
            Units::Imperial => "fahrenheit",
        }
    }

    /// Value of the `windspeed_unit` query parameter
    pub fn windspeed_param(self) -> &'static str {
        match self {
            Units::Metric => "kmh",
            Units::Imperial => "mph",
        }
    }

    /// Value of the `precipitation_unit` query parameter
    pub fn precipitation_param(self) -> &'static str {
        match self {
            Units::Metric => "mm",
            Units::Imperial => "inch",
        }
    }

    pub fn temperature_label(self) -> &'static str {
        match self {
            Units::Metric => "°C",
            Units::Imperial => "°F",
        }
    }

    pub fn windspeed_label(self) -> &'static str {
        match self {
            Units::Metric => "km/h",
            Units::Imperial => "mph",
        }
    }

    pub fn precipitation_label(self) -> &'static str {
        match self {
            Units::Metric => "mm",
            Units::Imperial => "in",
        }
    }
}

/// Typed view over a forecast document as returned by Open-Meteo
///
/// The cache keeps the raw JSON; this is only decoded for display. Any
/// element of a daily series may be null upstream.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Forecast {
    pub daily: DailySeries,
    #[serde(default)]
    pub current_weather: Option<CurrentWeather>,
}

/// Parallel arrays of daily aggregates, one element per forecast day
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DailySeries {
    pub time: Vec<String>,
    pub temperature_2m_max: Vec<Option<f64>>,
    pub temperature_2m_min: Vec<Option<f64>>,
    pub precipitation_sum: Vec<Option<f64>>,
    pub windspeed_10m_max: Vec<Option<f64>>,
}

/// Current conditions block of the forecast document
///
/// Only the readings shown in the report; other fields stay in the cached JSON.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurrentWeather {
    pub temperature: Option<f64>,
    pub windspeed: Option<f64>,
}

/// One row of the daily table
#[derive(Debug, Clone, PartialEq)]
pub struct DailyRow<'a> {
    pub date: &'a str,
    pub temperature_max: Option<f64>,
    pub temperature_min: Option<f64>,
    pub windspeed_max: Option<f64>,
    pub precipitation: Option<f64>,
}

impl DailySeries {
    /// Zips the parallel arrays into rows
    ///
    /// Rows follow `time`; a value array shorter than `time` yields `None`
    /// for the missing days.
    pub fn rows(&self) -> impl Iterator<Item = DailyRow<'_>> + '_ {
        self.time.iter().enumerate().map(move |(i, date)| DailyRow {
            date: date.as_str(),
            temperature_max: value_at(&self.temperature_2m_max, i),
            temperature_min: value_at(&self.temperature_2m_min, i),
            windspeed_max: value_at(&self.windspeed_10m_max, i),
            precipitation: value_at(&self.precipitation_sum, i),
        })
    }
}

fn value_at(values: &[Option<f64>], i: usize) -> Option<f64> {
    values.get(i).copied().flatten()
}

impl Forecast {
    /// Decodes the typed view from a raw forecast document
    pub fn from_value(value: &serde_json::Value) -> Result<Self, WeatherError> {
        Ok(Self::deserialize(value)?)
    }
}
