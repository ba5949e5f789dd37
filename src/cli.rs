//! Command-line interface parsing for wxcache
//!
//! This module handles parsing of CLI arguments using clap and turns them
//! into a validated `RunConfig`, so range errors are reported before any
//! network or cache access.

use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::cache::DEFAULT_CACHE_PATH;
use crate::data::Units;
use crate::service::{validate_days, CacheTtls, LookupError};

/// Error types for CLI argument validation
#[derive(Debug, Error)]
pub enum CliError {
    /// The city argument is blank
    #[error("City name must not be empty")]
    EmptyCity,

    #[error(transparent)]
    Invalid(#[from] LookupError),
}

/// wxcache - Weather forecast report using Open-Meteo with a SQLite cache
#[derive(Parser, Debug)]
#[command(name = "wxcache")]
#[command(about = "Weather forecast report using Open-Meteo with a SQLite cache")]
#[command(version)]
pub struct Cli {
    /// City name, e.g. 'Minneapolis'
    pub city: String,

    /// Days of forecast (1-16)
    #[arg(long, default_value_t = 7, allow_negative_numbers = true)]
    pub days: i64,

    /// Unit system for temperatures, wind and precipitation
    #[arg(long, value_enum, default_value_t = Units::Metric)]
    pub units: Units,

    /// Forecast cache TTL in seconds
    #[arg(long, env = "WXCACHE_TTL", default_value_t = 7200)]
    pub ttl: u64,

    /// Path of the SQLite cache file
    #[arg(long, env = "WXCACHE_CACHE_PATH", default_value = DEFAULT_CACHE_PATH)]
    pub cache_path: PathBuf,

    /// Base URL of the geocoding API
    #[arg(long, env = "WXCACHE_GEOCODING_URL", hide = true)]
    pub geocoding_url: Option<String>,

    /// Base URL of the forecast API
    #[arg(long, env = "WXCACHE_FORECAST_URL", hide = true)]
    pub forecast_url: Option<String>,
}

/// Validated settings for one run
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub city: String,
    pub days: u8,
    pub units: Units,
    pub ttls: CacheTtls,
    pub cache_path: PathBuf,
    pub geocoding_url: Option<String>,
    pub forecast_url: Option<String>,
}

impl RunConfig {
    /// Creates a RunConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(RunConfig)` with the forecast TTL taken from `--ttl`
    /// * `Err(CliError)` if the city is blank or `--days` is out of range
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        let city = cli.city.trim();
        if city.is_empty() {
            return Err(CliError::EmptyCity);
        }
        let days = validate_days(cli.days)?;

        Ok(RunConfig {
            city: city.to_string(),
            days,
            units: cli.units,
            ttls: CacheTtls {
                forecast: Duration::from_secs(cli.ttl),
                ..CacheTtls::default()
            },
            cache_path: cli.cache_path.clone(),
            geocoding_url: cli.geocoding_url.clone(),
            forecast_url: cli.forecast_url.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["wxcache", "Minneapolis"]).unwrap();
        assert_eq!(cli.city, "Minneapolis");
        assert_eq!(cli.days, 7);
        assert_eq!(cli.units, Units::Metric);
    }

    #[test]
    fn test_cli_parse_all_flags() {
        let cli = Cli::try_parse_from([
            "wxcache",
            "St Paul",
            "--days",
            "3",
            "--units",
            "imperial",
            "--ttl",
            "60",
            "--cache-path",
            "/tmp/wx.sqlite",
        ])
        .unwrap();

        assert_eq!(cli.city, "St Paul");
        assert_eq!(cli.days, 3);
        assert_eq!(cli.units, Units::Imperial);
        assert_eq!(cli.ttl, 60);
        assert_eq!(cli.cache_path, PathBuf::from("/tmp/wx.sqlite"));
    }

    #[test]
    fn test_cli_requires_city() {
        assert!(Cli::try_parse_from(["wxcache"]).is_err());
    }

    #[test]
    fn test_cli_rejects_unknown_units() {
        assert!(Cli::try_parse_from(["wxcache", "Oslo", "--units", "kelvin"]).is_err());
    }

    #[test]
    fn test_cli_accepts_negative_days_for_validation() {
        let cli = Cli::try_parse_from(["wxcache", "Oslo", "--days", "-2"]).unwrap();
        assert_eq!(cli.days, -2);
    }

    #[test]
    fn test_run_config_from_cli() {
        let cli = Cli::try_parse_from(["wxcache", "  Oslo ", "--days", "16", "--ttl", "900"]).unwrap();
        let config = RunConfig::from_cli(&cli).unwrap();

        assert_eq!(config.city, "Oslo");
        assert_eq!(config.days, 16);
        assert_eq!(config.ttls.forecast, Duration::from_secs(900));
        assert_eq!(config.ttls.geocode, CacheTtls::default().geocode);
    }

    #[test]
    fn test_run_config_rejects_days_out_of_range() {
        for days in ["0", "17", "-1"] {
            let cli = Cli::try_parse_from(["wxcache", "Oslo", "--days", days]).unwrap();
            let result = RunConfig::from_cli(&cli);
            assert!(
                matches!(result, Err(CliError::Invalid(LookupError::InvalidDays(_)))),
                "days={} should be rejected",
                days
            );
        }
    }

    #[test]
    fn test_run_config_rejects_blank_city() {
        let cli = Cli::try_parse_from(["wxcache", "   "]).unwrap();
        assert!(matches!(RunConfig::from_cli(&cli), Err(CliError::EmptyCity)));
    }
}
