//! wxcache - Print a weather forecast for a city
//!
//! Resolves the city with the Open-Meteo geocoding API, fetches the daily
//! forecast and prints it as a table. Responses are cached in a local SQLite
//! file so repeated runs stay off the network.

use std::error::Error;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wxcache::cache::KvStore;
use wxcache::cli::{Cli, RunConfig};
use wxcache::data::{ForecastClient, GeocodingClient};
use wxcache::report;
use wxcache::service::WeatherService;

/// Logs go to stderr so the report on stdout stays clean.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wxcache=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Builds the service from the validated config
fn build_service(config: &RunConfig) -> WeatherService {
    let store = KvStore::new(&config.cache_path);
    if let Err(e) = store.ensure_initialized() {
        tracing::warn!(error = %e, "cache disabled for this run");
    }

    let geocoder = config
        .geocoding_url
        .as_deref()
        .map(GeocodingClient::with_base_url)
        .unwrap_or_default();
    let forecaster = config
        .forecast_url
        .as_deref()
        .map(ForecastClient::with_base_url)
        .unwrap_or_default();

    WeatherService::with_clients(store, geocoder, forecaster).with_ttls(config.ttls)
}

async fn run(cli: Cli) -> Result<String, Box<dyn Error>> {
    let config = RunConfig::from_cli(&cli)?;
    tracing::debug!(?config, "starting");

    let service = build_service(&config);
    let forecast_report = service
        .report(&config.city, i64::from(config.days), config.units)
        .await?;

    Ok(report::render(&forecast_report))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    match run(cli).await {
        Ok(text) => {
            println!("{}", text);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
