//! Entry point: one monitoring cycle across all three pipelines.
//!
//! Usage: `chaomon_service [config.toml]`
//!
//! Credentials come from the environment (a `.env` file is honored);
//! everything else has defaults, optionally overridden by the TOML file.
//! The process always exits normally — outcomes go to the log, and
//! recovery from any failure is simply the next scheduled run.

use std::path::PathBuf;
use std::time::Duration;

use chaomon_service::config::Config;
use chaomon_service::ingest::{hii, openweather, thaiwater};
use chaomon_service::logging::{self, DataSource, LogLevel};
use chaomon_service::notify::line::LineNotifier;
use chaomon_service::pipeline::{self, PipelineOutcome};
use chaomon_service::state::StateStore;

fn main() {
    dotenv::dotenv().ok();
    logging::init_logger(LogLevel::Info, None, true);

    let config_path = std::env::args().nth(1).map(PathBuf::from);
    let config = match Config::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            logging::error(DataSource::System, None, &err.to_string());
            return;
        }
    };

    let client = match reqwest::blocking::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()
    {
        Ok(client) => client,
        Err(err) => {
            logging::error(
                DataSource::System,
                None,
                &format!("cannot build HTTP client: {}", err),
            );
            return;
        }
    };

    let store = match StateStore::open(&config.state_dir) {
        Ok(store) => store,
        Err(err) => {
            logging::error(
                DataSource::State,
                None,
                &format!("cannot open state dir {}: {}", config.state_dir.display(), err),
            );
            return;
        }
    };

    if config.line.is_none() {
        logging::warn(
            DataSource::Line,
            None,
            "LINE credentials not set; notifications will be logged only",
        );
    }
    let notifier = LineNotifier::new(client.clone(), config.line.clone());

    let discharge = pipeline::run_discharge(
        hii::fetch_discharge(&client, &config.discharge),
        &config.discharge,
        &store,
        &notifier,
    );

    let gauge = pipeline::run_gauge(
        thaiwater::fetch_gauge(&client, &config.gauge),
        &config.gauge,
        &store,
        &notifier,
    );

    let forecast = match config.openweather_api_key.as_deref() {
        Some(api_key) => pipeline::run_forecast(
            openweather::fetch_forecast(&client, api_key, &config.forecast),
            &config.forecast,
            &store,
            &notifier,
        ),
        None => {
            logging::warn(
                DataSource::OpenWeather,
                None,
                "OPENWEATHER_API_KEY not set; skipping forecast pipeline",
            );
            PipelineOutcome::Skipped
        }
    };

    logging::info(
        DataSource::System,
        None,
        &format!(
            "cycle complete: discharge={:?} gauge={:?} forecast={:?}",
            discharge, gauge, forecast
        ),
    );
}
