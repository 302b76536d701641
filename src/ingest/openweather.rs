//! OpenWeatherMap forecast fetcher.
//!
//! Pulls the 5-day/3-hour forecast list for the monitored coordinates,
//! trimmed server-side to the configured number of periods. The response
//! is deserialized into typed structs; absent `pop` and `rain.3h` fields
//! default to zero, and a period with no weather entry simply never
//! qualifies downstream.

use serde::Deserialize;

use crate::config::ForecastConfig;
use crate::model::{FetchError, ForecastPeriod};
use crate::stations;

const FORECAST_URL: &str = "https://api.openweathermap.org/data/2.5/forecast";

// ---------------------------------------------------------------------------
// API response structures
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    #[serde(default)]
    list: Vec<ForecastEntry>,
}

#[derive(Debug, Deserialize)]
struct ForecastEntry {
    /// Unix timestamp of the period start.
    dt: i64,
    /// Probability of precipitation, [0, 1]; omitted means none forecast.
    #[serde(default)]
    pop: f64,
    #[serde(default)]
    weather: Vec<WeatherCondition>,
    rain: Option<RainVolume>,
}

#[derive(Debug, Deserialize)]
struct WeatherCondition {
    id: u32,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct RainVolume {
    #[serde(rename = "3h", default)]
    three_hour_mm: f64,
}

// ---------------------------------------------------------------------------
// Client functions
// ---------------------------------------------------------------------------

/// Builds the forecast request URL for the registry's forecast point.
pub fn build_forecast_url(api_key: &str, lat: f64, lon: f64, periods: u32) -> String {
    format!(
        "{}?lat={}&lon={}&appid={}&units=metric&cnt={}",
        FORECAST_URL, lat, lon, api_key, periods
    )
}

/// Fetches the forecast window, oldest period first.
pub fn fetch_forecast(
    client: &reqwest::blocking::Client,
    api_key: &str,
    config: &ForecastConfig,
) -> Result<Vec<ForecastPeriod>, FetchError> {
    let (lat, lon) = stations::forecast_point();
    let url = build_forecast_url(api_key, lat, lon, config.periods_to_check);
    let body = super::get_text(client, &url)?;
    parse_forecast(&body)
}

/// Maps the raw response onto the domain's forecast periods.
pub fn parse_forecast(body: &str) -> Result<Vec<ForecastPeriod>, FetchError> {
    let response: ForecastResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Parse(e.to_string()))?;

    Ok(response
        .list
        .into_iter()
        .map(|entry| {
            let (weather_id, description) = entry
                .weather
                .into_iter()
                .next()
                .map(|w| (w.id, w.description))
                .unwrap_or((0, String::new()));
            ForecastPeriod {
                timestamp: entry.dt,
                weather_id,
                description,
                pop: entry.pop,
                rain_3h_mm: entry.rain.map(|r| r.three_hour_mm).unwrap_or(0.0),
            }
        })
        .collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
