//! Data-source clients for the monitoring service.
//!
//! One submodule per external source, each reducing a raw response to a
//! small structured observation or a single `FetchError`:
//! - `thaiwater` — Singburi telemetry water-level table (HTML, framed).
//! - `hii` — HII Chao Phraya chart page (JSON embedded in a script block).
//! - `openweather` — OpenWeatherMap 5-day/3-hour forecast API.
//!
//! `html` holds the tolerant markup-scanning helpers the HTML sources
//! share.

pub mod hii;
pub mod html;
pub mod openweather;
pub mod thaiwater;

use crate::model::FetchError;

/// The telemetry site rejects default client user agents, so every request
/// identifies as a desktop browser.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// One GET, one attempt. Transport problems and non-2xx statuses both
/// collapse into `FetchError`; retry policy lives with the scheduler,
/// not here.
pub(crate) fn get_text(
    client: &reqwest::blocking::Client,
    url: &str,
) -> Result<String, FetchError> {
    let response = client
        .get(url)
        .header("User-Agent", USER_AGENT)
        .send()
        .map_err(|e| FetchError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchError::Http(status.as_u16()));
    }

    response.text().map_err(|e| FetchError::Network(e.to_string()))
}
