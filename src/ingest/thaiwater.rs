//! Singburi telemetry water-level fetcher.
//!
//! The provincial page hosts the station table inside a nested frame, so
//! the fetch is an explicit two-phase operation:
//!
//! 1. *Enter the frame context* — fetch the outer page and resolve the
//!    frame document. The frame is injected by script and is sometimes not
//!    referenced yet on a fresh load, so this phase retries a bounded
//!    number of times and fails with `ContextNotFound` when exhausted.
//! 2. *Locate the datum* — find the table by id, then the first body row
//!    whose first cell contains the station code. Either miss is an
//!    `ElementNotFound`.
//!
//! Row columns (0-based): 0 station name, 2 water level (m MSL),
//! 3 bank level (m MSL).

use std::thread;
use std::time::Duration;

use crate::config::GaugeConfig;
use crate::ingest::html;
use crate::model::{FetchError, RiverGaugeObservation};

/// Id of the telemetry water-level table in the frame document.
pub const TABLE_ID: &str = "tele_wl";

const WATER_LEVEL_COLUMN: usize = 2;
const BANK_LEVEL_COLUMN: usize = 3;

/// Fetches the current reading for the configured station.
pub fn fetch_gauge(
    client: &reqwest::blocking::Client,
    config: &GaugeConfig,
) -> Result<RiverGaugeObservation, FetchError> {
    let document = enter_water_level_frame(client, config)?;
    parse_station_row(&document, &config.station_code)
}

/// Phase one: returns the document that actually contains the table.
///
/// Lighter page builds inline the table directly; otherwise the first
/// `<iframe>` is followed. Only "frame not referenced yet" is retried —
/// transport and HTTP failures propagate immediately, single-attempt.
fn enter_water_level_frame(
    client: &reqwest::blocking::Client,
    config: &GaugeConfig,
) -> Result<String, FetchError> {
    for attempt in 0..config.frame_attempts {
        if attempt > 0 {
            thread::sleep(Duration::from_secs(config.frame_retry_pause_secs));
        }

        let outer = super::get_text(client, &config.page_url)?;
        if html::element_inner_by_id(&outer, "table", TABLE_ID).is_some() {
            return Ok(outer);
        }
        if let Some(src) = html::first_tag_attr(&outer, "iframe", "src") {
            let frame_url = resolve_href(&config.page_url, &src);
            return super::get_text(client, &frame_url);
        }
    }

    Err(FetchError::ContextNotFound(format!(
        "water-level frame on {} after {} attempts",
        config.page_url, config.frame_attempts
    )))
}

/// Phase two: extracts the station row from the frame document.
/// The first row whose first cell contains the station code wins.
pub fn parse_station_row(
    document: &str,
    station_code: &str,
) -> Result<RiverGaugeObservation, FetchError> {
    let table = html::element_inner_by_id(document, "table", TABLE_ID)
        .ok_or_else(|| FetchError::ElementNotFound(format!("table#{}", TABLE_ID)))?;

    // Header rows live outside tbody; fall back to the whole table for
    // markup that omits it.
    let body = html::inner_blocks(table, "tbody")
        .into_iter()
        .next()
        .unwrap_or(table);

    for row in html::inner_blocks(body, "tr") {
        let cells = html::inner_blocks(row, "td");
        if cells.is_empty() {
            continue;
        }
        let station = html::text_content(cells[0]);
        if !station.contains(station_code) {
            continue;
        }
        if cells.len() <= BANK_LEVEL_COLUMN {
            return Err(FetchError::ElementNotFound(format!(
                "level columns for station {}",
                station_code
            )));
        }
        let water_level_m = parse_level(&html::text_content(cells[WATER_LEVEL_COLUMN]), "water level")?;
        let bank_level_m = parse_level(&html::text_content(cells[BANK_LEVEL_COLUMN]), "bank level")?;
        return Ok(RiverGaugeObservation {
            station,
            water_level_m,
            bank_level_m: Some(bank_level_m),
        });
    }

    Err(FetchError::ElementNotFound(format!(
        "station {} in table#{}",
        station_code, TABLE_ID
    )))
}

fn parse_level(text: &str, what: &str) -> Result<f64, FetchError> {
    text.replace(',', "")
        .trim()
        .parse()
        .map_err(|_| FetchError::Parse(format!("{} '{}' is not a number", what, text)))
}

/// Joins a frame `src` against the page URL. Handles absolute URLs,
/// protocol-relative, root-relative, and directory-relative references.
fn resolve_href(base: &str, href: &str) -> String {
    if href.contains("://") {
        return href.to_string();
    }
    let scheme_end = match base.find("://") {
        Some(i) => i + 3,
        None => return href.to_string(),
    };
    if let Some(rest) = href.strip_prefix("//") {
        return format!("{}{}", &base[..scheme_end], rest);
    }
    let host_end = base[scheme_end..]
        .find('/')
        .map(|i| scheme_end + i)
        .unwrap_or(base.len());
    if href.starts_with('/') {
        return format!("{}{}", &base[..host_end], href);
    }
    match base.rfind('/') {
        Some(i) if i >= host_end => format!("{}{}", &base[..=i], href),
        _ => format!("{}/{}", &base[..host_end], href),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
