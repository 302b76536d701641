//! Core data types for the Chao Phraya monitoring service.
//!
//! This module defines the shared domain model imported by all other modules.
//! It contains no logic beyond trivial derivations, no I/O, and no external
//! dependencies — only types.

use std::fmt;

// ---------------------------------------------------------------------------
// Station codes
// ---------------------------------------------------------------------------

/// Telemetry station code for the In Buri river gauge on the Singburi
/// water-level table. Matched as a substring of the first table column.
pub const STATION_INBURI: &str = "C.35";

/// Station key for the Chao Phraya Dam tailwater entry in the HII
/// `json_data` mapping.
pub const STATION_CHAO_PHRAYA_DAM: &str = "C13";

// ---------------------------------------------------------------------------
// Observation types
// ---------------------------------------------------------------------------

/// One reading from a telemetry river gauge, in meters above mean sea level.
///
/// Produced by `ingest::thaiwater` from the station row of the water-level
/// table. The bank level is absent for sources that report only the gauge
/// reading (the embedded-JSON variant).
#[derive(Debug, Clone, PartialEq)]
pub struct RiverGaugeObservation {
    pub station: String,
    pub water_level_m: f64,
    pub bank_level_m: Option<f64>,
}

impl RiverGaugeObservation {
    /// Meters above the bank crest; negative while the river is below it.
    /// `None` when the source did not report a bank level.
    pub fn overflow_m(&self) -> Option<f64> {
        self.bank_level_m.map(|bank| self.water_level_m - bank)
    }
}

/// Reservoir discharge figures for one station, composed into the same
/// `"{storage}/ {qmax} cms"` string the source page renders.
///
/// The summary is an opaque comparison key — it is never decomposed back
/// into numbers, so formatting changes upstream register as changes here.
#[derive(Debug, Clone, PartialEq)]
pub struct DischargeObservation {
    pub station_code: String,
    pub summary: String,
}

/// A single 3-hour forecast period from the OpenWeatherMap forecast list.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastPeriod {
    /// Unix timestamp of the period start; doubles as the event identifier.
    pub timestamp: i64,
    /// OpenWeatherMap weather condition id (2xx thunderstorm, 5xx rain, ...).
    pub weather_id: u32,
    pub description: String,
    /// Probability of precipitation, in [0, 1].
    pub pop: f64,
    /// Expected rain volume over the 3-hour period, in millimeters.
    pub rain_3h_mm: f64,
}

/// Outcome of scanning a forecast window: either the first period of a
/// qualifying consecutive run, or nothing met the criteria.
#[derive(Debug, Clone, PartialEq)]
pub enum ForecastStatus {
    Rain(ForecastPeriod),
    NoRain,
}

/// Literal persisted in place of a period timestamp when no qualifying
/// rain was found. Never pushed as a notification.
pub const NO_RAIN_SENTINEL: &str = "NO_RAIN";

impl ForecastStatus {
    /// The identifier persisted between runs: the event's own timestamp,
    /// or the no-rain sentinel.
    pub fn id(&self) -> String {
        match self {
            ForecastStatus::Rain(period) => period.timestamp.to_string(),
            ForecastStatus::NoRain => NO_RAIN_SENTINEL.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise while fetching or extracting an observation.
///
/// Every variant means the same thing to the caller: no observation this
/// run, pipeline aborted before any state mutation.
#[derive(Debug, PartialEq)]
pub enum FetchError {
    /// Transport-level failure (connect, timeout, body read).
    Network(String),
    /// Non-2xx HTTP response.
    Http(u16),
    /// The nested frame hosting the data table could not be entered
    /// within the bounded number of attempts.
    ContextNotFound(String),
    /// An expected markup element (table, station row, script variable)
    /// was not present in the document.
    ElementNotFound(String),
    /// A JSON field required for the observation was missing.
    MissingField(String),
    /// A value was present but could not be converted (numeric or JSON).
    Parse(String),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Network(msg) => write!(f, "network error: {}", msg),
            FetchError::Http(code) => write!(f, "HTTP error: {}", code),
            FetchError::ContextNotFound(what) => write!(f, "frame context not found: {}", what),
            FetchError::ElementNotFound(what) => write!(f, "element not found: {}", what),
            FetchError::MissingField(field) => write!(f, "missing field: {}", field),
            FetchError::Parse(msg) => write!(f, "parse error: {}", msg),
        }
    }
}

impl std::error::Error for FetchError {}

/// Errors from the push channel. Reported but never retried, and never
/// allowed to block the state write that follows a decision.
#[derive(Debug)]
pub enum DeliveryError {
    Network(String),
    /// Non-2xx response; carries the body for the log.
    Http(u16, String),
}

impl fmt::Display for DeliveryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeliveryError::Network(msg) => write!(f, "push network error: {}", msg),
            DeliveryError::Http(code, body) => write!(f, "push HTTP error {}: {}", code, body),
        }
    }
}

impl std::error::Error for DeliveryError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
