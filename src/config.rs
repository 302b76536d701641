//! Runtime configuration for the monitoring service.
//!
//! Thresholds, source locations, and the window criteria live in an
//! optional TOML file; credentials come from the environment (loaded from
//! `.env` by `main` before this module runs). Everything is collected into
//! one explicit `Config` value handed to the fetchers and the decision
//! engine — no ambient process-wide state, so the decision functions stay
//! independently testable.

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Environment variable names
// ---------------------------------------------------------------------------

pub const ENV_LINE_TOKEN: &str = "LINE_CHANNEL_ACCESS_TOKEN";
pub const ENV_LINE_TARGET: &str = "LINE_TARGET_ID";
pub const ENV_OPENWEATHER_KEY: &str = "OPENWEATHER_API_KEY";

// ---------------------------------------------------------------------------
// Pipeline configuration sections
// ---------------------------------------------------------------------------

/// How the river-gauge pipeline compares a new level against the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompareMode {
    /// Notify when the absolute delta reaches `level_threshold_m`.
    Threshold,
    /// Notify on any change of the `%.2f`-formatted level string.
    Exact,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GaugeConfig {
    pub page_url: String,
    pub station_code: String,
    pub compare: CompareMode,
    /// Minimum absolute level change that warrants a notification, meters.
    pub level_threshold_m: f64,
    /// Attempts to locate the water-level frame before giving up.
    pub frame_attempts: u32,
    /// Pause between frame-location attempts, seconds.
    pub frame_retry_pause_secs: u64,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        GaugeConfig {
            page_url: "https://singburi.thaiwater.net/wl".to_string(),
            station_code: crate::model::STATION_INBURI.to_string(),
            compare: CompareMode::Threshold,
            level_threshold_m: 0.20,
            frame_attempts: 3,
            frame_retry_pause_secs: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DischargeConfig {
    pub page_url: String,
    pub station_code: String,
}

impl Default for DischargeConfig {
    fn default() -> Self {
        DischargeConfig {
            page_url:
                "https://tiwrm.hii.or.th/DATA/REPORT/php/chart/chaopraya/small/chaopraya.php"
                    .to_string(),
            station_code: crate::model::STATION_CHAO_PHRAYA_DAM.to_string(),
        }
    }
}

/// Criteria for the sliding-window forecast scan.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Weather category id prefixes that count as precipitation-like
    /// ("5" rain, "2" thunderstorm).
    pub category_prefixes: Vec<String>,
    /// Minimum probability of precipitation, in [0, 1].
    pub min_pop: f64,
    /// Minimum expected rain volume per period, millimeters.
    pub min_rain_volume_mm: f64,
    /// Consecutive qualifying periods required before an event is declared.
    pub consecutive_periods_needed: usize,
    /// Forecast periods fetched per run (each spans 3 hours).
    pub periods_to_check: u32,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        ForecastConfig {
            category_prefixes: vec!["5".to_string(), "2".to_string()],
            min_pop: 0.6,
            min_rain_volume_mm: 0.5,
            consecutive_periods_needed: 1,
            periods_to_check: 4,
        }
    }
}

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// LINE Messaging API credentials. Absence is not fatal: the pipelines
/// still decide and persist, and sends degrade to a logged skip.
#[derive(Debug, Clone)]
pub struct LineCredentials {
    pub channel_access_token: String,
    pub target_id: String,
}

// ---------------------------------------------------------------------------
// Top-level configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the per-pipeline state files.
    pub state_dir: PathBuf,
    pub http_timeout_secs: u64,
    pub line: Option<LineCredentials>,
    pub openweather_api_key: Option<String>,
    pub discharge: DischargeConfig,
    pub gauge: GaugeConfig,
    pub forecast: ForecastConfig,
}

/// File-backed subset of `Config`; every field optional with defaults so a
/// missing or partial file behaves the same as no file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileConfig {
    state_dir: Option<PathBuf>,
    http_timeout_secs: Option<u64>,
    discharge: Option<DischargeConfig>,
    gauge: Option<GaugeConfig>,
    forecast: Option<ForecastConfig>,
}

impl Config {
    /// Builds the configuration from an optional TOML file plus the
    /// process environment. A missing file path is an error; `None` uses
    /// pure defaults.
    pub fn load(path: Option<&Path>) -> Result<Config, ConfigError> {
        let file = match path {
            Some(p) => {
                let raw = std::fs::read_to_string(p)
                    .map_err(|e| ConfigError::Io(p.display().to_string(), e.to_string()))?;
                toml::from_str::<FileConfig>(&raw)
                    .map_err(|e| ConfigError::Toml(p.display().to_string(), e.to_string()))?
            }
            None => FileConfig::default(),
        };

        Ok(Config {
            state_dir: file.state_dir.unwrap_or_else(|| PathBuf::from(".")),
            http_timeout_secs: file.http_timeout_secs.unwrap_or(20),
            line: line_credentials_from_env(),
            openweather_api_key: non_empty_env(ENV_OPENWEATHER_KEY),
            discharge: file.discharge.unwrap_or_default(),
            gauge: file.gauge.unwrap_or_default(),
            forecast: file.forecast.unwrap_or_default(),
        })
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            state_dir: PathBuf::from("."),
            http_timeout_secs: 20,
            line: None,
            openweather_api_key: None,
            discharge: DischargeConfig::default(),
            gauge: GaugeConfig::default(),
            forecast: ForecastConfig::default(),
        }
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn line_credentials_from_env() -> Option<LineCredentials> {
    let token = non_empty_env(ENV_LINE_TOKEN)?;
    let target = non_empty_env(ENV_LINE_TARGET)?;
    Some(LineCredentials {
        channel_access_token: token,
        target_id: target,
    })
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub enum ConfigError {
    Io(String, String),
    Toml(String, String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(path, msg) => write!(f, "cannot read config {}: {}", path, msg),
            ConfigError::Toml(path, msg) => write!(f, "invalid config {}: {}", path, msg),
        }
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
