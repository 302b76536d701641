//! Per-pipeline orchestration: fetch result in, decision out, effects
//! applied in order.
//!
//! Each function takes the already-produced fetch result so the decision
//! flow can be exercised in tests without a network. The ordering
//! invariants live here:
//!
//! - a fetch failure aborts before the state store is even read;
//! - notification is attempted before the state write, but its failure
//!   never prevents that write — delivery is best-effort, state tracking
//!   is not.

use crate::config::{CompareMode, DischargeConfig, ForecastConfig, GaugeConfig};
use crate::decision::{discharge, forecast, gauge};
use crate::logging::{self, DataSource};
use crate::model::{
    DischargeObservation, FetchError, ForecastPeriod, RiverGaugeObservation,
};
use crate::notify::format;
use crate::notify::line::{DeliveryOutcome, LineNotifier};
use crate::state::{self, StateStore};

/// How one pipeline invocation ended. Purely informational — the process
/// exits normally either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// Changed enough to push a notification.
    Notified,
    /// Valid observation, no notification warranted.
    Unchanged,
    /// No observation this run; state untouched.
    FetchFailed,
    /// Pipeline could not run (state unreadable, missing configuration).
    Skipped,
}

// ---------------------------------------------------------------------------
// Reservoir discharge pipeline
// ---------------------------------------------------------------------------

pub fn run_discharge(
    fetched: Result<DischargeObservation, FetchError>,
    config: &DischargeConfig,
    store: &StateStore,
    notifier: &LineNotifier,
) -> PipelineOutcome {
    let observation = match fetched {
        Ok(observation) => observation,
        Err(err) => {
            logging::log_fetch_failure(DataSource::Hii, &config.station_code, &err);
            return PipelineOutcome::FetchFailed;
        }
    };

    let prior = match store.read(state::KEY_DISCHARGE) {
        Ok(prior) => prior,
        Err(err) => {
            logging::error(
                DataSource::State,
                Some(&config.station_code),
                &format!("cannot read {}: {}", state::KEY_DISCHARGE, err),
            );
            return PipelineOutcome::Skipped;
        }
    };

    let decision = discharge::decide(&observation, prior.as_deref());

    if let Some(facts) = &decision.facts {
        logging::info(
            DataSource::Hii,
            Some(&config.station_code),
            &format!(
                "discharge changed: '{}' -> '{}'",
                facts.previous.as_deref().unwrap_or(""),
                facts.current
            ),
        );
        send(notifier, &format::render_discharge(facts, format::thailand_now()));
    } else {
        logging::info(
            DataSource::Hii,
            Some(&config.station_code),
            &format!("discharge unchanged ({})", observation.summary),
        );
    }

    persist(store, state::KEY_DISCHARGE, &decision.new_state);

    if decision.notify {
        PipelineOutcome::Notified
    } else {
        PipelineOutcome::Unchanged
    }
}

// ---------------------------------------------------------------------------
// River gauge pipeline
// ---------------------------------------------------------------------------

pub fn run_gauge(
    fetched: Result<RiverGaugeObservation, FetchError>,
    config: &GaugeConfig,
    store: &StateStore,
    notifier: &LineNotifier,
) -> PipelineOutcome {
    let observation = match fetched {
        Ok(observation) => observation,
        Err(err) => {
            logging::log_fetch_failure(DataSource::ThaiWater, &config.station_code, &err);
            return PipelineOutcome::FetchFailed;
        }
    };

    let prior = match store.read(state::KEY_GAUGE_LEVEL) {
        Ok(prior) => prior,
        Err(err) => {
            logging::error(
                DataSource::State,
                Some(&config.station_code),
                &format!("cannot read {}: {}", state::KEY_GAUGE_LEVEL, err),
            );
            return PipelineOutcome::Skipped;
        }
    };

    // The decision treats a corrupt baseline as a first run; surface it
    // here so the overwrite is visible in the log.
    if let Some(raw) = prior.as_deref() {
        if config.compare == CompareMode::Threshold && raw.parse::<f64>().is_err() {
            logging::warn(
                DataSource::State,
                Some(&config.station_code),
                &format!("stored baseline '{}' is not numeric; treating as first run", raw),
            );
        }
    }

    let decision = gauge::decide(&observation, prior.as_deref(), config);

    if let Some(facts) = &decision.facts {
        logging::info(
            DataSource::ThaiWater,
            Some(&config.station_code),
            &format!(
                "level {:.2} m (delta {:+.2} m) warrants notification",
                facts.water_level_m, facts.delta_m
            ),
        );
        send(notifier, &format::render_gauge(facts, format::thailand_now()));
    } else {
        logging::info(
            DataSource::ThaiWater,
            Some(&config.station_code),
            &format!(
                "level {:.2} m, change below threshold; baseline rebased",
                observation.water_level_m
            ),
        );
    }

    persist(store, state::KEY_GAUGE_LEVEL, &decision.new_state);

    if decision.notify {
        PipelineOutcome::Notified
    } else {
        PipelineOutcome::Unchanged
    }
}

// ---------------------------------------------------------------------------
// Weather forecast pipeline
// ---------------------------------------------------------------------------

pub fn run_forecast(
    fetched: Result<Vec<ForecastPeriod>, FetchError>,
    config: &ForecastConfig,
    store: &StateStore,
    notifier: &LineNotifier,
) -> PipelineOutcome {
    let periods = match fetched {
        Ok(periods) => periods,
        Err(err) => {
            logging::log_fetch_failure(DataSource::OpenWeather, "forecast", &err);
            return PipelineOutcome::FetchFailed;
        }
    };

    let status = forecast::evaluate_window(&periods, config);

    let prior = match store.read(state::KEY_FORECAST_ID) {
        Ok(prior) => prior,
        Err(err) => {
            logging::error(
                DataSource::State,
                None,
                &format!("cannot read {}: {}", state::KEY_FORECAST_ID, err),
            );
            return PipelineOutcome::Skipped;
        }
    };

    let decision = forecast::decide(&status, prior.as_deref());

    if let Some(event) = &decision.facts {
        logging::info(
            DataSource::OpenWeather,
            None,
            &format!(
                "new qualifying rain event at {} ({}, pop {:.0}%, {:.1} mm)",
                event.timestamp,
                event.description,
                event.pop * 100.0,
                event.rain_3h_mm
            ),
        );
        send(notifier, &format::render_forecast(event, format::thailand_now()));
    }

    match &decision.new_state {
        Some(new_state) => {
            logging::info(
                DataSource::OpenWeather,
                None,
                &format!(
                    "forecast status changed: '{}' -> '{}'",
                    prior.as_deref().unwrap_or(""),
                    new_state
                ),
            );
            persist(store, state::KEY_FORECAST_ID, new_state);
        }
        None => {
            logging::info(DataSource::OpenWeather, None, "forecast status unchanged");
        }
    }

    if decision.notify {
        PipelineOutcome::Notified
    } else {
        PipelineOutcome::Unchanged
    }
}

// ---------------------------------------------------------------------------
// Shared effects
// ---------------------------------------------------------------------------

fn send(notifier: &LineNotifier, message: &str) {
    match notifier.push(message) {
        Ok(DeliveryOutcome::Sent) => {
            logging::info(DataSource::Line, None, "notification sent");
        }
        Ok(DeliveryOutcome::SkippedNoCredentials) => {
            logging::warn(
                DataSource::Line,
                None,
                "credentials not configured; notification logged only",
            );
            logging::info(DataSource::Line, None, message);
        }
        Err(err) => logging::log_delivery_failure(&err),
    }
}

fn persist(store: &StateStore, key: &str, value: &str) {
    if let Err(err) = store.write(key, value) {
        logging::error(
            DataSource::State,
            None,
            &format!("cannot write {}: {}", key, err),
        );
    }
}
