//! Sliding-window confidence run for the weather forecast pipeline.
//!
//! A forecast window is an ordered sequence of 3-hour periods. A period
//! qualifies only when its weather category, probability of precipitation,
//! and expected volume all clear the configured criteria. Periods are
//! scanned chronologically while tracking the current run of consecutive
//! qualifying periods; any break resets the run to zero. The scan stops as
//! soon as the run reaches the configured length, and the event is the
//! *first* period of that run — implemented as an explicit loop with an
//! early return so that selection survives refactoring.
//!
//! The decision compares the new status identifier against the persisted
//! one. Only a transition *into* a rain event notifies; a transition to
//! no-rain is recorded silently, and two distinct rain timestamps count as
//! a change even though both are "rain".

use crate::config::ForecastConfig;
use crate::model::{ForecastPeriod, ForecastStatus};

/// True when the period clears all three criteria.
fn qualifies(period: &ForecastPeriod, config: &ForecastConfig) -> bool {
    let id = period.weather_id.to_string();
    let category_matches = config
        .category_prefixes
        .iter()
        .any(|prefix| id.starts_with(prefix.as_str()));

    category_matches
        && period.pop >= config.min_pop
        && period.rain_3h_mm >= config.min_rain_volume_mm
}

/// Scans the window for the first run of consecutive qualifying periods
/// of the required length.
pub fn evaluate_window(periods: &[ForecastPeriod], config: &ForecastConfig) -> ForecastStatus {
    // (first period of the current run, run length)
    let mut run: Option<(&ForecastPeriod, usize)> = None;

    for period in periods {
        if qualifies(period, config) {
            let (start, len) = match run {
                Some((start, len)) => (start, len + 1),
                None => (period, 1),
            };
            if len >= config.consecutive_periods_needed {
                return ForecastStatus::Rain(start.clone());
            }
            run = Some((start, len));
        } else {
            run = None;
        }
    }

    ForecastStatus::NoRain
}

/// Outcome of one forecast decision.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastDecision {
    pub notify: bool,
    /// The qualifying event, present only when notifying.
    pub facts: Option<ForecastPeriod>,
    /// Identifier to persist; `None` when the status is unchanged.
    pub new_state: Option<String>,
}

/// Compares the freshly evaluated status against the persisted identifier.
pub fn decide(status: &ForecastStatus, prior: Option<&str>) -> ForecastDecision {
    let id = status.id();
    let prior = prior.map(str::trim).unwrap_or("");

    if id == prior {
        return ForecastDecision {
            notify: false,
            facts: None,
            new_state: None,
        };
    }

    match status {
        ForecastStatus::Rain(period) => ForecastDecision {
            notify: true,
            facts: Some(period.clone()),
            new_state: Some(id),
        },
        // Leaving a rain event (or starting up with clear skies) is
        // recorded but never announced.
        ForecastStatus::NoRain => ForecastDecision {
            notify: false,
            facts: None,
            new_state: Some(id),
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
