//! Exact-change detection for the reservoir discharge pipeline.
//!
//! The observation is one opaque formatted string; any difference against
//! the stored baseline — including the very first successful fetch against
//! an empty baseline — warrants a notification. There is no numeric
//! tolerance anywhere in this rule.

use crate::model::DischargeObservation;

/// Facts rendered into a discharge notification.
#[derive(Debug, Clone, PartialEq)]
pub struct DischargeFacts {
    pub station_code: String,
    pub current: String,
    /// `None` on the first run, when no baseline existed yet.
    pub previous: Option<String>,
}

/// Outcome of one discharge decision.
#[derive(Debug, Clone, PartialEq)]
pub struct DischargeDecision {
    pub notify: bool,
    pub facts: Option<DischargeFacts>,
    /// Persisted unconditionally after every valid observation.
    pub new_state: String,
}

/// Compares the fresh summary against the stored baseline.
///
/// An absent baseline reads as the empty string, so the first successful
/// fetch notifies and establishes the baseline in the same cycle.
pub fn decide(observation: &DischargeObservation, prior: Option<&str>) -> DischargeDecision {
    let prior = prior.map(str::trim).unwrap_or("");
    let notify = observation.summary != prior;

    let facts = if notify {
        Some(DischargeFacts {
            station_code: observation.station_code.clone(),
            current: observation.summary.clone(),
            previous: if prior.is_empty() {
                None
            } else {
                Some(prior.to_string())
            },
        })
    } else {
        None
    };

    DischargeDecision {
        notify,
        facts,
        new_state: observation.summary.clone(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
