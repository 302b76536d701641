//! Threshold-based change detection for the river-gauge pipeline.
//!
//! The baseline is the immediately previous *observed* level, not the last
//! notified one: every valid observation rebases the stored level, and the
//! threshold gates only whether a notification goes out. Small drifts
//! therefore accumulate silently — two consecutive 0.10 m rises never
//! notify even though the total movement is 0.20 m. That rebasing is
//! deliberate and must not be "fixed" into last-notified semantics.
//!
//! The original exact-string comparison survives as `CompareMode::Exact`
//! for deployments that want every formatted change announced.

use crate::config::{CompareMode, GaugeConfig};
use crate::model::RiverGaugeObservation;

/// Presentation-only classification of the level against the bank crest.
/// Never feeds back into the notify decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BankStatus {
    /// Water level above the bank crest (overflow > 0).
    OverBank,
    /// At or below the bank crest.
    Normal,
}

/// Facts rendered into a gauge notification.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeFacts {
    pub station: String,
    pub water_level_m: f64,
    pub bank_level_m: Option<f64>,
    pub overflow_m: Option<f64>,
    pub bank_status: Option<BankStatus>,
    /// Signed change against the previous observed level; 0.0 on the
    /// initial reading.
    pub delta_m: f64,
    /// True when no usable baseline existed.
    pub initial: bool,
}

/// Outcome of one gauge decision.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeDecision {
    pub notify: bool,
    pub facts: Option<GaugeFacts>,
    /// The `%.2f`-formatted current level; persisted unconditionally
    /// after every valid observation.
    pub new_state: String,
}

/// Compares the fresh reading against the stored baseline under the
/// configured mode.
///
/// An unparseable baseline is treated as absent — the initial path runs
/// and the bad value is overwritten by a clean one. Callers are expected
/// to log that condition; this function stays pure.
pub fn decide(
    observation: &RiverGaugeObservation,
    prior: Option<&str>,
    config: &GaugeConfig,
) -> GaugeDecision {
    let current_str = format!("{:.2}", observation.water_level_m);
    let prior_str = prior.map(str::trim).filter(|s| !s.is_empty());
    let prior_level: Option<f64> = prior_str.and_then(|s| s.parse().ok());

    let (notify, delta_m, initial) = match config.compare {
        CompareMode::Threshold => match prior_level {
            None => (true, 0.0, true),
            Some(previous) => {
                let delta = observation.water_level_m - previous;
                (delta.abs() >= config.level_threshold_m, delta, false)
            }
        },
        CompareMode::Exact => {
            let changed = prior_str != Some(current_str.as_str());
            let delta = prior_level
                .map(|previous| observation.water_level_m - previous)
                .unwrap_or(0.0);
            (changed, delta, prior_level.is_none())
        }
    };

    let facts = if notify {
        let overflow_m = observation.overflow_m();
        let bank_status = overflow_m.map(|overflow| {
            if overflow > 0.0 {
                BankStatus::OverBank
            } else {
                BankStatus::Normal
            }
        });
        Some(GaugeFacts {
            station: observation.station.clone(),
            water_level_m: observation.water_level_m,
            bank_level_m: observation.bank_level_m,
            overflow_m,
            bank_status,
            delta_m,
            initial,
        })
    } else {
        None
    };

    GaugeDecision {
        notify,
        facts,
        new_state: current_str,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(level: f64, bank: f64) -> RiverGaugeObservation {
        RiverGaugeObservation {
            station: "C.35 In Buri".to_string(),
            water_level_m: level,
            bank_level_m: Some(bank),
        }
    }

    fn threshold_config() -> GaugeConfig {
        GaugeConfig::default() // Threshold mode, 0.20 m
    }

    fn exact_config() -> GaugeConfig {
        GaugeConfig {
            compare: CompareMode::Exact,
            ..GaugeConfig::default()
        }
    }

    // --- Threshold mode -----------------------------------------------------

    #[test]
    fn test_initial_reading_always_notifies_with_zero_delta() {
        let decision = decide(&obs(10.00, 13.00), None, &threshold_config());
        assert!(decision.notify);
        let facts = decision.facts.expect("facts present");
        assert!(facts.initial);
        assert_eq!(facts.delta_m, 0.0);
        assert_eq!(decision.new_state, "10.00");
    }

    #[test]
    fn test_small_drift_stays_silent_but_rebases_baseline() {
        // prior 10.00, current 10.15: delta under threshold, no message,
        // baseline still moves to 10.15.
        let decision = decide(&obs(10.15, 13.00), Some("10.00"), &threshold_config());
        assert!(!decision.notify);
        assert!(decision.facts.is_none());
        assert_eq!(decision.new_state, "10.15");
    }

    #[test]
    fn test_cumulative_drift_does_not_trigger() {
        // 10.00 -> 10.15 -> 10.25: the second step diffs against 10.15,
        // so neither run notifies even though total drift is 0.25.
        let first = decide(&obs(10.15, 13.00), Some("10.00"), &threshold_config());
        assert!(!first.notify);
        let second = decide(
            &obs(10.25, 13.00),
            Some(first.new_state.as_str()),
            &threshold_config(),
        );
        assert!(!second.notify, "comparison must rebase to the latest observed level");
        assert_eq!(second.new_state, "10.25");
    }

    #[test]
    fn test_delta_at_exactly_threshold_fires() {
        // 10.25 and 10.00 are exactly representable, so the delta is a
        // clean 0.25 against a 0.25 threshold.
        let config = GaugeConfig {
            level_threshold_m: 0.25,
            ..threshold_config()
        };
        let decision = decide(&obs(10.25, 13.00), Some("10.00"), &config);
        assert!(decision.notify, "|delta| == threshold must notify (>=, not >)");
        let facts = decision.facts.expect("facts present");
        assert!((facts.delta_m - 0.25).abs() < 1e-9);
        assert!(!facts.initial);
    }

    #[test]
    fn test_falling_level_triggers_on_magnitude() {
        let decision = decide(&obs(9.50, 13.00), Some("10.00"), &threshold_config());
        assert!(decision.notify);
        let facts = decision.facts.expect("facts present");
        assert!(facts.delta_m < 0.0, "signed delta must carry direction");
    }

    #[test]
    fn test_unparseable_baseline_runs_initial_path() {
        let decision = decide(&obs(10.00, 13.00), Some("garbage"), &threshold_config());
        assert!(decision.notify);
        assert!(decision.facts.expect("facts").initial);
        assert_eq!(decision.new_state, "10.00");
    }

    // --- Bank status (presentation only) ------------------------------------

    #[test]
    fn test_over_bank_classification() {
        let decision = decide(&obs(13.40, 13.00), None, &threshold_config());
        let facts = decision.facts.expect("facts present");
        assert_eq!(facts.bank_status, Some(BankStatus::OverBank));
        assert!((facts.overflow_m.expect("overflow") - 0.40).abs() < 1e-9);
    }

    #[test]
    fn test_level_at_bank_crest_is_normal() {
        // overflow == 0 classifies as normal; only > 0 is over-bank.
        let decision = decide(&obs(13.00, 13.00), None, &threshold_config());
        let facts = decision.facts.expect("facts present");
        assert_eq!(facts.bank_status, Some(BankStatus::Normal));
    }

    #[test]
    fn test_bank_status_never_gates_notification() {
        // Deep below the bank but past the threshold: still notifies.
        let decision = decide(&obs(8.00, 13.00), Some("10.00"), &threshold_config());
        assert!(decision.notify);
        assert_eq!(
            decision.facts.expect("facts").bank_status,
            Some(BankStatus::Normal)
        );
    }

    #[test]
    fn test_missing_bank_level_leaves_status_unset() {
        let observation = RiverGaugeObservation {
            station: "C.35 In Buri".to_string(),
            water_level_m: 10.00,
            bank_level_m: None,
        };
        let decision = decide(&observation, None, &threshold_config());
        let facts = decision.facts.expect("facts present");
        assert_eq!(facts.bank_status, None);
        assert_eq!(facts.overflow_m, None);
    }

    // --- Exact mode ----------------------------------------------------------

    #[test]
    fn test_exact_mode_notifies_on_any_formatted_change() {
        let decision = decide(&obs(10.05, 13.00), Some("10.00"), &exact_config());
        assert!(decision.notify, "exact mode has no tolerance");
        assert_eq!(decision.new_state, "10.05");
    }

    #[test]
    fn test_exact_mode_identical_formatted_level_is_silent() {
        let decision = decide(&obs(10.00, 13.00), Some("10.00"), &exact_config());
        assert!(!decision.notify);
    }

    #[test]
    fn test_exact_mode_first_run_notifies() {
        let decision = decide(&obs(10.00, 13.00), None, &exact_config());
        assert!(decision.notify);
        assert!(decision.facts.expect("facts").initial);
    }
}
