//! End-to-end decision-flow tests across runs.
//!
//! These drive the real pipeline functions against a temp-dir state store
//! with injected fetch results and a credential-less notifier (sends
//! degrade to logged skips), so consecutive "invocations" exercise exactly
//! the read-decide-persist cycle a scheduled deployment sees — without a
//! network.

use chaomon_service::config::{Config, DischargeConfig, ForecastConfig, GaugeConfig};
use chaomon_service::model::{
    DischargeObservation, FetchError, ForecastPeriod, RiverGaugeObservation, NO_RAIN_SENTINEL,
};
use chaomon_service::notify::line::LineNotifier;
use chaomon_service::pipeline::{self, PipelineOutcome};
use chaomon_service::state::{StateStore, KEY_DISCHARGE, KEY_FORECAST_ID, KEY_GAUGE_LEVEL};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

struct Harness {
    _dir: tempfile::TempDir,
    store: StateStore,
    notifier: LineNotifier,
    config: Config,
}

fn harness() -> Harness {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = StateStore::open(dir.path()).expect("open store");
    let notifier = LineNotifier::new(reqwest::blocking::Client::new(), None);
    Harness {
        _dir: dir,
        store,
        notifier,
        config: Config::default(),
    }
}

fn discharge_obs(summary: &str) -> Result<DischargeObservation, FetchError> {
    Ok(DischargeObservation {
        station_code: "C13".to_string(),
        summary: summary.to_string(),
    })
}

fn gauge_obs(level: f64) -> Result<RiverGaugeObservation, FetchError> {
    Ok(RiverGaugeObservation {
        station: "C.35 In Buri".to_string(),
        water_level_m: level,
        bank_level_m: Some(13.00),
    })
}

fn rainy_period(timestamp: i64) -> ForecastPeriod {
    ForecastPeriod {
        timestamp,
        weather_id: 501,
        description: "moderate rain".to_string(),
        pop: 0.9,
        rain_3h_mm: 2.0,
    }
}

fn clear_period(timestamp: i64) -> ForecastPeriod {
    ForecastPeriod {
        timestamp,
        weather_id: 800,
        description: "clear sky".to_string(),
        pop: 0.0,
        rain_3h_mm: 0.0,
    }
}

// ---------------------------------------------------------------------------
// Discharge pipeline across runs
// ---------------------------------------------------------------------------

#[test]
fn test_discharge_a_then_b_notifies_then_replay_stays_silent() {
    let h = harness();
    let cfg = DischargeConfig::default();

    // First valid observation ever: notifies against the empty baseline.
    let first = pipeline::run_discharge(discharge_obs("120/ 700 cms"), &cfg, &h.store, &h.notifier);
    assert_eq!(first, PipelineOutcome::Notified);
    assert_eq!(
        h.store.read(KEY_DISCHARGE).expect("read"),
        Some("120/ 700 cms".to_string())
    );

    // Changed value: notifies again.
    let second = pipeline::run_discharge(discharge_obs("130/ 720 cms"), &cfg, &h.store, &h.notifier);
    assert_eq!(second, PipelineOutcome::Notified);

    // Replay of the same value: must never re-notify.
    let third = pipeline::run_discharge(discharge_obs("130/ 720 cms"), &cfg, &h.store, &h.notifier);
    assert_eq!(third, PipelineOutcome::Unchanged);
    assert_eq!(
        h.store.read(KEY_DISCHARGE).expect("read"),
        Some("130/ 720 cms".to_string())
    );
}

// ---------------------------------------------------------------------------
// River-gauge pipeline across runs
// ---------------------------------------------------------------------------

#[test]
fn test_gauge_baseline_rebases_to_latest_observation() {
    let h = harness();
    let cfg = GaugeConfig::default();

    // Initial reading always notifies.
    assert_eq!(
        pipeline::run_gauge(gauge_obs(10.00), &cfg, &h.store, &h.notifier),
        PipelineOutcome::Notified
    );

    // +0.15: below threshold, silent, but the baseline moves.
    assert_eq!(
        pipeline::run_gauge(gauge_obs(10.15), &cfg, &h.store, &h.notifier),
        PipelineOutcome::Unchanged
    );
    assert_eq!(
        h.store.read(KEY_GAUGE_LEVEL).expect("read"),
        Some("10.15".to_string())
    );

    // +0.10 on top: cumulative drift from 10.00 is 0.25, but the
    // comparison is against 10.15 — still silent.
    assert_eq!(
        pipeline::run_gauge(gauge_obs(10.25), &cfg, &h.store, &h.notifier),
        PipelineOutcome::Unchanged
    );
    assert_eq!(
        h.store.read(KEY_GAUGE_LEVEL).expect("read"),
        Some("10.25".to_string())
    );

    // A real jump past the threshold notifies.
    assert_eq!(
        pipeline::run_gauge(gauge_obs(10.50), &cfg, &h.store, &h.notifier),
        PipelineOutcome::Notified
    );
}

// ---------------------------------------------------------------------------
// Forecast pipeline across runs
// ---------------------------------------------------------------------------

#[test]
fn test_forecast_transitions_notify_only_into_rain() {
    let h = harness();
    let cfg = ForecastConfig::default();

    // First run with a qualifying event: notifies, records T1.
    let t1_window = vec![rainy_period(1_700_000_000), clear_period(1_700_010_800)];
    assert_eq!(
        pipeline::run_forecast(Ok(t1_window.clone()), &cfg, &h.store, &h.notifier),
        PipelineOutcome::Notified
    );
    assert_eq!(
        h.store.read(KEY_FORECAST_ID).expect("read"),
        Some("1700000000".to_string())
    );

    // Same event again: silent, state untouched.
    assert_eq!(
        pipeline::run_forecast(Ok(t1_window), &cfg, &h.store, &h.notifier),
        PipelineOutcome::Unchanged
    );

    // Rain clears: recorded silently.
    let clear_window = vec![clear_period(1_700_021_600), clear_period(1_700_032_400)];
    assert_eq!(
        pipeline::run_forecast(Ok(clear_window), &cfg, &h.store, &h.notifier),
        PipelineOutcome::Unchanged
    );
    assert_eq!(
        h.store.read(KEY_FORECAST_ID).expect("read"),
        Some(NO_RAIN_SENTINEL.to_string())
    );

    // A different rain event T2: notifies again.
    let t2_window = vec![rainy_period(1_700_043_200)];
    assert_eq!(
        pipeline::run_forecast(Ok(t2_window), &cfg, &h.store, &h.notifier),
        PipelineOutcome::Notified
    );
    assert_eq!(
        h.store.read(KEY_FORECAST_ID).expect("read"),
        Some("1700043200".to_string())
    );
}

#[test]
fn test_forecast_first_run_without_rain_records_sentinel_silently() {
    let h = harness();
    let cfg = ForecastConfig::default();

    let window = vec![clear_period(1), clear_period(2)];
    assert_eq!(
        pipeline::run_forecast(Ok(window), &cfg, &h.store, &h.notifier),
        PipelineOutcome::Unchanged
    );
    assert_eq!(
        h.store.read(KEY_FORECAST_ID).expect("read"),
        Some(NO_RAIN_SENTINEL.to_string())
    );
}

// ---------------------------------------------------------------------------
// Fetch failures leave state untouched
// ---------------------------------------------------------------------------

#[test]
fn test_failed_fetch_leaves_all_state_bit_for_bit_unchanged() {
    let h = harness();

    // Seed every pipeline's baseline.
    h.store.write(KEY_DISCHARGE, "120/ 700 cms").expect("seed");
    h.store.write(KEY_GAUGE_LEVEL, "10.15").expect("seed");
    h.store.write(KEY_FORECAST_ID, "1700000000").expect("seed");

    let outcomes = [
        pipeline::run_discharge(
            Err(FetchError::Http(502)),
            &h.config.discharge,
            &h.store,
            &h.notifier,
        ),
        pipeline::run_gauge(
            Err(FetchError::ContextNotFound("water-level frame".to_string())),
            &h.config.gauge,
            &h.store,
            &h.notifier,
        ),
        pipeline::run_forecast(
            Err(FetchError::Network("timeout".to_string())),
            &h.config.forecast,
            &h.store,
            &h.notifier,
        ),
    ];
    for outcome in outcomes {
        assert_eq!(outcome, PipelineOutcome::FetchFailed);
    }

    assert_eq!(
        h.store.read(KEY_DISCHARGE).expect("read"),
        Some("120/ 700 cms".to_string())
    );
    assert_eq!(
        h.store.read(KEY_GAUGE_LEVEL).expect("read"),
        Some("10.15".to_string())
    );
    assert_eq!(
        h.store.read(KEY_FORECAST_ID).expect("read"),
        Some("1700000000".to_string())
    );
}

#[test]
fn test_failed_fetch_on_first_run_creates_no_state() {
    let h = harness();

    pipeline::run_discharge(
        Err(FetchError::Http(500)),
        &h.config.discharge,
        &h.store,
        &h.notifier,
    );

    assert_eq!(h.store.read(KEY_DISCHARGE).expect("read"), None);
}
