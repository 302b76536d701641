//! Station registry for the Chao Phraya monitoring service.
//!
//! Defines the canonical list of monitored stations along with their
//! metadata. This is the single source of truth for station codes — all
//! other modules should reference stations from here rather than
//! hardcoding codes.

use crate::model::{STATION_CHAO_PHRAYA_DAM, STATION_INBURI};

// ---------------------------------------------------------------------------
// Station metadata
// ---------------------------------------------------------------------------

/// Metadata for a single monitored station.
pub struct Station {
    /// Station code as it appears in the source document
    /// (first table column for telemetry gauges, mapping key for HII).
    pub code: &'static str,
    /// Human-readable station name.
    pub name: &'static str,
    /// Role of the station in the monitoring setup.
    pub description: &'static str,
    /// WGS84 latitude.
    pub latitude: f64,
    /// WGS84 longitude.
    pub longitude: f64,
}

/// All monitored stations, ordered downstream to upstream.
///
/// Sources:
///   - Gauge codes: Royal Irrigation Department telemetry (singburi.thaiwater.net)
///   - Dam figures: Hydro-Informatics Institute chart data (tiwrm.hii.or.th)
pub static STATION_REGISTRY: &[Station] = &[
    Station {
        code: STATION_INBURI,
        name: "Chao Phraya River at In Buri, Sing Buri",
        description: "Primary telemetry gauge for the monitored reach. \
                      Water and bank levels read from the provincial \
                      water-level table.",
        latitude: 15.02,
        longitude: 100.34,
    },
    Station {
        code: STATION_CHAO_PHRAYA_DAM,
        name: "Chao Phraya Dam tailwater, Chai Nat",
        description: "Dam discharge reference upstream of In Buri. Rising \
                      release here reaches the In Buri reach within hours, \
                      so any change in the published figures is relevant.",
        latitude: 15.1565,
        longitude: 100.1779,
    },
];

/// Coordinates used for the weather forecast lookup. The forecast pipeline
/// watches the sky over the gauge, not the dam.
pub fn forecast_point() -> (f64, f64) {
    let station = find_station(STATION_INBURI)
        .expect("In Buri gauge must be in the registry");
    (station.latitude, station.longitude)
}

/// Looks up a station by code. Returns `None` if not found.
pub fn find_station(code: &str) -> Option<&'static Station> {
    STATION_REGISTRY.iter().find(|s| s.code == code)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
