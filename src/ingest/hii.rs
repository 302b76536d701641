//! HII Chao Phraya chart-page fetcher.
//!
//! The chart page ships its data as a JavaScript literal:
//!
//! ```text
//! var json_data = [{"itc_water": {"C13": {"storage": "120", "qmax": "700"}, ...}}];
//! ```
//!
//! The array is lifted out with a regex, parsed as JSON, and the station
//! entry is composed into the same `"{storage}/ {qmax} cms"` string the
//! page renders. The composed string is the pipeline's opaque comparison
//! key — it is never decomposed back into numbers.

use regex::Regex;
use serde_json::Value;

use crate::config::DischargeConfig;
use crate::model::{DischargeObservation, FetchError};

/// Pattern locating the embedded data array on the chart page.
const JSON_DATA_PATTERN: &str = r"var json_data = (\[.*\]);";

/// Fetches the current discharge figures for the configured station.
pub fn fetch_discharge(
    client: &reqwest::blocking::Client,
    config: &DischargeConfig,
) -> Result<DischargeObservation, FetchError> {
    let page = super::get_text(client, &config.page_url)?;
    parse_discharge(&page, &config.station_code)
}

/// Extracts the station's discharge summary from the page source.
pub fn parse_discharge(page: &str, station_code: &str) -> Result<DischargeObservation, FetchError> {
    let pattern =
        Regex::new(JSON_DATA_PATTERN).map_err(|e| FetchError::Parse(e.to_string()))?;
    let payload = pattern
        .captures(page)
        .and_then(|captures| captures.get(1))
        .ok_or_else(|| FetchError::ElementNotFound("json_data variable".to_string()))?
        .as_str();

    let data: Value =
        serde_json::from_str(payload).map_err(|e| FetchError::Parse(e.to_string()))?;

    let station = data
        .get(0)
        .and_then(|first| first.get("itc_water"))
        .and_then(|mapping| mapping.get(station_code))
        .ok_or_else(|| {
            FetchError::MissingField(format!("[0].itc_water.{}", station_code))
        })?;

    let storage = field_text(station, "storage");
    let qmax = field_text(station, "qmax");

    Ok(DischargeObservation {
        station_code: station_code.to_string(),
        summary: format!("{}/ {} cms", storage, qmax),
    })
}

/// Field values arrive as strings or numbers depending on the upstream
/// export; a missing field renders as `-`, matching the chart page.
fn field_text(station: &Value, field: &str) -> String {
    match station.get(field) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => "-".to_string(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn page_with(json: &str) -> String {
        format!(
            "<html><head><script>\nvar chart;\nvar json_data = {};\n</script></head></html>",
            json
        )
    }

    #[test]
    fn test_parse_discharge_composes_summary() {
        let page = page_with(r#"[{"itc_water": {"C13": {"storage": "120", "qmax": "700"}}}]"#);
        let obs = parse_discharge(&page, "C13").expect("station present");
        assert_eq!(obs.summary, "120/ 700 cms");
        assert_eq!(obs.station_code, "C13");
    }

    #[test]
    fn test_numeric_json_values_are_accepted() {
        let page = page_with(r#"[{"itc_water": {"C13": {"storage": 120.5, "qmax": 700}}}]"#);
        let obs = parse_discharge(&page, "C13").expect("station present");
        assert_eq!(obs.summary, "120.5/ 700 cms");
    }

    #[test]
    fn test_missing_individual_field_renders_dash() {
        let page = page_with(r#"[{"itc_water": {"C13": {"storage": "120"}}}]"#);
        let obs = parse_discharge(&page, "C13").expect("station present");
        assert_eq!(obs.summary, "120/ - cms");
    }

    #[test]
    fn test_missing_station_entry_is_missing_field() {
        let page = page_with(r#"[{"itc_water": {"C2": {"storage": "80", "qmax": "400"}}}]"#);
        let err = parse_discharge(&page, "C13").expect_err("C13 absent");
        assert!(matches!(err, FetchError::MissingField(_)));
    }

    #[test]
    fn test_page_without_json_data_is_element_not_found() {
        let err = parse_discharge("<html><body>down for maintenance</body></html>", "C13")
            .expect_err("no variable");
        assert!(matches!(err, FetchError::ElementNotFound(_)));
    }

    #[test]
    fn test_malformed_payload_is_parse_error() {
        let err = parse_discharge("var json_data = [{oops];", "C13").expect_err("bad JSON");
        assert!(matches!(err, FetchError::Parse(_)));
    }
}
