//! Message rendering for the push channel.
//!
//! Every renderer takes the timestamp as a parameter instead of reading
//! the clock, so message content is deterministic in tests. Timestamps
//! are shown in Thailand time — the audience is local to the river.

use chrono::{DateTime, FixedOffset, Utc};

use crate::decision::discharge::DischargeFacts;
use crate::decision::gauge::{BankStatus, GaugeFacts};
use crate::model::ForecastPeriod;

/// UTC+7, no daylight saving.
pub fn thailand_offset() -> FixedOffset {
    FixedOffset::east_opt(7 * 3600).expect("UTC+7 is a valid offset")
}

/// Current wall-clock time in Thailand.
pub fn thailand_now() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&thailand_offset())
}

fn stamp(now: DateTime<FixedOffset>) -> String {
    now.format("%d/%m/%Y %H:%M").to_string()
}

/// Reservoir discharge update: current figures with the displaced baseline.
pub fn render_discharge(facts: &DischargeFacts, now: DateTime<FixedOffset>) -> String {
    let previous = facts
        .previous
        .as_deref()
        .unwrap_or("no previous data");
    format!(
        "🚨 Update!\n\
         Chao Phraya Dam discharge ({})\n\n\
         Current: {}\n\
         Previous: {}\n\n\
         🗓️ {}",
        facts.station_code, facts.current, previous,
        stamp(now)
    )
}

/// River level update: both levels, the signed change, and the bank status.
pub fn render_gauge(facts: &GaugeFacts, now: DateTime<FixedOffset>) -> String {
    let (icon, status_line) = match facts.bank_status {
        Some(BankStatus::OverBank) => ("🚨", "⚠️ OVER BANK".to_string()),
        Some(BankStatus::Normal) => {
            let below = facts.overflow_m.map(|o| -o).unwrap_or(0.0);
            ("🌊", format!("✅ Normal ({:.2} m below the bank)", below))
        }
        None => ("🌊", "ℹ️ Bank level not reported".to_string()),
    };

    let change_line = if facts.initial {
        "📈 Change: first reading (baseline established)".to_string()
    } else if facts.delta_m >= 0.0 {
        format!("📈 Change: +{:.2} m (rising)", facts.delta_m)
    } else {
        format!("📉 Change: {:.2} m (falling)", facts.delta_m)
    };

    let bank_line = match facts.bank_level_m {
        Some(bank) => format!("🏞️ Bank level: {:.2} m (MSL)\n", bank),
        None => String::new(),
    };

    format!(
        "{} Chao Phraya River level update\n\
         📍 Station: {}\n\
         ━━━━━━━━━━━━━━\n\
         💧 Water level: {:.2} m (MSL)\n\
         {}\
         📊 Status: {}\n\
         {}\n\n\
         🗓️ {}",
        icon, facts.station, facts.water_level_m, bank_line, status_line, change_line,
        stamp(now)
    )
}

/// Forecast alert for a newly detected qualifying rain event.
pub fn render_forecast(period: &ForecastPeriod, now: DateTime<FixedOffset>) -> String {
    // Thunderstorm categories (2xx) get the storm icon; everything else
    // that qualifies is rain.
    let icon = if period.weather_id.to_string().starts_with('2') {
        "⛈️"
    } else {
        "🌧️"
    };

    let when = match DateTime::<Utc>::from_timestamp(period.timestamp, 0) {
        Some(t) => {
            let local = t.with_timezone(&thailand_offset());
            format!("{} ({})", local.format("%H:%M"), local.format("%d/%m"))
        }
        None => format!("period {}", period.timestamp),
    };

    format!(
        "{} Weather outlook: rain expected\n\
         ━━━━━━━━━━━━━━\n\
         📍 Area: In Buri District, Sing Buri\n\n\
         ▶️ Outlook: {}\n\
         💧 Rain volume: ~{:.1} mm\n\
         🗓️ Around: {}\n\n\
         Updated: {}",
        icon, period.description, period.rain_3h_mm, when,
        stamp(now)
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
