//! Display formatting for dates, clock times and worked durations.

use chrono::{DateTime, NaiveDate, NaiveTime};

use shared::types::WorkDuration;

/// Shown wherever a value is missing.
pub const MISSING: &str = "-";

/// `HH:MM:SS[.fff]` as stored by the backend → `hh:mm:ss AM/PM`.
pub fn clock_time(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return MISSING.to_string();
    };
    // Fractional seconds are dropped before parsing.
    let whole = raw.split('.').next().unwrap_or(raw);
    match NaiveTime::parse_from_str(whole, "%H:%M:%S") {
        Ok(t) => t.format("%I:%M:%S %p").to_string(),
        Err(_) => raw.to_string(),
    }
}

/// Worked time: under a minute `N sec`, otherwise `H hr S sec` where `S`
/// is what is left after whole hours are taken out.
pub fn work_duration(duration: Option<&WorkDuration>) -> String {
    let Some(total) = duration.and_then(|d| d.seconds) else {
        return MISSING.to_string();
    };
    if total < 60 {
        return format!("{} sec", total);
    }
    let hours = total / 3600;
    let rest = total % 3600;
    if hours == 0 {
        format!("{} sec", rest)
    } else {
        format!("{} hr {} sec", hours, rest)
    }
}

/// ISO date or timestamp → `Mon D, YYYY`. Unparseable values are shown
/// unchanged.
pub fn date(raw: Option<&str>) -> String {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return MISSING.to_string();
    };
    parse_date(raw)
        .map(|d| d.format("%b %-d, %Y").to_string())
        .unwrap_or_else(|| raw.to_string())
}

/// Date as accepted by the forms (`YYYY-MM-DD`); timestamps are cut to
/// their date part.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(d);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.date_naive())
}

/// `YYYY-MM-DD` for pre-filling edit forms.
pub fn iso_date(raw: Option<&str>) -> String {
    raw.and_then(parse_date)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_default()
}

/// Prediction probability as a percentage.
pub fn probability(p: Option<f64>) -> String {
    match p {
        Some(p) => format!("{:.1}%", p * 100.0),
        None => MISSING.to_string(),
    }
}
