//! Display formatting for volumes, fees, prices, and launch dates.
//!
//! Values arrive from the API as plain numbers and ISO-8601 strings; the
//! helpers here turn them into the strings the shell renders. A missing
//! value always formats as `"N/A"`.

use chrono::DateTime;

const NOT_AVAILABLE: &str = "N/A";

/// Format a USD volume with a B/M/K magnitude suffix.
///
/// `15_000_000_000` becomes `"$15.00B"`, `500_000_000` becomes `"$500.00M"`,
/// `750_000` becomes `"$750.00K"`, smaller values keep two decimals.
pub fn volume(value: Option<f64>) -> String {
    let Some(value) = value else {
        return NOT_AVAILABLE.to_string();
    };

    if value >= 1_000_000_000.0 {
        format!("${:.2}B", value / 1_000_000_000.0)
    } else if value >= 1_000_000.0 {
        format!("${:.2}M", value / 1_000_000.0)
    } else if value >= 1_000.0 {
        format!("${:.2}K", value / 1_000.0)
    } else {
        format!("${:.2}", value)
    }
}

/// Format a maker/taker fee percentage, e.g. `0.1` -> `"0.10%"`.
pub fn fee_percent(value: Option<f64>) -> String {
    match value {
        Some(fee) => format!("{:.2}%", fee),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Format a USD price with four decimals, e.g. `"$0.0067"`.
pub fn price_usd(value: Option<f64>) -> String {
    match value {
        Some(price) => format!("${:.4}", price),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Format an ISO-8601 launch date as a medium date, e.g. `"Jul 14, 2017"`.
///
/// Unparseable input is echoed back verbatim rather than hidden.
pub fn launch_date(value: Option<&str>) -> String {
    let Some(raw) = value else {
        return NOT_AVAILABLE.to_string();
    };

    match DateTime::parse_from_rfc3339(raw) {
        Ok(date) => date.format("%b %-d, %Y").to_string(),
        Err(_) => raw.to_string(),
    }
}
