use std::fmt::Display;

use crate::models::{AlertFeature, ForecastPeriod};

const UNKNOWN: &str = "Unknown";
const SEPARATOR: &str = "---";

/// Treats missing and empty strings alike
fn or_unknown(value: &Option<String>) -> &str {
    match value.as_deref() {
        Some(text) if !text.is_empty() => text,
        _ => UNKNOWN,
    }
}

/// Only a missing value falls back; an empty string is kept as is
fn present_or_unknown(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or(UNKNOWN)
}

fn display_or_unknown<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| UNKNOWN.to_string(), |v| v.to_string())
}

/// Formats a single alert as a labeled block ending in a separator
pub fn format_alert(feature: &AlertFeature) -> String {
    let props = &feature.properties;
    [
        format!("Event: {}", or_unknown(&props.event)),
        format!("Area: {}", or_unknown(&props.area_desc)),
        format!("Severity: {}", or_unknown(&props.severity)),
        format!("Status: {}", or_unknown(&props.status)),
        format!("Headline: {}", or_unknown(&props.headline)),
        SEPARATOR.to_string(),
    ]
    .join("\n")
}

/// Formats a single forecast period as a four-line block
pub fn format_period(period: &ForecastPeriod) -> String {
    [
        format!(
            "{}: {} {}",
            or_unknown(&period.name),
            display_or_unknown(period.temperature),
            present_or_unknown(&period.temperature_unit)
        ),
        format!(
            "Wind: {} {}",
            present_or_unknown(&period.wind_speed),
            present_or_unknown(&period.wind_direction)
        ),
        format!("Forecast: {}", or_unknown(&period.short_forecast)),
        SEPARATOR.to_string(),
    ]
    .join("\n")
}

/// Formats all alerts for a state under a header line
pub fn format_alerts_report(state: &str, features: &[AlertFeature]) -> String {
    let blocks: Vec<String> = features.iter().map(format_alert).collect();
    format!("Active alerts for {}:\n{}", state, blocks.join("\n\n"))
}

/// Formats all forecast periods for a location under a header line
pub fn format_forecast_report(latitude: f64, longitude: f64, periods: &[ForecastPeriod]) -> String {
    let blocks: Vec<String> = periods.iter().map(format_period).collect();
    format!(
        "Forecast for {}, {}:\n{}",
        latitude + 0.0,
        longitude + 0.0,
        blocks.join("\n\n")
    )
}
