//! Plain-text rendering of a forecast report

use crate::data::{CurrentWeather, DailySeries, Units};
use crate::service::Report;

const TABLE_HEADER: &str = "Date        MaxT  MinT  Wind  Precip";
const TABLE_RULE: &str = "-------------------------------------";

/// Formats an optional value right-aligned in `width` columns, `-` when missing
fn cell(value: Option<f64>, width: usize, precision: usize) -> String {
    match value {
        Some(v) => format!("{:>width$.precision$}", v),
        None => format!("{:>width$}", "-"),
    }
}

/// Formats an optional reading, `?` when missing
///
/// Whole numbers keep their decimal point (`12.0`, not `12`).
fn reading(value: Option<f64>) -> String {
    value.map_or_else(|| "?".to_string(), |v| format!("{:?}", v))
}

/// The "Now:" line for current conditions
pub fn current_line(current: &CurrentWeather, units: Units) -> String {
    format!(
        "Now: {} {}, wind {} {}",
        reading(current.temperature),
        units.temperature_label(),
        reading(current.windspeed),
        units.windspeed_label()
    )
}

/// Units legend printed under the table
pub fn legend(units: Units) -> String {
    format!(
        "(Temps {}, wind {}, precip {})",
        units.temperature_label(),
        units.windspeed_label(),
        units.precipitation_label()
    )
}

/// The daily table with header, rule, one row per day and the legend
pub fn format_table(daily: &DailySeries, units: Units) -> String {
    let mut rows = vec![TABLE_HEADER.to_string(), TABLE_RULE.to_string()];
    rows.extend(daily.rows().map(|row| {
        format!(
            "{}  {}  {}  {}  {}",
            row.date,
            cell(row.temperature_max, 4, 0),
            cell(row.temperature_min, 4, 0),
            cell(row.windspeed_max, 4, 0),
            cell(row.precipitation, 5, 2)
        )
    }));
    rows.push(legend(units));
    rows.join("\n")
}

/// Renders the complete report: place, current conditions, daily table
pub fn render(report: &Report) -> String {
    let mut out = vec![report.place.name.clone()];
    if let Some(current) = &report.forecast.current_weather {
        out.push(current_line(current, report.units));
    }
    out.push(format_table(&report.forecast.daily, report.units));
    out.join("\n")
}
