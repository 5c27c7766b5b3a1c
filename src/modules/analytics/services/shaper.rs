//! Pure shaping of raw batch-report rows into dashboard structures.
//!
//! Rows arrive position-encoded; every function here takes the ordinal it
//! cares about and returns named structures, so nothing downstream ever
//! indexes raw rows. Shaping is deterministic: the same raw result always
//! yields the same output, and no clock is read here.

use crate::modules::analytics::models::{
    CategoryCount, Kpi, PageCount, ReportResult, TimeSeriesPoint,
};

/// Dimension value the reporting API emits when a dimension was not captured
const NOT_SET_SENTINEL: &str = "(not set)";

/// Label substituted for malformed report dates so the row stays renderable
const INVALID_DATE_LABEL: &str = "Invalid Date";

/// Period-over-period percentage change
///
/// Defined at the zero boundaries so a dashboard card never divides by zero:
/// both periods zero means no movement (0), growth from nothing is +100.
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        if current > 0.0 {
            100.0
        } else {
            0.0
        }
    } else {
        ((current - previous) / previous) * 100.0
    }
}

/// Extract one KPI from a two-date-range report
///
/// Row 0 carries the current period, row 1 the previous one. Missing rows or
/// unparseable values read as 0 ("no data"), never as an error.
pub fn extract_kpi(report: &ReportResult, metric_index: usize) -> Kpi {
    let current = metric_value(report, 0, metric_index);
    let previous = metric_value(report, 1, metric_index);

    Kpi {
        value: current,
        change: percent_change(current, previous),
    }
}

/// Extract a per-date series, ordered by date ascending
///
/// The first dimension of each row is an 8-digit `YYYYMMDD` date; rows are
/// sorted on that raw value (lexicographic order is chronological order for
/// this format) before being labeled.
pub fn extract_time_series(report: &ReportResult, metric_index: usize) -> Vec<TimeSeriesPoint> {
    let mut rows: Vec<(&str, f64)> = report
        .rows
        .iter()
        .map(|row| {
            (
                row.dimension_values.first().map(String::as_str).unwrap_or(""),
                parse_metric(row.metric_values.get(metric_index)),
            )
        })
        .collect();
    rows.sort_by(|a, b| a.0.cmp(b.0));

    rows.into_iter()
        .map(|(raw_date, value)| TimeSeriesPoint {
            date: format_report_date(raw_date),
            value,
        })
        .collect()
}

/// Extract a category breakdown in the rows' existing order
///
/// The API already ordered rows per the request; rows whose dimension was
/// never captured ("(not set)") are dropped.
pub fn extract_categories(report: &ReportResult) -> Vec<CategoryCount> {
    report
        .rows
        .iter()
        .filter_map(|row| {
            let name = row.dimension_values.first()?;
            if name == NOT_SET_SENTINEL {
                return None;
            }
            Some(CategoryCount {
                name: name.clone(),
                value: parse_metric(row.metric_values.first()),
            })
        })
        .collect()
}

/// Extract the ranked top-pages table in the rows' existing order
pub fn extract_pages(report: &ReportResult) -> Vec<PageCount> {
    report
        .rows
        .iter()
        .filter_map(|row| {
            let path = row.dimension_values.first()?;
            if path == NOT_SET_SENTINEL {
                return None;
            }
            Some(PageCount {
                path: path.clone(),
                views: parse_metric(row.metric_values.first()),
            })
        })
        .collect()
}

/// Format an 8-digit `YYYYMMDD` report date as a short month/day label
///
/// Anything that is not exactly 8 characters, or does not parse as a date,
/// becomes the "Invalid Date" sentinel instead of failing the response.
pub fn format_report_date(raw: &str) -> String {
    if raw.len() != 8 {
        return INVALID_DATE_LABEL.to_string();
    }

    match chrono::NaiveDate::parse_from_str(raw, "%Y%m%d") {
        Ok(date) => date.format("%b %-d").to_string(),
        Err(_) => INVALID_DATE_LABEL.to_string(),
    }
}

fn metric_value(report: &ReportResult, row_index: usize, metric_index: usize) -> f64 {
    report
        .rows
        .get(row_index)
        .map(|row| parse_metric(row.metric_values.get(metric_index)))
        .unwrap_or(0.0)
}

fn parse_metric(value: Option<&String>) -> f64 {
    value.and_then(|v| v.parse::<f64>().ok()).unwrap_or(0.0)
}
