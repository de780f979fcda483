use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serializer;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%B %d, %Y", "%Y/%m/%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parses a frontmatter date.
///
/// Accepts plain dates, RFC 3339 timestamps, naive timestamps
/// and already formatted long dates ("April 19, 2020").
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            DATETIME_FORMATS
                .iter()
                .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
                .map(|dt| dt.date())
        })
}

/// Get day in format: Month day, Year. e.g. April 19, 2020
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Midnight UTC of the date, as used in sitemaps
pub fn format_iso_midnight(date: NaiveDate) -> String {
    format!("{}T00:00:00.000Z", date.format("%Y-%m-%d"))
}

pub fn serialize_long_date<S: Serializer>(
    date: &Option<NaiveDate>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match date {
        Some(date) => serializer.serialize_str(&format_long_date(*date)),
        None => serializer.serialize_none(),
    }
}
