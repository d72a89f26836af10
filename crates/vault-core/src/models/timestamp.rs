//! Parsing of server timestamps.
//!
//! The API emits RFC 3339 values, zone-less ISO date-times or bare dates
//! depending on the endpoint. Zone-less values are read as wall-clock time in
//! the target zone.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone};

const NAIVE_FORMATS: [&str; 3] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parse a server timestamp into the local time zone.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Local>> {
    parse_timestamp_in(raw, &Local)
}

/// Parse a server timestamp into `tz`.
pub fn parse_timestamp_in<Tz: TimeZone>(raw: &str, tz: &Tz) -> Option<DateTime<Tz>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(zoned) = DateTime::parse_from_rfc3339(raw) {
        return Some(zoned.with_timezone(tz));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })?;

    // Wall-clock times inside a DST gap have no local mapping; read them as UTC.
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| Some(tz.from_utc_datetime(&naive)))
}
