//! Epoch-millisecond helpers. All dates are UTC.

use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};

pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Parse `yyyy-MM-dd` into epoch milliseconds at UTC midnight.
#[must_use]
pub fn parse_date(value: &str) -> Option<i64> {
    let format = format_description!("[year]-[month]-[day]");
    let date = Date::parse(value, &format).ok()?;
    let midnight = PrimitiveDateTime::new(date, Time::MIDNIGHT).assume_utc();
    Some(midnight.unix_timestamp() * 1000)
}

fn to_datetime(millis: i64) -> Option<OffsetDateTime> {
    OffsetDateTime::from_unix_timestamp_nanos(i128::from(millis) * 1_000_000).ok()
}

/// `yyyy-MM-dd` of an epoch-millisecond timestamp.
#[must_use]
pub fn format_date(millis: i64) -> String {
    let format = format_description!("[year]-[month]-[day]");
    to_datetime(millis)
        .and_then(|dt| dt.format(&format).ok())
        .unwrap_or_else(|| millis.to_string())
}

/// `yyyy-MM-dd HH:mm:ss UTC` of an epoch-millisecond timestamp.
#[must_use]
pub fn format_date_time(millis: i64) -> String {
    let format = format_description!("[year]-[month]-[day] [hour]:[minute]:[second] UTC");
    to_datetime(millis)
        .and_then(|dt| dt.format(&format).ok())
        .unwrap_or_else(|| millis.to_string())
}
