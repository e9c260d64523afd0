//! Conversions for the service's millisecond timestamp strings.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::{CoreError, CoreResult};

/// Parse a base-10 count of milliseconds since the Unix epoch.
///
/// The service encodes instants such as `"1640818767000"` as JSON strings.
///
/// # Errors
/// Returns [`CoreError::InvalidTimestamp`] for non-numeric or out-of-range values.
pub fn parse_unix_millis(value: &str) -> CoreResult<DateTime<Utc>> {
    let millis: i64 = value
        .trim()
        .parse()
        .map_err(|e: std::num::ParseIntError| CoreError::invalid_timestamp(value, e.to_string()))?;

    Utc.timestamp_millis_opt(millis)
        .single()
        .ok_or_else(|| CoreError::invalid_timestamp(value, "out of range"))
}

/// Start and end instants of a status period.
///
/// `since` is the millisecond timestamp the status was entered and
/// `by_minute` the number of minutes spent in it.
///
/// # Errors
/// Returns [`CoreError::InvalidTimestamp`] when `since` cannot be parsed or the
/// end instant overflows.
pub fn status_interval(since: &str, by_minute: i64) -> CoreResult<(DateTime<Utc>, DateTime<Utc>)> {
    let start = parse_unix_millis(since)?;
    let end = Duration::try_minutes(by_minute)
        .and_then(|elapsed| start.checked_add_signed(elapsed))
        .ok_or_else(|| CoreError::invalid_timestamp(since, "elapsed minutes overflow"))?;
    Ok((start, end))
}
