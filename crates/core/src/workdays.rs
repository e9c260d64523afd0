//! Business-day arithmetic for status durations.
//!
//! Days are numbered ISO-style, Monday first. Both ends of an interval are
//! aligned to the Monday of their week; whole weeks between the two Mondays
//! contribute five days each and the position inside each week corrects the
//! total. Saturday and Sunday sit at the end of the week, so their offset is
//! clamped to five.
//!
//! The count covers the half-open date range `[start, end)`: the start date is
//! included when it is a weekday and the end date never is.

use chrono::{DateTime, Datelike, NaiveDate, TimeZone};

/// Weekdays in a calendar week.
pub const BUSINESS_DAYS_PER_WEEK: i64 = 5;

/// Business days between two instants, using each instant's calendar date in
/// its own timezone.
///
/// Returns 0 for instants on the same date and a negative count when `end`
/// precedes `start`.
pub fn business_days_between<Tz: TimeZone>(start: &DateTime<Tz>, end: &DateTime<Tz>) -> i64 {
    business_days_between_dates(start.date_naive(), end.date_naive())
}

/// Business days in the date range `[start, end)`.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use clickup_core::business_days_between_dates;
///
/// let monday = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// let friday = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
/// assert_eq!(business_days_between_dates(monday, friday), 4);
/// ```
#[must_use]
pub fn business_days_between_dates(start: NaiveDate, end: NaiveDate) -> i64 {
    let start_offset = weekday_offset(start);
    let end_offset = weekday_offset(end);

    // Distance between the two aligned Mondays is always a whole number of weeks.
    let aligned_days = (end - start).num_days() - end_offset + start_offset;
    let weeks = aligned_days / 7;

    weeks * BUSINESS_DAYS_PER_WEEK + end_offset.min(BUSINESS_DAYS_PER_WEEK)
        - start_offset.min(BUSINESS_DAYS_PER_WEEK)
}

/// Days since the Monday of `date`'s week (Monday 0, Sunday 6).
fn weekday_offset(date: NaiveDate) -> i64 {
    i64::from(date.weekday().num_days_from_monday())
}
