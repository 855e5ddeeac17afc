/*
Calendar-day offsets relative to an anchor date.
All scheduling is at day granularity, so this module only ever sees NaiveDate.
*/

use chrono::{Days, NaiveDate};

use crate::error::AppError;

pub const ISO_FORMAT: &str = "%Y-%m-%d";

// Number of calendar days by which `date` precedes `anchor`.
//     earlier than anchor -> positive
//     equal               -> 0
//     later than anchor   -> negative
pub fn to_offset(anchor: NaiveDate, date: NaiveDate) -> i64 {
    anchor.signed_duration_since(date).num_days()
}

// The calendar date `offset` days before `anchor`.
// Negative offsets move forward. None only when the result leaves chrono's range.
pub fn from_offset(anchor: NaiveDate, offset: i64) -> Option<NaiveDate> {
    let days = Days::new(offset.unsigned_abs());
    if offset >= 0 {
        anchor.checked_sub_days(days)
    } else {
        anchor.checked_add_days(days)
    }
}

/// Parse a `YYYY-MM-DD` string, naming the offending field on failure.
pub fn parse_iso(field: &'static str, value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value.trim(), ISO_FORMAT)
        .map_err(|_| AppError::validation(field, format!("invalid date '{value}', expected YYYY-MM-DD")))
}

pub fn format_iso(date: NaiveDate) -> String {
    date.format(ISO_FORMAT).to_string()
}

// Replay an offset against an anchor, reporting overflow as a validation error.
pub fn replay(field: &'static str, anchor: NaiveDate, offset: i64) -> Result<NaiveDate, AppError> {
    from_offset(anchor, offset).ok_or_else(|| {
        AppError::validation(field, format!("{offset} days before {} is out of range", format_iso(anchor)))
    })
}
