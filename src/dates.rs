//! Calendar date helpers shared by the classifier, formatters and forms.
//!
//! Dates travel through the crate as ISO strings because the data-fetch layer
//! hands them over untyped. Two parsing flavours exist: the lenient
//! [`parse_iso_date`] folds anything it cannot read into `None`, while
//! [`parse_date`] is meant for trust boundaries and reports the bad input.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::errors::LoanError;

pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

const ISO_DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parses an ISO calendar date, accepting date-time forms and keeping only
/// their calendar date. Returns `None` for anything unreadable.
pub fn parse_iso_date(input: &str) -> Option<NaiveDate> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, ISO_DATE_FORMAT) {
        return Some(date);
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(stamp.date_naive());
    }
    ISO_DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|stamp| stamp.date())
}

/// Strict `YYYY-MM-DD` parsing. Absent input is not an error.
pub fn parse_date(input: Option<&str>) -> Result<Option<NaiveDate>, LoanError> {
    match input {
        None => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, ISO_DATE_FORMAT)
            .map(Some)
            .map_err(|_| LoanError::InvalidDate(raw.to_string())),
    }
}

/// Signed whole days from `from` to `to`; positive when `to` is later.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn lenient_parser_reduces_date_times_to_dates() {
        assert_eq!(parse_iso_date("2024-01-05"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_iso_date("2024-01-05T23:59:00"), Some(ymd(2024, 1, 5)));
        assert_eq!(
            parse_iso_date("2024-01-05T10:00:00+02:00"),
            Some(ymd(2024, 1, 5))
        );
        assert_eq!(parse_iso_date("2024-01-05 23:59:00"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_iso_date("2024-01-05 08:15"), Some(ymd(2024, 1, 5)));
        assert_eq!(parse_iso_date("not-a-date"), None);
        assert_eq!(parse_iso_date("2024-02-30"), None);
        assert_eq!(parse_iso_date(""), None);
    }

    #[test]
    fn strict_parser_reports_input() {
        assert_eq!(parse_date(None).unwrap(), None);
        assert_eq!(
            parse_date(Some("2025-03-10")).unwrap(),
            Some(ymd(2025, 3, 10))
        );
        let err = parse_date(Some("03/10/2025")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid date format. Expected YYYY-MM-DD, got: 03/10/2025"
        );
    }

    #[test]
    fn day_difference_is_signed() {
        assert_eq!(days_between(ymd(2024, 1, 5), ymd(2024, 1, 10)), 5);
        assert_eq!(days_between(ymd(2024, 1, 10), ymd(2024, 1, 5)), -5);
        assert_eq!(days_between(ymd(2024, 2, 28), ymd(2024, 3, 1)), 2);
    }
}
