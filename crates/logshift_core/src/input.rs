//! Boundary parsing for user-supplied values.
//!
//! # Responsibility
//! - Turn raw prompt text into typed dates and hours before the tracker
//!   is called.
//!
//! # Invariants
//! - Accepted hours are finite and `>= 0`.
//! - Accepted dates have the `YYYY-MM-DD` shape.

use chrono::{NaiveDate, Weekday};
use std::error::Error;
use std::fmt::{Display, Formatter};

const DATE_FORMAT: &str = "%Y-%m-%d";
const DATE_TEXT_LEN: usize = 10;

/// Rejected user input.
#[derive(Debug, Clone, PartialEq)]
pub enum InputError {
    InvalidDate(String),
    InvalidHours(String),
    NegativeHours(f64),
}

impl Display for InputError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidDate(raw) => write!(f, "invalid date `{raw}`; expected YYYY-MM-DD"),
            Self::InvalidHours(raw) => write!(f, "invalid hours `{raw}`; expected a decimal number"),
            Self::NegativeHours(value) => write!(f, "hours cannot be negative, got {value}"),
        }
    }
}

impl Error for InputError {}

/// Parses a `YYYY-MM-DD` calendar date; surrounding whitespace is ignored.
pub fn parse_date(raw: &str) -> Result<NaiveDate, InputError> {
    let trimmed = raw.trim();
    if trimmed.len() != DATE_TEXT_LEN {
        return Err(InputError::InvalidDate(trimmed.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| InputError::InvalidDate(trimmed.to_string()))
}

/// Parses hours worked using `.` as decimal separator.
pub fn parse_hours(raw: &str) -> Result<f64, InputError> {
    let trimmed = raw.trim();
    let hours = trimmed
        .parse::<f64>()
        .map_err(|_| InputError::InvalidHours(trimmed.to_string()))?;
    if !hours.is_finite() {
        return Err(InputError::InvalidHours(trimmed.to_string()));
    }
    if hours < 0.0 {
        return Err(InputError::NegativeHours(hours));
    }
    // -0.0 parses as non-negative.
    Ok(hours.abs())
}

/// Monday..Sunday of the ISO week containing `date`.
pub fn week_bounds(date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let week = date.week(Weekday::Mon);
    (week.first_day(), week.last_day())
}

#[cfg(test)]
mod tests {
    use super::{parse_date, parse_hours, week_bounds, InputError};
    use chrono::NaiveDate;

    #[test]
    fn parse_date_accepts_iso_dates_with_whitespace() {
        assert_eq!(
            parse_date(" 2024-01-10\n").unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 10).unwrap()
        );
    }

    #[test]
    fn parse_date_rejects_other_shapes() {
        for raw in ["2024-1-10", "10.01.2024", "2024-02-30", "", "yesterday"] {
            assert!(
                matches!(parse_date(raw), Err(InputError::InvalidDate(_))),
                "{raw} should be rejected"
            );
        }
    }

    #[test]
    fn parse_hours_accepts_decimals_and_zero() {
        assert_eq!(parse_hours("3.25").unwrap(), 3.25);
        assert_eq!(parse_hours(" 8 ").unwrap(), 8.0);
        assert_eq!(parse_hours("-0").unwrap(), 0.0);
    }

    #[test]
    fn parse_hours_rejects_negative_and_non_numeric() {
        assert_eq!(parse_hours("-1"), Err(InputError::NegativeHours(-1.0)));
        assert!(matches!(parse_hours("3,5"), Err(InputError::InvalidHours(_))));
        assert!(matches!(parse_hours("NaN"), Err(InputError::InvalidHours(_))));
        assert!(matches!(parse_hours("inf"), Err(InputError::InvalidHours(_))));
    }

    #[test]
    fn week_bounds_span_monday_to_sunday() {
        // 2024-01-10 is a Wednesday.
        let (start, end) = week_bounds(NaiveDate::from_ymd_opt(2024, 1, 10).unwrap());
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 1, 8).unwrap());
        assert_eq!(end, NaiveDate::from_ymd_opt(2024, 1, 14).unwrap());

        let sunday = NaiveDate::from_ymd_opt(2024, 1, 14).unwrap();
        assert_eq!(week_bounds(sunday).0, start);
    }
}
