//! Calendar dates carried by bookings.
//!
//! Car bookings reserve a set of individual days; hotel bookings cover an
//! inclusive `start..=end` stay. Both are plain calendar dates with no time
//! zone: two requests collide when they name the same day.

use crate::validation::ValidationErrors;
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// Parse a client-supplied date.
///
/// Accepts ISO `YYYY-MM-DD`. RFC 3339 timestamps are also accepted and
/// truncated to the date written in them.
///
/// # Errors
///
/// Returns a message describing the expected format.
pub fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|ts| ts.date_naive()))
        .map_err(|_| format!("'{raw}' is not a valid date (expected YYYY-MM-DD)"))
}

/// Non-empty, sorted, duplicate-free set of days requested for one vehicle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<NaiveDate>", into = "Vec<NaiveDate>")]
pub struct BookingDates(Vec<NaiveDate>);

impl BookingDates {
    /// Build from already-parsed dates.
    ///
    /// # Errors
    ///
    /// Fails when `dates` is empty.
    pub fn new(mut dates: Vec<NaiveDate>) -> Result<Self, ValidationErrors> {
        if dates.is_empty() {
            return Err(ValidationErrors::single(
                "dates",
                "at least one date is required",
            ));
        }
        dates.sort_unstable();
        dates.dedup();
        Ok(Self(dates))
    }

    /// Parse raw strings, reporting every unparseable entry.
    ///
    /// # Errors
    ///
    /// Fails when the list is empty or any entry is not a date.
    pub fn parse<S: AsRef<str>>(raw: &[S]) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut dates = Vec::with_capacity(raw.len());
        for (index, value) in raw.iter().enumerate() {
            match parse_date(value.as_ref()) {
                Ok(date) => dates.push(date),
                Err(message) => errors.push(format!("dates[{index}]"), message),
            }
        }
        errors.into_result()?;
        Self::new(dates)
    }

    /// The days, ascending.
    #[must_use]
    pub fn as_slice(&self) -> &[NaiveDate] {
        &self.0
    }

    /// Number of distinct days.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Days present in both `self` and `booked`, ascending.
    #[must_use]
    pub fn overlapping(&self, booked: &[NaiveDate]) -> Vec<NaiveDate> {
        self.0
            .iter()
            .copied()
            .filter(|day| booked.contains(day))
            .collect()
    }
}

impl TryFrom<Vec<NaiveDate>> for BookingDates {
    type Error = ValidationErrors;

    fn try_from(dates: Vec<NaiveDate>) -> Result<Self, Self::Error> {
        Self::new(dates)
    }
}

impl From<BookingDates> for Vec<NaiveDate> {
    fn from(dates: BookingDates) -> Self {
        dates.0
    }
}

/// Inclusive hotel stay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StayRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl StayRange {
    /// Build a stay, requiring `start <= end`.
    ///
    /// # Errors
    ///
    /// Fails when the end date precedes the start date.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationErrors> {
        if end < start {
            return Err(ValidationErrors::single(
                "endDate",
                "end date must not be before start date",
            ));
        }
        Ok(Self { start, end })
    }

    /// First night.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the stay.
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn parses_plain_dates_and_timestamps() {
        assert_eq!(parse_date("2025-07-01"), Ok(day("2025-07-01")));
        assert_eq!(parse_date("2025-07-01T00:00:00.000Z"), Ok(day("2025-07-01")));
        assert_eq!(parse_date("2025-07-01T23:30:00+05:30"), Ok(day("2025-07-01")));
        assert!(parse_date("01/07/2025").is_err());
        assert!(parse_date("").is_err());
    }

    #[test]
    fn booking_dates_are_sorted_and_deduplicated() {
        let dates = BookingDates::parse(&["2025-07-03", "2025-07-01", "2025-07-03"]).unwrap();
        assert_eq!(dates.as_slice(), [day("2025-07-01"), day("2025-07-03")]);
        assert_eq!(dates.len(), 2);
    }

    #[test]
    fn empty_booking_dates_are_rejected() {
        let err = BookingDates::parse::<&str>(&[]).unwrap_err();
        assert_eq!(err.errors()[0].field, "dates");
    }

    #[test]
    fn every_bad_entry_is_reported() {
        let err = BookingDates::parse(&["2025-07-01", "soon", "later"]).unwrap_err();
        let fields: Vec<&str> = err.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["dates[1]", "dates[2]"]);
    }

    #[test]
    fn overlapping_uses_exact_day_equality() {
        let dates = BookingDates::parse(&["2025-07-01", "2025-07-02"]).unwrap();
        assert_eq!(
            dates.overlapping(&[day("2025-07-02"), day("2025-07-05")]),
            [day("2025-07-02")]
        );
        assert!(dates.overlapping(&[day("2025-06-30")]).is_empty());
    }

    #[test]
    fn stay_requires_ordered_bounds() {
        assert!(StayRange::new(day("2025-07-01"), day("2025-07-01")).is_ok());
        let err = StayRange::new(day("2025-07-05"), day("2025-07-01")).unwrap_err();
        assert_eq!(err.errors()[0].field, "endDate");
    }
}
