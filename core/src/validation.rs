//! Field-level input validation.
//!
//! Validators accumulate every failing field into [`ValidationErrors`]
//! instead of stopping at the first one, so a client can fix a whole form
//! in one round trip.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest count a stored record can hold (a signed 32-bit column).
pub const MAX_COUNT: u32 = i32::MAX.unsigned_abs();

/// A single failed field check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Name of the offending input field, as the client sent it.
    pub field: String,
    /// Human-readable reason.
    pub message: String,
}

/// One or more failed field checks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    /// Empty collector.
    #[must_use]
    pub const fn new() -> Self {
        Self { errors: Vec::new() }
    }

    /// Shorthand for a single failure.
    #[must_use]
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.push(field, message);
        errors
    }

    /// Record a failure.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Record a failure unless `ok` holds.
    pub fn check(&mut self, ok: bool, field: &str, message: impl Into<String>) {
        if !ok {
            self.push(field, message);
        }
    }

    /// Whether no failure was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// Recorded failures, in insertion order.
    #[must_use]
    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    /// Convert into a result: `Ok(())` if nothing failed.
    ///
    /// # Errors
    ///
    /// Returns `self` when at least one failure was recorded.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.as_slice() {
            [] => f.write_str("validation failed"),
            [only] => write!(f, "{}: {}", only.field, only.message),
            many => write!(f, "{} fields failed validation", many.len()),
        }
    }
}

impl std::error::Error for ValidationErrors {}

/// Minimum length, counted in characters after trimming surrounding
/// whitespace.
#[must_use]
pub fn has_min_chars(value: &str, min: usize) -> bool {
    value.trim().chars().count() >= min
}

/// Basic syntactic email check.
///
/// Accepts `local@domain.tld` where the local part is alphanumeric plus
/// `. - + _` and the domain has at least one dot, no empty labels and
/// alphanumeric or hyphen characters only.
///
/// ```
/// use voyage_core::validation::is_valid_email;
///
/// assert!(is_valid_email("traveller@example.com"));
/// assert!(!is_valid_email("traveller@localhost"));
/// ```
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.len() < 3 || email.len() > 254 {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return false;
    }

    let local_ok = local
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '.' | '-' | '+' | '_'));
    if !local_ok || local.starts_with('.') || local.ends_with('.') {
        return false;
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    labels.iter().all(|label| {
        !label.is_empty()
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_alphanumeric() || c == '-')
    })
}

/// A number as sent by a client: a JSON number or a string holding one.
///
/// HTML form fields arrive as strings, so `"2"` and `2` are the same input.
/// Anything that is not a number once parsed is left for the validator to
/// report against its field.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    /// A JSON number.
    Number(serde_json::Number),
    /// A JSON string, parsed on demand.
    Text(String),
}

impl NumericInput {
    /// Whole-number value, if the input is one.
    #[must_use]
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Number(number) => number.as_i64(),
            Self::Text(text) => text.trim().parse().ok(),
        }
    }

    /// Finite decimal value, if the input is one.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Self::Number(number) => number.as_f64(),
            Self::Text(text) => text.trim().parse::<f64>().ok(),
        };
        value.filter(|value| value.is_finite())
    }

    /// Count of at least `min` and at most [`MAX_COUNT`].
    #[must_use]
    pub fn as_count(&self, min: u32) -> Option<u32> {
        self.as_i64()
            .and_then(|value| u32::try_from(value).ok())
            .filter(|value| (min..=MAX_COUNT).contains(value))
    }
}

impl From<i64> for NumericInput {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<f64> for NumericInput {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value).map_or_else(|| Self::Text(value.to_string()), Self::Number)
    }
}

impl From<&str> for NumericInput {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_addresses() {
        assert!(is_valid_email("user@example.com"));
        assert!(is_valid_email("first.last@example.co.uk"));
        assert!(is_valid_email("user+trip@sub.example.com"));
        assert!(is_valid_email("user_name@ex-ample.com"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("plain"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("user@"));
        assert!(!is_valid_email("user@@example.com"));
        assert!(!is_valid_email("user@example"));
        assert!(!is_valid_email("user@.com"));
        assert!(!is_valid_email("user@example..com"));
        assert!(!is_valid_email("user name@example.com"));
        assert!(!is_valid_email(".user@example.com"));
    }

    #[test]
    fn min_chars_ignores_surrounding_whitespace() {
        assert!(has_min_chars("Alice", 5));
        assert!(!has_min_chars("  Al  ", 5));
        assert!(has_min_chars("Zoë B", 5));
    }

    #[test]
    fn collects_every_failure() {
        let mut errors = ValidationErrors::new();
        errors.check(false, "name", "too short");
        errors.check(true, "email", "unused");
        errors.check(false, "password", "too short");

        let err = errors.into_result().unwrap_err();
        let fields: Vec<&str> = err.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["name", "password"]);
        assert_eq!(err.to_string(), "2 fields failed validation");
    }

    #[test]
    fn empty_collector_is_ok() {
        assert!(ValidationErrors::new().into_result().is_ok());
    }

    #[test]
    fn numeric_input_accepts_numbers_and_numeric_strings() {
        let number: NumericInput = serde_json::from_str("2").unwrap();
        let text: NumericInput = serde_json::from_str("\" 2 \"").unwrap();
        assert_eq!(number.as_count(1), Some(2));
        assert_eq!(text.as_count(1), Some(2));

        let rent: NumericInput = serde_json::from_str("\"45.5\"").unwrap();
        assert_eq!(rent.as_f64(), Some(45.5));

        let junk: NumericInput = serde_json::from_str("\"two\"").unwrap();
        assert_eq!(junk.as_i64(), None);
        assert_eq!(junk.as_f64(), None);
        assert_eq!(NumericInput::from("NaN").as_f64(), None);
    }

    #[test]
    fn counts_are_bounded_by_the_storage_column() {
        let max = i64::from(i32::MAX);
        assert_eq!(NumericInput::from(max).as_count(0), Some(MAX_COUNT));
        assert_eq!(NumericInput::from(max + 1).as_count(0), None);
        assert_eq!(NumericInput::from(3_000_000_000_i64).as_count(1), None);
        assert_eq!(NumericInput::from(-1_i64).as_count(0), None);
        assert_eq!(NumericInput::from(0_i64).as_count(1), None);
        assert_eq!(NumericInput::from(2.5).as_count(1), None);
    }
}
