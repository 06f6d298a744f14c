//! Signup and login payloads.
//!
//! Field names follow the public API (`phn` for the phone number, `phone` is
//! accepted as an alias). Validation reports every failing field at once.

use serde::Deserialize;
use voyage_core::validation::{
    MAX_COUNT, NumericInput, ValidationErrors, has_min_chars, is_valid_email,
};

const MIN_NAME_CHARS: usize = 5;
const MIN_PASSWORD_CHARS: usize = 5;
const MIN_PHONE_CHARS: usize = 10;

/// Normalized form used for storage and lookup.
#[must_use]
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn check_common(errors: &mut ValidationErrors, name: &str, email: &str, password: &str, phone: &str) {
    errors.check(
        has_min_chars(name, MIN_NAME_CHARS),
        "name",
        "Enter a valid name",
    );
    errors.check(is_valid_email(email.trim()), "email", "Enter a valid email");
    errors.check(
        password.chars().count() >= MIN_PASSWORD_CHARS,
        "password",
        "Password must contain at least 5 characters",
    );
    errors.check(
        has_min_chars(phone, MIN_PHONE_CHARS),
        "phn",
        "Enter a valid phone number",
    );
}

/// Traveller signup.
#[derive(Debug, Clone, Deserialize)]
pub struct UserSignup {
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Login email.
    #[serde(default)]
    pub email: String,
    /// Plaintext password.
    #[serde(default)]
    pub password: String,
    /// Contact number.
    #[serde(default, rename = "phn", alias = "phone")]
    pub phone: String,
}

impl UserSignup {
    /// Check every field.
    ///
    /// # Errors
    ///
    /// Lists each failing field.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_common(&mut errors, &self.name, &self.email, &self.password, &self.phone);
        errors.into_result()
    }
}

/// Car provider signup.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSignup {
    /// Business name.
    #[serde(default)]
    pub name: String,
    /// Login email.
    #[serde(default)]
    pub email: String,
    /// Plaintext password.
    #[serde(default)]
    pub password: String,
    /// Contact number.
    #[serde(default, rename = "phn", alias = "phone")]
    pub phone: String,
}

impl ProviderSignup {
    /// Check every field.
    ///
    /// # Errors
    ///
    /// Lists each failing field.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_common(&mut errors, &self.name, &self.email, &self.password, &self.phone);
        errors.into_result()
    }
}

/// Hotel signup.
#[derive(Debug, Clone, Deserialize)]
pub struct HotelSignup {
    /// Hotel name.
    #[serde(default)]
    pub name: String,
    /// Login email.
    #[serde(default)]
    pub email: String,
    /// Plaintext password.
    #[serde(default)]
    pub password: String,
    /// Contact number.
    #[serde(default, rename = "phn", alias = "phone")]
    pub phone: String,
    /// Relative path of an already uploaded picture.
    #[serde(default)]
    pub image: Option<String>,
    /// City or area.
    #[serde(default)]
    pub location: Option<String>,
    /// Street address.
    #[serde(default)]
    pub address: Option<String>,
    /// Total rooms.
    #[serde(default)]
    pub rooms: Option<NumericInput>,
    /// Nightly rent per room.
    #[serde(default)]
    pub rent: Option<NumericInput>,
}

impl HotelSignup {
    /// Check every field, returning the room count and rent on success.
    ///
    /// # Errors
    ///
    /// Lists each failing field.
    pub fn validate(&self) -> Result<(u32, f64), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        check_common(&mut errors, &self.name, &self.email, &self.password, &self.phone);

        let rooms = self.rooms.as_ref().and_then(|rooms| rooms.as_count(1));
        errors.check(
            rooms.is_some(),
            "rooms",
            format!("Rooms must be a number between 1 and {MAX_COUNT}"),
        );

        let rent = self
            .rent
            .as_ref()
            .and_then(NumericInput::as_f64)
            .filter(|rent| *rent >= 0.0);
        errors.check(rent.is_some(), "rent", "Rent must be a non-negative number");

        errors.into_result()?;
        match (rooms, rent) {
            (Some(rooms), Some(rent)) => Ok((rooms, rent)),
            _ => Err(ValidationErrors::single("rooms", "Rooms must be a number")),
        }
    }
}

/// Email and password login, shared by all principal kinds.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Login email.
    #[serde(default)]
    pub email: String,
    /// Plaintext password.
    #[serde(default)]
    pub password: String,
}

impl LoginRequest {
    /// Check the email shape and that a password is present.
    ///
    /// # Errors
    ///
    /// Lists each failing field.
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(is_valid_email(self.email.trim()), "email", "Enter a valid email");
        errors.check(!self.password.is_empty(), "password", "Password cannot be blank");
        errors.into_result()
    }
}
