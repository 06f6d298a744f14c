//! HTTP API handlers, one module per route prefix.
//!
//! - `users`: `/api/auth/*`
//! - `car_providers`: `/api/carProviders/*`
//! - `bookings`: `/api/bookings/*`
//! - `hotels`: `/api/hotels/*`
//! - `admin`: `/api/admin/*`

pub mod admin;
pub mod bookings;
pub mod car_providers;
pub mod hotels;
pub mod users;

use crate::workflow::WorkflowError;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use voyage_auth::{AuthError, Authenticated};
use voyage_core::model::StatusChange;
use voyage_core::status::BookingStatus;

/// Handler result; every error renders as the JSON error body.
pub type ApiResult<T> = Result<T, WorkflowError>;

/// Record where a login attempt came from, then pass the outcome through.
fn audit_login<P>(
    kind: &'static str,
    ip: IpAddr,
    user_agent: &str,
    outcome: Result<Authenticated<P>, AuthError>,
) -> Result<Authenticated<P>, AuthError> {
    match &outcome {
        Ok(_) => tracing::info!(kind, %ip, user_agent, "Login succeeded"),
        Err(AuthError::InvalidCredentials) => {
            tracing::warn!(kind, %ip, user_agent, "Login rejected: invalid credentials");
        }
        Err(_) => {}
    }
    outcome
}

// ============================================================================
// Shared Request/Response Types
// ============================================================================

/// Body of the booking status updates.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusRequest {
    /// `pending`, `confirmed` or `canceled`.
    #[serde(default)]
    pub status: String,
}

/// Pending booking listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingResponse<T> {
    /// Always `true`.
    pub success: bool,
    /// Bookings awaiting a decision.
    pub pending_requests: Vec<T>,
}

impl<T> PendingResponse<T> {
    /// Wrap a listing.
    #[must_use]
    pub const fn new(pending_requests: Vec<T>) -> Self {
        Self {
            success: true,
            pending_requests,
        }
    }
}

/// Result of a booking status update.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusUpdateResponse<B> {
    /// Always `true`.
    pub success: bool,
    /// Human-readable outcome.
    pub message: String,
    /// Status before the update.
    pub old_status: BookingStatus,
    /// Status after the update.
    pub new_status: BookingStatus,
    /// Booking as stored.
    pub updated_booking: B,
}

impl<B> StatusUpdateResponse<B> {
    /// Describe a change whose booking now has `new_status`.
    #[must_use]
    pub fn new(change: StatusChange<B>, new_status: BookingStatus) -> Self {
        Self {
            success: true,
            message: format!("Booking {new_status} successfully"),
            old_status: change.previous,
            new_status,
            updated_booking: change.booking,
        }
    }
}
