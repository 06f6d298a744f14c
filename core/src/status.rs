//! Booking status and its state machine.
//!
//! ```text
//!            ┌──────────► confirmed
//!   pending ─┤
//!            └──────────► canceled
//! ```
//!
//! `confirmed` and `canceled` are terminal. Requesting the status a booking
//! already has is accepted and changes nothing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Lifecycle state shared by car and hotel bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    /// Awaiting a decision from the inventory owner.
    Pending,
    /// Accepted by the inventory owner.
    Confirmed,
    /// Rejected or withdrawn.
    Canceled,
}

impl BookingStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 3] = [Self::Pending, Self::Confirmed, Self::Canceled];

    /// Lowercase wire and storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Canceled => "canceled",
        }
    }

    /// Whether the booking still holds its inventory (dates stay reserved).
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// Validate a transition and return the resulting status.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] when leaving a terminal status or moving
    /// back to `pending`.
    pub fn transition_to(self, target: Self) -> Result<Self, TransitionError> {
        match (self, target) {
            (from, to) if from == to => Ok(to),
            (Self::Pending, Self::Confirmed | Self::Canceled) => Ok(target),
            (from, to) => Err(TransitionError { from, to }),
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "canceled" => Ok(Self::Canceled),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// A status string that is not one of `pending`, `confirmed`, `canceled`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid status '{0}', expected one of: pending, confirmed, canceled")]
pub struct UnknownStatus(pub String);

/// A transition the state machine does not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("cannot change booking status from {from} to {to}")]
pub struct TransitionError {
    /// Current status.
    pub from: BookingStatus,
    /// Requested status.
    pub to: BookingStatus,
}
