//! Hotel booking workflow: travellers request rooms for a stay, hotels
//! confirm or cancel.
//!
//! Requests are not checked against the hotel's room availability.

use super::WorkflowResult;
use serde::Deserialize;
use std::sync::Arc;
use voyage_core::dates::{StayRange, parse_date};
use voyage_core::environment::Clock;
use voyage_core::ids::{HotelBookingId, HotelId, UserId};
use voyage_core::model::{
    BookingFilter, HotelBooking, HotelBookingWithGuest, NewHotelBooking, StatusChange,
};
use voyage_core::status::BookingStatus;
use voyage_core::store::{BookingLedger, CredentialStore, StoreError};
use voyage_core::validation::{MAX_COUNT, NumericInput, ValidationErrors};

/// Body of `POST /api/hotels/bookRooms`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelBookingRequest {
    /// Hotel to book.
    #[serde(default)]
    pub hotel_id: Option<String>,
    /// First night.
    #[serde(default)]
    pub start_date: Option<String>,
    /// Last day, inclusive.
    #[serde(default)]
    pub end_date: Option<String>,
    /// Rooms wanted.
    #[serde(default, alias = "rooms")]
    pub num_rooms: Option<NumericInput>,
}

/// A validated hotel booking request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayRequest {
    /// Hotel to book.
    pub hotel_id: HotelId,
    /// Stay.
    pub stay: StayRange,
    /// Rooms wanted, at least one.
    pub rooms: u32,
}

fn required<'a>(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&'a str>,
) -> Option<&'a str> {
    match value.map(str::trim) {
        Some(raw) if !raw.is_empty() => Some(raw),
        _ => {
            errors.push(field, format!("{field} is required"));
            None
        }
    }
}

fn date_field(
    errors: &mut ValidationErrors,
    field: &str,
    value: Option<&str>,
) -> Option<chrono::NaiveDate> {
    let raw = required(errors, field, value)?;
    parse_date(raw)
        .map_err(|message| errors.push(field, message))
        .ok()
}

impl HotelBookingRequest {
    /// Check every field, reporting all failures.
    ///
    /// # Errors
    ///
    /// Missing fields, a malformed id or date, an end date before the start
    /// date or fewer than one room.
    pub fn validate(&self) -> Result<StayRequest, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let hotel_id = required(&mut errors, "hotelId", self.hotel_id.as_deref()).and_then(|raw| {
            raw.parse::<HotelId>()
                .map_err(|_| errors.push("hotelId", format!("{raw} is not a valid id")))
                .ok()
        });
        let start = date_field(&mut errors, "startDate", self.start_date.as_deref());
        let end = date_field(&mut errors, "endDate", self.end_date.as_deref());

        let rooms = match self.num_rooms.as_ref().map(|rooms| rooms.as_count(1)) {
            None => {
                errors.push("numRooms", "numRooms is required");
                None
            }
            Some(Some(rooms)) => Some(rooms),
            Some(None) => {
                errors.push(
                    "numRooms",
                    format!("numRooms must be a number between 1 and {MAX_COUNT}"),
                );
                None
            }
        };

        let stay = match (start, end) {
            (Some(start), Some(end)) => StayRange::new(start, end)
                .map_err(|failed| {
                    for error in failed.errors() {
                        errors.push(error.field.clone(), error.message.clone());
                    }
                })
                .ok(),
            _ => None,
        };

        match (hotel_id, stay, rooms) {
            (Some(hotel_id), Some(stay), Some(rooms)) if errors.is_empty() => Ok(StayRequest {
                hotel_id,
                stay,
                rooms,
            }),
            _ => Err(errors),
        }
    }
}

/// Hotel booking operations.
#[derive(Clone)]
pub struct HotelBookings {
    ledger: Arc<dyn BookingLedger>,
    accounts: Arc<dyn CredentialStore>,
    clock: Arc<dyn Clock>,
}

impl HotelBookings {
    /// Create the service.
    #[must_use]
    pub fn new(
        ledger: Arc<dyn BookingLedger>,
        accounts: Arc<dyn CredentialStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            ledger,
            accounts,
            clock,
        }
    }

    /// Request rooms at a hotel. The booking starts out `pending`.
    ///
    /// # Errors
    ///
    /// Validation failures and `NotFound` for an unknown hotel.
    #[tracing::instrument(skip_all, fields(user_id = %user_id))]
    pub async fn create(
        &self,
        user_id: UserId,
        request: &HotelBookingRequest,
    ) -> WorkflowResult<HotelBooking> {
        let StayRequest {
            hotel_id,
            stay,
            rooms,
        } = request.validate()?;

        if self.accounts.get_hotel(hotel_id).await?.is_none() {
            tracing::warn!(hotel_id = %hotel_id, "Hotel booking for unknown hotel");
            return Err(StoreError::not_found("Hotel", hotel_id).into());
        }

        let booking = self
            .ledger
            .create_hotel_booking(NewHotelBooking {
                user_id,
                hotel_id,
                stay,
                rooms,
                created_at: self.clock.now(),
            })
            .await?;

        tracing::info!(
            booking_id = %booking.id,
            hotel_id = %hotel_id,
            rooms,
            "Hotel booking requested"
        );
        Ok(booking)
    }

    /// The hotel's bookings awaiting a decision, most recent first.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    pub async fn pending(&self, hotel_id: HotelId) -> WorkflowResult<Vec<HotelBookingWithGuest>> {
        Ok(self
            .ledger
            .list_hotel_bookings_for_hotel(hotel_id, BookingFilter::Pending)
            .await?)
    }

    /// Every booking of the hotel, latest stay first.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    pub async fn history(&self, hotel_id: HotelId) -> WorkflowResult<Vec<HotelBookingWithGuest>> {
        Ok(self
            .ledger
            .list_hotel_bookings_for_hotel(hotel_id, BookingFilter::All)
            .await?)
    }

    /// Move one of the hotel's bookings to the requested status.
    ///
    /// # Errors
    ///
    /// A validation error for an unknown status, `NotFound`, `NotOwner` for
    /// another hotel's booking and `InvalidTransition` for a decided booking.
    #[tracing::instrument(skip_all, fields(hotel_id = %hotel_id, booking_id = %booking_id))]
    pub async fn update_status(
        &self,
        hotel_id: HotelId,
        booking_id: HotelBookingId,
        status: &str,
    ) -> WorkflowResult<StatusChange<HotelBooking>> {
        let status: BookingStatus = status.trim().parse()?;

        match self
            .ledger
            .set_hotel_booking_status(booking_id, hotel_id, status)
            .await
        {
            Ok(change) => {
                tracing::info!(
                    from = %change.previous,
                    to = %change.booking.status,
                    "Hotel booking status updated"
                );
                Ok(change)
            }
            Err(err) => {
                tracing::warn!(error = %err, requested = %status, "Hotel booking status update rejected");
                Err(err.into())
            }
        }
    }

    /// The traveller's own hotel bookings, most recent first.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    pub async fn for_user(&self, user_id: UserId) -> WorkflowResult<Vec<HotelBooking>> {
        Ok(self.ledger.list_hotel_bookings_for_user(user_id).await?)
    }
}
