//! Records persisted by the stores and the read views built from them.
//!
//! Profile types ([`User`], [`CarProvider`], [`Hotel`]) never carry the
//! password hash. The hash only travels inside [`Credentials`] on the login
//! path.

use crate::dates::{BookingDates, StayRange};
use crate::ids::{CarBookingId, CarProviderId, HotelBookingId, HotelId, UserId, VehicleId};
use crate::status::BookingStatus;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Traveller account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Identifier.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Login email, unique among users.
    pub email: String,
    /// Contact number.
    pub phone: String,
    /// Saved trip plan, opaque to the service.
    pub plan: Option<serde_json::Value>,
    /// Signup time.
    pub created_at: DateTime<Utc>,
}

/// Car rental provider account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarProvider {
    /// Identifier.
    pub id: CarProviderId,
    /// Business name.
    pub name: String,
    /// Login email, unique among car providers.
    pub email: String,
    /// Contact number.
    pub phone: String,
    /// Signup time.
    pub created_at: DateTime<Utc>,
}

/// Hotel account. A hotel is both a principal and an inventory owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hotel {
    /// Identifier.
    pub id: HotelId,
    /// Hotel name.
    pub name: String,
    /// Login email, unique among hotels.
    pub email: String,
    /// Contact number.
    pub phone: String,
    /// Relative path of the hotel picture under the uploads directory.
    pub image: Option<String>,
    /// City or area.
    pub location: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Total number of rooms.
    pub rooms: u32,
    /// Nightly rent per room.
    pub rent: f64,
    /// Signup time.
    pub created_at: DateTime<Utc>,
}

/// Input for [`CredentialStore::create_user`](crate::CredentialStore::create_user).
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Contact number.
    pub phone: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    /// Signup time.
    pub created_at: DateTime<Utc>,
}

/// Input for creating a car provider account.
#[derive(Debug, Clone)]
pub struct NewCarProvider {
    /// Business name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Contact number.
    pub phone: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    /// Signup time.
    pub created_at: DateTime<Utc>,
}

/// Input for creating a hotel account.
#[derive(Debug, Clone)]
pub struct NewHotel {
    /// Hotel name.
    pub name: String,
    /// Login email.
    pub email: String,
    /// Contact number.
    pub phone: String,
    /// Argon2 PHC string.
    pub password_hash: String,
    /// Relative picture path.
    pub image: Option<String>,
    /// City or area.
    pub location: Option<String>,
    /// Street address.
    pub address: Option<String>,
    /// Total number of rooms.
    pub rooms: u32,
    /// Nightly rent per room.
    pub rent: f64,
    /// Signup time.
    pub created_at: DateTime<Utc>,
}

/// A stored principal together with its password hash.
#[derive(Debug, Clone)]
pub struct Credentials<P> {
    /// Profile.
    pub principal: P,
    /// Argon2 PHC string.
    pub password_hash: String,
}

/// Vehicle listed by a car provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vehicle {
    /// Identifier.
    pub id: VehicleId,
    /// Owning provider.
    pub provider_id: CarProviderId,
    /// Make and model.
    pub model: String,
    /// Daily rent.
    pub rent: f64,
    /// Licence plate.
    pub registration_number: String,
    /// Relative picture path, possibly empty.
    pub image: String,
    /// Days held by pending or confirmed bookings, ascending.
    pub booked_dates: Vec<NaiveDate>,
    /// Listing time.
    pub created_at: DateTime<Utc>,
}

/// Input for [`InventoryStore::add_vehicle`](crate::InventoryStore::add_vehicle).
#[derive(Debug, Clone)]
pub struct NewVehicle {
    /// Make and model.
    pub model: String,
    /// Daily rent.
    pub rent: f64,
    /// Licence plate.
    pub registration_number: String,
    /// Relative picture path, possibly empty.
    pub image: String,
    /// Listing time.
    pub created_at: DateTime<Utc>,
}

/// Rooms a hotel offers on one date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomAvailability {
    /// Hotel.
    pub hotel_id: HotelId,
    /// Calendar date.
    pub date: NaiveDate,
    /// Rooms offered that night.
    pub available_rooms: u32,
}

/// Reservation of a vehicle for a set of days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarBooking {
    /// Identifier.
    pub id: CarBookingId,
    /// Requesting traveller.
    pub user_id: UserId,
    /// Reserved vehicle.
    pub vehicle_id: VehicleId,
    /// Owner of the vehicle at booking time.
    pub provider_id: CarProviderId,
    /// Reserved days, ascending.
    pub dates: Vec<NaiveDate>,
    /// Lifecycle state.
    pub status: BookingStatus,
    /// Request time.
    pub created_at: DateTime<Utc>,
}

/// Input for [`BookingLedger::reserve_vehicle`](crate::BookingLedger::reserve_vehicle).
#[derive(Debug, Clone)]
pub struct NewCarBooking {
    /// Requesting traveller.
    pub user_id: UserId,
    /// Vehicle to reserve.
    pub vehicle_id: VehicleId,
    /// Days to reserve.
    pub dates: BookingDates,
    /// Request time.
    pub created_at: DateTime<Utc>,
}

/// Reservation of hotel rooms for a stay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelBooking {
    /// Identifier.
    pub id: HotelBookingId,
    /// Requesting traveller.
    pub user_id: UserId,
    /// Hotel.
    pub hotel_id: HotelId,
    /// First night.
    pub start_date: NaiveDate,
    /// Last day, inclusive.
    pub end_date: NaiveDate,
    /// Number of rooms.
    pub rooms: u32,
    /// Lifecycle state.
    pub status: BookingStatus,
    /// Request time.
    pub created_at: DateTime<Utc>,
}

/// Input for [`BookingLedger::create_hotel_booking`](crate::BookingLedger::create_hotel_booking).
#[derive(Debug, Clone)]
pub struct NewHotelBooking {
    /// Requesting traveller.
    pub user_id: UserId,
    /// Hotel.
    pub hotel_id: HotelId,
    /// Stay.
    pub stay: StayRange,
    /// Number of rooms, at least one.
    pub rooms: u32,
    /// Request time.
    pub created_at: DateTime<Utc>,
}

/// Which bookings an owner listing returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingFilter {
    /// Only bookings awaiting a decision.
    Pending,
    /// Every booking regardless of status.
    All,
}

impl BookingFilter {
    /// Whether a booking with `status` passes the filter.
    #[must_use]
    pub fn matches(self, status: BookingStatus) -> bool {
        match self {
            Self::Pending => status == BookingStatus::Pending,
            Self::All => true,
        }
    }

    /// Status to filter on in a query, `None` for every status.
    #[must_use]
    pub const fn status(self) -> Option<BookingStatus> {
        match self {
            Self::Pending => Some(BookingStatus::Pending),
            Self::All => None,
        }
    }
}

/// The traveller behind a booking, as shown to inventory owners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingParty {
    /// Traveller id.
    pub id: UserId,
    /// Traveller name.
    pub name: String,
    /// Traveller email.
    pub email: String,
}

/// Vehicle details copied into booking listings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleSnapshot {
    /// Make and model.
    pub model: String,
    /// Daily rent.
    pub rent: f64,
    /// Licence plate.
    pub registration_number: String,
    /// Relative picture path.
    pub image: String,
}

impl From<&Vehicle> for VehicleSnapshot {
    fn from(vehicle: &Vehicle) -> Self {
        Self {
            model: vehicle.model.clone(),
            rent: vehicle.rent,
            registration_number: vehicle.registration_number.clone(),
            image: vehicle.image.clone(),
        }
    }
}

/// How a traveller reaches the provider of a booked car.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderContact {
    /// Provider id.
    pub id: CarProviderId,
    /// Provider name.
    pub name: String,
    /// Provider email.
    pub email: String,
    /// Provider phone.
    pub phone: String,
}

/// Car booking as listed to its provider.
///
/// `vehicle` is `None` once the vehicle has been removed from the catalogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderCarBooking {
    /// The booking.
    #[serde(flatten)]
    pub booking: CarBooking,
    /// Who asked for it.
    pub user: BookingParty,
    /// What was booked.
    pub vehicle: Option<VehicleSnapshot>,
}

/// Car booking as listed to the traveller who made it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserCarBooking {
    /// The booking.
    #[serde(flatten)]
    pub booking: CarBooking,
    /// What was booked.
    pub vehicle: Option<VehicleSnapshot>,
    /// Who to call about it.
    pub provider: ProviderContact,
}

/// Hotel booking as listed to its hotel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotelBookingWithGuest {
    /// The booking.
    #[serde(flatten)]
    pub booking: HotelBooking,
    /// Who asked for it.
    pub user: BookingParty,
}

/// Result of a status update: the status before and the booking after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange<B> {
    /// Status the booking had before the update.
    pub previous: BookingStatus,
    /// Booking as stored after the update.
    pub booking: B,
}
