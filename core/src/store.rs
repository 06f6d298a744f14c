//! Repository traits and their error type.
//!
//! Three traits split persistence by concern:
//!
//! - [`CredentialStore`]: accounts of the three principal kinds
//! - [`InventoryStore`]: vehicles and hotel room availability
//! - [`BookingLedger`]: car and hotel bookings
//!
//! plus [`Readiness`] for health probes. A backend normally implements all
//! four on one type and the application holds it behind `Arc<dyn Trait>`
//! for each concern.
//!
//! # Implementations
//!
//! - `PostgresStore` (in `voyage-postgres`): production
//! - `InMemoryStore` (in `voyage-testing`): tests
//!
//! # Atomicity
//!
//! Operations that check and then write ([`BookingLedger::reserve_vehicle`],
//! the status updates, account creation with a unique email) must do both in
//! one unit. Callers never pre-check and then write.
//!
//! # Dyn Compatibility
//!
//! Methods return boxed futures instead of using `async fn` so the traits
//! stay object safe.

use crate::ids::{
    CarBookingId, CarProviderId, HotelBookingId, HotelId, UserId, VehicleId,
};
use crate::model::{
    BookingFilter, CarBooking, CarProvider, Credentials, Hotel, HotelBooking,
    HotelBookingWithGuest, NewCarBooking, NewCarProvider, NewHotel, NewHotelBooking, NewUser,
    NewVehicle, ProviderCarBooking, RoomAvailability, StatusChange, User, UserCarBooking,
    Vehicle,
};
use crate::status::{BookingStatus, TransitionError};
use chrono::NaiveDate;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Boxed future returned by every repository method.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Errors raised by repository implementations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A referenced record does not exist.
    #[error("{entity} with id {id} not found")]
    NotFound {
        /// Record kind, e.g. `"Vehicle"`.
        entity: &'static str,
        /// Requested id.
        id: String,
    },

    /// An account with this email already exists for the principal kind.
    #[error("an account with email {email} already exists")]
    DuplicateEmail {
        /// The rejected email.
        email: String,
    },

    /// Some requested days are already held by another booking.
    #[error("Some dates are already booked: {}", format_dates(.dates))]
    DatesUnavailable {
        /// Vehicle being reserved.
        vehicle_id: VehicleId,
        /// The colliding days, ascending.
        dates: Vec<NaiveDate>,
    },

    /// The record exists but belongs to a different owner.
    #[error("{entity} {id} belongs to another account")]
    NotOwner {
        /// Record kind.
        entity: &'static str,
        /// Record id.
        id: String,
    },

    /// The requested status change is not allowed.
    #[error(transparent)]
    InvalidTransition(#[from] TransitionError),

    /// A vehicle cannot be removed while bookings still hold it.
    #[error("vehicle {0} still has pending or confirmed bookings")]
    VehicleInUse(VehicleId),

    /// Database or connection failure.
    #[error("Database error: {0}")]
    Database(String),

    /// A stored value could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl StoreError {
    /// Shorthand for [`StoreError::NotFound`].
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    /// Shorthand for [`StoreError::NotOwner`].
    pub fn not_owner(entity: &'static str, id: impl ToString) -> Self {
        Self::NotOwner {
            entity,
            id: id.to_string(),
        }
    }
}

fn format_dates(dates: &[NaiveDate]) -> String {
    dates
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Accounts for users, car providers and hotels.
pub trait CredentialStore: Send + Sync {
    /// Create a user.
    ///
    /// # Errors
    ///
    /// [`StoreError::DuplicateEmail`] when the email is taken by another user.
    fn create_user(&self, user: NewUser) -> StoreFuture<'_, User>;

    /// Create a car provider.
    ///
    /// # Errors
    ///
    /// [`StoreError::DuplicateEmail`] when the email is taken by another provider.
    fn create_car_provider(&self, provider: NewCarProvider) -> StoreFuture<'_, CarProvider>;

    /// Create a hotel.
    ///
    /// # Errors
    ///
    /// [`StoreError::DuplicateEmail`] when the email is taken by another hotel.
    fn create_hotel(&self, hotel: NewHotel) -> StoreFuture<'_, Hotel>;

    /// Look up a user and password hash by email.
    ///
    /// # Errors
    ///
    /// Backend failures only; an unknown email is `Ok(None)`.
    fn find_user_by_email<'a>(&'a self, email: &'a str)
    -> StoreFuture<'a, Option<Credentials<User>>>;

    /// Look up a car provider and password hash by email.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    fn find_car_provider_by_email<'a>(
        &'a self,
        email: &'a str,
    ) -> StoreFuture<'a, Option<Credentials<CarProvider>>>;

    /// Look up a hotel and password hash by email.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    fn find_hotel_by_email<'a>(&'a self, email: &'a str)
    -> StoreFuture<'a, Option<Credentials<Hotel>>>;

    /// Fetch a user profile.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    fn get_user(&self, id: UserId) -> StoreFuture<'_, Option<User>>;

    /// Fetch a car provider profile.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    fn get_car_provider(&self, id: CarProviderId) -> StoreFuture<'_, Option<CarProvider>>;

    /// Fetch a hotel profile.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    fn get_hotel(&self, id: HotelId) -> StoreFuture<'_, Option<Hotel>>;

    /// Replace a user's saved plan and return the updated profile.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when the user does not exist.
    fn set_user_plan(&self, id: UserId, plan: serde_json::Value) -> StoreFuture<'_, User>;

    /// Every user, oldest first.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    fn list_users(&self) -> StoreFuture<'_, Vec<User>>;

    /// Every car provider, oldest first.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    fn list_car_providers(&self) -> StoreFuture<'_, Vec<CarProvider>>;

    /// Every hotel, oldest first.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    fn list_hotels(&self) -> StoreFuture<'_, Vec<Hotel>>;
}

/// Vehicles and hotel room availability.
pub trait InventoryStore: Send + Sync {
    /// List a vehicle for a provider.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when the provider does not exist.
    fn add_vehicle(
        &self,
        provider_id: CarProviderId,
        vehicle: NewVehicle,
    ) -> StoreFuture<'_, Vehicle>;

    /// Delete one of the provider's vehicles.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when the vehicle does not exist or belongs to
    /// another provider, [`StoreError::VehicleInUse`] while pending or
    /// confirmed bookings hold it.
    fn remove_vehicle(
        &self,
        provider_id: CarProviderId,
        vehicle_id: VehicleId,
    ) -> StoreFuture<'_, ()>;

    /// Fetch a vehicle with its booked days.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    fn get_vehicle(&self, id: VehicleId) -> StoreFuture<'_, Option<Vehicle>>;

    /// The provider's vehicles, oldest listing first.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    fn list_provider_vehicles(&self, provider_id: CarProviderId)
    -> StoreFuture<'_, Vec<Vehicle>>;

    /// Every vehicle of every provider, oldest listing first.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    fn list_all_vehicles(&self) -> StoreFuture<'_, Vec<Vehicle>>;

    /// Insert or replace the rooms a hotel offers on a date.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] when the hotel does not exist.
    fn set_room_availability(
        &self,
        availability: RoomAvailability,
    ) -> StoreFuture<'_, RoomAvailability>;

    /// A hotel's availability, ascending by date.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    fn list_room_availability(&self, hotel_id: HotelId)
    -> StoreFuture<'_, Vec<RoomAvailability>>;
}

/// Car and hotel bookings.
pub trait BookingLedger: Send + Sync {
    /// Reserve a vehicle for a set of days as one atomic unit.
    ///
    /// Verifies the vehicle exists, checks the days against the vehicle's
    /// booked days and, only when none collide, stores a `pending` booking
    /// and marks the days booked.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] for an unknown vehicle or user,
    /// [`StoreError::DatesUnavailable`] when any day is taken. Nothing is
    /// written on error.
    fn reserve_vehicle(&self, booking: NewCarBooking) -> StoreFuture<'_, CarBooking>;

    /// Store a `pending` hotel booking.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`] for an unknown hotel or user.
    fn create_hotel_booking(&self, booking: NewHotelBooking) -> StoreFuture<'_, HotelBooking>;

    /// Fetch a car booking.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    fn get_car_booking(&self, id: CarBookingId) -> StoreFuture<'_, Option<CarBooking>>;

    /// Fetch a hotel booking.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    fn get_hotel_booking(&self, id: HotelBookingId) -> StoreFuture<'_, Option<HotelBooking>>;

    /// Move a car booking owned by `provider_id` to `status`.
    ///
    /// Canceling releases the booking's days in the same unit.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`], [`StoreError::NotOwner`] or
    /// [`StoreError::InvalidTransition`]; the booking is unchanged on error.
    fn set_car_booking_status(
        &self,
        id: CarBookingId,
        provider_id: CarProviderId,
        status: BookingStatus,
    ) -> StoreFuture<'_, StatusChange<CarBooking>>;

    /// Move a hotel booking owned by `hotel_id` to `status`.
    ///
    /// # Errors
    ///
    /// [`StoreError::NotFound`], [`StoreError::NotOwner`] or
    /// [`StoreError::InvalidTransition`]; the booking is unchanged on error.
    fn set_hotel_booking_status(
        &self,
        id: HotelBookingId,
        hotel_id: HotelId,
        status: BookingStatus,
    ) -> StoreFuture<'_, StatusChange<HotelBooking>>;

    /// Car bookings of a provider's vehicles with traveller and vehicle
    /// details, most recent first.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    fn list_car_bookings_for_provider(
        &self,
        provider_id: CarProviderId,
        filter: BookingFilter,
    ) -> StoreFuture<'_, Vec<ProviderCarBooking>>;

    /// Bookings of a hotel with traveller details.
    ///
    /// Pending listings are most recent first. Full history is ordered by
    /// start date, latest stay first.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    fn list_hotel_bookings_for_hotel(
        &self,
        hotel_id: HotelId,
        filter: BookingFilter,
    ) -> StoreFuture<'_, Vec<HotelBookingWithGuest>>;

    /// A traveller's car bookings with vehicle and provider contact, most
    /// recent first.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    fn list_car_bookings_for_user(&self, user_id: UserId) -> StoreFuture<'_, Vec<UserCarBooking>>;

    /// A traveller's hotel bookings, most recent first.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    fn list_hotel_bookings_for_user(&self, user_id: UserId)
    -> StoreFuture<'_, Vec<HotelBooking>>;
}

/// Backend liveness probe used by the readiness endpoint.
pub trait Readiness: Send + Sync {
    /// Succeeds when the backend can serve queries.
    ///
    /// # Errors
    ///
    /// [`StoreError::Database`] when the backend is unreachable.
    fn ping(&self) -> StoreFuture<'_, ()>;
}
