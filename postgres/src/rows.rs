//! Row shapes returned by the queries and their conversion into domain
//! records.
//!
//! Column lists live next to the rows so every query selects exactly what
//! its row decodes.

use crate::from_db_int;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;
use voyage_core::ids::{
    CarBookingId, CarProviderId, HotelBookingId, HotelId, UserId, VehicleId,
};
use voyage_core::model::{
    BookingParty, CarBooking, CarProvider, Credentials, Hotel, HotelBooking,
    HotelBookingWithGuest, ProviderCarBooking, ProviderContact, RoomAvailability, User,
    UserCarBooking, Vehicle, VehicleSnapshot,
};
use voyage_core::status::BookingStatus;
use voyage_core::store::StoreError;

pub(crate) const USER_COLUMNS: &str = "id, name, email, phone, plan, created_at";
pub(crate) const CAR_PROVIDER_COLUMNS: &str = "id, name, email, phone, created_at";
pub(crate) const HOTEL_COLUMNS: &str =
    "id, name, email, phone, image, location, address, rooms, rent, created_at";
pub(crate) const CAR_BOOKING_COLUMNS: &str =
    "b.id, b.user_id, b.vehicle_id, b.provider_id, b.dates, b.status, b.created_at";
pub(crate) const HOTEL_BOOKING_COLUMNS: &str =
    "b.id, b.user_id, b.hotel_id, b.start_date, b.end_date, b.rooms, b.status, b.created_at";

/// Vehicles with their booked days folded into an array.
pub(crate) const VEHICLE_SELECT: &str = r"
    SELECT v.id, v.provider_id, v.model, v.rent, v.registration_number, v.image, v.created_at,
           COALESCE(
               array_agg(d.booked_on ORDER BY d.booked_on) FILTER (WHERE d.booked_on IS NOT NULL),
               '{}'
           ) AS booked_dates
    FROM vehicles v
    LEFT JOIN vehicle_booked_dates d ON d.vehicle_id = v.id
";

fn parse_status(raw: &str) -> Result<BookingStatus, StoreError> {
    raw.parse()
        .map_err(|e: voyage_core::status::UnknownStatus| StoreError::Serialization(e.to_string()))
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    phone: String,
    plan: Option<serde_json::Value>,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::from_uuid(row.id),
            name: row.name,
            email: row.email,
            phone: row.phone,
            plan: row.plan,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CarProviderRow {
    id: Uuid,
    name: String,
    email: String,
    phone: String,
    created_at: DateTime<Utc>,
}

impl From<CarProviderRow> for CarProvider {
    fn from(row: CarProviderRow) -> Self {
        Self {
            id: CarProviderId::from_uuid(row.id),
            name: row.name,
            email: row.email,
            phone: row.phone,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct HotelRow {
    id: Uuid,
    name: String,
    email: String,
    phone: String,
    image: Option<String>,
    location: Option<String>,
    address: Option<String>,
    rooms: i32,
    rent: f64,
    created_at: DateTime<Utc>,
}

impl HotelRow {
    pub(crate) fn into_hotel(self) -> Result<Hotel, StoreError> {
        Ok(Hotel {
            id: HotelId::from_uuid(self.id),
            name: self.name,
            email: self.email,
            phone: self.phone,
            image: self.image,
            location: self.location,
            address: self.address,
            rooms: from_db_int(self.rooms, "rooms")?,
            rent: self.rent,
            created_at: self.created_at,
        })
    }
}

macro_rules! with_hash {
    ($name:ident, $row:ty) => {
        /// A profile row plus its password hash.
        #[derive(Debug, sqlx::FromRow)]
        pub(crate) struct $name {
            #[sqlx(flatten)]
            pub(crate) row: $row,
            pub(crate) password_hash: String,
        }
    };
}

with_hash!(UserWithHash, UserRow);
with_hash!(CarProviderWithHash, CarProviderRow);
with_hash!(HotelWithHash, HotelRow);

impl UserWithHash {
    pub(crate) fn into_credentials(self) -> Credentials<User> {
        Credentials {
            principal: self.row.into(),
            password_hash: self.password_hash,
        }
    }
}

impl CarProviderWithHash {
    pub(crate) fn into_credentials(self) -> Credentials<CarProvider> {
        Credentials {
            principal: self.row.into(),
            password_hash: self.password_hash,
        }
    }
}

impl HotelWithHash {
    pub(crate) fn into_credentials(self) -> Result<Credentials<Hotel>, StoreError> {
        Ok(Credentials {
            principal: self.row.into_hotel()?,
            password_hash: self.password_hash,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct VehicleRow {
    id: Uuid,
    provider_id: Uuid,
    model: String,
    rent: f64,
    registration_number: String,
    image: String,
    booked_dates: Vec<NaiveDate>,
    created_at: DateTime<Utc>,
}

impl From<VehicleRow> for Vehicle {
    fn from(row: VehicleRow) -> Self {
        Self {
            id: VehicleId::from_uuid(row.id),
            provider_id: CarProviderId::from_uuid(row.provider_id),
            model: row.model,
            rent: row.rent,
            registration_number: row.registration_number,
            image: row.image,
            booked_dates: row.booked_dates,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct AvailabilityRow {
    hotel_id: Uuid,
    date: NaiveDate,
    available_rooms: i32,
}

impl AvailabilityRow {
    pub(crate) fn into_availability(self) -> Result<RoomAvailability, StoreError> {
        Ok(RoomAvailability {
            hotel_id: HotelId::from_uuid(self.hotel_id),
            date: self.date,
            available_rooms: from_db_int(self.available_rooms, "available_rooms")?,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct CarBookingRow {
    id: Uuid,
    user_id: Uuid,
    vehicle_id: Uuid,
    provider_id: Uuid,
    dates: Vec<NaiveDate>,
    status: String,
    created_at: DateTime<Utc>,
}

impl CarBookingRow {
    pub(crate) fn into_booking(self) -> Result<CarBooking, StoreError> {
        Ok(CarBooking {
            id: CarBookingId::from_uuid(self.id),
            user_id: UserId::from_uuid(self.user_id),
            vehicle_id: VehicleId::from_uuid(self.vehicle_id),
            provider_id: CarProviderId::from_uuid(self.provider_id),
            dates: self.dates,
            status: parse_status(&self.status)?,
            created_at: self.created_at,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct HotelBookingRow {
    id: Uuid,
    user_id: Uuid,
    hotel_id: Uuid,
    start_date: NaiveDate,
    end_date: NaiveDate,
    rooms: i32,
    status: String,
    created_at: DateTime<Utc>,
}

impl HotelBookingRow {
    pub(crate) fn into_booking(self) -> Result<HotelBooking, StoreError> {
        Ok(HotelBooking {
            id: HotelBookingId::from_uuid(self.id),
            user_id: UserId::from_uuid(self.user_id),
            hotel_id: HotelId::from_uuid(self.hotel_id),
            start_date: self.start_date,
            end_date: self.end_date,
            rooms: from_db_int(self.rooms, "rooms")?,
            status: parse_status(&self.status)?,
            created_at: self.created_at,
        })
    }
}

/// Vehicle columns of a `LEFT JOIN vehicles`; all `NULL` once the vehicle
/// was removed.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct SnapshotColumns {
    vehicle_model: Option<String>,
    vehicle_rent: Option<f64>,
    vehicle_registration_number: Option<String>,
    vehicle_image: Option<String>,
}

impl SnapshotColumns {
    fn into_snapshot(self) -> Option<VehicleSnapshot> {
        Some(VehicleSnapshot {
            model: self.vehicle_model?,
            rent: self.vehicle_rent?,
            registration_number: self.vehicle_registration_number?,
            image: self.vehicle_image.unwrap_or_default(),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ProviderCarBookingRow {
    #[sqlx(flatten)]
    booking: CarBookingRow,
    #[sqlx(flatten)]
    vehicle: SnapshotColumns,
    user_name: String,
    user_email: String,
}

impl ProviderCarBookingRow {
    pub(crate) fn into_view(self) -> Result<ProviderCarBooking, StoreError> {
        let booking = self.booking.into_booking()?;
        Ok(ProviderCarBooking {
            user: BookingParty {
                id: booking.user_id,
                name: self.user_name,
                email: self.user_email,
            },
            vehicle: self.vehicle.into_snapshot(),
            booking,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct UserCarBookingRow {
    #[sqlx(flatten)]
    booking: CarBookingRow,
    #[sqlx(flatten)]
    vehicle: SnapshotColumns,
    provider_name: String,
    provider_email: String,
    provider_phone: String,
}

impl UserCarBookingRow {
    pub(crate) fn into_view(self) -> Result<UserCarBooking, StoreError> {
        let booking = self.booking.into_booking()?;
        Ok(UserCarBooking {
            provider: ProviderContact {
                id: booking.provider_id,
                name: self.provider_name,
                email: self.provider_email,
                phone: self.provider_phone,
            },
            vehicle: self.vehicle.into_snapshot(),
            booking,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct HotelBookingWithGuestRow {
    #[sqlx(flatten)]
    booking: HotelBookingRow,
    user_name: String,
    user_email: String,
}

impl HotelBookingWithGuestRow {
    pub(crate) fn into_view(self) -> Result<HotelBookingWithGuest, StoreError> {
        let booking = self.booking.into_booking()?;
        Ok(HotelBookingWithGuest {
            user: BookingParty {
                id: booking.user_id,
                name: self.user_name,
                email: self.user_email,
            },
            booking,
        })
    }
}
