//! `BookingLedger` over `car_bookings`, `vehicle_booked_dates` and
//! `hotel_bookings`.
//!
//! A car reservation locks the vehicle row, checks the requested days,
//! inserts the booking and one `vehicle_booked_dates` row per day, all in
//! one transaction. The `(vehicle_id, booked_on)` primary key backs the lock
//! up: even a writer that skipped it could not double-book a day.

use crate::rows::{
    CAR_BOOKING_COLUMNS, CarBookingRow, HOTEL_BOOKING_COLUMNS, HotelBookingRow,
    HotelBookingWithGuestRow, ProviderCarBookingRow, UserCarBookingRow,
};
use crate::{PostgresStore, database_error, foreign_key_violation, is_unique_violation, to_db_int};
use chrono::NaiveDate;
use uuid::Uuid;
use voyage_core::ids::{CarBookingId, CarProviderId, HotelBookingId, HotelId, UserId, VehicleId};
use voyage_core::model::{
    BookingFilter, CarBooking, HotelBooking, HotelBookingWithGuest, NewCarBooking,
    NewHotelBooking, ProviderCarBooking, StatusChange, UserCarBooking,
};
use voyage_core::status::BookingStatus;
use voyage_core::store::{BookingLedger, StoreError, StoreFuture};

/// Vehicle snapshot columns for a `LEFT JOIN vehicles v`.
const SNAPSHOT_COLUMNS: &str = "v.model AS vehicle_model, v.rent AS vehicle_rent, \
     v.registration_number AS vehicle_registration_number, v.image AS vehicle_image";

/// Map a missing user or owner, reported by a foreign key, to `NotFound`.
fn booking_insert_error(err: sqlx::Error, user_id: UserId, owner: (&'static str, String)) -> StoreError {
    match foreign_key_violation(&err) {
        Some(constraint) if constraint.ends_with("user_id_fkey") => {
            StoreError::not_found("User", user_id)
        }
        Some(_) => StoreError::not_found(owner.0, owner.1),
        None => database_error(err),
    }
}

impl BookingLedger for PostgresStore {
    fn reserve_vehicle(&self, booking: NewCarBooking) -> StoreFuture<'_, CarBooking> {
        Box::pin(async move {
            let vehicle_id = booking.vehicle_id;
            let dates: Vec<NaiveDate> = booking.dates.into();
            let mut tx = self.pool.begin().await.map_err(database_error)?;

            let owner: Option<(Uuid,)> =
                sqlx::query_as("SELECT provider_id FROM vehicles WHERE id = $1 FOR UPDATE")
                    .bind(Uuid::from(vehicle_id))
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(database_error)?;
            let Some((provider_id,)) = owner else {
                return Err(StoreError::not_found("Vehicle", vehicle_id));
            };

            let taken: Vec<(NaiveDate,)> = sqlx::query_as(
                r"
                SELECT booked_on FROM vehicle_booked_dates
                WHERE vehicle_id = $1 AND booked_on = ANY($2)
                ORDER BY booked_on
                ",
            )
            .bind(Uuid::from(vehicle_id))
            .bind(&dates)
            .fetch_all(&mut *tx)
            .await
            .map_err(database_error)?;
            if !taken.is_empty() {
                return Err(StoreError::DatesUnavailable {
                    vehicle_id,
                    dates: taken.into_iter().map(|(day,)| day).collect(),
                });
            }

            let query = format!(
                "INSERT INTO car_bookings AS b (id, user_id, vehicle_id, provider_id, dates, status, created_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING {CAR_BOOKING_COLUMNS}"
            );
            let row: CarBookingRow = sqlx::query_as(&query)
                .bind(Uuid::from(CarBookingId::new()))
                .bind(Uuid::from(booking.user_id))
                .bind(Uuid::from(vehicle_id))
                .bind(provider_id)
                .bind(&dates)
                .bind(BookingStatus::Pending.as_str())
                .bind(booking.created_at)
                .fetch_one(&mut *tx)
                .await
                .map_err(|err| {
                    booking_insert_error(err, booking.user_id, ("Vehicle", vehicle_id.to_string()))
                })?;
            let record = row.into_booking()?;

            sqlx::query(
                r"
                INSERT INTO vehicle_booked_dates (vehicle_id, booked_on, booking_id)
                SELECT $1, day, $3 FROM UNNEST($2::date[]) AS day
                ",
            )
            .bind(Uuid::from(vehicle_id))
            .bind(&dates)
            .bind(Uuid::from(record.id))
            .execute(&mut *tx)
            .await
            .map_err(|err| {
                if is_unique_violation(&err) {
                    StoreError::DatesUnavailable {
                        vehicle_id,
                        dates: dates.clone(),
                    }
                } else {
                    database_error(err)
                }
            })?;

            tx.commit().await.map_err(database_error)?;
            tracing::debug!(booking_id = %record.id, vehicle_id = %vehicle_id, "Reserved vehicle");
            Ok(record)
        })
    }

    fn create_hotel_booking(&self, booking: NewHotelBooking) -> StoreFuture<'_, HotelBooking> {
        Box::pin(async move {
            let query = format!(
                "INSERT INTO hotel_bookings AS b \
                     (id, user_id, hotel_id, start_date, end_date, rooms, status, created_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {HOTEL_BOOKING_COLUMNS}"
            );
            let row: HotelBookingRow = sqlx::query_as(&query)
                .bind(Uuid::from(HotelBookingId::new()))
                .bind(Uuid::from(booking.user_id))
                .bind(Uuid::from(booking.hotel_id))
                .bind(booking.stay.start())
                .bind(booking.stay.end())
                .bind(to_db_int(booking.rooms, "rooms")?)
                .bind(BookingStatus::Pending.as_str())
                .bind(booking.created_at)
                .fetch_one(&self.pool)
                .await
                .map_err(|err| {
                    booking_insert_error(err, booking.user_id, ("Hotel", booking.hotel_id.to_string()))
                })?;
            row.into_booking()
        })
    }

    fn get_car_booking(&self, id: CarBookingId) -> StoreFuture<'_, Option<CarBooking>> {
        Box::pin(async move {
            let query = format!("SELECT {CAR_BOOKING_COLUMNS} FROM car_bookings b WHERE b.id = $1");
            let row: Option<CarBookingRow> = sqlx::query_as(&query)
                .bind(Uuid::from(id))
                .fetch_optional(&self.pool)
                .await
                .map_err(database_error)?;
            row.map(CarBookingRow::into_booking).transpose()
        })
    }

    fn get_hotel_booking(&self, id: HotelBookingId) -> StoreFuture<'_, Option<HotelBooking>> {
        Box::pin(async move {
            let query =
                format!("SELECT {HOTEL_BOOKING_COLUMNS} FROM hotel_bookings b WHERE b.id = $1");
            let row: Option<HotelBookingRow> = sqlx::query_as(&query)
                .bind(Uuid::from(id))
                .fetch_optional(&self.pool)
                .await
                .map_err(database_error)?;
            row.map(HotelBookingRow::into_booking).transpose()
        })
    }

    fn set_car_booking_status(
        &self,
        id: CarBookingId,
        provider_id: CarProviderId,
        status: BookingStatus,
    ) -> StoreFuture<'_, StatusChange<CarBooking>> {
        Box::pin(async move {
            let mut tx = self.pool.begin().await.map_err(database_error)?;

            let query = format!(
                "SELECT {CAR_BOOKING_COLUMNS} FROM car_bookings b WHERE b.id = $1 FOR UPDATE"
            );
            let row: Option<CarBookingRow> = sqlx::query_as(&query)
                .bind(Uuid::from(id))
                .fetch_optional(&mut *tx)
                .await
                .map_err(database_error)?;
            let mut booking = row
                .ok_or_else(|| StoreError::not_found("Booking", id))?
                .into_booking()?;
            if booking.provider_id != provider_id {
                return Err(StoreError::not_owner("Booking", id));
            }

            let previous = booking.status;
            booking.status = previous.transition_to(status)?;
            if booking.status != previous {
                sqlx::query("UPDATE car_bookings SET status = $2 WHERE id = $1")
                    .bind(Uuid::from(id))
                    .bind(booking.status.as_str())
                    .execute(&mut *tx)
                    .await
                    .map_err(database_error)?;
            }
            if previous.is_active() && !booking.status.is_active() {
                sqlx::query("DELETE FROM vehicle_booked_dates WHERE booking_id = $1")
                    .bind(Uuid::from(id))
                    .execute(&mut *tx)
                    .await
                    .map_err(database_error)?;
            }

            tx.commit().await.map_err(database_error)?;
            Ok(StatusChange { previous, booking })
        })
    }

    fn set_hotel_booking_status(
        &self,
        id: HotelBookingId,
        hotel_id: HotelId,
        status: BookingStatus,
    ) -> StoreFuture<'_, StatusChange<HotelBooking>> {
        Box::pin(async move {
            let mut tx = self.pool.begin().await.map_err(database_error)?;

            let query = format!(
                "SELECT {HOTEL_BOOKING_COLUMNS} FROM hotel_bookings b WHERE b.id = $1 FOR UPDATE"
            );
            let row: Option<HotelBookingRow> = sqlx::query_as(&query)
                .bind(Uuid::from(id))
                .fetch_optional(&mut *tx)
                .await
                .map_err(database_error)?;
            let mut booking = row
                .ok_or_else(|| StoreError::not_found("Booking", id))?
                .into_booking()?;
            if booking.hotel_id != hotel_id {
                return Err(StoreError::not_owner("Booking", id));
            }

            let previous = booking.status;
            booking.status = previous.transition_to(status)?;
            if booking.status != previous {
                sqlx::query("UPDATE hotel_bookings SET status = $2 WHERE id = $1")
                    .bind(Uuid::from(id))
                    .bind(booking.status.as_str())
                    .execute(&mut *tx)
                    .await
                    .map_err(database_error)?;
            }

            tx.commit().await.map_err(database_error)?;
            Ok(StatusChange { previous, booking })
        })
    }

    fn list_car_bookings_for_provider(
        &self,
        provider_id: CarProviderId,
        filter: BookingFilter,
    ) -> StoreFuture<'_, Vec<ProviderCarBooking>> {
        Box::pin(async move {
            let query = format!(
                "SELECT {CAR_BOOKING_COLUMNS}, {SNAPSHOT_COLUMNS}, \
                        u.name AS user_name, u.email AS user_email \
                 FROM car_bookings b \
                 JOIN users u ON u.id = b.user_id \
                 LEFT JOIN vehicles v ON v.id = b.vehicle_id \
                 WHERE b.provider_id = $1 AND ($2::text IS NULL OR b.status = $2) \
                 ORDER BY b.created_at DESC, b.id"
            );
            let rows: Vec<ProviderCarBookingRow> = sqlx::query_as(&query)
                .bind(Uuid::from(provider_id))
                .bind(filter.status().map(BookingStatus::as_str))
                .fetch_all(&self.pool)
                .await
                .map_err(database_error)?;
            rows.into_iter().map(ProviderCarBookingRow::into_view).collect()
        })
    }

    fn list_hotel_bookings_for_hotel(
        &self,
        hotel_id: HotelId,
        filter: BookingFilter,
    ) -> StoreFuture<'_, Vec<HotelBookingWithGuest>> {
        Box::pin(async move {
            let order = match filter {
                BookingFilter::Pending => "b.created_at DESC, b.id",
                BookingFilter::All => "b.start_date DESC, b.created_at DESC, b.id",
            };
            let query = format!(
                "SELECT {HOTEL_BOOKING_COLUMNS}, u.name AS user_name, u.email AS user_email \
                 FROM hotel_bookings b \
                 JOIN users u ON u.id = b.user_id \
                 WHERE b.hotel_id = $1 AND ($2::text IS NULL OR b.status = $2) \
                 ORDER BY {order}"
            );
            let rows: Vec<HotelBookingWithGuestRow> = sqlx::query_as(&query)
                .bind(Uuid::from(hotel_id))
                .bind(filter.status().map(BookingStatus::as_str))
                .fetch_all(&self.pool)
                .await
                .map_err(database_error)?;
            rows.into_iter().map(HotelBookingWithGuestRow::into_view).collect()
        })
    }

    fn list_car_bookings_for_user(&self, user_id: UserId) -> StoreFuture<'_, Vec<UserCarBooking>> {
        Box::pin(async move {
            let query = format!(
                "SELECT {CAR_BOOKING_COLUMNS}, {SNAPSHOT_COLUMNS}, \
                        p.name AS provider_name, p.email AS provider_email, p.phone AS provider_phone \
                 FROM car_bookings b \
                 JOIN car_providers p ON p.id = b.provider_id \
                 LEFT JOIN vehicles v ON v.id = b.vehicle_id \
                 WHERE b.user_id = $1 \
                 ORDER BY b.created_at DESC, b.id"
            );
            let rows: Vec<UserCarBookingRow> = sqlx::query_as(&query)
                .bind(Uuid::from(user_id))
                .fetch_all(&self.pool)
                .await
                .map_err(database_error)?;
            rows.into_iter().map(UserCarBookingRow::into_view).collect()
        })
    }

    fn list_hotel_bookings_for_user(
        &self,
        user_id: UserId,
    ) -> StoreFuture<'_, Vec<HotelBooking>> {
        Box::pin(async move {
            let query = format!(
                "SELECT {HOTEL_BOOKING_COLUMNS} FROM hotel_bookings b \
                 WHERE b.user_id = $1 ORDER BY b.created_at DESC, b.id"
            );
            let rows: Vec<HotelBookingRow> = sqlx::query_as(&query)
                .bind(Uuid::from(user_id))
                .fetch_all(&self.pool)
                .await
                .map_err(database_error)?;
            rows.into_iter().map(HotelBookingRow::into_booking).collect()
        })
    }
}
