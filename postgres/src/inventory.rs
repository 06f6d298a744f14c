//! `InventoryStore` over `vehicles` and `room_availability`.

use crate::rows::{AvailabilityRow, VEHICLE_SELECT, VehicleRow};
use crate::{PostgresStore, database_error, foreign_key_violation, to_db_int};
use uuid::Uuid;
use voyage_core::ids::{CarProviderId, HotelId, VehicleId};
use voyage_core::model::{NewVehicle, RoomAvailability, Vehicle};
use voyage_core::store::{InventoryStore, StoreError, StoreFuture};

impl PostgresStore {
    async fn fetch_vehicle(&self, id: VehicleId) -> Result<Option<Vehicle>, StoreError> {
        let query = format!("{VEHICLE_SELECT} WHERE v.id = $1 GROUP BY v.id");
        let row: Option<VehicleRow> = sqlx::query_as(&query)
            .bind(Uuid::from(id))
            .fetch_optional(&self.pool)
            .await
            .map_err(database_error)?;
        Ok(row.map(Vehicle::from))
    }
}

impl InventoryStore for PostgresStore {
    fn add_vehicle(
        &self,
        provider_id: CarProviderId,
        vehicle: NewVehicle,
    ) -> StoreFuture<'_, Vehicle> {
        Box::pin(async move {
            let id = VehicleId::new();
            sqlx::query(
                r"
                INSERT INTO vehicles (id, provider_id, model, rent, registration_number, image, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                ",
            )
            .bind(Uuid::from(id))
            .bind(Uuid::from(provider_id))
            .bind(&vehicle.model)
            .bind(vehicle.rent)
            .bind(&vehicle.registration_number)
            .bind(&vehicle.image)
            .bind(vehicle.created_at)
            .execute(&self.pool)
            .await
            .map_err(|err| {
                if foreign_key_violation(&err).is_some() {
                    StoreError::not_found("CarProvider", provider_id)
                } else {
                    database_error(err)
                }
            })?;

            tracing::debug!(vehicle_id = %id, provider_id = %provider_id, "Inserted vehicle");
            Ok(Vehicle {
                id,
                provider_id,
                model: vehicle.model,
                rent: vehicle.rent,
                registration_number: vehicle.registration_number,
                image: vehicle.image,
                booked_dates: Vec::new(),
                created_at: vehicle.created_at,
            })
        })
    }

    fn remove_vehicle(
        &self,
        provider_id: CarProviderId,
        vehicle_id: VehicleId,
    ) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            let mut tx = self.pool.begin().await.map_err(database_error)?;

            // Locking the vehicle row serializes against reservations
            let owner: Option<(Uuid,)> =
                sqlx::query_as("SELECT provider_id FROM vehicles WHERE id = $1 FOR UPDATE")
                    .bind(Uuid::from(vehicle_id))
                    .fetch_optional(&mut *tx)
                    .await
                    .map_err(database_error)?;
            if owner.map(|(owner,)| CarProviderId::from_uuid(owner)) != Some(provider_id) {
                return Err(StoreError::not_found("Vehicle", vehicle_id));
            }

            let (in_use,): (bool,) = sqlx::query_as(
                r"
                SELECT EXISTS(
                    SELECT 1 FROM car_bookings
                    WHERE vehicle_id = $1 AND status IN ('pending', 'confirmed')
                )
                ",
            )
            .bind(Uuid::from(vehicle_id))
            .fetch_one(&mut *tx)
            .await
            .map_err(database_error)?;
            if in_use {
                return Err(StoreError::VehicleInUse(vehicle_id));
            }

            sqlx::query("DELETE FROM vehicles WHERE id = $1")
                .bind(Uuid::from(vehicle_id))
                .execute(&mut *tx)
                .await
                .map_err(database_error)?;
            tx.commit().await.map_err(database_error)?;

            tracing::debug!(vehicle_id = %vehicle_id, "Deleted vehicle");
            Ok(())
        })
    }

    fn get_vehicle(&self, id: VehicleId) -> StoreFuture<'_, Option<Vehicle>> {
        Box::pin(self.fetch_vehicle(id))
    }

    fn list_provider_vehicles(
        &self,
        provider_id: CarProviderId,
    ) -> StoreFuture<'_, Vec<Vehicle>> {
        Box::pin(async move {
            let query = format!(
                "{VEHICLE_SELECT} WHERE v.provider_id = $1 GROUP BY v.id ORDER BY v.created_at, v.id"
            );
            let rows: Vec<VehicleRow> = sqlx::query_as(&query)
                .bind(Uuid::from(provider_id))
                .fetch_all(&self.pool)
                .await
                .map_err(database_error)?;
            Ok(rows.into_iter().map(Vehicle::from).collect())
        })
    }

    fn list_all_vehicles(&self) -> StoreFuture<'_, Vec<Vehicle>> {
        Box::pin(async move {
            let query = format!("{VEHICLE_SELECT} GROUP BY v.id ORDER BY v.created_at, v.id");
            let rows: Vec<VehicleRow> = sqlx::query_as(&query)
                .fetch_all(&self.pool)
                .await
                .map_err(database_error)?;
            Ok(rows.into_iter().map(Vehicle::from).collect())
        })
    }

    fn set_room_availability(
        &self,
        availability: RoomAvailability,
    ) -> StoreFuture<'_, RoomAvailability> {
        Box::pin(async move {
            let row: AvailabilityRow = sqlx::query_as(
                r"
                INSERT INTO room_availability (hotel_id, date, available_rooms)
                VALUES ($1, $2, $3)
                ON CONFLICT (hotel_id, date)
                DO UPDATE SET available_rooms = EXCLUDED.available_rooms
                RETURNING hotel_id, date, available_rooms
                ",
            )
            .bind(Uuid::from(availability.hotel_id))
            .bind(availability.date)
            .bind(to_db_int(availability.available_rooms, "available_rooms")?)
            .fetch_one(&self.pool)
            .await
            .map_err(|err| {
                if foreign_key_violation(&err).is_some() {
                    StoreError::not_found("Hotel", availability.hotel_id)
                } else {
                    database_error(err)
                }
            })?;
            row.into_availability()
        })
    }

    fn list_room_availability(
        &self,
        hotel_id: HotelId,
    ) -> StoreFuture<'_, Vec<RoomAvailability>> {
        Box::pin(async move {
            let rows: Vec<AvailabilityRow> = sqlx::query_as(
                "SELECT hotel_id, date, available_rooms FROM room_availability \
                 WHERE hotel_id = $1 ORDER BY date",
            )
            .bind(Uuid::from(hotel_id))
            .fetch_all(&self.pool)
            .await
            .map_err(database_error)?;
            rows.into_iter().map(AvailabilityRow::into_availability).collect()
        })
    }
}
