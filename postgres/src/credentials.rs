//! `CredentialStore` over the `users`, `car_providers` and `hotels` tables.

use crate::rows::{
    CAR_PROVIDER_COLUMNS, CarProviderRow, CarProviderWithHash, HOTEL_COLUMNS, HotelRow,
    HotelWithHash, USER_COLUMNS, UserRow, UserWithHash,
};
use crate::{PostgresStore, database_error, is_unique_violation, to_db_int};
use uuid::Uuid;
use voyage_core::ids::{CarProviderId, HotelId, UserId};
use voyage_core::model::{
    CarProvider, Credentials, Hotel, NewCarProvider, NewHotel, NewUser, User,
};
use voyage_core::store::{CredentialStore, StoreError, StoreFuture};

/// Map an insert failure, turning the email unique index into
/// [`StoreError::DuplicateEmail`].
fn insert_error(email: &str) -> impl FnOnce(sqlx::Error) -> StoreError + '_ {
    move |err| {
        if is_unique_violation(&err) {
            StoreError::DuplicateEmail {
                email: email.to_string(),
            }
        } else {
            database_error(err)
        }
    }
}

impl CredentialStore for PostgresStore {
    fn create_user(&self, user: NewUser) -> StoreFuture<'_, User> {
        Box::pin(async move {
            let query = format!(
                "INSERT INTO users (id, name, email, phone, password_hash, created_at) \
                 VALUES ($1, $2, $3, $4, $5, $6) RETURNING {USER_COLUMNS}"
            );
            let row: UserRow = sqlx::query_as(&query)
                .bind(Uuid::from(UserId::new()))
                .bind(&user.name)
                .bind(&user.email)
                .bind(&user.phone)
                .bind(&user.password_hash)
                .bind(user.created_at)
                .fetch_one(&self.pool)
                .await
                .map_err(insert_error(&user.email))?;

            tracing::debug!(email = %user.email, "Inserted user");
            Ok(row.into())
        })
    }

    fn create_car_provider(&self, provider: NewCarProvider) -> StoreFuture<'_, CarProvider> {
        Box::pin(async move {
            let query = format!(
                "INSERT INTO car_providers (id, name, email, phone, password_hash, created_at) \
                 VALUES ($1, $2, $3, $4, $5, $6) RETURNING {CAR_PROVIDER_COLUMNS}"
            );
            let row: CarProviderRow = sqlx::query_as(&query)
                .bind(Uuid::from(CarProviderId::new()))
                .bind(&provider.name)
                .bind(&provider.email)
                .bind(&provider.phone)
                .bind(&provider.password_hash)
                .bind(provider.created_at)
                .fetch_one(&self.pool)
                .await
                .map_err(insert_error(&provider.email))?;

            tracing::debug!(email = %provider.email, "Inserted car provider");
            Ok(row.into())
        })
    }

    fn create_hotel(&self, hotel: NewHotel) -> StoreFuture<'_, Hotel> {
        Box::pin(async move {
            let query = format!(
                "INSERT INTO hotels \
                     (id, name, email, phone, password_hash, image, location, address, rooms, rent, created_at) \
                 VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) RETURNING {HOTEL_COLUMNS}"
            );
            let row: HotelRow = sqlx::query_as(&query)
                .bind(Uuid::from(HotelId::new()))
                .bind(&hotel.name)
                .bind(&hotel.email)
                .bind(&hotel.phone)
                .bind(&hotel.password_hash)
                .bind(&hotel.image)
                .bind(&hotel.location)
                .bind(&hotel.address)
                .bind(to_db_int(hotel.rooms, "rooms")?)
                .bind(hotel.rent)
                .bind(hotel.created_at)
                .fetch_one(&self.pool)
                .await
                .map_err(insert_error(&hotel.email))?;

            tracing::debug!(email = %hotel.email, "Inserted hotel");
            row.into_hotel()
        })
    }

    fn find_user_by_email<'a>(
        &'a self,
        email: &'a str,
    ) -> StoreFuture<'a, Option<Credentials<User>>> {
        Box::pin(async move {
            let query = format!("SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = $1");
            let row: Option<UserWithHash> = sqlx::query_as(&query)
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(database_error)?;
            Ok(row.map(UserWithHash::into_credentials))
        })
    }

    fn find_car_provider_by_email<'a>(
        &'a self,
        email: &'a str,
    ) -> StoreFuture<'a, Option<Credentials<CarProvider>>> {
        Box::pin(async move {
            let query = format!(
                "SELECT {CAR_PROVIDER_COLUMNS}, password_hash FROM car_providers WHERE email = $1"
            );
            let row: Option<CarProviderWithHash> = sqlx::query_as(&query)
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(database_error)?;
            Ok(row.map(CarProviderWithHash::into_credentials))
        })
    }

    fn find_hotel_by_email<'a>(
        &'a self,
        email: &'a str,
    ) -> StoreFuture<'a, Option<Credentials<Hotel>>> {
        Box::pin(async move {
            let query =
                format!("SELECT {HOTEL_COLUMNS}, password_hash FROM hotels WHERE email = $1");
            let row: Option<HotelWithHash> = sqlx::query_as(&query)
                .bind(email)
                .fetch_optional(&self.pool)
                .await
                .map_err(database_error)?;
            row.map(HotelWithHash::into_credentials).transpose()
        })
    }

    fn get_user(&self, id: UserId) -> StoreFuture<'_, Option<User>> {
        Box::pin(async move {
            let query = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
            let row: Option<UserRow> = sqlx::query_as(&query)
                .bind(Uuid::from(id))
                .fetch_optional(&self.pool)
                .await
                .map_err(database_error)?;
            Ok(row.map(User::from))
        })
    }

    fn get_car_provider(&self, id: CarProviderId) -> StoreFuture<'_, Option<CarProvider>> {
        Box::pin(async move {
            let query = format!("SELECT {CAR_PROVIDER_COLUMNS} FROM car_providers WHERE id = $1");
            let row: Option<CarProviderRow> = sqlx::query_as(&query)
                .bind(Uuid::from(id))
                .fetch_optional(&self.pool)
                .await
                .map_err(database_error)?;
            Ok(row.map(CarProvider::from))
        })
    }

    fn get_hotel(&self, id: HotelId) -> StoreFuture<'_, Option<Hotel>> {
        Box::pin(async move {
            let query = format!("SELECT {HOTEL_COLUMNS} FROM hotels WHERE id = $1");
            let row: Option<HotelRow> = sqlx::query_as(&query)
                .bind(Uuid::from(id))
                .fetch_optional(&self.pool)
                .await
                .map_err(database_error)?;
            row.map(HotelRow::into_hotel).transpose()
        })
    }

    fn set_user_plan(&self, id: UserId, plan: serde_json::Value) -> StoreFuture<'_, User> {
        Box::pin(async move {
            let query = format!("UPDATE users SET plan = $2 WHERE id = $1 RETURNING {USER_COLUMNS}");
            let row: Option<UserRow> = sqlx::query_as(&query)
                .bind(Uuid::from(id))
                .bind(plan)
                .fetch_optional(&self.pool)
                .await
                .map_err(database_error)?;
            row.map(User::from)
                .ok_or_else(|| StoreError::not_found("User", id))
        })
    }

    fn list_users(&self) -> StoreFuture<'_, Vec<User>> {
        Box::pin(async move {
            let query = format!("SELECT {USER_COLUMNS} FROM users ORDER BY created_at, id");
            let rows: Vec<UserRow> = sqlx::query_as(&query)
                .fetch_all(&self.pool)
                .await
                .map_err(database_error)?;
            Ok(rows.into_iter().map(User::from).collect())
        })
    }

    fn list_car_providers(&self) -> StoreFuture<'_, Vec<CarProvider>> {
        Box::pin(async move {
            let query =
                format!("SELECT {CAR_PROVIDER_COLUMNS} FROM car_providers ORDER BY created_at, id");
            let rows: Vec<CarProviderRow> = sqlx::query_as(&query)
                .fetch_all(&self.pool)
                .await
                .map_err(database_error)?;
            Ok(rows.into_iter().map(CarProvider::from).collect())
        })
    }

    fn list_hotels(&self) -> StoreFuture<'_, Vec<Hotel>> {
        Box::pin(async move {
            let query = format!("SELECT {HOTEL_COLUMNS} FROM hotels ORDER BY created_at, id");
            let rows: Vec<HotelRow> = sqlx::query_as(&query)
                .fetch_all(&self.pool)
                .await
                .map_err(database_error)?;
            rows.into_iter().map(HotelRow::into_hotel).collect()
        })
    }
}
