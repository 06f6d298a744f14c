//! `PostgreSQL` storage for Voyage.
//!
//! [`PostgresStore`] implements every repository trait from `voyage-core`
//! on one connection pool:
//!
//! - `CredentialStore`: `users`, `car_providers`, `hotels`
//! - `InventoryStore`: `vehicles`, `room_availability`
//! - `BookingLedger`: `car_bookings`, `vehicle_booked_dates`, `hotel_bookings`
//!
//! Uniqueness rules live in the schema (unique emails, one holder per
//! vehicle and day), so every check-then-write either runs in a transaction
//! or is a single statement guarded by a constraint.
//!
//! # Example
//!
//! ```no_run
//! use voyage_postgres::{PoolConfig, PostgresStore};
//!
//! # async fn example() -> Result<(), voyage_core::StoreError> {
//! let store = PostgresStore::connect("postgres://localhost/voyage", &PoolConfig::default()).await?;
//! store.migrate().await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

mod credentials;
mod inventory;
mod ledger;
mod rows;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use voyage_core::store::{Readiness, StoreError, StoreFuture};

/// Connection pool sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolConfig {
    /// Upper bound on open connections.
    pub max_connections: u32,
    /// Connections kept open while idle.
    pub min_connections: u32,
    /// How long to wait for a connection before failing.
    pub connect_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            connect_timeout: Duration::from_secs(30),
        }
    }
}

/// Repository backed by a `PostgreSQL` pool.
#[derive(Clone, Debug)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Open a pool against `database_url`.
    ///
    /// # Errors
    ///
    /// [`StoreError::Database`] when no connection can be established.
    pub async fn connect(database_url: &str, config: &PoolConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(config.connect_timeout)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Database(format!("Failed to connect: {e}")))?;

        tracing::info!(
            max_connections = config.max_connections,
            "Connected to PostgreSQL"
        );
        Ok(Self { pool })
    }

    /// Wrap an existing pool.
    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply the bundled migrations.
    ///
    /// # Errors
    ///
    /// [`StoreError::Database`] if a migration fails.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("Migration failed: {e}")))?;
        tracing::info!("Database migrations applied");
        Ok(())
    }
}

impl Readiness for PostgresStore {
    fn ping(&self) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            sqlx::query("SELECT 1")
                .execute(&self.pool)
                .await
                .map_err(database_error)?;
            Ok(())
        })
    }
}

pub(crate) fn database_error(err: sqlx::Error) -> StoreError {
    StoreError::Database(err.to_string())
}

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db_err) if db_err.is_unique_violation())
}

/// Name of the violated foreign key, if `err` is a foreign key violation.
pub(crate) fn foreign_key_violation(err: &sqlx::Error) -> Option<String> {
    match err {
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            Some(db_err.constraint().unwrap_or_default().to_string())
        }
        _ => None,
    }
}

/// Convert a count into an `INTEGER` column value.
pub(crate) fn to_db_int(value: u32, field: &str) -> Result<i32, StoreError> {
    i32::try_from(value).map_err(|_| StoreError::Serialization(format!("{field} out of range: {value}")))
}

/// Convert an `INTEGER` column value back into a count.
pub(crate) fn from_db_int(value: i32, field: &str) -> Result<u32, StoreError> {
    u32::try_from(value).map_err(|_| StoreError::Serialization(format!("negative {field}: {value}")))
}
