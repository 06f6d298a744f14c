//! Application state shared by every handler.

use crate::workflow::{AccountDirectory, CarBookings, Catalog, HotelBookings};
use axum::extract::FromRef;
use std::sync::Arc;
use voyage_auth::{AuthConfig, AuthService};
use voyage_core::environment::Clock;
use voyage_core::store::{BookingLedger, CredentialStore, InventoryStore, Readiness};

/// Application state shared across all HTTP handlers.
///
/// Every field is a cheap handle over the same store, cloned per request.
#[derive(Clone)]
pub struct AppState {
    /// Signup, login and token resolution
    pub auth: AuthService,
    /// Plans and admin listings
    pub accounts: AccountDirectory,
    /// Vehicles, hotels and room availability
    pub catalog: Catalog,
    /// Car booking workflow
    pub car_bookings: CarBookings,
    /// Hotel booking workflow
    pub hotel_bookings: HotelBookings,
    /// Store probe for `/ready`
    pub readiness: Arc<dyn Readiness>,
    /// Key required by the admin listings, if any
    pub admin_key: Option<Arc<str>>,
}

impl AppState {
    /// Wire every service to one store.
    ///
    /// # Arguments
    ///
    /// - `store`: backend implementing every repository trait
    /// - `auth_config`: the single token configuration
    /// - `clock`: source of `created_at` timestamps
    /// - `admin_key`: optional key for the admin listings
    #[must_use]
    pub fn new<S>(
        store: Arc<S>,
        auth_config: &AuthConfig,
        clock: Arc<dyn Clock>,
        admin_key: Option<String>,
    ) -> Self
    where
        S: CredentialStore + InventoryStore + BookingLedger + Readiness + 'static,
    {
        let accounts: Arc<dyn CredentialStore> = store.clone();
        let inventory: Arc<dyn InventoryStore> = store.clone();
        let ledger: Arc<dyn BookingLedger> = store.clone();

        Self {
            auth: AuthService::new(Arc::clone(&accounts), auth_config, Arc::clone(&clock)),
            accounts: AccountDirectory::new(Arc::clone(&accounts)),
            catalog: Catalog::new(inventory, Arc::clone(&accounts), Arc::clone(&clock)),
            car_bookings: CarBookings::new(Arc::clone(&ledger), Arc::clone(&clock)),
            hotel_bookings: HotelBookings::new(ledger, accounts, clock),
            readiness: store,
            admin_key: admin_key.map(Arc::from),
        }
    }
}

impl FromRef<AppState> for Arc<dyn Readiness> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.readiness)
    }
}
