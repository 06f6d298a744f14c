//! # Voyage Core
//!
//! Domain types and persistence abstractions for the Voyage travel-booking
//! service.
//!
//! The crate is split the same way the rest of the workspace is layered:
//!
//! - **Pure domain** ([`ids`], [`model`], [`status`], [`dates`],
//!   [`validation`]): plain data and total functions with no I/O. The booking
//!   state machine lives in [`status::BookingStatus::transition_to`].
//! - **Environment** ([`environment`]): the [`Clock`](environment::Clock)
//!   dependency, injected so tests can pin time.
//! - **Repository traits** ([`store`]): [`CredentialStore`],
//!   [`InventoryStore`], [`BookingLedger`] and [`Readiness`]. Implemented by
//!   `voyage-postgres` for production and `voyage-testing` for tests.
//!
//! # Example
//!
//! ```
//! use voyage_core::status::BookingStatus;
//!
//! let next = BookingStatus::Pending
//!     .transition_to(BookingStatus::Confirmed)
//!     .unwrap();
//! assert_eq!(next, BookingStatus::Confirmed);
//! assert!(BookingStatus::Confirmed.transition_to(BookingStatus::Pending).is_err());
//! ```

pub mod dates;
pub mod environment;
pub mod ids;
pub mod model;
pub mod status;
pub mod store;
pub mod validation;

pub use store::{BookingLedger, CredentialStore, InventoryStore, Readiness, StoreError};

/// Convenience re-exports for downstream crates.
pub mod prelude {
    pub use crate::dates::{BookingDates, StayRange};
    pub use crate::environment::{Clock, SystemClock};
    pub use crate::ids::{
        CarBookingId, CarProviderId, HotelBookingId, HotelId, UserId, VehicleId,
    };
    pub use crate::model::{
        BookingFilter, CarBooking, CarProvider, Hotel, HotelBooking, User, Vehicle,
    };
    pub use crate::status::BookingStatus;
    pub use crate::store::{BookingLedger, CredentialStore, InventoryStore, Readiness, StoreError};
    pub use crate::validation::{NumericInput, ValidationErrors};
}
