//! # Voyage Testing
//!
//! Testing utilities for the Voyage workspace.
//!
//! This crate provides:
//! - [`InMemoryStore`]: every repository trait behind a single lock, with the
//!   same atomicity guarantees as the Postgres store
//! - [`FixedClock`] and [`test_clock`] for deterministic timestamps
//! - [`fixtures`]: builders for store inputs
//! - [`properties`]: proptest strategies for booking dates
//!
//! ## Example
//!
//! ```
//! use voyage_core::CredentialStore;
//! use voyage_testing::{fixtures, InMemoryStore};
//!
//! # tokio_test::block_on(async {
//! let store = InMemoryStore::new();
//! let user = store.create_user(fixtures::new_user("alice@example.com")).await.unwrap();
//! assert_eq!(user.email, "alice@example.com");
//! # });
//! ```

mod memory;

pub use memory::InMemoryStore;

use chrono::{DateTime, Utc};
use voyage_core::environment::Clock;

/// Mock implementations of environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests.
    ///
    /// ```
    /// use voyage_testing::mocks::FixedClock;
    /// use voyage_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a clock frozen at `time`.
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Fixed clock at 2025-01-01 00:00:00 UTC.
    ///
    /// # Panics
    ///
    /// Never in practice: the timestamp is a literal.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Builders for store inputs with sensible defaults.
pub mod fixtures {
    use super::mocks::test_clock;
    use voyage_core::dates::{BookingDates, StayRange};
    use voyage_core::environment::Clock;
    use voyage_core::ids::{HotelId, UserId, VehicleId};
    use voyage_core::model::{
        NewCarBooking, NewCarProvider, NewHotel, NewHotelBooking, NewUser, NewVehicle,
    };

    /// Placeholder hash; the stores never inspect it.
    pub const PASSWORD_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$fixture$fixture";

    /// A user signup with the given email.
    #[must_use]
    pub fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Alice Traveller".to_string(),
            email: email.to_string(),
            phone: "5550001111".to_string(),
            password_hash: PASSWORD_HASH.to_string(),
            created_at: test_clock().now(),
        }
    }

    /// A car provider signup with the given email.
    #[must_use]
    pub fn new_car_provider(email: &str) -> NewCarProvider {
        NewCarProvider {
            name: "Roadrunner Rentals".to_string(),
            email: email.to_string(),
            phone: "5550002222".to_string(),
            password_hash: PASSWORD_HASH.to_string(),
            created_at: test_clock().now(),
        }
    }

    /// A hotel signup with the given email.
    #[must_use]
    pub fn new_hotel(email: &str) -> NewHotel {
        NewHotel {
            name: "Harbour View Hotel".to_string(),
            email: email.to_string(),
            phone: "5550003333".to_string(),
            password_hash: PASSWORD_HASH.to_string(),
            image: Some("uploads/harbour.jpg".to_string()),
            location: Some("Lisbon".to_string()),
            address: Some("1 Quay Street".to_string()),
            rooms: 20,
            rent: 120.0,
            created_at: test_clock().now(),
        }
    }

    /// A vehicle listing.
    #[must_use]
    pub fn new_vehicle(model: &str) -> NewVehicle {
        NewVehicle {
            model: model.to_string(),
            rent: 45.0,
            registration_number: "AB-12-CD".to_string(),
            image: String::new(),
            created_at: test_clock().now(),
        }
    }

    /// A car booking request for ISO dates.
    ///
    /// # Panics
    ///
    /// If any date fails to parse.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn car_booking(user_id: UserId, vehicle_id: VehicleId, dates: &[&str]) -> NewCarBooking {
        NewCarBooking {
            user_id,
            vehicle_id,
            dates: BookingDates::parse(dates).expect("fixture dates should parse"),
            created_at: test_clock().now(),
        }
    }

    /// A hotel booking request for an inclusive ISO date range.
    ///
    /// # Panics
    ///
    /// If the dates fail to parse or are out of order.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn hotel_booking(
        user_id: UserId,
        hotel_id: HotelId,
        start: &str,
        end: &str,
        rooms: u32,
    ) -> NewHotelBooking {
        let parse = |raw: &str| {
            voyage_core::dates::parse_date(raw).expect("fixture date should parse")
        };
        NewHotelBooking {
            user_id,
            hotel_id,
            stay: StayRange::new(parse(start), parse(end)).expect("fixture stay should be ordered"),
            rooms,
            created_at: test_clock().now(),
        }
    }
}

/// Property-based testing strategies.
pub mod properties {
    use chrono::{Duration, NaiveDate};
    use proptest::collection::vec;
    use proptest::prelude::*;

    /// Days within a 60-day window starting 2025-07-01, so that generated
    /// sets overlap often.
    pub fn booking_day() -> impl Strategy<Value = NaiveDate> {
        (0i64..60).prop_map(|offset| {
            NaiveDate::from_ymd_opt(2025, 7, 1)
                .map_or(NaiveDate::MIN, |first| first + Duration::days(offset))
        })
    }

    /// Non-empty lists of booking days, possibly with duplicates.
    pub fn booking_days() -> impl Strategy<Value = Vec<NaiveDate>> {
        vec(booking_day(), 1..8)
    }
}

pub use mocks::{FixedClock, test_clock};
