//! Behavioural tests for the in-memory store.

#![allow(clippy::unwrap_used)] // Tests can unwrap
#![allow(clippy::expect_used)] // Tests can expect
#![allow(clippy::panic)]

use chrono::NaiveDate;
use proptest::prelude::*;
use std::collections::BTreeSet;
use voyage_core::model::{BookingFilter, RoomAvailability};
use voyage_core::prelude::*;
use voyage_testing::{InMemoryStore, fixtures, properties};

fn day(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
}

struct Seeded {
    store: InMemoryStore,
    user: User,
    provider: CarProvider,
    vehicle: Vehicle,
}

async fn seeded() -> Seeded {
    let store = InMemoryStore::new();
    let user = store
        .create_user(fixtures::new_user("alice@example.com"))
        .await
        .unwrap();
    let provider = store
        .create_car_provider(fixtures::new_car_provider("fleet@example.com"))
        .await
        .unwrap();
    let vehicle = store
        .add_vehicle(provider.id, fixtures::new_vehicle("Toyota Corolla"))
        .await
        .unwrap();
    Seeded {
        store,
        user,
        provider,
        vehicle,
    }
}

#[tokio::test]
async fn duplicate_emails_are_rejected_per_principal_kind() {
    let store = InMemoryStore::new();
    store
        .create_user(fixtures::new_user("same@example.com"))
        .await
        .unwrap();

    let err = store
        .create_user(fixtures::new_user("same@example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::DuplicateEmail { .. }));

    // Different principal kinds have independent email namespaces.
    store
        .create_hotel(fixtures::new_hotel("same@example.com"))
        .await
        .unwrap();
}

#[tokio::test]
async fn credentials_lookup_returns_the_hash() {
    let store = InMemoryStore::new();
    let user = store
        .create_user(fixtures::new_user("alice@example.com"))
        .await
        .unwrap();

    let found = store
        .find_user_by_email("alice@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.principal.id, user.id);
    assert_eq!(found.password_hash, fixtures::PASSWORD_HASH);
    assert!(store.find_user_by_email("bob@example.com").await.unwrap().is_none());
}

#[tokio::test]
async fn user_plan_is_replaced() {
    let store = InMemoryStore::new();
    let user = store
        .create_user(fixtures::new_user("alice@example.com"))
        .await
        .unwrap();

    store
        .set_user_plan(user.id, serde_json::json!({"days": 3}))
        .await
        .unwrap();
    let updated = store
        .set_user_plan(user.id, serde_json::json!({"days": 5}))
        .await
        .unwrap();

    assert_eq!(updated.plan, Some(serde_json::json!({"days": 5})));
    assert!(matches!(
        store.set_user_plan(UserId::new(), serde_json::json!({})).await,
        Err(StoreError::NotFound { .. })
    ));
}

#[tokio::test]
async fn reservation_marks_dates_booked() {
    let s = seeded().await;

    let booking = s
        .store
        .reserve_vehicle(fixtures::car_booking(
            s.user.id,
            s.vehicle.id,
            &["2025-07-02", "2025-07-01"],
        ))
        .await
        .unwrap();

    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.provider_id, s.provider.id);
    assert_eq!(booking.dates, [day("2025-07-01"), day("2025-07-02")]);

    let vehicle = s.store.get_vehicle(s.vehicle.id).await.unwrap().unwrap();
    assert_eq!(vehicle.booked_dates, [day("2025-07-01"), day("2025-07-02")]);
}

#[tokio::test]
async fn colliding_reservation_changes_nothing() {
    let s = seeded().await;
    s.store
        .reserve_vehicle(fixtures::car_booking(s.user.id, s.vehicle.id, &["2025-07-02"]))
        .await
        .unwrap();

    let err = s
        .store
        .reserve_vehicle(fixtures::car_booking(
            s.user.id,
            s.vehicle.id,
            &["2025-07-01", "2025-07-02"],
        ))
        .await
        .unwrap_err();

    match err {
        StoreError::DatesUnavailable { dates, .. } => assert_eq!(dates, [day("2025-07-02")]),
        other => panic!("unexpected error: {other:?}"),
    }
    let vehicle = s.store.get_vehicle(s.vehicle.id).await.unwrap().unwrap();
    assert_eq!(vehicle.booked_dates, [day("2025-07-02")]);
    let pending = s
        .store
        .list_car_bookings_for_provider(s.provider.id, BookingFilter::All)
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
}

#[tokio::test]
async fn reserving_an_unknown_vehicle_is_not_found() {
    let s = seeded().await;
    let err = s
        .store
        .reserve_vehicle(fixtures::car_booking(s.user.id, VehicleId::new(), &["2025-07-01"]))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::NotFound { entity: "Vehicle", .. }));
}

#[tokio::test]
async fn concurrent_reservations_for_the_same_day_have_one_winner() {
    let s = seeded().await;

    let attempts = (0..8).map(|_| {
        let store = s.store.clone();
        let booking = fixtures::car_booking(s.user.id, s.vehicle.id, &["2025-08-15"]);
        tokio::spawn(async move { store.reserve_vehicle(booking).await })
    });
    let results = futures::future::join_all(attempts).await;

    let successes = results
        .iter()
        .filter(|result| result.as_ref().unwrap().is_ok())
        .count();
    assert_eq!(successes, 1);
    assert!(results.iter().all(|result| match result.as_ref().unwrap() {
        Ok(_) => true,
        Err(err) => matches!(err, StoreError::DatesUnavailable { .. }),
    }));
}

#[tokio::test]
async fn canceling_releases_dates_and_confirming_keeps_them() {
    let s = seeded().await;
    let first = s
        .store
        .reserve_vehicle(fixtures::car_booking(s.user.id, s.vehicle.id, &["2025-07-01"]))
        .await
        .unwrap();
    let second = s
        .store
        .reserve_vehicle(fixtures::car_booking(s.user.id, s.vehicle.id, &["2025-07-05"]))
        .await
        .unwrap();

    let change = s
        .store
        .set_car_booking_status(first.id, s.provider.id, BookingStatus::Canceled)
        .await
        .unwrap();
    assert_eq!(change.previous, BookingStatus::Pending);
    assert_eq!(change.booking.status, BookingStatus::Canceled);

    s.store
        .set_car_booking_status(second.id, s.provider.id, BookingStatus::Confirmed)
        .await
        .unwrap();

    let vehicle = s.store.get_vehicle(s.vehicle.id).await.unwrap().unwrap();
    assert_eq!(vehicle.booked_dates, [day("2025-07-05")]);

    // The released day can be booked again.
    s.store
        .reserve_vehicle(fixtures::car_booking(s.user.id, s.vehicle.id, &["2025-07-01"]))
        .await
        .unwrap();
}

#[tokio::test]
async fn status_updates_enforce_ownership_and_the_state_machine() {
    let s = seeded().await;
    let booking = s
        .store
        .reserve_vehicle(fixtures::car_booking(s.user.id, s.vehicle.id, &["2025-07-01"]))
        .await
        .unwrap();

    let stranger = CarProviderId::new();
    assert!(matches!(
        s.store
            .set_car_booking_status(booking.id, stranger, BookingStatus::Confirmed)
            .await,
        Err(StoreError::NotOwner { .. })
    ));
    assert!(matches!(
        s.store
            .set_car_booking_status(CarBookingId::new(), s.provider.id, BookingStatus::Confirmed)
            .await,
        Err(StoreError::NotFound { .. })
    ));

    s.store
        .set_car_booking_status(booking.id, s.provider.id, BookingStatus::Confirmed)
        .await
        .unwrap();
    assert!(matches!(
        s.store
            .set_car_booking_status(booking.id, s.provider.id, BookingStatus::Pending)
            .await,
        Err(StoreError::InvalidTransition(_))
    ));

    let stored = s.store.get_car_booking(booking.id).await.unwrap().unwrap();
    assert_eq!(stored.status, BookingStatus::Confirmed);
}

#[tokio::test]
async fn provider_listings_filter_and_enrich() {
    let s = seeded().await;
    let first = s
        .store
        .reserve_vehicle(fixtures::car_booking(s.user.id, s.vehicle.id, &["2025-07-01"]))
        .await
        .unwrap();
    s.store
        .reserve_vehicle(fixtures::car_booking(s.user.id, s.vehicle.id, &["2025-07-02"]))
        .await
        .unwrap();
    s.store
        .set_car_booking_status(first.id, s.provider.id, BookingStatus::Confirmed)
        .await
        .unwrap();

    let pending = s
        .store
        .list_car_bookings_for_provider(s.provider.id, BookingFilter::Pending)
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].user.email, "alice@example.com");
    assert_eq!(
        pending[0].vehicle.as_ref().unwrap().model,
        "Toyota Corolla"
    );

    let history = s
        .store
        .list_car_bookings_for_provider(s.provider.id, BookingFilter::All)
        .await
        .unwrap();
    assert_eq!(history.len(), 2);
    // Most recent first.
    assert_eq!(history[1].booking.id, first.id);

    let mine = s.store.list_car_bookings_for_user(s.user.id).await.unwrap();
    assert_eq!(mine.len(), 2);
    assert_eq!(mine[0].provider.email, "fleet@example.com");
}

#[tokio::test]
async fn vehicles_with_active_bookings_cannot_be_removed() {
    let s = seeded().await;
    let booking = s
        .store
        .reserve_vehicle(fixtures::car_booking(s.user.id, s.vehicle.id, &["2025-07-01"]))
        .await
        .unwrap();

    assert!(matches!(
        s.store.remove_vehicle(s.provider.id, s.vehicle.id).await,
        Err(StoreError::VehicleInUse(_))
    ));
    assert!(matches!(
        s.store.remove_vehicle(CarProviderId::new(), s.vehicle.id).await,
        Err(StoreError::NotFound { .. })
    ));

    s.store
        .set_car_booking_status(booking.id, s.provider.id, BookingStatus::Canceled)
        .await
        .unwrap();
    s.store
        .remove_vehicle(s.provider.id, s.vehicle.id)
        .await
        .unwrap();
    assert!(s.store.get_vehicle(s.vehicle.id).await.unwrap().is_none());

    // History survives without the vehicle snapshot.
    let history = s
        .store
        .list_car_bookings_for_provider(s.provider.id, BookingFilter::All)
        .await
        .unwrap();
    assert!(history[0].vehicle.is_none());
}

#[tokio::test]
async fn hotel_bookings_follow_the_same_lifecycle() {
    let store = InMemoryStore::new();
    let user = store
        .create_user(fixtures::new_user("alice@example.com"))
        .await
        .unwrap();
    let hotel = store
        .create_hotel(fixtures::new_hotel("stay@example.com"))
        .await
        .unwrap();
    let other = store
        .create_hotel(fixtures::new_hotel("other@example.com"))
        .await
        .unwrap();

    let early = store
        .create_hotel_booking(fixtures::hotel_booking(
            user.id,
            hotel.id,
            "2025-07-01",
            "2025-07-03",
            1,
        ))
        .await
        .unwrap();
    let late = store
        .create_hotel_booking(fixtures::hotel_booking(
            user.id,
            hotel.id,
            "2025-09-01",
            "2025-09-02",
            2,
        ))
        .await
        .unwrap();

    assert!(matches!(
        store
            .set_hotel_booking_status(early.id, other.id, BookingStatus::Confirmed)
            .await,
        Err(StoreError::NotOwner { .. })
    ));
    let change = store
        .set_hotel_booking_status(early.id, hotel.id, BookingStatus::Confirmed)
        .await
        .unwrap();
    assert_eq!(change.previous, BookingStatus::Pending);

    let pending = store
        .list_hotel_bookings_for_hotel(hotel.id, BookingFilter::Pending)
        .await
        .unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].booking.id, late.id);

    let history = store
        .list_hotel_bookings_for_hotel(hotel.id, BookingFilter::All)
        .await
        .unwrap();
    let order: Vec<HotelBookingId> = history.iter().map(|b| b.booking.id).collect();
    assert_eq!(order, [late.id, early.id]);

    assert!(matches!(
        store
            .create_hotel_booking(fixtures::hotel_booking(
                user.id,
                HotelId::new(),
                "2025-07-01",
                "2025-07-01",
                1,
            ))
            .await,
        Err(StoreError::NotFound { entity: "Hotel", .. })
    ));
}

#[tokio::test]
async fn room_availability_is_upserted_and_ordered() {
    let store = InMemoryStore::new();
    let hotel = store
        .create_hotel(fixtures::new_hotel("stay@example.com"))
        .await
        .unwrap();

    for (date, rooms) in [("2025-07-03", 4), ("2025-07-01", 9), ("2025-07-03", 2)] {
        store
            .set_room_availability(RoomAvailability {
                hotel_id: hotel.id,
                date: day(date),
                available_rooms: rooms,
            })
            .await
            .unwrap();
    }

    let listed = store.list_room_availability(hotel.id).await.unwrap();
    let summary: Vec<(NaiveDate, u32)> =
        listed.iter().map(|a| (a.date, a.available_rooms)).collect();
    assert_eq!(summary, [(day("2025-07-01"), 9), (day("2025-07-03"), 2)]);
}

#[tokio::test]
async fn readiness_reflects_offline_flag() {
    let store = InMemoryStore::new();
    assert!(store.ping().await.is_ok());
    store.set_offline(true);
    assert!(store.ping().await.is_err());
}

proptest! {
    #[test]
    fn successful_reservations_book_exactly_the_union(
        requests in proptest::collection::vec(properties::booking_days(), 1..6)
    ) {
        let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
        runtime.block_on(async {
            let s = seeded().await;
            let mut expected = BTreeSet::new();

            for days in requests {
                let dates = BookingDates::new(days.clone()).unwrap();
                let request = voyage_core::model::NewCarBooking {
                    user_id: s.user.id,
                    vehicle_id: s.vehicle.id,
                    dates,
                    created_at: chrono::Utc::now(),
                };
                let collides = days.iter().any(|d| expected.contains(d));
                let result = s.store.reserve_vehicle(request).await;

                prop_assert_eq!(result.is_ok(), !collides);
                if result.is_ok() {
                    expected.extend(days);
                }
            }

            let vehicle = s.store.get_vehicle(s.vehicle.id).await.unwrap().unwrap();
            let booked: Vec<NaiveDate> = expected.into_iter().collect();
            prop_assert_eq!(vehicle.booked_dates, booked);
            Ok(())
        })?;
    }
}
