//! Car booking workflow: travellers reserve days on a vehicle, providers
//! confirm or cancel.

use super::WorkflowResult;
use serde::Deserialize;
use std::sync::Arc;
use voyage_core::dates::BookingDates;
use voyage_core::environment::Clock;
use voyage_core::ids::{CarBookingId, CarProviderId, UserId, VehicleId};
use voyage_core::model::{
    BookingFilter, CarBooking, NewCarBooking, ProviderCarBooking, StatusChange, UserCarBooking,
};
use voyage_core::status::BookingStatus;
use voyage_core::store::{BookingLedger, StoreError};
use voyage_core::validation::ValidationErrors;

/// Body of `POST /api/bookings/addnewcarbooking`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarBookingRequest {
    /// Vehicle to reserve.
    #[serde(default)]
    pub car_id: Option<String>,
    /// Requested days, `YYYY-MM-DD` or RFC 3339.
    #[serde(default)]
    pub dates: Vec<String>,
}

impl CarBookingRequest {
    /// Parse the vehicle id and days, reporting every failing field.
    ///
    /// # Errors
    ///
    /// A missing or malformed `carId`, an empty `dates` list or any
    /// unparseable date.
    pub fn validate(&self) -> Result<(VehicleId, BookingDates), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let vehicle_id = match self.car_id.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => raw.parse::<VehicleId>().map_or_else(
                |_| {
                    errors.push("carId", format!("{raw} is not a valid id"));
                    None
                },
                Some,
            ),
            _ => {
                errors.push("carId", "carId is required");
                None
            }
        };

        let dates = match BookingDates::parse(&self.dates) {
            Ok(dates) => Some(dates),
            Err(failed) => {
                for error in failed.errors() {
                    errors.push(error.field.clone(), error.message.clone());
                }
                None
            }
        };

        match (vehicle_id, dates) {
            (Some(vehicle_id), Some(dates)) => Ok((vehicle_id, dates)),
            _ => Err(errors),
        }
    }
}

/// Car booking operations.
#[derive(Clone)]
pub struct CarBookings {
    ledger: Arc<dyn BookingLedger>,
    clock: Arc<dyn Clock>,
}

impl CarBookings {
    /// Create the service.
    #[must_use]
    pub fn new(ledger: Arc<dyn BookingLedger>, clock: Arc<dyn Clock>) -> Self {
        Self { ledger, clock }
    }

    /// Reserve a vehicle for the requested days.
    ///
    /// # Errors
    ///
    /// Validation failures, `NotFound` for an unknown vehicle and
    /// `DatesUnavailable` when any day is already held.
    #[tracing::instrument(skip_all, fields(user_id = %user_id))]
    pub async fn create(
        &self,
        user_id: UserId,
        request: &CarBookingRequest,
    ) -> WorkflowResult<CarBooking> {
        let (vehicle_id, dates) = request.validate()?;

        let booking = NewCarBooking {
            user_id,
            vehicle_id,
            dates,
            created_at: self.clock.now(),
        };

        match self.ledger.reserve_vehicle(booking).await {
            Ok(booking) => {
                tracing::info!(
                    booking_id = %booking.id,
                    vehicle_id = %vehicle_id,
                    days = booking.dates.len(),
                    "Car booking requested"
                );
                Ok(booking)
            }
            Err(err @ StoreError::DatesUnavailable { .. }) => {
                tracing::warn!(vehicle_id = %vehicle_id, error = %err, "Car booking rejected");
                Err(err.into())
            }
            Err(err) => Err(err.into()),
        }
    }

    /// Bookings of the provider's vehicles still awaiting a decision.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    pub async fn pending(&self, provider_id: CarProviderId) -> WorkflowResult<Vec<ProviderCarBooking>> {
        Ok(self
            .ledger
            .list_car_bookings_for_provider(provider_id, BookingFilter::Pending)
            .await?)
    }

    /// Every booking of the provider's vehicles, most recent first.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    pub async fn history(&self, provider_id: CarProviderId) -> WorkflowResult<Vec<ProviderCarBooking>> {
        Ok(self
            .ledger
            .list_car_bookings_for_provider(provider_id, BookingFilter::All)
            .await?)
    }

    /// Move a booking of the provider to the requested status.
    ///
    /// # Errors
    ///
    /// A validation error for an unknown status, `NotFound`, `NotOwner` when
    /// the booking belongs to another provider and `InvalidTransition` for a
    /// decided booking.
    #[tracing::instrument(skip_all, fields(provider_id = %provider_id, booking_id = %booking_id))]
    pub async fn update_status(
        &self,
        provider_id: CarProviderId,
        booking_id: CarBookingId,
        status: &str,
    ) -> WorkflowResult<StatusChange<CarBooking>> {
        let status: BookingStatus = status.trim().parse()?;

        match self
            .ledger
            .set_car_booking_status(booking_id, provider_id, status)
            .await
        {
            Ok(change) => {
                tracing::info!(
                    from = %change.previous,
                    to = %change.booking.status,
                    "Car booking status updated"
                );
                Ok(change)
            }
            Err(err) => {
                tracing::warn!(error = %err, requested = %status, "Car booking status update rejected");
                Err(err.into())
            }
        }
    }

    /// The traveller's own car bookings with vehicle and provider contact.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    pub async fn for_user(&self, user_id: UserId) -> WorkflowResult<Vec<UserCarBooking>> {
        Ok(self.ledger.list_car_bookings_for_user(user_id).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::workflow::WorkflowError;
    use voyage_core::model::Vehicle;
    use voyage_core::store::{CredentialStore, InventoryStore};
    use voyage_testing::mocks::test_clock;
    use voyage_testing::{InMemoryStore, fixtures};

    struct Fixture {
        store: Arc<InMemoryStore>,
        service: CarBookings,
        user: UserId,
        provider: CarProviderId,
        vehicle: Vehicle,
    }

    async fn fixture() -> Fixture {
        let store = Arc::new(InMemoryStore::new());
        let user = store
            .create_user(fixtures::new_user("alice@example.com"))
            .await
            .unwrap();
        let provider = store
            .create_car_provider(fixtures::new_car_provider("fleet@example.com"))
            .await
            .unwrap();
        let vehicle = store
            .add_vehicle(provider.id, fixtures::new_vehicle("Civic"))
            .await
            .unwrap();
        let service = CarBookings::new(store.clone(), Arc::new(test_clock()));
        Fixture {
            store,
            service,
            user: user.id,
            provider: provider.id,
            vehicle,
        }
    }

    fn request(vehicle: VehicleId, dates: &[&str]) -> CarBookingRequest {
        CarBookingRequest {
            car_id: Some(vehicle.to_string()),
            dates: dates.iter().map(ToString::to_string).collect(),
        }
    }

    #[test]
    fn validation_reports_every_field() {
        let errors = CarBookingRequest {
            car_id: Some("not-a-uuid".into()),
            dates: vec!["2025-03-01".into(), "soon".into()],
        }
        .validate()
        .unwrap_err();

        let fields: Vec<_> = errors.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["carId", "dates[1]"]);

        let errors = CarBookingRequest::default().validate().unwrap_err();
        let fields: Vec<_> = errors.errors().iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, ["carId", "dates"]);
    }

    #[tokio::test]
    async fn booking_marks_the_union_of_days() {
        let f = fixture().await;

        let booking = f
            .service
            .create(f.user, &request(f.vehicle.id, &["2025-03-02", "2025-03-01T10:00:00Z"]))
            .await
            .unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.provider_id, f.provider);
        assert_eq!(booking.created_at, test_clock().now());

        f.service
            .create(f.user, &request(f.vehicle.id, &["2025-03-05"]))
            .await
            .unwrap();

        let vehicle = f.store.get_vehicle(f.vehicle.id).await.unwrap().unwrap();
        let days: Vec<_> = vehicle.booked_dates.iter().map(ToString::to_string).collect();
        assert_eq!(days, ["2025-03-01", "2025-03-02", "2025-03-05"]);
    }

    #[tokio::test]
    async fn colliding_days_are_rejected_without_changes() {
        let f = fixture().await;
        f.service
            .create(f.user, &request(f.vehicle.id, &["2025-03-01"]))
            .await
            .unwrap();

        let err = f
            .service
            .create(f.user, &request(f.vehicle.id, &["2025-03-01", "2025-03-02"]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WorkflowError::Store(StoreError::DatesUnavailable { .. })
        ));

        let vehicle = f.store.get_vehicle(f.vehicle.id).await.unwrap().unwrap();
        assert_eq!(vehicle.booked_dates.len(), 1);
        assert_eq!(f.service.pending(f.provider).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn unknown_vehicle_is_not_found() {
        let f = fixture().await;
        let err = f
            .service
            .create(f.user, &request(VehicleId::new(), &["2025-03-01"]))
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Store(StoreError::NotFound { .. })));
    }

    #[tokio::test]
    async fn provider_decides_its_own_bookings() {
        let f = fixture().await;
        let booking = f
            .service
            .create(f.user, &request(f.vehicle.id, &["2025-03-01"]))
            .await
            .unwrap();

        let other = f
            .store
            .create_car_provider(fixtures::new_car_provider("other@example.com"))
            .await
            .unwrap();
        let err = f
            .service
            .update_status(other.id, booking.id, "confirmed")
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Store(StoreError::NotOwner { .. })));

        let err = f
            .service
            .update_status(f.provider, booking.id, "approved")
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::Validation(_)));

        let change = f
            .service
            .update_status(f.provider, booking.id, "confirmed")
            .await
            .unwrap();
        assert_eq!(change.previous, BookingStatus::Pending);
        assert_eq!(change.booking.status, BookingStatus::Confirmed);

        assert!(f.service.pending(f.provider).await.unwrap().is_empty());
        let history = f.service.history(f.provider).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].user.email, "alice@example.com");
        assert_eq!(
            history[0].vehicle.as_ref().map(|v| v.model.as_str()),
            Some("Civic")
        );
    }

    #[tokio::test]
    async fn canceling_releases_the_days() {
        let f = fixture().await;
        let booking = f
            .service
            .create(f.user, &request(f.vehicle.id, &["2025-03-01"]))
            .await
            .unwrap();

        f.service
            .update_status(f.provider, booking.id, "canceled")
            .await
            .unwrap();
        f.service
            .create(f.user, &request(f.vehicle.id, &["2025-03-01"]))
            .await
            .expect("released day can be booked again");

        let mine = f.service.for_user(f.user).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].provider.email, "fleet@example.com");
    }
}
