//! Vehicles, hotels and room availability.

use super::WorkflowResult;
use serde::Deserialize;
use std::sync::Arc;
use voyage_core::dates::parse_date;
use voyage_core::environment::Clock;
use voyage_core::ids::{CarProviderId, HotelId, VehicleId};
use voyage_core::model::{Hotel, NewVehicle, RoomAvailability, Vehicle};
use voyage_core::store::{CredentialStore, InventoryStore, StoreError};
use voyage_core::validation::{MAX_COUNT, NumericInput, ValidationErrors, has_min_chars};

/// Body of `POST /api/carProviders/addcar`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRequest {
    /// Make and model.
    #[serde(default)]
    pub model: String,
    /// Daily rent.
    #[serde(default)]
    pub rent: Option<NumericInput>,
    /// Licence plate.
    #[serde(default, rename = "regdNumber", alias = "registrationNumber")]
    pub registration_number: String,
    /// Picture path under the uploads directory.
    #[serde(default)]
    pub image: Option<String>,
}

impl VehicleRequest {
    /// Check every field.
    ///
    /// # Errors
    ///
    /// Empty model or plate, missing or negative rent.
    pub fn validate(&self) -> Result<f64, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        errors.check(has_min_chars(&self.model, 1), "model", "model is required");
        errors.check(
            has_min_chars(&self.registration_number, 1),
            "regdNumber",
            "registration number is required",
        );
        let rent = match self.rent.as_ref().map(NumericInput::as_f64) {
            Some(Some(rent)) if rent >= 0.0 => Some(rent),
            Some(_) => {
                errors.push("rent", "rent must be a non-negative number");
                None
            }
            None => {
                errors.push("rent", "rent is required");
                None
            }
        };
        errors.into_result()?;
        Ok(rent.unwrap_or_default())
    }
}

/// Body of `PUT /api/hotels/availability`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityRequest {
    /// Calendar date.
    #[serde(default)]
    pub date: Option<String>,
    /// Rooms offered that night.
    #[serde(default)]
    pub available_rooms: Option<NumericInput>,
}

impl AvailabilityRequest {
    /// Parse into an availability entry for `hotel_id`.
    ///
    /// # Errors
    ///
    /// Missing or malformed date, missing or negative room count.
    pub fn validate(&self, hotel_id: HotelId) -> Result<RoomAvailability, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let date = match self.date.as_deref() {
            Some(raw) => parse_date(raw).map_err(|m| errors.push("date", m)).ok(),
            None => {
                errors.push("date", "date is required");
                None
            }
        };
        let rooms = self.available_rooms.as_ref().and_then(|rooms| rooms.as_count(0));
        if rooms.is_none() {
            errors.push(
                "availableRooms",
                format!("availableRooms must be a number between 0 and {MAX_COUNT}"),
            );
        }

        match (date, rooms) {
            (Some(date), Some(available_rooms)) => Ok(RoomAvailability {
                hotel_id,
                date,
                available_rooms,
            }),
            _ => Err(errors),
        }
    }
}

/// Catalogue reads and inventory owner writes.
#[derive(Clone)]
pub struct Catalog {
    inventory: Arc<dyn InventoryStore>,
    accounts: Arc<dyn CredentialStore>,
    clock: Arc<dyn Clock>,
}

impl Catalog {
    /// Create the service.
    #[must_use]
    pub fn new(
        inventory: Arc<dyn InventoryStore>,
        accounts: Arc<dyn CredentialStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            inventory,
            accounts,
            clock,
        }
    }

    /// List a vehicle for the provider.
    ///
    /// # Errors
    ///
    /// Validation failures.
    #[tracing::instrument(skip_all, fields(provider_id = %provider_id))]
    pub async fn add_vehicle(
        &self,
        provider_id: CarProviderId,
        request: &VehicleRequest,
    ) -> WorkflowResult<Vehicle> {
        let rent = request.validate()?;
        let vehicle = self
            .inventory
            .add_vehicle(
                provider_id,
                NewVehicle {
                    model: request.model.trim().to_string(),
                    rent,
                    registration_number: request.registration_number.trim().to_string(),
                    image: request.image.clone().unwrap_or_default(),
                    created_at: self.clock.now(),
                },
            )
            .await?;
        tracing::info!(vehicle_id = %vehicle.id, "Vehicle listed");
        Ok(vehicle)
    }

    /// Delete one of the provider's vehicles.
    ///
    /// # Errors
    ///
    /// `NotFound` for a vehicle of another provider, `VehicleInUse` while
    /// active bookings hold it.
    #[tracing::instrument(skip_all, fields(provider_id = %provider_id, vehicle_id = %vehicle_id))]
    pub async fn remove_vehicle(
        &self,
        provider_id: CarProviderId,
        vehicle_id: VehicleId,
    ) -> WorkflowResult<()> {
        if let Err(err) = self.inventory.remove_vehicle(provider_id, vehicle_id).await {
            tracing::warn!(error = %err, "Vehicle removal rejected");
            return Err(err.into());
        }
        tracing::info!("Vehicle removed");
        Ok(())
    }

    /// The provider's vehicles.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    pub async fn provider_vehicles(&self, provider_id: CarProviderId) -> WorkflowResult<Vec<Vehicle>> {
        Ok(self.inventory.list_provider_vehicles(provider_id).await?)
    }

    /// Every listed vehicle.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    pub async fn all_vehicles(&self) -> WorkflowResult<Vec<Vehicle>> {
        Ok(self.inventory.list_all_vehicles().await?)
    }

    /// Every hotel.
    ///
    /// # Errors
    ///
    /// Backend failures only.
    pub async fn hotels(&self) -> WorkflowResult<Vec<Hotel>> {
        Ok(self.accounts.list_hotels().await?)
    }

    /// One hotel.
    ///
    /// # Errors
    ///
    /// `NotFound` when absent.
    pub async fn hotel(&self, id: HotelId) -> WorkflowResult<Hotel> {
        self.accounts
            .get_hotel(id)
            .await?
            .ok_or_else(|| StoreError::not_found("Hotel", id).into())
    }

    /// Publish how many rooms the hotel offers on a date.
    ///
    /// # Errors
    ///
    /// Validation failures.
    #[tracing::instrument(skip_all, fields(hotel_id = %hotel_id))]
    pub async fn set_availability(
        &self,
        hotel_id: HotelId,
        request: &AvailabilityRequest,
    ) -> WorkflowResult<RoomAvailability> {
        let availability = request.validate(hotel_id)?;
        let stored = self.inventory.set_room_availability(availability).await?;
        tracing::info!(
            date = %stored.date,
            available_rooms = stored.available_rooms,
            "Room availability updated"
        );
        Ok(stored)
    }

    /// A hotel's availability by date.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown hotel.
    pub async fn availability(&self, hotel_id: HotelId) -> WorkflowResult<Vec<RoomAvailability>> {
        self.hotel(hotel_id).await?;
        Ok(self.inventory.list_room_availability(hotel_id).await?)
    }
}
