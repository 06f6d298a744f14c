//! Car provider endpoints under `/api/carProviders`.

use super::{ApiResult, audit_login};
use crate::gates::AuthCarProvider;
use crate::server::state::AppState;
use crate::workflow::VehicleRequest;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use voyage_auth::{LoginRequest, ProviderSignup};
use voyage_core::ids::VehicleId;
use voyage_core::model::{CarProvider, ProviderCarBooking, Vehicle};
use voyage_web::{ClientIp, JsonBody, UserAgent, parse_id};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Token returned by provider signup and login.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderTokenResponse {
    /// Signed bearer token for the `auth-token` header.
    pub auth_token: String,
}

/// Response of `POST /addcar`.
#[derive(Debug, Serialize)]
pub struct AddCarResponse {
    /// The new listing.
    pub car: Vehicle,
    /// Every vehicle of the provider, including the new one.
    pub cars: Vec<Vehicle>,
}

/// Response of `DELETE /removecar/:carId`.
#[derive(Debug, Serialize)]
pub struct RemoveCarResponse {
    /// Always `true`.
    pub success: bool,
    /// Outcome.
    pub message: &'static str,
}

// ============================================================================
// Handlers
// ============================================================================

/// Sign up a car provider.
///
/// # Errors
///
/// Validation failures or an email already in use.
pub async fn create(
    State(state): State<AppState>,
    JsonBody(signup): JsonBody<ProviderSignup>,
) -> ApiResult<Json<ProviderTokenResponse>> {
    let session = state.auth.register_car_provider(signup).await?;
    Ok(Json(ProviderTokenResponse {
        auth_token: session.token,
    }))
}

/// Log a car provider in.
///
/// # Errors
///
/// Incorrect credentials.
pub async fn login(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    UserAgent(user_agent): UserAgent,
    JsonBody(login): JsonBody<LoginRequest>,
) -> ApiResult<Json<ProviderTokenResponse>> {
    let outcome = state.auth.login_car_provider(login).await;
    let session = audit_login("car_provider", ip, &user_agent, outcome)?;
    Ok(Json(ProviderTokenResponse {
        auth_token: session.token,
    }))
}

/// The authenticated provider's profile.
pub async fn get_car_provider(AuthCarProvider(provider): AuthCarProvider) -> Json<CarProvider> {
    Json(provider)
}

/// List a vehicle.
///
/// # Errors
///
/// Validation failures.
pub async fn add_car(
    State(state): State<AppState>,
    AuthCarProvider(provider): AuthCarProvider,
    JsonBody(request): JsonBody<VehicleRequest>,
) -> ApiResult<(StatusCode, Json<AddCarResponse>)> {
    let car = state.catalog.add_vehicle(provider.id, &request).await?;
    let cars = state.catalog.provider_vehicles(provider.id).await?;
    Ok((StatusCode::CREATED, Json(AddCarResponse { car, cars })))
}

/// Delete one of the provider's vehicles.
///
/// # Errors
///
/// 404 for a vehicle of another provider, 400 while bookings hold it.
pub async fn remove_car(
    State(state): State<AppState>,
    AuthCarProvider(provider): AuthCarProvider,
    Path(car_id): Path<String>,
) -> ApiResult<Json<RemoveCarResponse>> {
    let vehicle_id: VehicleId = parse_id(&car_id, "carId")?;
    state.catalog.remove_vehicle(provider.id, vehicle_id).await?;
    Ok(Json(RemoveCarResponse {
        success: true,
        message: "Car removed",
    }))
}

/// The provider's vehicles.
///
/// # Errors
///
/// Backend failures.
pub async fn get_cars(
    State(state): State<AppState>,
    AuthCarProvider(provider): AuthCarProvider,
) -> ApiResult<Json<Vec<Vehicle>>> {
    Ok(Json(state.catalog.provider_vehicles(provider.id).await?))
}

/// Every listed vehicle, for browsing.
///
/// # Errors
///
/// Backend failures.
pub async fn get_all_cars(State(state): State<AppState>) -> ApiResult<Json<Vec<Vehicle>>> {
    Ok(Json(state.catalog.all_vehicles().await?))
}

/// Every booking of the provider's vehicles with traveller and vehicle
/// details.
///
/// # Errors
///
/// Backend failures.
pub async fn get_bookings(
    State(state): State<AppState>,
    AuthCarProvider(provider): AuthCarProvider,
) -> ApiResult<Json<Vec<ProviderCarBooking>>> {
    Ok(Json(state.car_bookings.history(provider.id).await?))
}
