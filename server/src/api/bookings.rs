//! Booking endpoints under `/api/bookings`.
//!
//! The hotel status update is also mounted under `/api/hotels`.

use super::{ApiResult, PendingResponse, StatusRequest, StatusUpdateResponse};
use crate::gates::{AuthCarProvider, AuthHotel, AuthUser};
use crate::server::state::AppState;
use crate::workflow::CarBookingRequest;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Serialize;
use voyage_core::ids::{CarBookingId, HotelBookingId};
use voyage_core::model::{CarBooking, HotelBooking, HotelBookingWithGuest, ProviderCarBooking};
use voyage_web::{JsonBody, parse_id};

/// Response of `POST /addnewcarbooking`.
#[derive(Debug, Serialize)]
pub struct CarBookingCreated {
    /// Always `true`.
    pub success: bool,
    /// Outcome.
    pub message: &'static str,
    /// The pending booking.
    pub booking: CarBooking,
}

/// Reserve a vehicle for the authenticated traveller.
///
/// # Errors
///
/// 400 for invalid input or already booked days, 404 for an unknown vehicle.
pub async fn add_car_booking(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    JsonBody(request): JsonBody<CarBookingRequest>,
) -> ApiResult<(StatusCode, Json<CarBookingCreated>)> {
    let booking = state.car_bookings.create(user.id, &request).await?;
    Ok((
        StatusCode::CREATED,
        Json(CarBookingCreated {
            success: true,
            message: "Booking successful",
            booking,
        }),
    ))
}

/// Pending car bookings of the authenticated provider.
///
/// # Errors
///
/// Backend failures.
pub async fn car_pending_requests(
    State(state): State<AppState>,
    AuthCarProvider(provider): AuthCarProvider,
) -> ApiResult<Json<PendingResponse<ProviderCarBooking>>> {
    let pending = state.car_bookings.pending(provider.id).await?;
    Ok(Json(PendingResponse::new(pending)))
}

/// Confirm or cancel a car booking of the authenticated provider.
///
/// # Errors
///
/// 400 for an invalid status or transition, 403 for another provider's
/// booking, 404 for an unknown booking.
pub async fn update_car_status(
    State(state): State<AppState>,
    AuthCarProvider(provider): AuthCarProvider,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<StatusRequest>,
) -> ApiResult<Json<StatusUpdateResponse<CarBooking>>> {
    let booking_id: CarBookingId = parse_id(&id, "id")?;
    let change = state
        .car_bookings
        .update_status(provider.id, booking_id, &request.status)
        .await?;
    let new_status = change.booking.status;
    Ok(Json(StatusUpdateResponse::new(change, new_status)))
}

/// Pending hotel bookings of the authenticated hotel.
///
/// # Errors
///
/// Backend failures.
pub async fn hotel_pending_requests(
    State(state): State<AppState>,
    AuthHotel(hotel): AuthHotel,
) -> ApiResult<Json<PendingResponse<HotelBookingWithGuest>>> {
    let pending = state.hotel_bookings.pending(hotel.id).await?;
    Ok(Json(PendingResponse::new(pending)))
}

/// Confirm or cancel a booking of the authenticated hotel.
///
/// # Errors
///
/// 400 for an invalid status or transition, 403 for another hotel's
/// booking, 404 for an unknown booking.
pub async fn update_hotel_status(
    State(state): State<AppState>,
    AuthHotel(hotel): AuthHotel,
    Path(id): Path<String>,
    JsonBody(request): JsonBody<StatusRequest>,
) -> ApiResult<Json<StatusUpdateResponse<HotelBooking>>> {
    let booking_id: HotelBookingId = parse_id(&id, "id")?;
    let change = state
        .hotel_bookings
        .update_status(hotel.id, booking_id, &request.status)
        .await?;
    let new_status = change.booking.status;
    Ok(Json(StatusUpdateResponse::new(change, new_status)))
}
