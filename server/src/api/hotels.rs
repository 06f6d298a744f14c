//! Hotel endpoints under `/api/hotels`.

use super::{ApiResult, audit_login};
use crate::gates::{AuthHotel, AuthUser};
use crate::server::state::AppState;
use crate::workflow::{AvailabilityRequest, HotelBookingRequest};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use voyage_auth::{HotelSignup, LoginRequest};
use voyage_core::ids::HotelId;
use voyage_core::model::{Hotel, HotelBooking, HotelBookingWithGuest, RoomAvailability};
use voyage_web::{ClientIp, JsonBody, UserAgent, parse_id};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response of `POST /createHotel`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelCreatedResponse {
    /// Signed bearer token for the `auth-token` header.
    pub token: String,
    /// Picture path as stored.
    pub image_path: Option<String>,
}

/// Response of `POST /login`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelTokenResponse {
    /// Signed bearer token for the `auth-token` header.
    pub auth_token: String,
}

/// Response of `POST /bookRooms`.
#[derive(Debug, Serialize)]
pub struct RoomsBookedResponse {
    /// Outcome.
    pub message: &'static str,
    /// The pending booking.
    pub booking: HotelBooking,
}

/// A hotel's booking listing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HotelBookingsResponse {
    /// Bookings with traveller details.
    pub booked_hotels: Vec<HotelBookingWithGuest>,
    /// Number of bookings listed.
    pub count: usize,
}

impl From<Vec<HotelBookingWithGuest>> for HotelBookingsResponse {
    fn from(booked_hotels: Vec<HotelBookingWithGuest>) -> Self {
        Self {
            count: booked_hotels.len(),
            booked_hotels,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Sign up a hotel.
///
/// # Errors
///
/// Validation failures or an email already in use.
pub async fn create_hotel(
    State(state): State<AppState>,
    JsonBody(signup): JsonBody<HotelSignup>,
) -> ApiResult<Json<HotelCreatedResponse>> {
    let session = state.auth.register_hotel(signup).await?;
    Ok(Json(HotelCreatedResponse {
        token: session.token,
        image_path: session.principal.image,
    }))
}

/// Log a hotel in.
///
/// # Errors
///
/// Incorrect credentials.
pub async fn login(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    UserAgent(user_agent): UserAgent,
    JsonBody(login): JsonBody<LoginRequest>,
) -> ApiResult<Json<HotelTokenResponse>> {
    let outcome = state.auth.login_hotel(login).await;
    let session = audit_login("hotel", ip, &user_agent, outcome)?;
    Ok(Json(HotelTokenResponse {
        auth_token: session.token,
    }))
}

/// The authenticated hotel's profile.
pub async fn get_hotel(AuthHotel(hotel): AuthHotel) -> Json<Hotel> {
    Json(hotel)
}

/// Every hotel.
///
/// # Errors
///
/// Backend failures.
pub async fn get_all_hotels(State(state): State<AppState>) -> ApiResult<Json<Vec<Hotel>>> {
    Ok(Json(state.catalog.hotels().await?))
}

/// Request rooms for the authenticated traveller.
///
/// # Errors
///
/// 400 for invalid input, 404 for an unknown hotel.
pub async fn book_rooms(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    JsonBody(request): JsonBody<HotelBookingRequest>,
) -> ApiResult<(StatusCode, Json<RoomsBookedResponse>)> {
    let booking = state.hotel_bookings.create(user.id, &request).await?;
    Ok((
        StatusCode::CREATED,
        Json(RoomsBookedResponse {
            message: "Booking request submitted successfully",
            booking,
        }),
    ))
}

/// Pending bookings of the authenticated hotel.
///
/// # Errors
///
/// Backend failures.
pub async fn hotel_bookings(
    State(state): State<AppState>,
    AuthHotel(hotel): AuthHotel,
) -> ApiResult<Json<HotelBookingsResponse>> {
    Ok(Json(state.hotel_bookings.pending(hotel.id).await?.into()))
}

/// Every booking of the authenticated hotel, latest stay first.
///
/// # Errors
///
/// Backend failures.
pub async fn hotel_booking_history(
    State(state): State<AppState>,
    AuthHotel(hotel): AuthHotel,
) -> ApiResult<Json<HotelBookingsResponse>> {
    Ok(Json(state.hotel_bookings.history(hotel.id).await?.into()))
}

/// Publish the rooms the authenticated hotel offers on a date.
///
/// # Errors
///
/// Validation failures.
pub async fn set_availability(
    State(state): State<AppState>,
    AuthHotel(hotel): AuthHotel,
    JsonBody(request): JsonBody<AvailabilityRequest>,
) -> ApiResult<Json<RoomAvailability>> {
    Ok(Json(state.catalog.set_availability(hotel.id, &request).await?))
}

/// Public room availability of a hotel.
///
/// # Errors
///
/// 400 for a malformed id, 404 for an unknown hotel.
pub async fn get_availability(
    State(state): State<AppState>,
    Path(hotel_id): Path<String>,
) -> ApiResult<Json<Vec<RoomAvailability>>> {
    let hotel_id: HotelId = parse_id(&hotel_id, "hotelId")?;
    Ok(Json(state.catalog.availability(hotel_id).await?))
}
