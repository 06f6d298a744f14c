//! Traveller endpoints under `/api/auth`.
//!
//! - POST /createuser, POST /login
//! - POST|GET /getuser, POST /addplan, POST|GET /getplan
//! - GET /bookedcars, GET /gethotelbookings
//! - GET /gethoteldetails/:hotelId

use super::{ApiResult, audit_login};
use crate::gates::AuthUser;
use crate::server::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use voyage_auth::{LoginRequest, UserSignup};
use voyage_core::ids::HotelId;
use voyage_core::model::{Hotel, HotelBooking, User, UserCarBooking};
use voyage_web::{ClientIp, JsonBody, UserAgent, parse_id};

// ============================================================================
// Request/Response Types
// ============================================================================

/// Token returned by traveller signup and login.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserTokenResponse {
    /// Signed bearer token for the `auth-token` header.
    pub authtoken: String,
}

/// Body of `POST /addplan`.
#[derive(Debug, Deserialize)]
pub struct PlanRequest {
    /// New plan, stored as-is.
    #[serde(default)]
    pub plan: serde_json::Value,
}

/// Response of `POST /addplan`.
#[derive(Debug, Serialize)]
pub struct PlanUpdatedResponse {
    /// Outcome.
    pub message: &'static str,
    /// Stored plan.
    pub plan: Option<serde_json::Value>,
}

/// Response of `getplan`.
#[derive(Debug, Serialize)]
pub struct PlanResponse {
    /// Stored plan, `null` when none was saved.
    pub plan: Option<serde_json::Value>,
}

/// The traveller's car bookings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedCarsResponse {
    /// Bookings with vehicle and provider contact.
    pub booked_cars: Vec<UserCarBooking>,
}

/// The traveller's hotel bookings.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookedHotelsResponse {
    /// Bookings, most recent first.
    pub booked_hotels: Vec<HotelBooking>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Sign up a traveller.
///
/// # Errors
///
/// Validation failures or an email already in use.
pub async fn create_user(
    State(state): State<AppState>,
    JsonBody(signup): JsonBody<UserSignup>,
) -> ApiResult<Json<UserTokenResponse>> {
    let session = state.auth.register_user(signup).await?;
    Ok(Json(UserTokenResponse {
        authtoken: session.token,
    }))
}

/// Log a traveller in.
///
/// # Errors
///
/// Incorrect credentials.
pub async fn login(
    State(state): State<AppState>,
    ClientIp(ip): ClientIp,
    UserAgent(user_agent): UserAgent,
    JsonBody(login): JsonBody<LoginRequest>,
) -> ApiResult<Json<UserTokenResponse>> {
    let outcome = state.auth.login_user(login).await;
    let session = audit_login("user", ip, &user_agent, outcome)?;
    Ok(Json(UserTokenResponse {
        authtoken: session.token,
    }))
}

/// The authenticated traveller's profile.
pub async fn get_user(AuthUser(user): AuthUser) -> Json<User> {
    Json(user)
}

/// Replace the traveller's plan.
///
/// # Errors
///
/// Backend failures.
pub async fn add_plan(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    JsonBody(request): JsonBody<PlanRequest>,
) -> ApiResult<Json<PlanUpdatedResponse>> {
    let user = state.accounts.set_plan(user.id, request.plan).await?;
    Ok(Json(PlanUpdatedResponse {
        message: "Plan updated successfully",
        plan: user.plan,
    }))
}

/// The traveller's plan.
pub async fn get_plan(AuthUser(user): AuthUser) -> Json<PlanResponse> {
    Json(PlanResponse { plan: user.plan })
}

/// The traveller's car bookings.
///
/// # Errors
///
/// Backend failures.
pub async fn booked_cars(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> ApiResult<Json<BookedCarsResponse>> {
    let booked_cars = state.car_bookings.for_user(user.id).await?;
    Ok(Json(BookedCarsResponse { booked_cars }))
}

/// The traveller's hotel bookings.
///
/// # Errors
///
/// Backend failures.
pub async fn hotel_bookings(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> ApiResult<Json<BookedHotelsResponse>> {
    let booked_hotels = state.hotel_bookings.for_user(user.id).await?;
    Ok(Json(BookedHotelsResponse { booked_hotels }))
}

/// Public hotel detail.
///
/// # Errors
///
/// 400 for a malformed id, 404 for an unknown hotel.
pub async fn hotel_details(
    State(state): State<AppState>,
    Path(hotel_id): Path<String>,
) -> ApiResult<Json<Hotel>> {
    let hotel_id: HotelId = parse_id(&hotel_id, "hotelId")?;
    Ok(Json(state.catalog.hotel(hotel_id).await?))
}
