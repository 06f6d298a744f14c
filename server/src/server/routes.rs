//! Router configuration for the Voyage API.

use super::state::AppState;
use crate::api::{admin, bookings, car_providers, hotels, users};
use axum::{
    Router,
    routing::{delete, get, post, put},
};
use std::path::Path;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};
use voyage_web::correlation_id_layer;
use voyage_web::handlers::{health_check, readiness_check};

/// Build the complete Axum router.
///
/// - `/health`, `/ready`: liveness and store readiness
/// - `/api/*`: the JSON API
/// - `/uploads/*`: static files from `uploads_dir`
pub fn build_router(state: AppState, uploads_dir: impl AsRef<Path>) -> Router {
    let auth_routes = Router::new()
        .route("/createuser", post(users::create_user))
        .route("/login", post(users::login))
        .route("/getuser", post(users::get_user).get(users::get_user))
        .route("/addplan", post(users::add_plan))
        .route("/getplan", post(users::get_plan).get(users::get_plan))
        .route("/bookedcars", get(users::booked_cars))
        .route("/gethotelbookings", get(users::hotel_bookings))
        .route("/gethoteldetails/:hotelId", get(users::hotel_details));

    let car_provider_routes = Router::new()
        .route("/create", post(car_providers::create))
        .route("/login", post(car_providers::login))
        .route(
            "/getcarprovider",
            post(car_providers::get_car_provider).get(car_providers::get_car_provider),
        )
        .route("/addcar", post(car_providers::add_car))
        .route("/removecar/:carId", delete(car_providers::remove_car))
        .route("/getcars", get(car_providers::get_cars))
        .route("/getallcars", get(car_providers::get_all_cars))
        .route("/getbookings", get(car_providers::get_bookings));

    let booking_routes = Router::new()
        .route("/addnewcarbooking", post(bookings::add_car_booking))
        .route("/getmypendingrequests", get(bookings::car_pending_requests))
        .route("/updatestatus/:id", put(bookings::update_car_status))
        .route(
            "/getmyhotelpendingrequests",
            get(bookings::hotel_pending_requests),
        )
        .route("/updatehotelbooking/:id", put(bookings::update_hotel_status));

    let hotel_routes = Router::new()
        .route("/createHotel", post(hotels::create_hotel))
        .route("/login", post(hotels::login))
        .route("/getHotel", get(hotels::get_hotel))
        .route("/getAllHotels", get(hotels::get_all_hotels))
        .route("/bookRooms", post(hotels::book_rooms))
        .route("/gethotelbookings", get(hotels::hotel_bookings))
        .route("/gethotelbookinghistory", get(hotels::hotel_booking_history))
        .route("/updatehotelbooking/:id", put(bookings::update_hotel_status))
        .route("/availability", put(hotels::set_availability))
        .route("/:hotelId/availability", get(hotels::get_availability));

    let admin_routes = Router::new()
        .route("/users", get(admin::users))
        .route("/carproviders", get(admin::car_providers))
        .route("/hotels", get(admin::hotels));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/carProviders", car_provider_routes)
        .nest("/bookings", booking_routes)
        .nest("/hotels", hotel_routes)
        .nest("/admin", admin_routes);

    Router::new()
        // Health checks (no authentication)
        .route("/health", get(health_check))
        .route("/ready", get(readiness_check))
        .nest("/api", api_routes)
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .layer(correlation_id_layer())
}
