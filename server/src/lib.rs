//! # Voyage Server
//!
//! Travel-booking HTTP API for three kinds of account:
//!
//! - **Travellers** sign up, save a trip plan, reserve cars by the day and
//!   request hotel rooms for a stay.
//! - **Car providers** list vehicles and confirm or cancel the bookings made
//!   on them.
//! - **Hotels** publish room availability and confirm or cancel stays.
//!
//! # Architecture
//!
//! ```text
//! client ─▶ router (correlation id, trace, CORS)
//!             │
//!             ├─▶ gates (auth-token ─▶ AuthUser / AuthCarProvider / AuthHotel)
//!             │
//!             └─▶ api handlers ─▶ workflow services ─▶ repository traits
//!                                                      (PostgresStore | InMemoryStore)
//! ```
//!
//! Bookings move `pending → confirmed` or `pending → canceled` and are
//! decided only by the owner of the booked inventory. A car booking holds
//! its days on the vehicle until it is canceled; two requests for the same
//! day on the same vehicle cannot both succeed.

pub mod api;
pub mod config;
pub mod gates;
pub mod server;
pub mod workflow;

pub use config::Config;
pub use server::{AppState, build_router};
pub use workflow::WorkflowError;
