//! Axum integration for Voyage.
//!
//! This crate holds the HTTP glue shared by every Voyage service, kept apart
//! from the domain so handlers stay thin:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         HTTP shell (Axum)               │  ← JSON in/out, headers
//! │  - extractors, AppError, middleware     │  ← correlation ids, tracing
//! ├─────────────────────────────────────────┤
//! │         Domain (voyage-core)            │
//! │  - booking state machine, validation    │  ← no I/O
//! │  - repository traits                    │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Request Flow
//!
//! 1. **Correlation layer** tags the request and opens an `http_request` span
//! 2. **Extractors** pull the JSON body, path ids and the `auth-token` header
//! 3. **Handler** calls into a service and maps the outcome
//! 4. **`AppError`** renders any failure as `{"error", "code"}` JSON
//!
//! # Example
//!
//! ```ignore
//! use voyage_web::{AppError, JsonBody};
//! use axum::Json;
//!
//! async fn handler(JsonBody(request): JsonBody<Request>) -> Result<Json<Response>, AppError> {
//!     let outcome = service.run(request).await?;
//!     Ok(Json(outcome.into()))
//! }
//! ```

#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;

// Re-export key types for convenience
pub use error::AppError;
pub use extractors::{AuthToken, ClientIp, JsonBody, UserAgent, parse_id};
pub use middleware::{CORRELATION_ID_HEADER, correlation_id_layer};

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
