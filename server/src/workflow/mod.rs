//! Booking workflows and catalogue operations.
//!
//! Each service validates raw request input, delegates to the repository
//! traits and logs the outcome. Atomicity lives in the stores; the services
//! hold no state of their own beyond their dependencies.

pub mod accounts;
pub mod car;
pub mod catalog;
pub mod hotel;

pub use accounts::AccountDirectory;
pub use car::{CarBookingRequest, CarBookings};
pub use catalog::{AvailabilityRequest, Catalog, VehicleRequest};
pub use hotel::{HotelBookingRequest, HotelBookings};

use axum::response::{IntoResponse, Response};
use thiserror::Error;
use voyage_auth::AuthError;
use voyage_core::status::UnknownStatus;
use voyage_core::store::StoreError;
use voyage_core::validation::ValidationErrors;
use voyage_web::AppError;

/// Failures of the request-level operations.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Input failed validation.
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// Signup, login or token failure.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Repository failure, including conflicts and ownership violations.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Already shaped for the client.
    #[error(transparent)]
    Http(#[from] AppError),
}

impl From<UnknownStatus> for WorkflowError {
    fn from(err: UnknownStatus) -> Self {
        Self::Validation(ValidationErrors::single("status", err.to_string()))
    }
}

impl From<WorkflowError> for AppError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::Validation(errors) => Self::validation(errors),
            WorkflowError::Store(err) => err.into(),
            WorkflowError::Http(err) => err,
            WorkflowError::Auth(err) => auth_error(err),
        }
    }
}

fn auth_error(err: AuthError) -> AppError {
    match err {
        AuthError::Validation(errors) => AppError::validation(errors),
        AuthError::InvalidCredentials => AppError::bad_request(err.to_string()),
        AuthError::EmailTaken { .. } => AppError::conflict(err.to_string()),
        AuthError::Unauthenticated => AppError::unauthorized(err.to_string()),
        AuthError::Store(err) => err.into(),
        AuthError::PasswordHash(_) | AuthError::TokenSigning(_) => {
            AppError::internal("An internal error occurred").with_source(err.into())
        }
    }
}

impl IntoResponse for WorkflowError {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

/// Result of a workflow operation.
pub type WorkflowResult<T> = Result<T, WorkflowError>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use voyage_core::ids::VehicleId;

    #[test]
    fn auth_failures_map_to_client_errors() {
        let cases = [
            (AuthError::InvalidCredentials, StatusCode::BAD_REQUEST),
            (
                AuthError::EmailTaken {
                    email: "a@example.com".into(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (AuthError::Unauthenticated, StatusCode::UNAUTHORIZED),
            (AuthError::PasswordHash("bad".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(AppError::from(WorkflowError::from(err)).status(), status);
        }
    }

    #[test]
    fn unknown_status_is_a_validation_error() {
        let err = WorkflowError::from(UnknownStatus("approved".into()));
        let app = AppError::from(err);
        assert_eq!(app.status(), StatusCode::BAD_REQUEST);
        assert_eq!(app.code(), "VALIDATION_ERROR");
    }

    #[test]
    fn store_conflicts_keep_their_message() {
        let err = WorkflowError::from(StoreError::VehicleInUse(VehicleId::new()));
        let app = AppError::from(err);
        assert_eq!(app.code(), "CONFLICT");
        assert!(app.to_string().contains("still has pending or confirmed bookings"));
    }
}
