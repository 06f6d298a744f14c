//! Authentication gates.
//!
//! Axum extractors that resolve the `auth-token` header to a principal of
//! one specific kind:
//!
//! - [`AuthUser`]: travellers
//! - [`AuthCarProvider`]: car rental providers
//! - [`AuthHotel`]: hotels
//! - [`AdminAccess`]: the optional `admin-key` check on admin listings
//!
//! A token signed for one kind is rejected by the other gates.
//!
//! # Usage
//!
//! ```rust,ignore
//! async fn get_user(AuthUser(user): AuthUser) -> Json<User> {
//!     Json(user)
//! }
//! ```

use crate::server::state::AppState;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use voyage_auth::AuthError;
use voyage_core::model::{CarProvider, Hotel, User};
use voyage_web::{AppError, AuthToken};

/// Header carrying the admin key.
pub const ADMIN_KEY_HEADER: &str = "admin-key";

/// Map a failed token resolution to a response, keeping backend outages
/// distinct from bad tokens.
fn rejection(kind: &'static str, err: AuthError) -> AppError {
    match err {
        AuthError::Store(store) => {
            AppError::internal("An internal error occurred").with_source(store.into())
        }
        other => {
            tracing::warn!(kind, reason = %other, "Rejected token");
            AppError::unauthorized("Please authenticate using a valid token")
        }
    }
}

/// Authenticated traveller.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthToken(token) = AuthToken::from_request_parts(parts, state).await?;
        let user = state
            .auth
            .authenticate_user(&token)
            .await
            .map_err(|err| rejection("user", err))?;
        tracing::debug!(user_id = %user.id, "Authenticated user");
        Ok(Self(user))
    }
}

/// Authenticated car provider.
#[derive(Debug, Clone)]
pub struct AuthCarProvider(pub CarProvider);

#[async_trait]
impl FromRequestParts<AppState> for AuthCarProvider {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthToken(token) = AuthToken::from_request_parts(parts, state).await?;
        let provider = state
            .auth
            .authenticate_car_provider(&token)
            .await
            .map_err(|err| rejection("car_provider", err))?;
        tracing::debug!(provider_id = %provider.id, "Authenticated car provider");
        Ok(Self(provider))
    }
}

/// Authenticated hotel.
#[derive(Debug, Clone)]
pub struct AuthHotel(pub Hotel);

#[async_trait]
impl FromRequestParts<AppState> for AuthHotel {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthToken(token) = AuthToken::from_request_parts(parts, state).await?;
        let hotel = state
            .auth
            .authenticate_hotel(&token)
            .await
            .map_err(|err| rejection("hotel", err))?;
        tracing::debug!(hotel_id = %hotel.id, "Authenticated hotel");
        Ok(Self(hotel))
    }
}

/// Admin listing access.
///
/// Open when no admin key is configured. Otherwise the `admin-key` header
/// must match it.
#[derive(Debug, Clone, Copy)]
pub struct AdminAccess;

#[async_trait]
impl FromRequestParts<AppState> for AdminAccess {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.admin_key.as_deref() else {
            return Ok(Self);
        };

        let provided = parts
            .headers
            .get(ADMIN_KEY_HEADER)
            .and_then(|value| value.to_str().ok());
        if provided == Some(expected) {
            Ok(Self)
        } else {
            tracing::warn!("Rejected admin request");
            Err(AppError::unauthorized("Invalid admin key"))
        }
    }
}
