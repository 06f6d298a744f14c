//! Signup, login and token resolution.

use crate::config::AuthConfig;
use crate::error::{AuthError, Result};
use crate::password::{hash_password_blocking, verify_password_blocking};
use crate::principal::{Principal, PrincipalKind};
use crate::signup::{HotelSignup, LoginRequest, ProviderSignup, UserSignup, normalize_email};
use crate::token::TokenIssuer;
use std::sync::Arc;
use voyage_core::CredentialStore;
use voyage_core::environment::Clock;
use voyage_core::ids::{CarProviderId, HotelId, UserId};
use voyage_core::model::{
    CarProvider, Credentials, Hotel, NewCarProvider, NewHotel, NewUser, User,
};

/// A principal together with a freshly issued bearer token.
#[derive(Debug, Clone)]
pub struct Authenticated<P> {
    /// Bearer token for the `auth-token` header.
    pub token: String,
    /// The authenticated profile.
    pub principal: P,
}

/// Authentication entry point shared by the HTTP handlers and gates.
#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    tokens: TokenIssuer,
    clock: Arc<dyn Clock>,
}

impl AuthService {
    /// Create the service.
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>, config: &AuthConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            tokens: TokenIssuer::new(config),
            clock,
        }
    }

    /// The token issuer in use.
    #[must_use]
    pub const fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// Create a traveller account and sign a token for it.
    ///
    /// # Errors
    ///
    /// [`AuthError::Validation`] for bad fields, [`AuthError::EmailTaken`]
    /// for a duplicate email.
    #[tracing::instrument(skip_all, fields(kind = "user"))]
    pub async fn register_user(&self, signup: UserSignup) -> Result<Authenticated<User>> {
        signup.validate()?;
        let password_hash = hash_password_blocking(signup.password).await?;
        let user = self
            .store
            .create_user(NewUser {
                name: signup.name.trim().to_string(),
                email: normalize_email(&signup.email),
                phone: signup.phone.trim().to_string(),
                password_hash,
                created_at: self.clock.now(),
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");
        self.authenticated(user)
    }

    /// Create a car provider account and sign a token for it.
    ///
    /// # Errors
    ///
    /// [`AuthError::Validation`] for bad fields, [`AuthError::EmailTaken`]
    /// for a duplicate email.
    #[tracing::instrument(skip_all, fields(kind = "car_provider"))]
    pub async fn register_car_provider(
        &self,
        signup: ProviderSignup,
    ) -> Result<Authenticated<CarProvider>> {
        signup.validate()?;
        let password_hash = hash_password_blocking(signup.password).await?;
        let provider = self
            .store
            .create_car_provider(NewCarProvider {
                name: signup.name.trim().to_string(),
                email: normalize_email(&signup.email),
                phone: signup.phone.trim().to_string(),
                password_hash,
                created_at: self.clock.now(),
            })
            .await?;

        tracing::info!(provider_id = %provider.id, "Car provider registered");
        self.authenticated(provider)
    }

    /// Create a hotel account and sign a token for it.
    ///
    /// # Errors
    ///
    /// [`AuthError::Validation`] for bad fields, [`AuthError::EmailTaken`]
    /// for a duplicate email.
    #[tracing::instrument(skip_all, fields(kind = "hotel"))]
    pub async fn register_hotel(&self, signup: HotelSignup) -> Result<Authenticated<Hotel>> {
        let (rooms, rent) = signup.validate()?;
        let password_hash = hash_password_blocking(signup.password).await?;
        let hotel = self
            .store
            .create_hotel(NewHotel {
                name: signup.name.trim().to_string(),
                email: normalize_email(&signup.email),
                phone: signup.phone.trim().to_string(),
                password_hash,
                image: signup.image.filter(|path| !path.trim().is_empty()),
                location: signup.location,
                address: signup.address,
                rooms,
                rent,
                created_at: self.clock.now(),
            })
            .await?;

        tracing::info!(hotel_id = %hotel.id, "Hotel registered");
        self.authenticated(hotel)
    }

    /// Log a traveller in.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidCredentials`] for an unknown email or wrong
    /// password.
    #[tracing::instrument(skip_all, fields(kind = "user"))]
    pub async fn login_user(&self, login: LoginRequest) -> Result<Authenticated<User>> {
        login.validate()?;
        let email = normalize_email(&login.email);
        let credentials = self.store.find_user_by_email(&email).await?;
        self.check_password(credentials, login.password).await
    }

    /// Log a car provider in.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidCredentials`] for an unknown email or wrong
    /// password.
    #[tracing::instrument(skip_all, fields(kind = "car_provider"))]
    pub async fn login_car_provider(
        &self,
        login: LoginRequest,
    ) -> Result<Authenticated<CarProvider>> {
        login.validate()?;
        let email = normalize_email(&login.email);
        let credentials = self.store.find_car_provider_by_email(&email).await?;
        self.check_password(credentials, login.password).await
    }

    /// Log a hotel in.
    ///
    /// # Errors
    ///
    /// [`AuthError::InvalidCredentials`] for an unknown email or wrong
    /// password.
    #[tracing::instrument(skip_all, fields(kind = "hotel"))]
    pub async fn login_hotel(&self, login: LoginRequest) -> Result<Authenticated<Hotel>> {
        login.validate()?;
        let email = normalize_email(&login.email);
        let credentials = self.store.find_hotel_by_email(&email).await?;
        self.check_password(credentials, login.password).await
    }

    /// Resolve a user token to the user's current profile.
    ///
    /// # Errors
    ///
    /// [`AuthError::Unauthenticated`] for a bad token or a deleted user.
    pub async fn authenticate_user(&self, token: &str) -> Result<User> {
        let id = self.tokens.verify(token, PrincipalKind::User)?;
        self.store
            .get_user(UserId::from_uuid(id))
            .await?
            .ok_or(AuthError::Unauthenticated)
    }

    /// Resolve a car provider token to the provider's current profile.
    ///
    /// # Errors
    ///
    /// [`AuthError::Unauthenticated`] for a bad token or a deleted provider.
    pub async fn authenticate_car_provider(&self, token: &str) -> Result<CarProvider> {
        let id = self.tokens.verify(token, PrincipalKind::CarProvider)?;
        self.store
            .get_car_provider(CarProviderId::from_uuid(id))
            .await?
            .ok_or(AuthError::Unauthenticated)
    }

    /// Resolve a hotel token to the hotel's current profile.
    ///
    /// # Errors
    ///
    /// [`AuthError::Unauthenticated`] for a bad token or a deleted hotel.
    pub async fn authenticate_hotel(&self, token: &str) -> Result<Hotel> {
        let id = self.tokens.verify(token, PrincipalKind::Hotel)?;
        self.store
            .get_hotel(HotelId::from_uuid(id))
            .await?
            .ok_or(AuthError::Unauthenticated)
    }

    async fn check_password<P: Principal>(
        &self,
        credentials: Option<Credentials<P>>,
        password: String,
    ) -> Result<Authenticated<P>> {
        let Some(credentials) = credentials else {
            tracing::warn!("Login attempt for unknown email");
            return Err(AuthError::InvalidCredentials);
        };

        if !verify_password_blocking(password, credentials.password_hash).await? {
            tracing::warn!(subject = %credentials.principal.subject(), "Login attempt with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        tracing::info!(subject = %credentials.principal.subject(), "Logged in");
        self.authenticated(credentials.principal)
    }

    fn authenticated<P: Principal>(&self, principal: P) -> Result<Authenticated<P>> {
        let token = self.tokens.issue(P::KIND, principal.subject())?;
        Ok(Authenticated { token, principal })
    }
}
