//! # Voyage Auth
//!
//! Authentication for the three kinds of Voyage principal: travellers
//! (users), car rental providers and hotels.
//!
//! - [`password`]: Argon2id hashing and verification
//! - [`token`]: signed bearer tokens (JWT, HS256) carrying the principal id
//!   and kind
//! - [`signup`]: request payloads and their field validation
//! - [`service`]: [`AuthService`], which ties the above to a
//!   [`CredentialStore`](voyage_core::CredentialStore)
//!
//! A token issued for one principal kind is never accepted for another: the
//! kind is part of the signed claims and checked on every verification.
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use voyage_auth::{AuthConfig, AuthService, LoginRequest};
//! use voyage_core::environment::SystemClock;
//! # async fn example(store: Arc<dyn voyage_core::CredentialStore>) -> voyage_auth::Result<()> {
//! let auth = AuthService::new(store, &AuthConfig::new("secret".into()), Arc::new(SystemClock));
//!
//! let session = auth
//!     .login_user(LoginRequest {
//!         email: "alice@example.com".into(),
//!         password: "hunter22".into(),
//!     })
//!     .await?;
//! let user = auth.authenticate_user(&session.token).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod password;
pub mod principal;
pub mod service;
pub mod signup;
pub mod token;

pub use config::AuthConfig;
pub use error::{AuthError, Result};
pub use principal::PrincipalKind;
pub use service::{AuthService, Authenticated};
pub use signup::{HotelSignup, LoginRequest, ProviderSignup, UserSignup};
pub use token::{Claims, TokenIssuer};
