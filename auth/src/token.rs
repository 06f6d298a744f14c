//! Signed bearer tokens.
//!
//! Tokens are HS256 JWTs with four claims:
//!
//! | claim  | meaning                                        |
//! |--------|------------------------------------------------|
//! | `sub`  | principal id (UUID)                            |
//! | `kind` | `user`, `car_provider` or `hotel`              |
//! | `iat`  | issue time, seconds since the Unix epoch       |
//! | `exp`  | expiry, seconds since the Unix epoch           |
//!
//! Expiry is checked against wall-clock time by `jsonwebtoken` itself.

use crate::config::AuthConfig;
use crate::error::{AuthError, Result};
use crate::principal::PrincipalKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Token payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Principal id.
    pub sub: Uuid,
    /// Principal kind.
    pub kind: PrincipalKind,
    /// Issued at.
    pub iat: u64,
    /// Expires at.
    pub exp: u64,
}

/// Issues and verifies bearer tokens with one shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl_secs: u64,
}

impl TokenIssuer {
    /// Build an issuer from configuration.
    #[must_use]
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation.leeway = 0;

        Self {
            encoding: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            ttl_secs: config.token_ttl_secs,
        }
    }

    /// Sign a token for `subject`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::TokenSigning`] if encoding fails.
    pub fn issue(&self, kind: PrincipalKind, subject: Uuid) -> Result<String> {
        let now = jsonwebtoken::get_current_timestamp();
        let claims = Claims {
            sub: subject,
            kind,
            iat: now,
            exp: now.saturating_add(self.ttl_secs),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| AuthError::TokenSigning(e.to_string()))
    }

    /// Verify a token and return its subject.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Unauthenticated`] when the token is malformed,
    /// badly signed, expired or was issued to a different principal kind.
    pub fn verify(&self, token: &str, expected: PrincipalKind) -> Result<Uuid> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            tracing::debug!(error = %e, "Rejected bearer token");
            AuthError::Unauthenticated
        })?;

        if data.claims.kind != expected {
            tracing::debug!(
                expected = %expected,
                actual = %data.claims.kind,
                "Bearer token issued to a different principal kind"
            );
            return Err(AuthError::Unauthenticated);
        }

        Ok(data.claims.sub)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(&AuthConfig::new("test-secret".to_string()))
    }

    #[test]
    fn issued_tokens_verify_for_their_kind() {
        let subject = Uuid::new_v4();
        let token = issuer().issue(PrincipalKind::Hotel, subject).unwrap();
        assert_eq!(issuer().verify(&token, PrincipalKind::Hotel).unwrap(), subject);
    }

    #[test]
    fn tokens_are_rejected_for_other_kinds() {
        let token = issuer().issue(PrincipalKind::User, Uuid::new_v4()).unwrap();
        assert!(matches!(
            issuer().verify(&token, PrincipalKind::CarProvider),
            Err(AuthError::Unauthenticated)
        ));
        assert!(matches!(
            issuer().verify(&token, PrincipalKind::Hotel),
            Err(AuthError::Unauthenticated)
        ));
    }

    #[test]
    fn tokens_signed_with_another_secret_are_rejected() {
        let foreign = TokenIssuer::new(&AuthConfig::new("other-secret".to_string()));
        let token = foreign.issue(PrincipalKind::User, Uuid::new_v4()).unwrap();
        assert!(issuer().verify(&token, PrincipalKind::User).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(issuer().verify("not.a.token", PrincipalKind::User).is_err());
        assert!(issuer().verify("", PrincipalKind::User).is_err());
    }

    #[test]
    fn expired_tokens_are_rejected() {
        let now = jsonwebtoken::get_current_timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            kind: PrincipalKind::User,
            iat: now - 7200,
            exp: now - 3600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"test-secret"),
        )
        .unwrap();

        assert!(matches!(
            issuer().verify(&token, PrincipalKind::User),
            Err(AuthError::Unauthenticated)
        ));
    }

    #[test]
    fn expiry_follows_the_configured_lifetime() {
        let issuer = TokenIssuer::new(&AuthConfig::new("test-secret".into()).with_token_ttl_secs(90));
        let token = issuer.issue(PrincipalKind::User, Uuid::new_v4()).unwrap();
        let data = decode::<Claims>(&token, &issuer.decoding, &issuer.validation).unwrap();
        assert_eq!(data.claims.exp - data.claims.iat, 90);
    }
}
