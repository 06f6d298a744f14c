//! Authentication configuration.
//!
//! One [`AuthConfig`] is built at startup and shared by the token issuer and
//! every authentication gate. Values come from the application, never from
//! module-level constants.

use std::fmt;

/// Signing secret used when none is configured. Development only.
pub const DEV_JWT_SECRET: &str = "voyage-dev-secret-change-me";

/// Default token lifetime: 7 days.
pub const DEFAULT_TOKEN_TTL_SECS: u64 = 7 * 24 * 60 * 60;

/// Bearer-token configuration.
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC secret for HS256 signatures.
    pub jwt_secret: String,

    /// Token lifetime in seconds.
    ///
    /// Default: 604800 (7 days)
    pub token_ttl_secs: u64,
}

impl AuthConfig {
    /// Create a configuration with the default token lifetime.
    #[must_use]
    pub const fn new(jwt_secret: String) -> Self {
        Self {
            jwt_secret,
            token_ttl_secs: DEFAULT_TOKEN_TTL_SECS,
        }
    }

    /// Set the token lifetime.
    #[must_use]
    pub const fn with_token_ttl_secs(mut self, secs: u64) -> Self {
        self.token_ttl_secs = secs;
        self
    }

    /// Whether the development secret is in use.
    #[must_use]
    pub fn uses_dev_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self::new(DEV_JWT_SECRET.to_string())
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_secs", &self.token_ttl_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_the_secret() {
        let config = AuthConfig::new("super-secret".to_string());
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("604800"));
    }

    #[test]
    fn default_uses_the_dev_secret() {
        assert!(AuthConfig::default().uses_dev_secret());
        assert!(!AuthConfig::new("x".into()).with_token_ttl_secs(60).uses_dev_secret());
    }
}
