//! Error types for signup, login and token verification.

use thiserror::Error;
use voyage_core::store::StoreError;
use voyage_core::validation::ValidationErrors;

/// Result type alias for authentication operations.
pub type Result<T> = std::result::Result<T, AuthError>;

/// Authentication failures.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Request fields failed validation.
    #[error("{0}")]
    Validation(#[from] ValidationErrors),

    /// Unknown email or wrong password. Deliberately indistinguishable.
    #[error("Incorrect credentials")]
    InvalidCredentials,

    /// An account of the same kind already uses this email.
    #[error("Sorry, an account with this email already exists")]
    EmailTaken {
        /// The rejected email.
        email: String,
    },

    /// Missing, malformed, expired or wrong-kind token, or a token whose
    /// subject no longer exists.
    #[error("Please authenticate using a valid token")]
    Unauthenticated,

    /// Password hashing failed or a stored hash could not be parsed.
    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    /// A token could not be signed.
    #[error("Token signing error: {0}")]
    TokenSigning(String),

    /// Credential store failure.
    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for AuthError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateEmail { email } => Self::EmailTaken { email },
            other => Self::Store(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_email_becomes_email_taken() {
        let err = AuthError::from(StoreError::DuplicateEmail {
            email: "a@example.com".into(),
        });
        assert!(matches!(err, AuthError::EmailTaken { .. }));
    }

    #[test]
    fn other_store_errors_pass_through() {
        let err = AuthError::from(StoreError::Database("down".into()));
        assert!(matches!(err, AuthError::Store(StoreError::Database(_))));
    }
}
