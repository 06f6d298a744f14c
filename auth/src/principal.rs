//! Principal kinds and the profiles that represent them.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;
use voyage_core::model::{CarProvider, Hotel, User};

/// The kind of account a token was issued to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrincipalKind {
    /// Traveller.
    User,
    /// Car rental provider.
    CarProvider,
    /// Hotel.
    Hotel,
}

impl PrincipalKind {
    /// Wire name, as carried in token claims.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::CarProvider => "car_provider",
            Self::Hotel => "hotel",
        }
    }
}

impl fmt::Display for PrincipalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A profile that can be the subject of a token.
pub trait Principal {
    /// Kind recorded in the token.
    const KIND: PrincipalKind;

    /// Token subject.
    fn subject(&self) -> Uuid;
}

impl Principal for User {
    const KIND: PrincipalKind = PrincipalKind::User;

    fn subject(&self) -> Uuid {
        *self.id.as_uuid()
    }
}

impl Principal for CarProvider {
    const KIND: PrincipalKind = PrincipalKind::CarProvider;

    fn subject(&self) -> Uuid {
        *self.id.as_uuid()
    }
}

impl Principal for Hotel {
    const KIND: PrincipalKind = PrincipalKind::Hotel;

    fn subject(&self) -> Uuid {
        *self.id.as_uuid()
    }
}
