//! Cart sources.

use crate::{auth::BearerToken, domain::carts::models::IdentityMode};

/// Authoritative source of cart contents for the current identity.
///
/// Guests read and write the local guest store; authenticated customers the
/// remote cart service. The two are never combined into one line list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CartSource {
    #[default]
    Guest,
    Authenticated(BearerToken),
}

impl CartSource {
    #[must_use]
    pub fn from_credential(credential: Option<BearerToken>) -> Self {
        credential.map_or(Self::Guest, Self::Authenticated)
    }

    #[must_use]
    pub fn mode(&self) -> IdentityMode {
        match self {
            Self::Guest => IdentityMode::Guest,
            Self::Authenticated(_) => IdentityMode::Authenticated,
        }
    }

    #[must_use]
    pub fn credential(&self) -> Option<&BearerToken> {
        match self {
            Self::Guest => None,
            Self::Authenticated(token) => Some(token),
        }
    }
}

/// What happens to the guest cart when a guest signs in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum GuestCartPolicy {
    /// Leave the guest cart in local storage; it shows again after sign-out.
    #[default]
    Keep,

    /// Move guest lines into the remote cart, adding to existing quantities.
    /// Lines the service rejects stay in the guest cart.
    Merge,
}
