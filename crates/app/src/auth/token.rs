//! Bearer credential handling.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de::Error as _};
use thiserror::Error;
use zeroize::Zeroize;

/// Access token issued by the auth service and sent as `Authorization: Bearer`.
#[derive(Clone, PartialEq, Eq)]
pub struct BearerToken {
    raw: String,
}

#[derive(Debug, Error)]
pub enum BearerTokenError {
    #[error("bearer token is empty")]
    Empty,

    #[error("bearer token contains whitespace")]
    InvalidFormat,
}

impl BearerToken {
    /// Wrap a raw token string.
    ///
    /// # Errors
    ///
    /// Returns an error when the token is empty or contains whitespace, neither
    /// of which can be carried in an `Authorization` header.
    pub fn new(raw: impl Into<String>) -> Result<Self, BearerTokenError> {
        let raw = raw.into();

        if raw.is_empty() {
            return Err(BearerTokenError::Empty);
        }

        if raw.chars().any(char::is_whitespace) {
            return Err(BearerTokenError::InvalidFormat);
        }

        Ok(Self { raw })
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.raw
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BearerToken(**redacted**)")
    }
}

impl Drop for BearerToken {
    fn drop(&mut self) {
        self.raw.zeroize();
    }
}

impl Serialize for BearerToken {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.raw)
    }
}

impl<'de> Deserialize<'de> for BearerToken {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;

        Self::new(raw).map_err(D::Error::custom)
    }
}
