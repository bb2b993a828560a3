//! Auth service errors.

use thiserror::Error;

use crate::{api::ApiError, storage::StorageError};

#[derive(Debug, Error)]
pub enum AuthServiceError {
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("not signed in")]
    NotSignedIn,

    #[error("account not found")]
    NotFound,

    #[error("auth request rejected: {0}")]
    Rejected(String),

    #[error("auth service unavailable")]
    Network(#[source] ApiError),

    #[error("session storage error")]
    Storage(#[from] StorageError),
}

impl From<ApiError> for AuthServiceError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Unauthorized => Self::InvalidCredentials,
            ApiError::NotFound => Self::NotFound,
            ApiError::UnexpectedResponse { status, message } if (400..500).contains(&status) => {
                Self::Rejected(message)
            }
            ApiError::Http(_)
            | ApiError::InvalidBaseUrl(_)
            | ApiError::UnexpectedResponse { .. } => Self::Network(error),
        }
    }
}
