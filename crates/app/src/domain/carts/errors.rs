//! Cart errors.

use thiserror::Error;

use crate::{api::ApiError, storage::StorageError};

/// Failure reported by the remote cart service.
#[derive(Debug, Error)]
pub enum RemoteCartError {
    #[error("cart operation requires a signed-in customer")]
    Unauthenticated,

    #[error("cart line not found")]
    NotFound,

    #[error("cart service unavailable")]
    Network(#[source] ApiError),
}

impl From<ApiError> for RemoteCartError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Unauthorized => Self::Unauthenticated,
            ApiError::NotFound => Self::NotFound,
            ApiError::Http(_)
            | ApiError::InvalidBaseUrl(_)
            | ApiError::UnexpectedResponse { .. } => Self::Network(error),
        }
    }
}

/// Failure of a single cart mutation. Never returned to callers of the
/// reconciler; logged and followed by a refresh.
#[derive(Debug, Error)]
pub(crate) enum CartMutationError {
    #[error("guest cart could not be saved")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Remote(#[from] RemoteCartError),
}
