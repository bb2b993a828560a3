//! Catalog service errors.

use thiserror::Error;

use crate::api::ApiError;

#[derive(Debug, Error)]
pub enum CatalogServiceError {
    #[error("product not found")]
    NotFound,

    #[error("catalog unavailable")]
    Network(#[source] ApiError),
}

impl From<ApiError> for CatalogServiceError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::NotFound => Self::NotFound,
            ApiError::Http(_)
            | ApiError::Unauthorized
            | ApiError::InvalidBaseUrl(_)
            | ApiError::UnexpectedResponse { .. } => {
                Self::Network(error)
            }
        }
    }
}
