//! Checkout errors.

use thiserror::Error;

use crate::api::ApiError;

#[derive(Debug, Error)]
pub enum CheckoutServiceError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("checkout requires a signed-in customer")]
    Unauthenticated,

    #[error("checkout rejected: {0}")]
    Rejected(String),

    #[error("checkout service unavailable")]
    Network(#[source] ApiError),
}

impl From<ApiError> for CheckoutServiceError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Unauthorized => Self::Unauthenticated,
            ApiError::UnexpectedResponse { status, message } if (400..500).contains(&status) => {
                Self::Rejected(message)
            }
            ApiError::Http(_)
            | ApiError::NotFound
            | ApiError::InvalidBaseUrl(_)
            | ApiError::UnexpectedResponse { .. } => {
                Self::Network(error)
            }
        }
    }
}
