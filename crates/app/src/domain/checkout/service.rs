//! Checkout service.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Method;
use tracing::info;

use crate::{
    api::ApiClient,
    auth::BearerToken,
    domain::{
        carts::{CartReconciler, models::GuestCartRecord},
        checkout::{
            errors::CheckoutServiceError,
            models::{CheckoutRedirects, CheckoutSession, GuestCheckoutRequest, guest_items},
        },
    },
};

#[derive(Debug, Clone)]
pub struct HttpCheckoutService {
    api: ApiClient,
}

impl HttpCheckoutService {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl CheckoutService for HttpCheckoutService {
    async fn create_session(
        &self,
        credential: &BearerToken,
        redirects: &CheckoutRedirects,
    ) -> Result<CheckoutSession, CheckoutServiceError> {
        let request = self
            .api
            .request(Method::POST, "/checkout/session", Some(credential))
            .json(redirects);

        Ok(self.api.send_json(request).await?)
    }

    async fn create_guest_session(
        &self,
        items: &[GuestCartRecord],
        redirects: &CheckoutRedirects,
    ) -> Result<CheckoutSession, CheckoutServiceError> {
        let request = self
            .api
            .request(Method::POST, "/checkout/session_guest", None)
            .json(&GuestCheckoutRequest { items, redirects });

        Ok(self.api.send_json(request).await?)
    }
}

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Start a payment session for the customer's server-side cart.
    async fn create_session(
        &self,
        credential: &BearerToken,
        redirects: &CheckoutRedirects,
    ) -> Result<CheckoutSession, CheckoutServiceError>;

    /// Start a payment session for a guest's line list.
    async fn create_guest_session(
        &self,
        items: &[GuestCartRecord],
        redirects: &CheckoutRedirects,
    ) -> Result<CheckoutSession, CheckoutServiceError>;
}

/// Hand the current cart over to the payment provider.
///
/// Signed-in customers check out their remote cart; guests submit the lines
/// currently shown.
///
/// # Errors
///
/// Returns [`CheckoutServiceError::EmptyCart`] without calling the service
/// when the cart has no lines, or the service error.
pub async fn start_checkout(
    service: &dyn CheckoutService,
    cart: &CartReconciler,
    redirects: &CheckoutRedirects,
) -> Result<CheckoutSession, CheckoutServiceError> {
    let view = cart.view();

    if view.total_quantity() == 0 {
        return Err(CheckoutServiceError::EmptyCart);
    }

    let session = match cart.credential() {
        Some(credential) => service.create_session(&credential, redirects).await?,
        None => {
            service
                .create_guest_session(&guest_items(&view), redirects)
                .await?
        }
    };

    info!(
        lines = view.lines().len(),
        subtotal = view.subtotal(),
        "checkout session created"
    );

    Ok(session)
}
