//! Remote cart service.

use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use reqwest::Method;

use crate::{
    api::ApiClient,
    auth::BearerToken,
    domain::carts::{
        errors::RemoteCartError,
        models::{CartLineId, NewCartLine, QuantityUpdate, RemoteCart, RemoteCartItem},
    },
};

#[derive(Debug, Clone)]
pub struct HttpRemoteCartService {
    api: ApiClient,
}

impl HttpRemoteCartService {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl RemoteCartService for HttpRemoteCartService {
    async fn fetch_cart(&self, credential: &BearerToken) -> Result<RemoteCart, RemoteCartError> {
        let request = self.api.request(Method::GET, "/cart", Some(credential));

        Ok(self.api.send_json(request).await?)
    }

    async fn create_line(
        &self,
        credential: &BearerToken,
        line: NewCartLine,
    ) -> Result<RemoteCartItem, RemoteCartError> {
        let request = self
            .api
            .request(Method::POST, "/cart", Some(credential))
            .json(&line);

        Ok(self.api.send_json(request).await?)
    }

    async fn set_line_quantity(
        &self,
        credential: &BearerToken,
        line: CartLineId,
        qty: u32,
    ) -> Result<RemoteCartItem, RemoteCartError> {
        let request = self
            .api
            .request(Method::PUT, &format!("/cart/{line}"), Some(credential))
            .json(&QuantityUpdate { qty });

        Ok(self.api.send_json(request).await?)
    }

    async fn delete_line(
        &self,
        credential: &BearerToken,
        line: CartLineId,
    ) -> Result<(), RemoteCartError> {
        let request = self
            .api
            .request(Method::DELETE, &format!("/cart/{line}"), Some(credential));

        Ok(self.api.send_empty(request).await?)
    }

    async fn clear(&self, credential: &BearerToken) -> Result<(), RemoteCartError> {
        let request = self.api.request(Method::DELETE, "/cart", Some(credential));

        Ok(self.api.send_empty(request).await?)
    }
}

#[automock]
#[async_trait]
pub trait RemoteCartService: Send + Sync {
    /// Retrieve the cart of the credential's owner.
    async fn fetch_cart(&self, credential: &BearerToken) -> Result<RemoteCart, RemoteCartError>;

    /// Add `line.qty` units of a product, creating the line when needed.
    async fn create_line(
        &self,
        credential: &BearerToken,
        line: NewCartLine,
    ) -> Result<RemoteCartItem, RemoteCartError>;

    /// Replace the quantity of an existing line.
    async fn set_line_quantity(
        &self,
        credential: &BearerToken,
        line: CartLineId,
        qty: u32,
    ) -> Result<RemoteCartItem, RemoteCartError>;

    /// Delete a line.
    async fn delete_line(
        &self,
        credential: &BearerToken,
        line: CartLineId,
    ) -> Result<(), RemoteCartError>;

    /// Delete every line.
    async fn clear(&self, credential: &BearerToken) -> Result<(), RemoteCartError>;
}

/// Cart service handle scoped by an optional credential.
///
/// Every operation fails with [`RemoteCartError::Unauthenticated`] when no
/// credential is present, without reaching the service.
#[derive(Clone)]
pub struct RemoteCartClient {
    service: Arc<dyn RemoteCartService>,
    credential: Option<BearerToken>,
}

impl RemoteCartClient {
    #[must_use]
    pub fn new(service: Arc<dyn RemoteCartService>, credential: Option<BearerToken>) -> Self {
        Self {
            service,
            credential,
        }
    }

    fn credential(&self) -> Result<&BearerToken, RemoteCartError> {
        self.credential
            .as_ref()
            .ok_or(RemoteCartError::Unauthenticated)
    }

    /// # Errors
    ///
    /// Returns an error when unauthenticated or when the service call fails.
    pub async fn fetch_cart(&self) -> Result<RemoteCart, RemoteCartError> {
        self.service.fetch_cart(self.credential()?).await
    }

    /// # Errors
    ///
    /// Returns an error when unauthenticated or when the service call fails.
    pub async fn create_line(&self, line: NewCartLine) -> Result<RemoteCartItem, RemoteCartError> {
        self.service.create_line(self.credential()?, line).await
    }

    /// # Errors
    ///
    /// Returns an error when unauthenticated or when the service call fails.
    pub async fn set_line_quantity(
        &self,
        line: CartLineId,
        qty: u32,
    ) -> Result<RemoteCartItem, RemoteCartError> {
        self.service
            .set_line_quantity(self.credential()?, line, qty)
            .await
    }

    /// # Errors
    ///
    /// Returns an error when unauthenticated or when the service call fails.
    pub async fn delete_line(&self, line: CartLineId) -> Result<(), RemoteCartError> {
        self.service.delete_line(self.credential()?, line).await
    }

    /// # Errors
    ///
    /// Returns an error when unauthenticated or when the service call fails.
    pub async fn clear(&self) -> Result<(), RemoteCartError> {
        self.service.clear(self.credential()?).await
    }
}

impl std::fmt::Debug for RemoteCartClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteCartClient")
            .field("credential", &self.credential)
            .finish_non_exhaustive()
    }
}
