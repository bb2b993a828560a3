//! Catalog service.

use async_trait::async_trait;
use mockall::automock;
use reqwest::Method;

use crate::{
    api::ApiClient,
    domain::products::{errors::CatalogServiceError, models::Product},
};

#[derive(Debug, Clone)]
pub struct HttpCatalogService {
    api: ApiClient,
}

impl HttpCatalogService {
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }
}

#[async_trait]
impl CatalogService for HttpCatalogService {
    async fn list_products(&self) -> Result<Vec<Product>, CatalogServiceError> {
        let request = self.api.request(Method::GET, "/products", None);

        Ok(self.api.send_json(request).await?)
    }

    async fn get_product(&self, slug: &str) -> Result<Product, CatalogServiceError> {
        let request = self
            .api
            .request_segments(Method::GET, &["products", slug], None);

        Ok(self.api.send_json(request).await?)
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Retrieves the full catalog, ordered by product id.
    async fn list_products(&self) -> Result<Vec<Product>, CatalogServiceError>;

    /// Retrieve a single product by slug.
    async fn get_product(&self, slug: &str) -> Result<Product, CatalogServiceError>;
}
