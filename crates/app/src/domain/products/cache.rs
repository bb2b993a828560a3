//! Product lookup cache.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::domain::products::{
    errors::CatalogServiceError,
    models::{Product, ProductId},
    service::CatalogService,
};

/// Catalog fetched once per session and indexed for line hydration.
///
/// The first successful [`ensure_loaded`](Self::ensure_loaded) pins the
/// catalog for the lifetime of the cache; it is never invalidated. A failed
/// fetch leaves the cache empty and the next call tries again.
pub struct ProductLookupCache {
    catalog: Arc<dyn CatalogService>,
    loaded: OnceCell<Catalog>,
}

#[derive(Debug)]
struct Catalog {
    products: Vec<Product>,
    by_id: FxHashMap<ProductId, usize>,
}

impl ProductLookupCache {
    #[must_use]
    pub fn new(catalog: Arc<dyn CatalogService>) -> Self {
        Self {
            catalog,
            loaded: OnceCell::new(),
        }
    }

    /// Return the catalog, fetching it on first use.
    ///
    /// Concurrent first callers share a single request.
    ///
    /// # Errors
    ///
    /// Returns the catalog service error when the fetch fails.
    pub async fn ensure_loaded(&self) -> Result<&[Product], CatalogServiceError> {
        let service = Arc::clone(&self.catalog);

        let catalog = self
            .loaded
            .get_or_try_init(|| async move {
                let products = service.list_products().await?;

                debug!(count = products.len(), "product catalog cached");

                let by_id = products
                    .iter()
                    .enumerate()
                    .map(|(index, product)| (product.id, index))
                    .collect();

                Ok::<_, CatalogServiceError>(Catalog { products, by_id })
            })
            .await?;

        Ok(&catalog.products)
    }

    /// Whatever has been cached so far, without fetching.
    #[must_use]
    pub fn loaded(&self) -> &[Product] {
        self.loaded
            .get()
            .map_or(&[], |catalog| catalog.products.as_slice())
    }

    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&Product> {
        let catalog = self.loaded.get()?;

        catalog
            .by_id
            .get(&id)
            .and_then(|index| catalog.products.get(*index))
    }

    #[must_use]
    pub fn get_by_slug(&self, slug: &str) -> Option<&Product> {
        self.loaded().iter().find(|product| product.slug == slug)
    }

    /// Display data for `id`, loading the catalog if needed.
    ///
    /// Falls back to a placeholder when the catalog is unavailable or does not
    /// list the product; cart rendering never fails on missing display data.
    pub async fn display(&self, id: ProductId) -> Product {
        if let Err(error) = self.ensure_loaded().await {
            debug!(product = %id, "no display data available: {error}");
        }

        self.get(id)
            .cloned()
            .unwrap_or_else(|| Product::placeholder(id))
    }
}

impl std::fmt::Debug for ProductLookupCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductLookupCache")
            .field("loaded", &self.loaded.get())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        api::ApiError,
        domain::products::service::MockCatalogService,
        test::helpers::product,
    };

    use super::*;

    #[tokio::test]
    async fn fetches_catalog_only_once() -> TestResult {
        let mut catalog = MockCatalogService::new();

        catalog
            .expect_list_products()
            .once()
            .returning(|| Ok(vec![product(1, 890), product(2, 1250)]));
        catalog.expect_get_product().never();

        let cache = ProductLookupCache::new(Arc::new(catalog));

        assert_eq!(cache.ensure_loaded().await?.len(), 2);
        assert_eq!(cache.ensure_loaded().await?.len(), 2);
        assert_eq!(cache.get(ProductId::new(2)).map(|p| p.price), Some(1250));
        assert_eq!(cache.get_by_slug("product-1").map(|p| p.id), Some(ProductId::new(1)));

        Ok(())
    }

    #[tokio::test]
    async fn failed_fetch_stays_empty_and_retries() -> TestResult {
        let mut catalog = MockCatalogService::new();
        let mut sequence = mockall::Sequence::new();

        catalog
            .expect_list_products()
            .once()
            .in_sequence(&mut sequence)
            .returning(|| Err(CatalogServiceError::Network(ApiError::Unauthorized)));
        catalog
            .expect_list_products()
            .once()
            .in_sequence(&mut sequence)
            .returning(|| Ok(vec![product(7, 500)]));

        let cache = ProductLookupCache::new(Arc::new(catalog));

        let first = cache.ensure_loaded().await;

        assert!(
            matches!(first, Err(CatalogServiceError::Network(_))),
            "expected the fetch failure to surface, got {first:?}"
        );
        assert!(cache.loaded().is_empty());

        assert_eq!(cache.ensure_loaded().await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn display_falls_back_to_placeholder() {
        let mut catalog = MockCatalogService::new();

        catalog
            .expect_list_products()
            .returning(|| Err(CatalogServiceError::NotFound));

        let cache = ProductLookupCache::new(Arc::new(catalog));

        assert_eq!(
            cache.display(ProductId::new(9)).await,
            Product::placeholder(ProductId::new(9))
        );
    }
}
