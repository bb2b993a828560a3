//! Test Helpers

use std::sync::Arc;

use crate::{
    auth::BearerToken,
    domain::{
        carts::{
            guest::GuestStore, reconciler::CartReconciler, remote::RemoteCartService,
        },
        products::{
            cache::ProductLookupCache,
            models::{Product, ProductId},
            service::MockCatalogService,
        },
    },
    storage::{KeyValueStore, MemoryKeyValueStore},
};

pub(crate) fn product(id: u64, price: u64) -> Product {
    Product {
        id: ProductId::new(id),
        name: format!("Product {id}"),
        slug: format!("product-{id}"),
        price,
        short_description: None,
        usage: None,
        warnings: None,
        image: None,
    }
}

/// The catalog every reconciler test shares.
pub(crate) fn catalog() -> Vec<Product> {
    vec![product(5, 450), product(10, 890), product(20, 1250)]
}

pub(crate) fn catalog_service(products: Vec<Product>) -> MockCatalogService {
    let mut service = MockCatalogService::new();

    service
        .expect_list_products()
        .returning(move || Ok(products.clone()));

    service
}

pub(crate) fn token(raw: &str) -> BearerToken {
    BearerToken::new(raw).expect("test token should be valid")
}

pub(crate) fn memory_store() -> Arc<dyn KeyValueStore> {
    Arc::new(MemoryKeyValueStore::new())
}

pub(crate) fn reconciler(
    store: Arc<dyn KeyValueStore>,
    remote: Arc<dyn RemoteCartService>,
) -> CartReconciler {
    CartReconciler::new(
        GuestStore::new(store),
        remote,
        Arc::new(ProductLookupCache::new(Arc::new(catalog_service(catalog())))),
    )
}
