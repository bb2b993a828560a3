//! App Context

use std::{path::PathBuf, sync::Arc};

use thiserror::Error;
use tracing::info;

use crate::{
    api::{ApiClient, ApiConfig, ApiError},
    auth::{Account, AuthService, HttpAuthService, SessionStore},
    domain::{
        carts::{
            CartReconciler, GuestCartPolicy, GuestStore, HttpRemoteCartService, RemoteCartService,
        },
        checkout::{
            CheckoutService, CheckoutServiceError, HttpCheckoutService,
            models::{CheckoutRedirects, CheckoutSession},
            start_checkout,
        },
        products::{CatalogService, HttpCatalogService, ProductLookupCache},
    },
    storage::{FileKeyValueStore, KeyValueStore},
};

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to build api client")]
    Api(#[source] ApiError),
}

/// Everything needed to wire the storefront client.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,

    /// Directory holding the guest cart and the persisted session.
    pub data_dir: PathBuf,

    /// Storefront address the payment provider redirects back to.
    pub storefront_origin: String,

    pub guest_cart_policy: GuestCartPolicy,
}

/// Remote boundaries the client talks to.
#[derive(Clone)]
pub struct Services {
    pub catalog: Arc<dyn CatalogService>,
    pub remote_cart: Arc<dyn RemoteCartService>,
    pub auth: Arc<dyn AuthService>,
    pub checkout: Arc<dyn CheckoutService>,
}

impl Services {
    /// HTTP implementations sharing one client.
    #[must_use]
    pub fn http(api: &ApiClient) -> Self {
        Self {
            catalog: Arc::new(HttpCatalogService::new(api.clone())),
            remote_cart: Arc::new(HttpRemoteCartService::new(api.clone())),
            auth: Arc::new(HttpAuthService::new(api.clone())),
            checkout: Arc::new(HttpCheckoutService::new(api.clone())),
        }
    }
}

#[derive(Clone)]
pub struct AppContext {
    pub catalog: Arc<dyn CatalogService>,
    pub products: Arc<ProductLookupCache>,
    pub cart: Arc<CartReconciler>,
    pub account: Arc<Account>,
    pub checkout: Arc<dyn CheckoutService>,
    pub redirects: CheckoutRedirects,
}

impl AppContext {
    /// Wire the HTTP services and file storage described by `config`, then
    /// restore the persisted session and load the matching cart.
    ///
    /// # Errors
    ///
    /// Returns an error when the HTTP client cannot be built.
    pub async fn start(config: AppConfig) -> Result<Self, AppInitError> {
        let api = ApiClient::new(config.api.clone()).map_err(AppInitError::Api)?;
        let store = Arc::new(FileKeyValueStore::new(&config.data_dir));

        info!(
            api = api.base_url(),
            data_dir = %config.data_dir.display(),
            "starting storefront client"
        );

        let context = Self::with_services(&config, Services::http(&api), store);

        context.account.restore().await;

        Ok(context)
    }

    /// Wire the given services and storage without touching either.
    #[must_use]
    pub fn with_services(
        config: &AppConfig,
        services: Services,
        store: Arc<dyn KeyValueStore>,
    ) -> Self {
        let products = Arc::new(ProductLookupCache::new(Arc::clone(&services.catalog)));

        let cart = Arc::new(
            CartReconciler::new(
                GuestStore::new(Arc::clone(&store)),
                services.remote_cart,
                Arc::clone(&products),
            )
            .with_guest_cart_policy(config.guest_cart_policy),
        );

        let account = Arc::new(Account::new(
            services.auth,
            SessionStore::new(store),
            Arc::clone(&cart),
        ));

        Self {
            catalog: services.catalog,
            products,
            cart,
            account,
            checkout: services.checkout,
            redirects: CheckoutRedirects::for_origin(&config.storefront_origin),
        }
    }

    /// Start a checkout for the current cart.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty cart or when the checkout service fails.
    pub async fn checkout(&self) -> Result<CheckoutSession, CheckoutServiceError> {
        start_checkout(self.checkout.as_ref(), &self.cart, &self.redirects).await
    }
}

impl std::fmt::Debug for AppContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppContext")
            .field("cart", &self.cart)
            .field("account", &self.account)
            .field("redirects", &self.redirects)
            .finish_non_exhaustive()
    }
}

impl std::fmt::Debug for Services {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Services").finish_non_exhaustive()
    }
}
