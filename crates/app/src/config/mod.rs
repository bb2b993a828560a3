//! Client configuration module

use std::{path::PathBuf, time::Duration};

use suds_app::{api::ApiConfig, context::AppConfig};

use crate::config::{api::ApiArgs, observability::LoggingConfig, storage::StorageArgs};

pub(crate) mod api;
pub(crate) mod observability;
pub(crate) mod storage;

/// Settings shared by every command.
#[derive(Debug, clap::Args)]
pub(crate) struct ClientConfig {
    /// Storefront API settings.
    #[command(flatten)]
    pub api: ApiArgs,

    /// Local storage settings.
    #[command(flatten)]
    pub storage: StorageArgs,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}

impl ClientConfig {
    /// Library configuration for these settings.
    pub(crate) fn app_config(&self) -> AppConfig {
        AppConfig {
            api: ApiConfig {
                base_url: self.api.api_base.clone(),
                timeout: Duration::from_secs(self.api.request_timeout_seconds),
            },
            data_dir: PathBuf::from(&self.storage.data_dir),
            storefront_origin: self.api.storefront_origin.clone(),
            guest_cart_policy: self.storage.guest_cart_policy,
        }
    }
}
