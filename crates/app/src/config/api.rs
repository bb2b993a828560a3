//! API Config

use clap::Args;

/// Storefront API settings.
#[derive(Debug, Args)]
pub(crate) struct ApiArgs {
    /// Storefront API base address
    #[arg(
        long,
        global = true,
        env = "SUDS_API_BASE",
        default_value = "http://localhost:5000/api"
    )]
    pub api_base: String,

    /// Storefront address payment redirects return to
    #[arg(
        long,
        global = true,
        env = "SUDS_STOREFRONT_ORIGIN",
        default_value = "http://localhost:5173"
    )]
    pub storefront_origin: String,

    /// Per-request timeout in seconds.
    #[arg(
        long,
        global = true,
        env = "SUDS_REQUEST_TIMEOUT_SECONDS",
        default_value_t = 10_u64
    )]
    pub request_timeout_seconds: u64,
}
