//! Storage Config

use clap::Args;
use suds_app::domain::carts::GuestCartPolicy;

/// Local storage settings.
#[derive(Debug, Args)]
pub(crate) struct StorageArgs {
    /// Directory holding the guest cart and the signed-in session
    #[arg(long, global = true, env = "SUDS_DATA_DIR", default_value = ".suds")]
    pub data_dir: String,

    /// What happens to the guest cart on sign-in (keep, merge)
    #[arg(
        long,
        global = true,
        env = "SUDS_GUEST_CART_POLICY",
        value_enum,
        default_value_t = GuestCartPolicy::Keep
    )]
    pub guest_cart_policy: GuestCartPolicy,
}
