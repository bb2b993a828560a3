use clap::{Parser, Subcommand};
use suds_app::context::AppContext;

use crate::config::ClientConfig;

mod account;
mod auth;
mod cart;
mod checkout;
mod output;
mod products;

#[derive(Debug, Parser)]
#[command(name = "suds", about = "Senda de Suds storefront client", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub config: ClientConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Browse the catalog
    Products(products::ProductsCommand),

    /// Show or change the cart
    Cart(cart::CartCommand),

    /// Sign in, register or sign out
    Auth(auth::AuthCommand),

    /// Manage the signed-in customer's profile
    Account(account::AccountCommand),

    /// Start a payment session for the cart
    Checkout,
}

impl Cli {
    /// Parse arguments after loading `.env`, if present.
    pub(crate) fn load() -> Result<Self, clap::Error> {
        _ = dotenvy::dotenv();

        Self::try_parse()
    }

    /// Run the command and return what it prints.
    pub(crate) async fn run(self) -> Result<String, String> {
        let context = AppContext::start(self.config.app_config())
            .await
            .map_err(|error| format!("failed to start: {error}"))?;

        match self.command {
            Commands::Products(command) => products::run(command, &context).await,
            Commands::Cart(command) => cart::run(command, &context).await,
            Commands::Auth(command) => auth::run(command, &context).await,
            Commands::Account(command) => account::run(command, &context).await,
            Commands::Checkout => checkout::run(&context).await,
        }
    }
}
