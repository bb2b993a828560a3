use clap::{Args, Subcommand};
use suds_app::context::AppContext;

use crate::cli::output;

#[derive(Debug, Args)]
pub(crate) struct ProductsCommand {
    #[command(subcommand)]
    command: ProductsSubcommand,
}

#[derive(Debug, Subcommand)]
enum ProductsSubcommand {
    /// List the whole catalog
    List,

    /// Show one product
    Show(ShowProductArgs),
}

#[derive(Debug, Args)]
struct ShowProductArgs {
    /// Product slug
    slug: String,
}

pub(crate) async fn run(command: ProductsCommand, context: &AppContext) -> Result<String, String> {
    match command.command {
        ProductsSubcommand::List => {
            let products = context
                .products
                .ensure_loaded()
                .await
                .map_err(|error| format!("failed to load catalog: {error}"))?;

            Ok(output::products(products))
        }
        ProductsSubcommand::Show(args) => {
            let product = context
                .catalog
                .get_product(&args.slug)
                .await
                .map_err(|error| format!("failed to load product {}: {error}", args.slug))?;

            Ok(output::product(&product))
        }
    }
}
