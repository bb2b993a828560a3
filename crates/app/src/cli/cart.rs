use clap::{Args, Subcommand};
use suds_app::{context::AppContext, domain::products::models::ProductId};

use crate::cli::output;

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Show the cart
    Show,

    /// Add units of a product
    Add(AddArgs),

    /// Set the quantity of a product; zero or less removes it
    Update(UpdateArgs),

    /// Remove a product
    Remove(RemoveArgs),

    /// Remove everything
    Clear,
}

#[derive(Debug, Args)]
struct AddArgs {
    /// Product id or slug
    product: String,

    /// Units to add
    #[arg(long, default_value_t = 1)]
    qty: u32,
}

#[derive(Debug, Args)]
struct UpdateArgs {
    /// Product id or slug
    product: String,

    /// New quantity; fractions are rounded down
    #[arg(allow_negative_numbers = true)]
    qty: f64,
}

#[derive(Debug, Args)]
struct RemoveArgs {
    /// Product id or slug
    product: String,
}

pub(crate) async fn run(command: CartCommand, context: &AppContext) -> Result<String, String> {
    let cart = &context.cart;

    let view = match command.command {
        CartSubcommand::Show => cart.view(),
        CartSubcommand::Add(args) => {
            let product = resolve_product(context, &args.product).await?;
            cart.add(product, args.qty).await
        }
        CartSubcommand::Update(args) => {
            let product = resolve_product(context, &args.product).await?;
            cart.update(product, args.qty).await
        }
        CartSubcommand::Remove(args) => {
            let product = resolve_product(context, &args.product).await?;
            cart.remove(product).await
        }
        CartSubcommand::Clear => cart.clear().await,
    };

    Ok(output::cart(&view, cart.mode()))
}

/// Accept either a numeric product id or a catalog slug.
async fn resolve_product(context: &AppContext, reference: &str) -> Result<ProductId, String> {
    if let Ok(id) = reference.parse::<u64>() {
        return Ok(ProductId::new(id));
    }

    context
        .products
        .ensure_loaded()
        .await
        .map_err(|error| format!("failed to load catalog: {error}"))?;

    context
        .products
        .get_by_slug(reference)
        .map(|product| product.id)
        .ok_or_else(|| format!("unknown product: {reference}"))
}

#[cfg(test)]
mod tests {
    use clap::Parser;
    use suds_app::domain::carts::models::RequestedQuantity;

    use super::*;

    #[derive(Debug, Parser)]
    struct Harness {
        #[command(flatten)]
        cart: CartCommand,
    }

    fn requested(args: &[&str]) -> Option<u32> {
        let harness = Harness::try_parse_from(args).ok()?;

        match harness.cart.command {
            CartSubcommand::Update(update) => Some(RequestedQuantity::from(update.qty).get()),
            _ => None,
        }
    }

    #[test]
    fn update_quantity_is_floored_and_clamped() {
        assert_eq!(requested(&["cart", "update", "lavanda", "2.5"]), Some(2));
        assert_eq!(requested(&["cart", "update", "lavanda", "3"]), Some(3));
        assert_eq!(requested(&["cart", "update", "lavanda", "-1.5"]), Some(0));
        assert_eq!(requested(&["cart", "update", "lavanda", "0.9"]), Some(0));
    }

    #[test]
    fn update_rejects_non_numeric_quantity() {
        assert_eq!(requested(&["cart", "update", "lavanda", "two"]), None);
    }
}
