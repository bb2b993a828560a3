//! Plain-text rendering of command results.

use std::fmt::Write as _;

use rusty_money::{Money, iso};
use suds_app::{
    auth::User,
    domain::{
        carts::models::{CartView, IdentityMode},
        products::models::Product,
    },
};

/// Format an amount in euro cents.
pub(crate) fn money(cents: u64) -> String {
    Money::from_minor(i64::try_from(cents).unwrap_or(i64::MAX), iso::EUR).to_string()
}

pub(crate) fn products(products: &[Product]) -> String {
    if products.is_empty() {
        return "no products".to_string();
    }

    let mut out = String::new();

    for product in products {
        _ = writeln!(
            out,
            "{:>4}  {:<32}  {:>10}  {}",
            product.id,
            product.name,
            money(product.price),
            product.slug
        );
    }

    out.trim_end().to_string()
}

pub(crate) fn product(product: &Product) -> String {
    let mut out = format!(
        "{} ({})\nid: {}\nprice: {}",
        product.name,
        product.slug,
        product.id,
        money(product.price)
    );

    for (label, text) in [
        ("description", &product.short_description),
        ("usage", &product.usage),
        ("warnings", &product.warnings),
        ("image", &product.image),
    ] {
        if let Some(text) = text {
            _ = write!(out, "\n{label}: {text}");
        }
    }

    out
}

pub(crate) fn cart(view: &CartView, mode: IdentityMode) -> String {
    let owner = match mode {
        IdentityMode::Guest => "guest cart",
        IdentityMode::Authenticated => "customer cart",
    };

    if view.is_empty() {
        return format!("{owner}: empty");
    }

    let mut out = format!("{owner}:");

    for line in view.lines() {
        let name = if line.product.name.is_empty() {
            format!("product {}", line.product.id)
        } else {
            line.product.name.clone()
        };

        _ = write!(
            out,
            "\n{:>3} x {:<32} {:>10}",
            line.quantity,
            name,
            money(line.total())
        );
    }

    _ = write!(
        out,
        "\nitems: {}  subtotal: {}",
        view.total_quantity(),
        money(view.subtotal())
    );

    out
}

pub(crate) fn user(user: &User) -> String {
    if user.name.is_empty() {
        return user.email.clone();
    }

    format!("{} <{}>", user.name, user.email)
}

#[cfg(test)]
mod tests {
    use suds_app::domain::{carts::models::CartLine, products::models::ProductId};

    use super::*;

    fn soap(id: u64, name: &str, price: u64) -> Product {
        let mut product = Product::placeholder(ProductId::new(id));
        product.name = name.to_string();
        product.slug = name.to_lowercase();
        product.price = price;
        product
    }

    #[test]
    fn money_renders_whole_and_fractional_euros() {
        let rendered = money(890);

        assert!(rendered.contains('8'), "missing units in {rendered}");
        assert!(rendered.contains("90"), "missing cents in {rendered}");
        assert!(rendered.contains('€'), "missing currency in {rendered}");
    }

    #[test]
    fn empty_cart_names_its_owner() {
        assert_eq!(cart(&CartView::default(), IdentityMode::Guest), "guest cart: empty");
        assert_eq!(
            cart(&CartView::default(), IdentityMode::Authenticated),
            "customer cart: empty"
        );
    }

    #[test]
    fn cart_lists_lines_and_totals() {
        let view = CartView::from_lines(vec![
            CartLine {
                id: None,
                product: soap(1, "Lavanda", 450),
                quantity: 2,
            },
            CartLine {
                id: None,
                product: Product::placeholder(ProductId::new(9)),
                quantity: 1,
            },
        ]);

        let rendered = cart(&view, IdentityMode::Guest);

        assert!(rendered.starts_with("guest cart:"), "{rendered}");
        assert!(rendered.contains("2 x Lavanda"), "{rendered}");
        assert!(rendered.contains("product 9"), "{rendered}");
        assert!(rendered.contains("items: 3"), "{rendered}");
    }

    #[test]
    fn product_detail_skips_missing_text() {
        let mut lavanda = soap(1, "Lavanda", 450);
        lavanda.usage = Some("Aplicar sobre piel húmeda".to_string());

        let rendered = product(&lavanda);

        assert!(rendered.contains("usage: Aplicar"), "{rendered}");
        assert!(!rendered.contains("warnings"), "{rendered}");
    }

    #[test]
    fn user_without_name_shows_email() {
        let user = User {
            name: String::new(),
            email: "ana@example.com".to_string(),
        };

        assert_eq!(super::user(&user), "ana@example.com");
    }
}
