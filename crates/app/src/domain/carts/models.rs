//! Cart Models

use serde::{Deserialize, Serialize};

use crate::{
    domain::products::models::{Product, ProductId, price},
    ids::TypedId,
};

/// Remote Cart Line Id
pub type CartLineId = TypedId<CartLine>;

/// One product/quantity pairing within a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    /// Assigned by the cart service; absent for guest and optimistic lines.
    pub id: Option<CartLineId>,
    pub product: Product,

    /// Units in the cart, at least 1.
    pub quantity: u32,
}

impl CartLine {
    /// Price of the line in cents.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.product.price.saturating_mul(u64::from(self.quantity))
    }
}

/// Derived cart view.
///
/// Totals are computed when the view is built and the lines cannot be changed
/// afterwards, so they always agree with the line set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartView {
    lines: Vec<CartLine>,
    subtotal: u64,
    total_quantity: u64,
}

impl CartView {
    /// Build a view, dropping any line whose quantity is zero.
    #[must_use]
    pub fn from_lines(mut lines: Vec<CartLine>) -> Self {
        lines.retain(|line| line.quantity > 0);

        let subtotal = lines
            .iter()
            .fold(0_u64, |sum, line| sum.saturating_add(line.total()));
        let total_quantity = lines.iter().map(|line| u64::from(line.quantity)).sum();

        Self {
            lines,
            subtotal,
            total_quantity,
        }
    }

    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }

    /// Sum of price × quantity over all lines, in cents.
    #[must_use]
    pub fn subtotal(&self) -> u64 {
        self.subtotal
    }

    /// Sum of quantities over all lines.
    #[must_use]
    pub fn total_quantity(&self) -> u64 {
        self.total_quantity
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    #[must_use]
    pub fn line(&self, product: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.product.id == product)
    }

    #[must_use]
    pub fn quantity_of(&self, product: ProductId) -> u32 {
        self.line(product).map_or(0, |line| line.quantity)
    }
}

/// Which authoritative source backs the cart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdentityMode {
    #[default]
    Guest,
    Authenticated,
}

/// Snapshot published to cart observers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartState {
    /// Whose cart is shown.
    pub mode: IdentityMode,

    pub view: CartView,

    /// Set while a non-silent refresh is running.
    pub is_busy: bool,
}

/// Persisted guest cart entry. `qty` is at least 1 for every stored entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestCartRecord {
    pub product_id: ProductId,
    pub qty: u32,
}

/// Body of `GET /cart`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RemoteCart {
    #[serde(default)]
    pub items: Vec<RemoteCartItem>,

    /// Server-computed subtotal in cents. Informational only: views always
    /// recompute their own totals.
    #[serde(default, deserialize_with = "price::deserialize_optional")]
    pub subtotal: Option<u64>,
}

impl RemoteCart {
    #[must_use]
    pub fn item(&self, product: ProductId) -> Option<&RemoteCartItem> {
        self.items.iter().find(|item| item.product_id == product)
    }
}

/// A line as tracked by the cart service.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteCartItem {
    pub id: CartLineId,
    pub product_id: ProductId,
    pub qty: u32,

    /// Embedded product data, when the service includes it.
    #[serde(default)]
    pub product: Option<Product>,
}

/// Body of `POST /cart`. The quantity is added to any existing line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct NewCartLine {
    pub product_id: ProductId,
    pub qty: u32,
}

/// Body of `PUT /cart/{line_id}`. The quantity replaces the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub(crate) struct QuantityUpdate {
    pub qty: u32,
}

/// Caller-supplied absolute quantity, floored and clamped to `0..=u32::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestedQuantity(u32);

impl RequestedQuantity {
    #[must_use]
    pub const fn get(self) -> u32 {
        self.0
    }
}

impl From<u32> for RequestedQuantity {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl From<i64> for RequestedQuantity {
    fn from(value: i64) -> Self {
        Self(u32::try_from(value.max(0)).unwrap_or(u32::MAX))
    }
}

impl From<i32> for RequestedQuantity {
    fn from(value: i32) -> Self {
        Self::from(i64::from(value))
    }
}

impl From<f64> for RequestedQuantity {
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "value is floored and clamped into u32 range first"
    )]
    fn from(value: f64) -> Self {
        if value.is_nan() || value < 1.0 {
            return Self(0);
        }

        Self(value.floor().min(f64::from(u32::MAX)) as u32)
    }
}
