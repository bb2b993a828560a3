//! Checkout Models

use serde::{Deserialize, Serialize};

use crate::domain::carts::models::{CartView, GuestCartRecord};

/// Placeholder the payment provider replaces with its session id.
pub const CHECKOUT_SESSION_PLACEHOLDER: &str = "{CHECKOUT_SESSION_ID}";

/// Where the payment provider sends the customer afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckoutRedirects {
    pub success_url: String,
    pub cancel_url: String,
}

impl CheckoutRedirects {
    /// Redirects back to the storefront at `origin`: the success page on
    /// payment, the cart on cancel.
    #[must_use]
    pub fn for_origin(origin: &str) -> Self {
        let origin = origin.trim_end_matches('/');

        Self {
            success_url: format!("{origin}/success?session_id={CHECKOUT_SESSION_PLACEHOLDER}"),
            cancel_url: format!("{origin}/cart"),
        }
    }
}

/// A payment session ready for the customer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CheckoutSession {
    /// Hosted payment page.
    pub url: String,
}

/// Body of `POST /checkout/session_guest`.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct GuestCheckoutRequest<'a> {
    pub items: &'a [GuestCartRecord],

    #[serde(flatten)]
    pub redirects: &'a CheckoutRedirects,
}

/// Line list submitted for a guest checkout.
#[must_use]
pub fn guest_items(view: &CartView) -> Vec<GuestCartRecord> {
    view.lines()
        .iter()
        .map(|line| GuestCartRecord {
            product_id: line.product.id,
            qty: line.quantity,
        })
        .collect()
}
