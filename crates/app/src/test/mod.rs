//! Shared test fixtures.

pub(crate) mod fake_cart;
pub(crate) mod helpers;
