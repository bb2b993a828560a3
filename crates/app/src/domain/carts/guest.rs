//! Guest cart store.

use std::sync::Arc;

use tracing::warn;

use crate::{
    domain::{carts::models::GuestCartRecord, products::models::ProductId},
    storage::{self, KeyValueStore, StorageError},
};

/// Storage key holding the guest cart.
pub const GUEST_CART_KEY: &str = "cart:guest";

/// Guest cart persisted as one JSON document of `{product_id, qty}` entries.
#[derive(Clone)]
pub struct GuestStore {
    store: Arc<dyn KeyValueStore>,
}

impl GuestStore {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Read the persisted cart. Missing, unreadable or malformed documents read
    /// as an empty cart; zero-quantity entries are dropped.
    pub async fn read_all(&self) -> Vec<GuestCartRecord> {
        let json = match self.store.get(GUEST_CART_KEY).await {
            Ok(Some(json)) => json,
            Ok(None) => return Vec::new(),
            Err(error) => {
                warn!("guest cart unreadable, treating as empty: {error}");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<GuestCartRecord>>(&json) {
            Ok(mut records) => {
                records.retain(|record| record.qty > 0);
                records
            }
            Err(error) => {
                warn!("guest cart malformed, treating as empty: {error}");
                Vec::new()
            }
        }
    }

    /// Overwrite the persisted cart with `records` in one write.
    ///
    /// # Errors
    ///
    /// Returns an error when the records cannot be encoded or the underlying
    /// store rejects the write.
    pub async fn write_all(&self, records: &[GuestCartRecord]) -> Result<(), StorageError> {
        storage::set_json(self.store.as_ref(), GUEST_CART_KEY, records).await
    }
}

impl std::fmt::Debug for GuestStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuestStore")
            .field("key", &GUEST_CART_KEY)
            .finish_non_exhaustive()
    }
}

/// Add `delta` to the entry for `product`, appending one when absent.
pub(crate) fn increment(records: &mut Vec<GuestCartRecord>, product: ProductId, delta: u32) {
    match records.iter_mut().find(|record| record.product_id == product) {
        Some(record) => record.qty = record.qty.saturating_add(delta).max(1),
        None => records.push(GuestCartRecord {
            product_id: product,
            qty: delta.max(1),
        }),
    }
}

/// Set the entry for `product` to `qty`, removing it at zero.
pub(crate) fn set_quantity(records: &mut Vec<GuestCartRecord>, product: ProductId, qty: u32) {
    let position = records
        .iter()
        .position(|record| record.product_id == product);

    match (position, qty) {
        (Some(index), 0) => {
            records.remove(index);
        }
        (Some(index), qty) => {
            if let Some(record) = records.get_mut(index) {
                record.qty = qty;
            }
        }
        (None, 0) => {}
        (None, qty) => records.push(GuestCartRecord {
            product_id: product,
            qty,
        }),
    }
}
