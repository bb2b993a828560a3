//! Per-product mutation sequencing.

use std::sync::Arc;

use rustc_hash::FxHashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::domain::products::models::ProductId;

/// Serializes cart mutations that target the same product.
///
/// Mutations on different products still run concurrently.
#[derive(Debug, Default)]
pub(crate) struct ProductSequencer {
    slots: Mutex<FxHashMap<ProductId, Arc<Mutex<()>>>>,
}

impl ProductSequencer {
    /// Wait for earlier mutations of `product` to settle and claim its slot
    /// until the returned guard is dropped.
    pub(crate) async fn acquire(&self, product: ProductId) -> OwnedMutexGuard<()> {
        let slot = {
            let mut slots = self.slots.lock().await;

            // Slots referenced only by the map have no holder or waiter.
            slots.retain(|_, slot| Arc::strong_count(slot) > 1);

            Arc::clone(slots.entry(product).or_default())
        };

        slot.lock_owned().await
    }
}
