//! Cart Reconciler
//!
//! Presents one cart regardless of who is shopping. Guests are backed by the
//! local [`GuestStore`]; signed-in customers by the remote cart service.
//! Authenticated mutations are applied to the in-memory lines straight away
//! and then confirmed remotely. Every mutation ends with a silent refresh from
//! whichever source is authoritative, so optimistic values never outlive the
//! next reload.

use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::{
    auth::BearerToken,
    domain::{
        carts::{
            errors::{CartMutationError, RemoteCartError},
            guest::{self, GuestStore},
            models::{CartLine, CartState, CartView, IdentityMode, NewCartLine, RequestedQuantity},
            remote::{RemoteCartClient, RemoteCartService},
            sequencer::ProductSequencer,
            source::{CartSource, GuestCartPolicy},
        },
        products::{
            cache::ProductLookupCache,
            models::{Product, ProductId},
        },
    },
};

/// Current identity. The epoch increases on every identity change so that
/// work started under an earlier identity can recognise itself as stale.
#[derive(Debug, Clone, Default)]
struct Identity {
    source: CartSource,
    epoch: u64,
}

/// Single cart over the guest store and the remote cart service.
///
/// Operations never fail: errors are logged and followed by a refresh from
/// the authoritative source, and the settled view is returned.
pub struct CartReconciler {
    guest: GuestStore,
    remote: Arc<dyn RemoteCartService>,
    products: Arc<ProductLookupCache>,
    policy: GuestCartPolicy,
    sequencer: ProductSequencer,
    identity: watch::Sender<Identity>,
    state: watch::Sender<CartState>,
    busy_refreshes: AtomicUsize,
}

impl CartReconciler {
    /// Create a reconciler in guest mode with an empty view. Call
    /// [`load`](Self::load) to read the initial contents.
    #[must_use]
    pub fn new(
        guest: GuestStore,
        remote: Arc<dyn RemoteCartService>,
        products: Arc<ProductLookupCache>,
    ) -> Self {
        Self {
            guest,
            remote,
            products,
            policy: GuestCartPolicy::default(),
            sequencer: ProductSequencer::default(),
            identity: watch::channel(Identity::default()).0,
            state: watch::channel(CartState::default()).0,
            busy_refreshes: AtomicUsize::new(0),
        }
    }

    #[must_use]
    pub fn with_guest_cart_policy(mut self, policy: GuestCartPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Receive every published [`CartState`].
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn state(&self) -> CartState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn view(&self) -> CartView {
        self.state.borrow().view.clone()
    }

    #[must_use]
    pub fn mode(&self) -> IdentityMode {
        self.identity.borrow().source.mode()
    }

    #[must_use]
    pub fn guest_cart_policy(&self) -> GuestCartPolicy {
        self.policy
    }

    /// Credential of the signed-in customer, if any.
    #[must_use]
    pub fn credential(&self) -> Option<BearerToken> {
        self.identity.borrow().source.credential().cloned()
    }

    /// Guest store backing guest mode.
    #[must_use]
    pub fn guest_store(&self) -> &GuestStore {
        &self.guest
    }

    /// Initial, non-silent load from the current source.
    pub async fn load(&self) -> CartView {
        self.refresh(false).await
    }

    /// Re-derive the lines from the authoritative source.
    ///
    /// A non-silent refresh marks the state busy while it runs. When the load
    /// fails the current lines are kept; when the identity changed while it
    /// ran the result is discarded.
    pub async fn refresh(&self, silent: bool) -> CartView {
        let Identity { source, epoch } = self.identity.borrow().clone();
        let busy = (!silent).then(|| self.busy());

        match self.load_lines(&source).await {
            Ok(lines) => {
                if !self.replace_lines(epoch, lines) {
                    debug!(epoch, "dropped cart refresh for a previous identity");
                }
            }
            Err(error) => {
                warn!(mode = ?source.mode(), "cart refresh failed, keeping current lines: {error}");
            }
        }

        drop(busy);

        self.view()
    }

    /// Switch identity and reload from the new source.
    ///
    /// The previous lines are discarded immediately. With
    /// [`GuestCartPolicy::Merge`], a guest signing in first has the guest cart
    /// moved into the remote cart.
    pub async fn set_credential(&self, credential: Option<BearerToken>) -> CartView {
        let source = CartSource::from_credential(credential);
        let mode = source.mode();
        let mut previous = CartSource::Guest;

        self.identity.send_modify(|identity| {
            previous = std::mem::replace(&mut identity.source, source.clone());
            identity.epoch = identity.epoch.wrapping_add(1);
        });

        // Busy from the moment the old lines are dropped until the new ones land.
        let _busy = self.busy();

        self.state.send_modify(|state| {
            state.mode = mode;
            state.view = CartView::default();
        });

        debug!(?mode, "cart identity changed");

        if let (GuestCartPolicy::Merge, CartSource::Guest, CartSource::Authenticated(token)) =
            (self.policy, &previous, &source)
        {
            self.merge_guest_cart(token.clone()).await;
        }

        self.refresh(false).await
    }

    /// Add `delta` units of `product`. Zero is a no-op.
    pub async fn add(&self, product: ProductId, delta: u32) -> CartView {
        if delta == 0 {
            return self.view();
        }

        let _slot = self.sequencer.acquire(product).await;
        let Identity { source, epoch } = self.identity.borrow().clone();

        let outcome = match source {
            CartSource::Guest => self.add_to_guest(product, delta).await,
            CartSource::Authenticated(token) => {
                self.add_to_remote(token, epoch, product, delta).await
            }
        };

        if let Err(error) = outcome {
            warn!(%product, delta, "cart add failed, reconciling: {error}");
        }

        self.refresh(true).await
    }

    /// Set the quantity of `product`, removing the line at zero. Negative and
    /// fractional requests are floored and clamped first.
    pub async fn update(&self, product: ProductId, quantity: impl Into<RequestedQuantity>) -> CartView {
        let quantity = quantity.into().get();

        let _slot = self.sequencer.acquire(product).await;
        let Identity { source, epoch } = self.identity.borrow().clone();

        let outcome = match source {
            CartSource::Guest => self.update_guest(product, quantity).await,
            CartSource::Authenticated(token) => {
                self.update_remote(token, epoch, product, quantity).await
            }
        };

        if let Err(error) = outcome {
            warn!(%product, quantity, "cart update failed, reconciling: {error}");
        }

        self.refresh(true).await
    }

    /// Remove every unit of `product`.
    pub async fn remove(&self, product: ProductId) -> CartView {
        self.update(product, 0_u32).await
    }

    /// Empty the cart. Best effort: the outcome is verified by a silent
    /// refresh whether or not the write succeeded.
    pub async fn clear(&self) -> CartView {
        let Identity { source, epoch } = self.identity.borrow().clone();

        self.modify_lines(epoch, Vec::clear);

        let outcome: Result<(), CartMutationError> = match source {
            CartSource::Guest => self.guest.write_all(&[]).await.map_err(Into::into),
            CartSource::Authenticated(token) => {
                self.remote_for(token).clear().await.map_err(Into::into)
            }
        };

        if let Err(error) = outcome {
            warn!("cart clear failed, reconciling: {error}");
        }

        self.refresh(true).await
    }

    async fn add_to_guest(&self, product: ProductId, delta: u32) -> Result<(), CartMutationError> {
        let mut records = self.guest.read_all().await;

        guest::increment(&mut records, product, delta);

        Ok(self.guest.write_all(&records).await?)
    }

    async fn add_to_remote(
        &self,
        token: BearerToken,
        epoch: u64,
        product: ProductId,
        delta: u32,
    ) -> Result<(), CartMutationError> {
        let snapshot = self.view().line(product).cloned();
        let display = match &snapshot {
            Some(line) => line.product.clone(),
            None => self.products.display(product).await,
        };

        self.modify_lines(epoch, |lines| increment_line(lines, display, delta));

        let created = self
            .remote_for(token)
            .create_line(NewCartLine {
                product_id: product,
                qty: delta,
            })
            .await;

        if created.is_err() {
            self.modify_lines(epoch, |lines| restore_line(lines, product, snapshot));
        }

        created?;

        Ok(())
    }

    async fn update_guest(&self, product: ProductId, quantity: u32) -> Result<(), CartMutationError> {
        let mut records = self.guest.read_all().await;

        guest::set_quantity(&mut records, product, quantity);

        Ok(self.guest.write_all(&records).await?)
    }

    async fn update_remote(
        &self,
        token: BearerToken,
        epoch: u64,
        product: ProductId,
        quantity: u32,
    ) -> Result<(), CartMutationError> {
        let remote = self.remote_for(token);

        // Only the service knows the line id for a product.
        let cart = remote.fetch_cart().await?;
        let existing = cart.item(product);

        let display = if quantity > 0 && self.view().line(product).is_none() {
            match existing.and_then(|item| item.product.clone()) {
                Some(embedded) => Some(embedded),
                None => Some(self.products.display(product).await),
            }
        } else {
            None
        };

        let line = existing.map(|item| item.id);

        self.modify_lines(epoch, |lines| {
            set_line_quantity(lines, product, quantity, display);
        });

        match (line, quantity) {
            (None, 0) => {}
            (None, qty) => {
                remote
                    .create_line(NewCartLine {
                        product_id: product,
                        qty,
                    })
                    .await?;
            }
            (Some(line), 0) => remote.delete_line(line).await?,
            (Some(line), qty) => {
                remote.set_line_quantity(line, qty).await?;
            }
        }

        Ok(())
    }

    /// Post every guest line to the remote cart. Accepted lines leave the
    /// guest record; rejected ones stay for a later attempt.
    async fn merge_guest_cart(&self, token: BearerToken) {
        let records = self.guest.read_all().await;

        if records.is_empty() {
            return;
        }

        let remote = self.remote_for(token);
        let mut rejected = Vec::new();

        for record in records {
            let merged = remote
                .create_line(NewCartLine {
                    product_id: record.product_id,
                    qty: record.qty,
                })
                .await;

            if let Err(error) = merged {
                warn!(product = %record.product_id, "guest cart line not merged: {error}");
                rejected.push(record);
            }
        }

        if let Err(error) = self.guest.write_all(&rejected).await {
            warn!("guest cart not updated after merge: {error}");
        }

        info!(kept = rejected.len(), "guest cart merged into customer cart");
    }

    async fn load_lines(&self, source: &CartSource) -> Result<Vec<CartLine>, RemoteCartError> {
        match source {
            CartSource::Guest => Ok(self.load_guest_lines().await),
            CartSource::Authenticated(token) => self.load_remote_lines(token.clone()).await,
        }
    }

    async fn load_guest_lines(&self) -> Vec<CartLine> {
        let records = self.guest.read_all().await;

        if records.is_empty() {
            return Vec::new();
        }

        if let Err(error) = self.products.ensure_loaded().await {
            debug!("guest cart shown without product data: {error}");
        }

        records
            .into_iter()
            .map(|record| CartLine {
                id: None,
                product: self
                    .products
                    .get(record.product_id)
                    .cloned()
                    .unwrap_or_else(|| Product::placeholder(record.product_id)),
                quantity: record.qty,
            })
            .collect()
    }

    async fn load_remote_lines(&self, token: BearerToken) -> Result<Vec<CartLine>, RemoteCartError> {
        let cart = self.remote_for(token).fetch_cart().await?;
        let mut lines = Vec::with_capacity(cart.items.len());

        for item in cart.items {
            if item.qty == 0 {
                continue;
            }

            let product = match item.product {
                Some(product) if product.id == item.product_id => product,
                _ => self.products.display(item.product_id).await,
            };

            lines.push(CartLine {
                id: Some(item.id),
                product,
                quantity: item.qty,
            });
        }

        if let Some(reported) = cart.subtotal {
            let computed = CartView::from_lines(lines.clone()).subtotal();

            if reported != computed {
                debug!(reported, computed, "cart service subtotal differs from line prices");
            }
        }

        Ok(lines)
    }

    fn remote_for(&self, token: BearerToken) -> RemoteCartClient {
        RemoteCartClient::new(Arc::clone(&self.remote), Some(token))
    }

    fn is_current(&self, epoch: u64) -> bool {
        self.identity.borrow().epoch == epoch
    }

    /// Publish `lines` if `epoch` is still the current identity.
    ///
    /// The check runs while the state is held, so an identity change either
    /// happens-before (and the write is dropped) or clears the view after it.
    fn replace_lines(&self, epoch: u64, lines: Vec<CartLine>) -> bool {
        self.state.send_if_modified(|state| {
            if !self.is_current(epoch) {
                return false;
            }

            let view = CartView::from_lines(lines);
            let changed = state.view != view;
            state.view = view;
            changed
        });

        self.is_current(epoch)
    }

    fn modify_lines(&self, epoch: u64, change: impl FnOnce(&mut Vec<CartLine>)) {
        self.state.send_if_modified(|state| {
            if !self.is_current(epoch) {
                return false;
            }

            let mut lines = std::mem::take(&mut state.view).into_lines();
            change(&mut lines);
            state.view = CartView::from_lines(lines);
            true
        });
    }

    /// Mark the state busy until the returned guard is dropped, including
    /// when the awaiting future is cancelled.
    fn busy(&self) -> BusyGuard<'_> {
        self.state.send_modify(|state| {
            self.busy_refreshes.fetch_add(1, Ordering::SeqCst);
            state.is_busy = true;
        });

        BusyGuard { cart: self }
    }
}

struct BusyGuard<'a> {
    cart: &'a CartReconciler,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        let cart = self.cart;

        cart.state.send_modify(|state| {
            let running = cart
                .busy_refreshes
                .fetch_sub(1, Ordering::SeqCst)
                .saturating_sub(1);

            state.is_busy = running > 0;
        });
    }
}

impl std::fmt::Debug for CartReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartReconciler")
            .field("mode", &self.mode())
            .field("policy", &self.policy)
            .field("state", &*self.state.borrow())
            .finish_non_exhaustive()
    }
}

fn increment_line(lines: &mut Vec<CartLine>, product: Product, delta: u32) {
    match lines.iter_mut().find(|line| line.product.id == product.id) {
        Some(line) => line.quantity = line.quantity.saturating_add(delta),
        None => lines.push(CartLine {
            id: None,
            product,
            quantity: delta,
        }),
    }
}

fn set_line_quantity(
    lines: &mut Vec<CartLine>,
    product: ProductId,
    quantity: u32,
    display: Option<Product>,
) {
    match lines.iter_mut().find(|line| line.product.id == product) {
        Some(line) => line.quantity = quantity,
        None if quantity > 0 => lines.push(CartLine {
            id: None,
            product: display.unwrap_or_else(|| Product::placeholder(product)),
            quantity,
        }),
        None => {}
    }
}

/// Put the line for `product` back to how it was before an optimistic change.
fn restore_line(lines: &mut Vec<CartLine>, product: ProductId, snapshot: Option<CartLine>) {
    let position = lines.iter().position(|line| line.product.id == product);

    match (position, snapshot) {
        (Some(index), Some(line)) => {
            if let Some(current) = lines.get_mut(index) {
                *current = line;
            }
        }
        (Some(index), None) => {
            lines.remove(index);
        }
        (None, Some(line)) => lines.push(line),
        (None, None) => {}
    }
}
