//! In-memory cart service.

use std::sync::Mutex;

use async_trait::async_trait;
use rustc_hash::FxHashSet;

use crate::{
    api::ApiError,
    auth::BearerToken,
    domain::{
        carts::{
            errors::RemoteCartError,
            models::{CartLineId, NewCartLine, RemoteCart, RemoteCartItem},
            remote::RemoteCartService,
        },
        products::models::{Product, ProductId},
    },
};

/// Operations that can be told to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum FakeOp {
    Fetch,
    Create,
    SetQuantity,
    Delete,
    Clear,
}

/// Calls the service received, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum FakeCall {
    Fetch,
    Create(NewCartLine),
    SetQuantity(CartLineId, u32),
    Delete(CartLineId),
    Clear,
}

/// Cart service holding one customer's cart in memory, accepting a single
/// bearer token and embedding product data from a fixed catalog.
#[derive(Debug)]
pub(crate) struct FakeCartService {
    token: String,
    catalog: Vec<Product>,
    state: Mutex<FakeCart>,
}

#[derive(Debug, Default)]
struct FakeCart {
    items: Vec<RemoteCartItem>,
    next_id: u64,
    failing: FxHashSet<FakeOp>,
    calls: Vec<FakeCall>,
}

impl FakeCartService {
    pub(crate) fn new(token: &str, catalog: Vec<Product>) -> Self {
        Self {
            token: token.to_string(),
            catalog,
            state: Mutex::new(FakeCart {
                next_id: 100,
                ..FakeCart::default()
            }),
        }
    }

    pub(crate) fn with_lines(self, lines: &[(u64, u32)]) -> Self {
        {
            let mut state = self.state.lock().expect("fake cart lock");

            for (product, qty) in lines {
                let item = self.item(&mut state, ProductId::new(*product), *qty);
                state.items.push(item);
            }
        }

        self
    }

    pub(crate) fn fail(&self, op: FakeOp) {
        self.state.lock().expect("fake cart lock").failing.insert(op);
    }

    pub(crate) fn recover(&self, op: FakeOp) {
        self.state.lock().expect("fake cart lock").failing.remove(&op);
    }

    pub(crate) fn calls(&self) -> Vec<FakeCall> {
        self.state.lock().expect("fake cart lock").calls.clone()
    }

    pub(crate) fn quantities(&self) -> Vec<(u64, u32)> {
        self.state
            .lock()
            .expect("fake cart lock")
            .items
            .iter()
            .map(|item| (item.product_id.get(), item.qty))
            .collect()
    }

    fn item(&self, state: &mut FakeCart, product: ProductId, qty: u32) -> RemoteCartItem {
        state.next_id += 1;

        RemoteCartItem {
            id: CartLineId::new(state.next_id),
            product_id: product,
            qty,
            product: self.catalog.iter().find(|p| p.id == product).cloned(),
        }
    }

    fn begin(
        &self,
        credential: &BearerToken,
        op: FakeOp,
        call: FakeCall,
    ) -> Result<std::sync::MutexGuard<'_, FakeCart>, RemoteCartError> {
        let mut state = self.state.lock().expect("fake cart lock");

        state.calls.push(call);

        if credential.expose() != self.token {
            return Err(RemoteCartError::Unauthenticated);
        }

        if state.failing.contains(&op) {
            return Err(RemoteCartError::Network(ApiError::UnexpectedResponse {
                status: 503,
                message: "unavailable".to_string(),
            }));
        }

        Ok(state)
    }
}

#[async_trait]
impl RemoteCartService for FakeCartService {
    async fn fetch_cart(&self, credential: &BearerToken) -> Result<RemoteCart, RemoteCartError> {
        let state = self.begin(credential, FakeOp::Fetch, FakeCall::Fetch)?;

        Ok(RemoteCart {
            items: state.items.clone(),
            subtotal: None,
        })
    }

    async fn create_line(
        &self,
        credential: &BearerToken,
        line: NewCartLine,
    ) -> Result<RemoteCartItem, RemoteCartError> {
        let mut state = self.begin(credential, FakeOp::Create, FakeCall::Create(line))?;

        if let Some(item) = state
            .items
            .iter_mut()
            .find(|item| item.product_id == line.product_id)
        {
            item.qty += line.qty;
            return Ok(item.clone());
        }

        let item = self.item(&mut state, line.product_id, line.qty);
        state.items.push(item.clone());

        Ok(item)
    }

    async fn set_line_quantity(
        &self,
        credential: &BearerToken,
        line: CartLineId,
        qty: u32,
    ) -> Result<RemoteCartItem, RemoteCartError> {
        let mut state = self.begin(
            credential,
            FakeOp::SetQuantity,
            FakeCall::SetQuantity(line, qty),
        )?;

        let item = state
            .items
            .iter_mut()
            .find(|item| item.id == line)
            .ok_or(RemoteCartError::NotFound)?;

        item.qty = qty;

        Ok(item.clone())
    }

    async fn delete_line(
        &self,
        credential: &BearerToken,
        line: CartLineId,
    ) -> Result<(), RemoteCartError> {
        let mut state = self.begin(credential, FakeOp::Delete, FakeCall::Delete(line))?;

        let before = state.items.len();
        state.items.retain(|item| item.id != line);

        if state.items.len() == before {
            return Err(RemoteCartError::NotFound);
        }

        Ok(())
    }

    async fn clear(&self, credential: &BearerToken) -> Result<(), RemoteCartError> {
        let mut state = self.begin(credential, FakeOp::Clear, FakeCall::Clear)?;

        state.items.clear();

        Ok(())
    }
}
