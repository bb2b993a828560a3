//! Storefront client for the Senda de Suds soap shop: catalog, dual-mode
//! cart, customer accounts and checkout handoff over the shop's REST API.

pub mod api;
pub mod auth;
pub mod context;
pub mod domain;
pub mod ids;
pub mod storage;

#[cfg(test)]
mod test;
