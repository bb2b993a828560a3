//! Products

pub mod cache;
pub mod errors;
pub mod models;
pub mod service;

pub use cache::ProductLookupCache;
pub use errors::CatalogServiceError;
pub use service::*;
