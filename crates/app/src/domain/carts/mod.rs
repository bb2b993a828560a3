//! Carts

pub mod errors;
pub mod guest;
pub mod models;
pub mod reconciler;
pub mod remote;
mod sequencer;
pub mod source;

pub use errors::RemoteCartError;
pub use guest::GuestStore;
pub use reconciler::CartReconciler;
pub use remote::*;
pub use source::{CartSource, GuestCartPolicy};
