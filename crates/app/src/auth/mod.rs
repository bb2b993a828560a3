//! Authentication

pub mod account;
mod errors;
mod models;
mod service;
pub mod session;
mod token;

pub use account::Account;
pub use errors::*;
pub use models::*;
pub use service::*;
pub use session::SessionStore;
pub use token::*;
