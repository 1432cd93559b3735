//! User accounts: lookup, profile updates and the admin user listing.

pub mod domain;
pub mod repository;
pub mod service;

pub use service::UserService;
