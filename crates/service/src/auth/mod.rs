//! Auth module: registration, login and bearer token handling.
//!
//! Persistence goes through `users::repository::UserRepository`; this module
//! only adds password hashing and token issuance on top.

pub mod domain;
pub mod errors;
pub mod service;
pub mod token;

pub use service::{AuthConfig, AuthService};
