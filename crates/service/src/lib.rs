//! Service layer for the laundry booking backend.
//! - Business rules for bookings, shops, Metapay wallets and accounts.
//! - Persistence behind repository traits (`repo::seaorm` for Postgres,
//!   `repo::memory` for tests and local runs).
//! - Framework independent: the HTTP crate only maps inputs and errors.

pub mod errors;
pub mod pagination;
pub mod auth;
pub mod users;
pub mod booking;
pub mod laundry;
pub mod metapay;
pub mod repo;
#[cfg(test)]
pub mod test_support;

pub use auth::domain::Caller;
pub use errors::ServiceError;
